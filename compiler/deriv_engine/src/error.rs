//! Engine errors.
//!
//! Call-level errors (`UnsupportedType`, `SignatureMismatch`) are collected
//! against their call sites; name errors abort the run.

use std::fmt;

use deriv_ir::FrontendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("{plugin}: unsupported type `{ty}`: {reason}")]
    UnsupportedType {
        plugin: String,
        ty: String,
        reason: String,
    },

    #[error("{plugin}: {message}")]
    SignatureMismatch { plugin: String, message: String },

    #[error("signature ({signature}) is already named `{existing}`, cannot also name it `{requested}`")]
    AmbiguousName {
        signature: String,
        existing: String,
        requested: String,
    },

    #[error("`{name}` is bound to ({existing}), cannot also bind it to ({requested})")]
    ConflictingName {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("plugin `{plugin}` depends on unknown plugin `{dependency}`")]
    MissingDependency { plugin: String, dependency: String },

    #[error("pass {pass} made no progress; unresolved calls:\n{}", .unresolved.join("\n"))]
    NoProgress { pass: usize, unresolved: Vec<String> },

    #[error("{} call(s) could not be derived:\n{}", .0.len(), FailureList(.0))]
    CallsFailed(Vec<CallFailure>),

    #[error(transparent)]
    Frontend(#[from] FrontendError),
}

impl DeriveError {
    /// Naming errors abort the run instead of failing a single call.
    pub fn is_name_error(&self) -> bool {
        matches!(
            self,
            DeriveError::AmbiguousName { .. } | DeriveError::ConflictingName { .. }
        )
    }

    pub(crate) fn unsupported(plugin: &str, ty: String, reason: impl Into<String>) -> Self {
        DeriveError::UnsupportedType {
            plugin: plugin.to_owned(),
            ty,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(plugin: &str, message: impl Into<String>) -> Self {
        DeriveError::SignatureMismatch {
            plugin: plugin.to_owned(),
            message: message.into(),
        }
    }
}

/// A call that failed validation.
#[derive(Debug)]
pub struct CallFailure {
    /// Rendered call site (`pkg/file#id: call(args)`).
    pub site: String,
    pub error: DeriveError,
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.error)
    }
}

struct FailureList<'a>(&'a [CallFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}
