//! Front-end errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::ExprId;

/// Failures reported by a [`Frontend`](crate::Frontend).
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid program description {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown package `{path}`")]
    UnknownPackage { path: String },

    #[error("no call expression {expr} in {package}/{file}")]
    UnknownCall {
        package: String,
        file: String,
        expr: ExprId,
    },
}
