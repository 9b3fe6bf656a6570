//! The boundary between the engine and whatever supplies programs.

use crate::{Artifact, CallLocation, FrontendError, Program};

/// Supplies type-checked programs and accepts the engine's output.
///
/// The engine calls `load` once per pass. Rewrites and artifacts written
/// during a pass are visible to the next `load`.
pub trait Frontend {
    /// Load the packages at `paths`; an empty list loads every package.
    fn load(&mut self, paths: &[String]) -> Result<Program, FrontendError>;

    /// Rename the callee of the call at `location`.
    fn rewrite_call(&mut self, location: &CallLocation, new_name: &str)
        -> Result<(), FrontendError>;

    /// Replace the package's generated artifact.
    fn write_artifact(&mut self, artifact: &Artifact) -> Result<(), FrontendError>;
}
