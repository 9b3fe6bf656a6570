//! In-memory front end.
//!
//! Serves a `ProgramSpec` and keeps whatever the engine writes back:
//! call rewrites are applied to the `ProgramSpec` itself and artifacts are stored
//! per package. Every `load` lowers the current state again, so a pass
//! sees the previous pass's output exactly as a real front end would.

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    lower, Artifact, CallLocation, ExprSpec, Frontend, FrontendError, Program, ProgramSpec,
};

#[derive(Clone, Debug, Default)]
pub struct MemoryFrontend {
    spec: ProgramSpec,
    artifacts: BTreeMap<String, Artifact>,
    loads: usize,
    writes: usize,
}

impl MemoryFrontend {
    pub fn new(spec: ProgramSpec) -> Self {
        MemoryFrontend {
            spec,
            ..MemoryFrontend::default()
        }
    }

    /// Start from a spec plus artifacts written by an earlier run.
    pub fn with_artifacts(spec: ProgramSpec, artifacts: impl IntoIterator<Item = Artifact>) -> Self {
        let mut frontend = MemoryFrontend::new(spec);
        for artifact in artifacts {
            frontend.artifacts.insert(artifact.package.clone(), artifact);
        }
        frontend
    }

    /// The program description with every rewrite applied so far.
    pub fn spec(&self) -> &ProgramSpec {
        &self.spec
    }

    pub fn into_spec(self) -> ProgramSpec {
        self.spec
    }

    /// The current artifact of a package.
    pub fn artifact(&self, package: &str) -> Option<&Artifact> {
        self.artifacts.get(package)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Number of `load` calls served.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Number of `write_artifact` calls received.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Frontend for MemoryFrontend {
    fn load(&mut self, paths: &[String]) -> Result<Program, FrontendError> {
        self.loads += 1;
        let generated: FxHashMap<_, _> = self
            .artifacts
            .iter()
            .map(|(path, artifact)| (path.clone(), artifact.to_generated()))
            .collect();
        lower(&self.spec, &generated, paths)
    }

    fn rewrite_call(
        &mut self,
        location: &CallLocation,
        new_name: &str,
    ) -> Result<(), FrontendError> {
        let unknown_call = || FrontendError::UnknownCall {
            package: location.package.clone(),
            file: location.file.clone(),
            expr: location.expr,
        };
        let pkg = self
            .spec
            .package_mut(&location.package)
            .ok_or_else(|| FrontendError::UnknownPackage {
                path: location.package.clone(),
            })?;
        let file = pkg
            .files
            .iter_mut()
            .find(|f| f.name == location.file)
            .ok_or_else(unknown_call)?;

        let mut next = 0;
        let target = location.expr.raw();
        let func = file
            .exprs
            .iter_mut()
            .find_map(|expr| find_call(expr, target, &mut next))
            .ok_or_else(unknown_call)?;
        debug!(from = %func, to = new_name, at = %location.expr, "rewrote call");
        *func = new_name.to_owned();
        Ok(())
    }

    fn write_artifact(&mut self, artifact: &Artifact) -> Result<(), FrontendError> {
        self.writes += 1;
        self.artifacts
            .insert(artifact.package.clone(), artifact.clone());
        Ok(())
    }
}

/// Find the callee name of the call with pre-order id `target`.
fn find_call<'a>(expr: &'a mut ExprSpec, target: u32, next: &mut u32) -> Option<&'a mut String> {
    let id = *next;
    *next += 1;
    match expr {
        ExprSpec::Value { .. } => None,
        ExprSpec::Call { func, args } => {
            if id == target {
                return Some(func);
            }
            args.iter_mut().find_map(|arg| find_call(arg, target, next))
        }
    }
}
