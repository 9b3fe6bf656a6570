//! Fixpoint driver.
//!
//! # Passes
//!
//! Each pass loads the program, and per package
//!
//! 1. builds the plugin set and its registries,
//! 2. discovers candidate calls and dispatches each to the plugin owning
//!    the longest matching prefix,
//! 3. drains every queue, generating dependencies as they are requested,
//! 4. assembles the package's artifact.
//!
//! Calls with an argument the front end could not type are deferred: they
//! usually wait for a declaration this pass generates. The run ends when
//! nothing is deferred.
//!
//! # Termination
//!
//! The number of unresolved calls (deferred plus failed) must strictly
//! decrease from one pass to the next; otherwise the run stops with
//! `NoProgress`. Name conflicts abort the run at once. Validation failures
//! are collected and reported together once nothing is deferred.

mod artifact;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use deriv_ir::{CallLocation, Frontend, Package, Program};
use deriv_types::Pool;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

pub use artifact::GENERATED_HEADER;

use crate::discovery::discover;
use crate::plugin::PluginRegistry;
use crate::{CallFailure, Config, DeriveError};

/// What a run did to one package.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub path: String,
    /// Declarations of the final artifact, in artifact order.
    pub declarations: Vec<String>,
    /// Declarations that the artifact present before the run lacked.
    pub new_declarations: Vec<String>,
    /// Call sites renamed to their canonical name.
    pub rewrites: usize,
    /// Whether the artifact was written.
    pub artifact_changed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passes: usize,
    pub packages: Vec<PackageReport>,
}

impl RunReport {
    pub fn package(&self, path: &str) -> Option<&PackageReport> {
        self.packages.iter().find(|p| p.path == path)
    }

    /// Whether the run changed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.packages
            .iter()
            .all(|p| p.new_declarations.is_empty() && p.rewrites == 0 && !p.artifact_changed)
    }
}

/// Everything one pass produced that has not been handed to the front end.
#[derive(Default)]
struct PassOutcome {
    deferred: Vec<String>,
    failures: Vec<CallFailure>,
    rewrites: Vec<(CallLocation, String)>,
    packages: Vec<PackageOutcome>,
}

struct PackageOutcome {
    path: String,
    declarations: Vec<String>,
    /// The artifact to write, when it differs from the loaded one.
    write: Option<deriv_ir::Artifact>,
}

pub struct Driver {
    config: Config,
    registry: PluginRegistry,
}

impl Driver {
    /// A driver with the standard plugins.
    pub fn new(config: Config) -> Self {
        Driver::with_registry(config, PluginRegistry::standard())
    }

    pub fn with_registry(config: Config, registry: PluginRegistry) -> Self {
        Driver { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run passes until every call is derived or the run fails.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&self, frontend: &mut dyn Frontend) -> Result<RunReport, DeriveError> {
        let mut reports: Vec<PackageReport> = Vec::new();
        let mut initial: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        let mut previous: Option<usize> = None;
        let mut pass = 0;

        loop {
            pass += 1;
            let program = frontend.load(&self.config.paths)?;
            if pass == 1 {
                for package in &program.packages {
                    let names = package
                        .generated
                        .iter()
                        .flat_map(|g| g.decls.iter().map(|d| d.name.clone()))
                        .collect();
                    initial.insert(package.path.clone(), names);
                }
            }

            let outcome = self.pass(pass, program)?;
            let unresolved = outcome.deferred.len() + outcome.failures.len();
            debug!(pass, unresolved, deferred = outcome.deferred.len(), "pass finished");

            if outcome.deferred.is_empty() {
                if !outcome.failures.is_empty() {
                    return Err(DeriveError::CallsFailed(outcome.failures));
                }
                self.apply(frontend, outcome, &initial, &mut reports)?;
                return Ok(RunReport {
                    passes: pass,
                    packages: reports,
                });
            }

            if previous.is_some_and(|p| unresolved >= p) {
                let mut unresolved: Vec<String> = outcome.deferred;
                unresolved.extend(outcome.failures.iter().map(ToString::to_string));
                return Err(DeriveError::NoProgress { pass, unresolved });
            }
            previous = Some(unresolved);
            self.apply(frontend, outcome, &initial, &mut reports)?;
        }
    }

    #[tracing::instrument(level = "debug", skip(self, program))]
    fn pass(&self, pass: usize, program: Program) -> Result<PassOutcome, DeriveError> {
        let Program { mut pool, packages } = program;
        let mut outcome = PassOutcome::default();
        for package in &packages {
            self.package(&mut pool, package, &mut outcome)?;
        }
        Ok(outcome)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(package = %package.path))]
    fn package(
        &self,
        pool: &mut Pool,
        package: &Package,
        outcome: &mut PassOutcome,
    ) -> Result<(), DeriveError> {
        let mut set = self.registry.instantiate(&self.config, package)?;

        for site in discover(pool, package) {
            let Some(dep) = set.dispatch(&site.name) else {
                trace!(call = %site, "no plugin owns this name");
                continue;
            };
            if site.has_undefined() {
                warn!(call = %site, "deferred call with untyped arguments");
                outcome.deferred.push(site.to_string());
                continue;
            }
            match set.add(pool, dep, &site.name, &site.args) {
                Ok(name) => {
                    if name != site.name {
                        outcome.rewrites.push((site.location.clone(), name));
                    }
                }
                Err(error) if error.is_name_error() => return Err(error),
                Err(error) => {
                    debug!(call = %site, %error, "call failed");
                    outcome.failures.push(CallFailure {
                        site: site.to_string(),
                        error,
                    });
                }
            }
        }

        let drained = set.drain(pool)?;
        let declarations: Vec<String> = drained.decls.iter().map(|d| d.name.clone()).collect();
        let artifact = artifact::assemble(pool, package, &self.config.file_name, &drained);

        let previous = package.generated.as_ref();
        let unchanged = previous.is_some_and(|g| g.text == artifact.text);
        let nothing_to_write = previous.is_none() && declarations.is_empty();
        let write = (!unchanged && !nothing_to_write).then_some(artifact);

        outcome.packages.push(PackageOutcome {
            path: package.path.clone(),
            declarations,
            write,
        });
        Ok(())
    }

    /// Hand a pass's rewrites and artifacts to the front end.
    fn apply(
        &self,
        frontend: &mut dyn Frontend,
        outcome: PassOutcome,
        initial: &FxHashMap<String, FxHashSet<String>>,
        reports: &mut Vec<PackageReport>,
    ) -> Result<(), DeriveError> {
        for (location, name) in &outcome.rewrites {
            frontend.rewrite_call(location, name)?;
            report_for(reports, &location.package).rewrites += 1;
        }
        for package in outcome.packages {
            let known = initial.get(&package.path);
            let report = report_for(reports, &package.path);
            report.new_declarations = package
                .declarations
                .iter()
                .filter(|name| !known.is_some_and(|k| k.contains(*name)))
                .cloned()
                .collect();
            report.declarations = package.declarations;
            if let Some(artifact) = package.write {
                debug!(package = %artifact.package, file = %artifact.file_name, "writing artifact");
                frontend.write_artifact(&artifact)?;
                report.artifact_changed = true;
            }
        }
        Ok(())
    }
}

fn report_for<'a>(reports: &'a mut Vec<PackageReport>, path: &str) -> &'a mut PackageReport {
    let index = match reports.iter().position(|r| r.path == path) {
        Some(index) => index,
        None => {
            reports.push(PackageReport {
                path: path.to_owned(),
                ..PackageReport::default()
            });
            reports.len() - 1
        }
    };
    &mut reports[index]
}
