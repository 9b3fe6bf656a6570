//! Derivation engine.
//!
//! Finds calls to functions that do not exist yet, such as
//! `deriveEqual(a, b)`, generates the functions from the argument types,
//! and repeats until the program is complete.
//!
//! # Architecture
//!
//! - [`discovery`]: candidate calls of a loaded package.
//! - [`registry`]: per-plugin signature to name maps sharing one package
//!   namespace.
//! - [`plugin`]: the plugin trait, dependency handles and the per-package
//!   plugin set.
//! - `plugins`: the standard derivations.
//! - [`driver`]: the progress-bounded pass loop.
//! - [`emitter`]: indentation-aware output.

pub mod config;
pub mod discovery;
pub mod driver;
pub mod emitter;
mod error;
pub mod plugin;
mod plugins;
pub mod registry;

pub use config::{default_prefix, Config, DEFAULT_FILE_NAME};
pub use discovery::{discover, CallSite};
pub use driver::{Driver, PackageReport, RunReport, GENERATED_HEADER};
pub use error::{CallFailure, DeriveError};
pub use plugin::{Dependency, Plugin, PluginDef, PluginRegistry, PluginSet};
pub use registry::{Namespace, Signature, TypesMap};
