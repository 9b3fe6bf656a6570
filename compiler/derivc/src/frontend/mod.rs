//! File-backed front end.
//!
//! The program description is a JSON `ProgramSpec`. The artifact of a
//! package lives at `<out_dir>/<package name>/<file name>`, next to a
//! `<file name>.json` manifest listing its declarations. Manifests are read
//! back when the front end is opened, so a second run sees the calls of the
//! first as calls to generated functions.
//!
//! Everything else is delegated to a [`MemoryFrontend`]; this type only
//! mirrors its writes to disk. Call rewrites re-serialize the program file.


use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use deriv_ir::{
    Artifact, CallLocation, FuncSpec, Frontend, FrontendError, MemoryFrontend, PackageSpec,
    Program, ProgramSpec,
};
use tracing::debug;

pub struct FileFrontend {
    program: PathBuf,
    out_dir: PathBuf,
    inner: MemoryFrontend,
}

impl FileFrontend {
    pub fn open(program: &Path, out_dir: &Path, file_name: &str) -> Result<Self, FrontendError> {
        let text = fs::read_to_string(program).map_err(io_error(program))?;
        let spec: ProgramSpec =
            serde_json::from_str(&text).map_err(|source| FrontendError::Json {
                path: program.to_owned(),
                source,
            })?;

        let mut artifacts = Vec::new();
        for package in &spec.packages {
            if let Some(artifact) = read_artifact(out_dir, package, file_name)? {
                debug!(package = %package.path, decls = artifact.decls.len(), "found artifact");
                artifacts.push(artifact);
            }
        }

        Ok(FileFrontend {
            program: program.to_owned(),
            out_dir: out_dir.to_owned(),
            inner: MemoryFrontend::with_artifacts(spec, artifacts),
        })
    }

    fn save_program(&self) -> Result<(), FrontendError> {
        let mut text = serde_json::to_string_pretty(self.inner.spec()).map_err(|source| {
            FrontendError::Json {
                path: self.program.clone(),
                source,
            }
        })?;
        text.push('\n');
        fs::write(&self.program, text).map_err(io_error(&self.program))
    }
}

impl Frontend for FileFrontend {
    fn load(&mut self, paths: &[String]) -> Result<Program, FrontendError> {
        self.inner.load(paths)
    }

    fn rewrite_call(
        &mut self,
        location: &CallLocation,
        new_name: &str,
    ) -> Result<(), FrontendError> {
        self.inner.rewrite_call(location, new_name)?;
        self.save_program()
    }

    fn write_artifact(&mut self, artifact: &Artifact) -> Result<(), FrontendError> {
        let package = self.inner.spec().package(&artifact.package).ok_or_else(|| {
            FrontendError::UnknownPackage {
                path: artifact.package.clone(),
            }
        })?;
        let dir = package_dir(&self.out_dir, package);
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.text).map_err(io_error(&path))?;

        let manifest = manifest_path(&path);
        let decls = serde_json::to_string_pretty(&artifact.decls).map_err(|source| {
            FrontendError::Json {
                path: manifest.clone(),
                source,
            }
        })?;
        fs::write(&manifest, decls).map_err(io_error(&manifest))?;
        debug!(path = %path.display(), "wrote artifact");

        self.inner.write_artifact(artifact)
    }
}

fn package_dir(out_dir: &Path, package: &PackageSpec) -> PathBuf {
    out_dir.join(package.package_name())
}

/// `derived.gen.go` -> `derived.gen.go.json`
fn manifest_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.file_name().unwrap_or_default().to_owned();
    name.push(".json");
    artifact.with_file_name(name)
}

/// The artifact on disk, or `None` when the package has none yet.
fn read_artifact(
    out_dir: &Path,
    package: &PackageSpec,
    file_name: &str,
) -> Result<Option<Artifact>, FrontendError> {
    let path = package_dir(out_dir, package).join(file_name);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(FrontendError::Io { path, source }),
    };

    // Without a manifest the calls stay undefined and are derived again.
    let manifest = manifest_path(&path);
    let decls: Vec<FuncSpec> = match fs::read_to_string(&manifest) {
        Ok(json) => serde_json::from_str(&json).map_err(|source| FrontendError::Json {
            path: manifest.clone(),
            source,
        })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(source) => {
            return Err(FrontendError::Io {
                path: manifest,
                source,
            })
        }
    };

    Ok(Some(Artifact {
        package: package.path.clone(),
        file_name: file_name.to_owned(),
        text,
        decls,
    }))
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> FrontendError + '_ {
    move |source| FrontendError::Io {
        path: path.to_owned(),
        source,
    }
}
