//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;
use deriv_engine::{Config, PluginRegistry, DEFAULT_FILE_NAME};

/// Generate Go functions for the `deriveXxx` calls of a program.
#[derive(Parser, Debug)]
#[command(name = "deriv", version)]
pub struct Cli {
    /// Type-checked program description written by the front end.
    #[arg(value_name = "PROGRAM.json")]
    pub program: PathBuf,

    /// Import paths of the packages to process; every package when omitted.
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Rename calls whose name is taken instead of failing.
    #[arg(long)]
    pub autoname: bool,

    /// Let assignable signatures share one function.
    #[arg(long)]
    pub dedup: bool,

    /// Override a plugin's name prefix, e.g. `equal=eq`.
    #[arg(long = "prefix", value_name = "PLUGIN=PREFIX", value_parser = parse_prefix)]
    pub prefixes: Vec<(String, String)>,

    /// Directory receiving one subdirectory per package.
    /// Defaults to the directory of the program file.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Name of the generated file.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        let mut config = Config::new()
            .with_autoname(self.autoname)
            .with_dedup(self.dedup)
            .with_paths(self.packages.clone());
        for (plugin, prefix) in &self.prefixes {
            config = config.with_prefix(plugin, prefix);
        }
        config.file_name.clone_from(&self.file_name);
        config
    }

    pub fn out_dir(&self) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.clone(),
            None => self
                .program
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }
}

fn parse_prefix(arg: &str) -> Result<(String, String), String> {
    let Some((plugin, prefix)) = arg.split_once('=') else {
        return Err(format!("expected PLUGIN=PREFIX, got `{arg}`"));
    };
    let registry = PluginRegistry::standard();
    if !registry.names().any(|name| name == plugin) {
        let known: Vec<_> = registry.names().collect();
        return Err(format!(
            "unknown plugin `{plugin}`, expected one of: {}",
            known.join(", ")
        ));
    }
    if prefix.is_empty() {
        return Err(format!("the prefix of `{plugin}` must not be empty"));
    }
    Ok((plugin.to_owned(), prefix.to_owned()))
}
