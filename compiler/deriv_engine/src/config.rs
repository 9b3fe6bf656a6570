//! Engine configuration.

use std::collections::BTreeMap;

/// Default file name of the generated artifact.
pub const DEFAULT_FILE_NAME: &str = "derived.gen.go";

/// Plain configuration consumed by the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Per-plugin name prefix overrides, keyed by plugin name.
    pub prefixes: BTreeMap<String, String>,
    /// Permit disambiguating suffixes when a requested name is taken.
    pub autoname: bool,
    /// Permit assignable signatures to share one canonical name.
    pub dedup: bool,
    /// Package paths to process; empty means every loaded package.
    pub paths: Vec<String>,
    /// File name of the generated artifact.
    pub file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefixes: BTreeMap::new(),
            autoname: false,
            dedup: false,
            paths: Vec::new(),
            file_name: DEFAULT_FILE_NAME.to_owned(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, plugin: &str, prefix: &str) -> Self {
        self.prefixes.insert(plugin.to_owned(), prefix.to_owned());
        self
    }

    #[must_use]
    pub fn with_autoname(mut self, autoname: bool) -> Self {
        self.autoname = autoname;
        self
    }

    #[must_use]
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    #[must_use]
    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
        self
    }

    /// The configured prefix of `plugin`, or `"derive" + CapitalizedName`.
    pub fn prefix_for(&self, plugin: &str) -> String {
        match self.prefixes.get(plugin) {
            Some(prefix) => prefix.clone(),
            None => default_prefix(plugin),
        }
    }
}

/// `"derive" + CapitalizedName`.
pub fn default_prefix(plugin: &str) -> String {
    let mut prefix = String::from("derive");
    let mut chars = plugin.chars();
    if let Some(first) = chars.next() {
        prefix.extend(first.to_uppercase());
        prefix.extend(chars);
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes_capitalize_plugin_name() {
        let config = Config::new();
        assert_eq!(config.prefix_for("equal"), "deriveEqual");
        assert_eq!(config.prefix_for("mem"), "deriveMem");
    }

    #[test]
    fn overrides_win() {
        let config = Config::new().with_prefix("equal", "eq");
        assert_eq!(config.prefix_for("equal"), "eq");
        assert_eq!(config.prefix_for("hash"), "deriveHash");
        assert_eq!(config.file_name, DEFAULT_FILE_NAME);
    }
}
