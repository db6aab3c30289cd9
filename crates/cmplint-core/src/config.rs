//! Configuration loading from cmplint.toml.

use cmplint_analyzer::catalog::{Catalog, CatalogEntry};
use cmplint_analyzer::{Analyzer, Options};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "cmplint.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cmplint: CmplintConfig,
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmplintConfig {
    pub severity_threshold: String,
    /// Drop diagnostics reported in generated files.
    pub skip_generated: bool,
    /// 0 = unlimited.
    pub max_diagnostics: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(rename = "check-is")]
    pub check_is: bool,
    /// Extra comparison functions, added to the built-in catalog.
    pub functions: Vec<CatalogEntry>,
}

impl Default for CmplintConfig {
    fn default() -> Self {
        Self {
            severity_threshold: "warning".to_string(),
            skip_generated: true,
            max_diagnostics: 100,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            check_is: true,
            functions: vec![],
        }
    }
}

impl AnalyzerConfig {
    /// Build the analyzer this section describes.
    pub fn analyzer(&self) -> Analyzer {
        let analyzer = Analyzer::new(Options::default().with_check_is(self.check_is));
        if self.functions.is_empty() {
            return analyzer;
        }
        let catalog = Catalog::extended(self.functions.iter().cloned());
        analyzer.with_catalog(Arc::new(catalog))
    }
}

/// Find and load cmplint.toml, walking up from `start_dir`.
/// Returns default config if no file found or the file is unreadable or invalid.
pub fn load_config(start_dir: &Path) -> Config {
    let Some(path) = find_config_file(start_dir) else {
        return Config::default();
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable configuration");
            return Config::default();
        }
    };
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            config
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid configuration");
            Config::default()
        }
    }
}

/// Walk up directories looking for cmplint.toml.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Default TOML content for `cmplint init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"[cmplint]
severity_threshold = "warning"
skip_generated = true
max_diagnostics = 100

[analyzer]
# Suppress errors.Is diagnostics when the compared type has an
# "Is(error) bool" method (or "Unwrap" for the inspected error).
check-is = true

# Additional comparison functions. Shapes:
#   error_is        Is(err, target)
#   assert_error_is ErrorIs(t, err, target, ...)
#   equal           Equal(x, y)
#   assert_equal    Equal(t, x, y, ...)
#
# [[analyzer.functions]]
# path = "example.com/myassert"
# name = "ErrorIs"
# shape = "assert_error_is"
#
# [[analyzer.functions]]
# path = "example.com/myassert"
# receiver = "Checker"
# name = "Is"
# shape = "error_is"
"#;
