//! Analyzer entry point: configuration, pass context and the node driver.

use std::sync::Arc;

use cmplint_diagnostics::diagnostic::Diagnostic;
use cmplint_ir::info::TypeInfo;
use cmplint_ir::inspect::{Inspector, NodeIndex, NodeKind};
use cmplint_ir::ir::{ExprKind, Package};
use cmplint_ir::types::TypeMap;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::cmp::Checker;
use crate::options::{self, Options, FLAG_CHECK_IS};
use crate::settings::Settings;

const KINDS: &[NodeKind] = &[NodeKind::Binary, NodeKind::Call];

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The pass was not given a node index.
    #[error("inspector missing")]
    NoInspector,
    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),
    #[error("invalid boolean value {value:?} for -{flag}: parse error")]
    InvalidFlagValue { flag: String, value: String },
    #[error("invalid plugin settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Read-only view of one type-checked package.
pub struct Pass<'a> {
    pub package: &'a Package,
    pub info: &'a TypeInfo,
    pub types: &'a TypeMap,
    /// Supplies binary and call nodes in document order.
    pub index: Option<&'a dyn NodeIndex>,
}

/// Output of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassResult {
    /// User-facing comparison diagnostics, in traversal order.
    pub diagnostics: Vec<Diagnostic>,
    /// Tool-internal reports (catalog entries that do not fit a call site).
    pub internal: Vec<Diagnostic>,
}

impl PassResult {
    pub fn extend(&mut self, other: PassResult) {
        self.diagnostics.extend(other.diagnostics);
        self.internal.extend(other.internal);
    }
}

/// The cmplint analyzer.
#[derive(Debug, Clone)]
pub struct Analyzer {
    options: Options,
    catalog: Arc<Catalog>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Analyzer {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            catalog: Catalog::shared(),
        }
    }

    /// Build an analyzer from a plugin settings payload.
    pub fn from_settings(settings: serde_json::Value) -> Result<Self, AnalyzerError> {
        let settings = Settings::from_json(settings)?;
        Ok(Self::new(settings.options(Options::default())))
    }

    /// Replace the function catalog.
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn doc(&self) -> &str {
        &self.options.doc
    }

    pub fn url(&self) -> &'static str {
        options::URL
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Flags accepted by [`Analyzer::set_flag`], with their usage text.
    pub fn flags(&self) -> Vec<(&'static str, &'static str)> {
        vec![(FLAG_CHECK_IS, options::FLAG_CHECK_IS_USAGE)]
    }

    /// Set a flag from its command-line spelling.
    pub fn set_flag(&mut self, name: &str, value: &str) -> Result<(), AnalyzerError> {
        match name {
            FLAG_CHECK_IS => {
                let check_is =
                    options::parse_bool(value).ok_or_else(|| AnalyzerError::InvalidFlagValue {
                        flag: name.to_string(),
                        value: value.to_string(),
                    })?;
                self.options.check_is = check_is;
                Ok(())
            }
            other => Err(AnalyzerError::UnknownFlag(other.to_string())),
        }
    }

    /// Run over the nodes of one pass.
    pub fn run(&self, pass: &Pass<'_>) -> Result<PassResult, AnalyzerError> {
        let index = pass.index.ok_or(AnalyzerError::NoInspector)?;

        let mut checker = Checker::new(pass, &self.catalog, self.options.check_is);
        for node in index.preorder(KINDS) {
            match &node.kind {
                ExprKind::Binary { .. } => checker.handle_binary(node),
                ExprKind::Call { .. } => checker.handle_call(node),
                _ => {}
            }
        }
        let result = checker.finish();

        tracing::debug!(
            analyzer = %self.options.name,
            package = %pass.package.import_path,
            diagnostics = result.diagnostics.len(),
            internal = result.internal.len(),
            "pass complete"
        );
        Ok(result)
    }

    /// Build a pass over all files of `pkg` and run it.
    pub fn run_package(&self, pkg: &Package) -> Result<PassResult, AnalyzerError> {
        let info = TypeInfo::from_package(pkg);
        let types = TypeMap::from_package(pkg);
        let inspector = Inspector::new(&pkg.files);
        let pass = Pass {
            package: pkg,
            info: &info,
            types: &types,
            index: Some(&inspector),
        };
        self.run(&pass)
    }
}
