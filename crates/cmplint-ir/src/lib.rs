//! cmplint IR - typed Go syntax model for comparison analysis.
//!
//! The syntax trees and type-checker results are produced by a Go frontend
//! (`go/packages` + `go/types`) and deserialized here from JSON. This crate
//! provides:
//! - The owned data model matching the frontend output
//! - A type oracle (type identity, method sets, capability checks)
//! - Indexed type-checker results per package
//! - A pre-order node index and a gofmt-style expression printer

pub mod info; // Indexed type-checker results
pub mod inspect; // Pre-order node index
pub mod ir; // Data model
pub mod printer; // Expression rendering
pub mod types; // Type system helpers

#[cfg(any(test, feature = "test-fixtures"))]
pub mod builder;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid analysis input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse analysis input from a JSON string.
pub fn from_json_str(data: &str) -> Result<ir::AnalysisInput, IrError> {
    Ok(serde_json::from_str(data)?)
}

/// Load a JSON file written by the Go frontend.
pub fn load_json_file(path: &std::path::Path) -> Result<ir::AnalysisInput, IrError> {
    let data = std::fs::read_to_string(path).map_err(|source| IrError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json_str(&data)
}

/// Load a fixture file from `tests/fixtures/` by name (without `.json`).
///
/// This is available in test builds and when the `test-fixtures` feature is enabled.
#[cfg(any(test, feature = "test-fixtures"))]
pub fn load_fixture(name: &str) -> ir::AnalysisInput {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let fixture_path = manifest_dir
        .join("../../tests/fixtures")
        .join(format!("{name}.json"));
    load_json_file(&fixture_path).unwrap_or_else(|e| panic!("failed to load fixture {name}: {e}"))
}
