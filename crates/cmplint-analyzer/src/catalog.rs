//! Catalog of comparison-style functions, keyed by fully-qualified identity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Fully-qualified identity of a function or method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncName {
    /// Import path of the declaring package.
    pub path: String,
    /// Receiver base type name, for methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub name: String,
}

impl FuncName {
    pub fn func(path: &str, name: &str) -> Self {
        Self {
            path: path.into(),
            receiver: None,
            name: name.into(),
        }
    }

    pub fn method(path: &str, receiver: &str, name: &str) -> Self {
        Self {
            path: path.into(),
            receiver: Some(receiver.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for FuncName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.receiver {
            Some(recv) => write!(f, "(*{}.{}).{}", self.path, recv, self.name),
            None => write!(f, "{}.{}", self.path, self.name),
        }
    }
}

/// Argument layout of a catalogued comparison call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonShape {
    /// `errors.Is(err, target)`
    ErrorIs,
    /// `assert.ErrorIs(t, err, target, ...)`
    AssertErrorIs,
    /// `cmp.Equal(x, y)`
    Equal,
    /// `assert.Equal(t, x, y, ...)`
    AssertEqual,
}

impl ComparisonShape {
    /// Index of the first compared argument of a plain call.
    pub fn first_operand(self) -> usize {
        match self {
            Self::ErrorIs | Self::Equal => 0,
            Self::AssertErrorIs | Self::AssertEqual => 1,
        }
    }

    /// Minimum number of arguments of a plain call.
    pub fn min_args(self) -> usize {
        self.first_operand() + 2
    }

    /// Whether the comparison follows `errors.Is` semantics, which enables
    /// suppression through `Is` and `Unwrap` methods.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::AssertEqual)
    }
}

/// A catalog entry as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub func: FuncName,
    pub shape: ComparisonShape,
}

const ERRORS_IS_PACKAGES: &[&str] = &[
    "errors",
    "golang.org/x/exp/errors",
    "golang.org/x/xerrors",
    "github.com/pkg/errors",
    "github.com/friendsofgo/errors",
    "github.com/go-errors/errors",
    "github.com/go-faster/errors",
    "github.com/cockroachdb/errors",
    "github.com/cockroachdb/errors/markers",
    "github.com/juju/errors",
];

const TESTIFY_PACKAGES: &[&str] = &[
    "github.com/stretchr/testify/assert",
    "github.com/stretchr/testify/require",
];

const TESTIFY_ERROR_IS: &[&str] = &["ErrorIs", "ErrorIsf", "NotErrorIs", "NotErrorIsf"];

/// The entries every analyzer starts with.
pub fn default_entries() -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    let mut add = |func: FuncName, shape| entries.push(CatalogEntry { func, shape });

    for path in ERRORS_IS_PACKAGES {
        add(FuncName::func(path, "Is"), ComparisonShape::ErrorIs);
    }

    add(
        FuncName::func("gotest.tools/v3/assert", "Equal"),
        ComparisonShape::AssertEqual,
    );
    add(
        FuncName::func("gotest.tools/v3/assert", "ErrorIs"),
        ComparisonShape::AssertErrorIs,
    );
    add(
        FuncName::func("gotest.tools/v3/assert/cmp", "Equal"),
        ComparisonShape::Equal,
    );

    for path in TESTIFY_PACKAGES {
        for name in TESTIFY_ERROR_IS {
            add(FuncName::func(path, name), ComparisonShape::AssertErrorIs);
        }
    }
    for path in TESTIFY_PACKAGES {
        for name in TESTIFY_ERROR_IS {
            add(
                FuncName::method(path, "Assertions", name),
                ComparisonShape::ErrorIs,
            );
        }
    }

    entries
}

static DEFAULT_CATALOG: LazyLock<Arc<Catalog>> =
    LazyLock::new(|| Arc::new(Catalog::from_entries(default_entries())));

/// Read-only mapping from function identity to comparison shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: HashMap<FuncName, ComparisonShape>,
}

impl Catalog {
    /// The process-wide default catalog.
    pub fn shared() -> Arc<Catalog> {
        Arc::clone(&DEFAULT_CATALOG)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.func, e.shape)).collect(),
        }
    }

    /// The default catalog plus `extra`; extra entries override defaults.
    pub fn extended(extra: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = DEFAULT_CATALOG.as_ref().clone();
        catalog
            .entries
            .extend(extra.into_iter().map(|e| (e.func, e.shape)));
        catalog
    }

    pub fn get(&self, func: &FuncName) -> Option<ComparisonShape> {
        self.entries.get(func).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
