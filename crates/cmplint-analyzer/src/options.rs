//! Analyzer options and the command-line flag surface.

/// Default analyzer name.
pub const NAME: &str = "cmplint";

/// Default analyzer documentation.
pub const DOC: &str = "cmplint is a Go linter (static analysis tool) that detects comparisons against
the address of newly created values, such as ptr == &MyStruct{} or ptr == new(MyStruct).
These comparisons are almost always incorrect, as each expression creates a unique
allocation at runtime, usually yielding false or undefined results.

Example of code flagged by cmplint:

\terr := json.Unmarshal(msg, &es)
\tif errors.Is(err, &json.UnmarshalTypeError{}) { // flagged
\t\t//...
\t}";

/// Documentation URL reported with the analyzer.
pub const URL: &str = "https://pkg.go.dev/fillmore-labs.com/cmplint";

/// Name of the flag toggling `Is`/`Unwrap` suppression.
pub const FLAG_CHECK_IS: &str = "check-is";

/// Usage text of [`FLAG_CHECK_IS`].
pub const FLAG_CHECK_IS_USAGE: &str =
    r#"suppress diagnostic on errors.Is if the compared type has an "Is(error) bool" method"#;

/// Configurable analyzer parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub name: String,
    pub doc: String,
    /// Run the suppression heuristic on error-style comparisons.
    pub check_is: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: NAME.to_string(),
            doc: DOC.to_string(),
            check_is: true,
        }
    }
}

impl Options {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// When `false`, diagnostics on `errors.Is(err, &MyError{})` are reported
    /// even if `*MyError` implements `Is(error) bool` or `Unwrap`.
    pub fn with_check_is(mut self, check_is: bool) -> Self {
        self.check_is = check_is;
        self
    }
}

/// Parse a boolean the way Go's `strconv.ParseBool` does.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
