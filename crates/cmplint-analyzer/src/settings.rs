//! Plugin settings payload, as passed by linter runners.

use serde::{Deserialize, Serialize};

use crate::options::Options;

/// Settings for one analyzer instance. Absent values keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "check-is", default, skip_serializing_if = "Option::is_none")]
    pub check_is: Option<bool>,
}

impl Settings {
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Apply explicitly set values on top of `base`.
    pub fn options(&self, base: Options) -> Options {
        match self.check_is {
            Some(check_is) => base.with_check_is(check_is),
            None => base,
        }
    }
}
