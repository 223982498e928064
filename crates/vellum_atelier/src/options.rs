//! Compiler options.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use vellum_carton::String;

pub const DEFAULT_DELIMITERS: (&str, &str) = ("{{", "}}");
pub const DEFAULT_DIRECTIVE_PREFIX: &str = "v-";

static DEFAULT_INTERPOLATION: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| build_interpolation(DEFAULT_DELIMITERS.0, DEFAULT_DELIMITERS.1));

/// Non-greedy matcher for one interpolation; group 1 is the expression.
fn build_interpolation(open: &str, close: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "{}(.+?){}",
        regex::escape(open),
        regex::escape(close)
    ))
}

/// Template compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Interpolation delimiters
    #[serde(default = "default_delimiters")]
    pub delimiters: (String, String),

    /// Attribute prefix marking a directive
    #[serde(default = "default_directive_prefix")]
    pub directive_prefix: String,
}

fn default_delimiters() -> (String, String) {
    (DEFAULT_DELIMITERS.0.into(), DEFAULT_DELIMITERS.1.into())
}

fn default_directive_prefix() -> String {
    DEFAULT_DIRECTIVE_PREFIX.into()
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            directive_prefix: default_directive_prefix(),
        }
    }
}

impl CompilerOptions {
    /// The interpolation matcher for the configured delimiters
    pub fn interpolation(&self) -> Result<Regex, regex::Error> {
        let (open, close) = &self.delimiters;
        if (open.as_str(), close.as_str()) == DEFAULT_DELIMITERS {
            return (*DEFAULT_INTERPOLATION).clone();
        }
        build_interpolation(open, close)
    }

    /// Strip the directive prefix from an attribute name
    pub fn directive_name<'a>(&self, attribute: &'a str) -> Option<&'a str> {
        attribute.strip_prefix(self.directive_prefix.as_str())
    }
}
