// src/validator.rs
//! Pluggable predicates that gate completion of an input session.
//!
//! A validator is a total, side-effect-free `&str -> bool`. It only ever
//! sees a shared borrow of the text, so it cannot mutate its argument.

use serde::de::IgnoredAny;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A named text predicate.
#[derive(Clone)]
pub struct Validator {
    name: Cow<'static, str>,
    check: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl Validator {
    /// Wraps a custom predicate.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Accepts any text with at least one character.
    pub fn not_empty() -> Self {
        Self::new("not-empty", is_not_empty)
    }

    /// Accepts text that parses as a complete JSON document.
    pub fn json() -> Self {
        Self::new("json", is_json)
    }

    pub fn check(&self, text: &str) -> bool {
        (self.check)(text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::not_empty()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// Built-in validators, selectable by name from the CLI or a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinValidator {
    #[serde(alias = "not_empty", alias = "isNotEmpty")]
    NotEmpty,
    #[serde(alias = "isJSON")]
    Json,
}

impl From<BuiltinValidator> for Validator {
    fn from(kind: BuiltinValidator) -> Self {
        match kind {
            BuiltinValidator::NotEmpty => Validator::not_empty(),
            BuiltinValidator::Json => Validator::json(),
        }
    }
}

fn is_not_empty(text: &str) -> bool {
    !text.is_empty()
}

/// Full parse with the value discarded.
fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}
