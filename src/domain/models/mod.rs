pub mod access_request;
pub mod account;
pub mod auth;
pub mod profile;
pub mod provider;

use thiserror::Error;

/// A stored or submitted tag that is not one of the closed set of values.
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}
