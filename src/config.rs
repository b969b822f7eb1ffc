use std::path::Path;

use serde::Deserialize;

use crate::descriptor::CodeDescriptor;
use crate::error::LdpcError;
use crate::ldpc::DecoderOptions;
use crate::selftest::TestVectors;

/// Configuration file contents. Every section is optional: a missing `[code]`
/// falls back to the compiled-in code and a missing `[decoder]` to the
/// default options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub code: Option<CodeDescriptor>,
    pub decoder: DecoderOptions,
    pub test_vectors: Option<TestVectors>,
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self, LdpcError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LdpcError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LdpcError::io(path, e))?;
        Self::from_toml(&contents)
    }
}
