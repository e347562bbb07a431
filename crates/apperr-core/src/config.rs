//! Codec configuration

use serde::Deserialize;

use apperr_core_types::schema::{FALLBACK_CODE, FALLBACK_SERVICE};

/// Default ceiling on the encoded size of the structured detail
pub const DEFAULT_MAX_DETAIL_BYTES: usize = 8 * 1024;

/// Settings for [`crate::codec::WireCodec`]
///
/// Missing keys take their default, so a partial TOML table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest encoded detail the encoder will attach
    pub max_detail_bytes: usize,
    /// Service assigned to statuses that carry no structured detail
    pub fallback_service: String,
    /// Code assigned to statuses that carry no structured detail
    pub fallback_code: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_detail_bytes: DEFAULT_MAX_DETAIL_BYTES,
            fallback_service: FALLBACK_SERVICE.to_string(),
            fallback_code: FALLBACK_CODE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_detail_bytes, 8192);
        assert_eq!(config.fallback_service, "unknown");
        assert_eq!(config.fallback_code, "00000");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CodecConfig = toml::from_str("max_detail_bytes = 512").unwrap();
        assert_eq!(config.max_detail_bytes, 512);
        assert_eq!(config.fallback_service, "unknown");
    }
}
