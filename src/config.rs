//! Converter configuration.
//!
//! ```json
//! {
//!   "sources": ["cn", "hk"],
//!   "data_dir": "dictionaries",
//!   "custom_dict": "terms/custom.json",
//!   "strict": false,
//!   "parallel": true
//! }
//! ```
//!
//! Every field is optional; a missing one takes its [`Default`] value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dictionary_lib::Region;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Built-in dictionary families, loaded in this order.
    pub sources: Vec<Region>,
    /// Read each region from `<data_dir>/<region>/*.json` instead of the
    /// embedded dictionaries.
    pub data_dir: Option<PathBuf>,
    /// Optional override dictionary, loaded last.
    pub custom_dict: Option<PathBuf>,
    /// Report cross-origin overrides and chained targets during validation.
    pub strict: bool,
    /// Use rayon for the batch APIs.
    pub parallel: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            sources: Region::ALL.to_vec(),
            data_dir: None,
            custom_dict: None,
            strict: false,
            parallel: true,
        }
    }
}

impl ConverterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file. Relative paths are resolved against the file's
    /// directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&content)?;

        if let Some(base) = path.parent() {
            for field in [&mut config.data_dir, &mut config.custom_dict] {
                if let Some(p) = field.as_mut().filter(|p| p.is_relative()) {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    /// Replaces `sources` from a comma-separated list such as `"cn,hk"`.
    pub fn with_sources(mut self, list: &str) -> Result<Self, ConfigError> {
        self.sources = Region::parse_list(list)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConverterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.sources, vec![Region::Cn, Region::Hk]);
        assert!(config.parallel);
        assert!(!config.strict);
    }

    #[test]
    fn parses_all_fields() {
        let config = ConverterConfig::from_json_str(
            r#"{"sources": ["hk"], "custom_dict": "/tmp/x.json", "strict": true, "parallel": false}"#,
        )
        .unwrap();
        assert_eq!(config.sources, vec![Region::Hk]);
        assert_eq!(config.custom_dict, Some(PathBuf::from("/tmp/x.json")));
        assert!(config.strict);
        assert!(!config.parallel);
    }

    #[test]
    fn rejects_unknown_region_and_field() {
        assert!(matches!(
            ConverterConfig::from_json_str(r#"{"sources": ["tw"]}"#),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ConverterConfig::from_json_str(r#"{"source": ["cn"]}"#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zhtw.json");
        fs::write(
            &path,
            r#"{"custom_dict": "terms.json", "data_dir": "/abs/dicts"}"#,
        )
        .unwrap();

        let config = ConverterConfig::from_path(&path).unwrap();
        assert_eq!(config.custom_dict, Some(dir.path().join("terms.json")));
        assert_eq!(config.data_dir, Some(PathBuf::from("/abs/dicts")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ConverterConfig::from_path(Path::new("/nonexistent/zhtw.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn sources_from_list() {
        let config = ConverterConfig::default().with_sources("hk").unwrap();
        assert_eq!(config.sources, vec![Region::Hk]);
        assert!(ConverterConfig::default().with_sources("cn,jp").is_err());
    }
}
