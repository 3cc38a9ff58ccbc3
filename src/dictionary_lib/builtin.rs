//! Dictionaries embedded at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::term_source::{Origin, TermSource};
use crate::error::{ConfigError, DictionaryError};

/// Built-in dictionary families, named after the text they convert from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Mainland (Simplified Chinese) vocabulary.
    Cn,
    /// Hong Kong (Traditional Chinese) vocabulary.
    Hk,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Cn, Region::Hk];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Cn => "cn",
            Region::Hk => "hk",
        }
    }

    /// Parses a comma-separated list such as `"cn,hk"`, skipping blanks.
    ///
    /// ```
    /// use zhtw::dictionary_lib::Region;
    ///
    /// assert_eq!(Region::parse_list("cn, hk").unwrap(), vec![Region::Cn, Region::Hk]);
    /// assert!(Region::parse_list("tw").is_err());
    /// ```
    pub fn parse_list(list: &str) -> Result<Vec<Region>, ConfigError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Region>())
            .collect()
    }

    fn files(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Region::Cn => &[
                ("base", include_str!("dicts/cn/base.json")),
                ("chars", include_str!("dicts/cn/chars.json")),
            ],
            Region::Hk => &[("base", include_str!("dicts/hk/base.json"))],
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cn" => Ok(Region::Cn),
            "hk" => Ok(Region::Hk),
            _ => Err(ConfigError::UnknownSource(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedded dictionaries for `regions`, in the given region order and file-name
/// order within a region.
pub fn builtin_sources(regions: &[Region]) -> Result<Vec<TermSource>, DictionaryError> {
    let mut sources = Vec::new();
    for &region in regions {
        for &(name, json) in region.files() {
            sources.push(TermSource::from_json_str(
                Origin::new(region.as_str(), name),
                json,
            )?);
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dictionaries_parse() {
        let sources = builtin_sources(&Region::ALL).unwrap();
        let names: Vec<String> = sources.iter().map(|s| s.origin.to_string()).collect();
        assert_eq!(names, vec!["cn/base", "cn/chars", "hk/base"]);
        assert!(sources.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn cn_base_has_software() {
        let sources = builtin_sources(&[Region::Cn]).unwrap();
        assert!(sources[0]
            .entries
            .contains(&("软件".to_string(), "軟體".to_string())));
    }

    #[test]
    fn region_parsing() {
        assert_eq!("HK".parse::<Region>().unwrap(), Region::Hk);
        assert_eq!(Region::parse_list("").unwrap(), Vec::<Region>::new());
        assert!(matches!(
            Region::parse_list("cn,xx"),
            Err(ConfigError::UnknownSource(s)) if s == "xx"
        ));
    }
}
