use std::path::Path;

use super::db;
use super::error::Result;

const EMBEDDED_OSS: &str = include_str!("../regexes/oss.yml");
const EMBEDDED_BROWSERS: &str = include_str!("../regexes/browsers.yml");

/// The ordered rule sets, as data.
///
/// The built-in registry is compiled into the crate; a replacement can be
/// loaded from a directory holding `oss.yml` and `browsers.yml` in the
/// same format. Mapping order in each file is the evaluation order.
#[derive(Debug)]
pub struct Registry {
    pub(crate) oss: db::OsMap,
    pub(crate) browsers: db::BrowserMap,
}

impl Registry {
    /// The registry shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_OSS, EMBEDDED_BROWSERS)
    }

    pub fn from_yaml(oss: &str, browsers: &str) -> Result<Self> {
        Ok(Self {
            oss: serde_yaml::from_str(oss)?,
            browsers: serde_yaml::from_str(browsers)?,
        })
    }

    /// Load `oss.yml` and `browsers.yml` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let oss = std::fs::read_to_string(dir.join("oss.yml"))?;
        let browsers = std::fs::read_to_string(dir.join("browsers.yml"))?;
        Self::from_yaml(&oss, &browsers)
    }

    pub fn os_rules(&self) -> impl Iterator<Item = &str> {
        self.oss.keys().map(String::as_str)
    }

    pub fn browser_rules(&self) -> impl Iterator<Item = &str> {
        self.browsers.keys().map(String::as_str)
    }
}
