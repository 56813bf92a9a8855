use indexmap::IndexMap;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Operating systems / device classes  (regexes/oss.yml)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OsEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub require: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
    pub device: String,
    pub label: String,
    #[serde(default)]
    pub tablet_label: Option<String>,
    #[serde(default)]
    pub mobile: bool,
    #[serde(default)]
    pub tablet: TabletEntry,
}

/// Either a fixed flag (`tablet: true`) or a heuristic: the device is a
/// tablet when `unless` does not match, or when `when` matches.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TabletEntry {
    Fixed(bool),
    Heuristic {
        #[serde(default)]
        unless: Option<String>,
        #[serde(default)]
        when: Option<String>,
    },
}

impl Default for TabletEntry {
    fn default() -> Self {
        Self::Fixed(false)
    }
}

// ---------------------------------------------------------------------------
// Browsers / engines  (regexes/browsers.yml)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BrowserEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub require: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub engine: Option<EngineRef>,
    #[serde(default)]
    pub legacy_engine: Option<LegacyEngineRef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EngineRef {
    pub name: String,
    #[serde(default)]
    pub regex: Option<String>,
}

/// Only applies when its marker is present, so the regex is mandatory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LegacyEngineRef {
    pub name: String,
    pub regex: String,
}

/// Raw deserialization targets for the registry files.
/// IndexMap keeps YAML insertion order, which is the evaluation order.
pub(crate) type OsMap = IndexMap<String, OsEntry>;
pub(crate) type BrowserMap = IndexMap<String, BrowserEntry>;
