use fancy_regex::Regex;

use super::types::DeviceType;

// ---------------------------------------------------------------------------
// Internal data structs carried inside CompiledParser<T>
// ---------------------------------------------------------------------------

pub(crate) struct OsData {
    pub name: String,
    pub version_template: Option<String>,
    pub device_type: DeviceType,
    pub label: String,
    pub tablet_label: Option<String>,
    pub mobile: bool,
    pub tablet: TabletData,
}

pub(crate) enum TabletData {
    Fixed(bool),
    Heuristic {
        unless: Option<Regex>,
        when: Option<Regex>,
    },
}

pub(crate) struct BrowserData {
    pub name: String,
    pub version_template: Option<String>,
    pub engine: Option<EngineData>,
    pub legacy_engine: Option<EngineData>,
}

pub(crate) struct EngineData {
    pub name: String,
    pub regex: Option<Regex>,
}
