use serde::{Deserialize, Serialize};

use super::{Classification, DeviceType, UNKNOWN};

/// The older flat result shape:
/// `{ type, os?, osVersion?, isTablet, isMobile, browser?, version? }`.
///
/// Unset optional fields are left out when serialized rather than being
/// written as "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyClassification {
    #[serde(rename = "type")]
    pub kind: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default)]
    pub is_tablet: bool,
    #[serde(default)]
    pub is_mobile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    /// Browser version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn known(value: &str) -> Option<String> {
    (value != UNKNOWN).then(|| value.to_string())
}

impl From<&Classification> for LegacyClassification {
    fn from(c: &Classification) -> Self {
        Self {
            kind: c.device.kind,
            os: known(&c.os.name),
            os_version: c.os.version.clone(),
            is_tablet: c.is_tablet(),
            is_mobile: c.is_mobile(),
            browser: known(&c.browser.name),
            version: known(&c.browser.version),
        }
    }
}

impl From<Classification> for LegacyClassification {
    fn from(c: Classification) -> Self {
        Self::from(&c)
    }
}

impl Classification {
    pub fn to_legacy(&self) -> LegacyClassification {
        self.into()
    }
}
