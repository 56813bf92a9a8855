use serde::{Deserialize, Serialize};

use super::DeviceType;

/// Sentinel for every name/version that no rule produced.
pub const UNKNOWN: &str = "unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Result of classifying one User-Agent string.
///
/// Serializes to the nested shape:
/// `{ userAgentString, device, engine, os, browser, platform, isBot }`.
/// Every field starts at its "unknown"/`false` default and is only ever
/// narrowed by a matching rule.
///
/// Serialize-only: the mobile/tablet flags are not part of the nested shape,
/// so a record read back from it could not carry them. Its parts
/// ([`Device`], [`Os`], [`Browser`], [`Engine`]) deserialize on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub user_agent_string: String,
    pub device: Device,
    pub engine: Engine,
    pub os: Os,
    pub browser: Browser,
    /// Platform hint, copied verbatim. Never used for classification.
    pub platform: String,
    /// Reserved; no bot detection is performed.
    pub is_bot: bool,
    #[serde(skip)]
    form_factor: FormFactor,
}

impl Classification {
    /// The all-unknown record for `ua`.
    pub fn unclassified(ua: impl Into<String>, platform: Option<&str>) -> Self {
        Self {
            user_agent_string: ua.into(),
            device: Device::default(),
            engine: Engine::default(),
            os: Os::default(),
            browser: Browser::default(),
            platform: platform.map_or_else(unknown, str::to_string),
            is_bot: false,
            form_factor: FormFactor::default(),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.form_factor.mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.form_factor.tablet
    }

    pub fn is_bot(&self) -> bool {
        self.is_bot
    }

    pub fn device_type(&self) -> DeviceType {
        self.device.kind
    }

    pub(crate) fn with_os(mut self, partial: OsMatch) -> Self {
        self.device = partial.device;
        self.os = partial.os;
        self.form_factor = partial.form_factor;
        self
    }

    pub(crate) fn with_browser(mut self, partial: BrowserMatch) -> Self {
        self.browser = partial.browser;
        self.engine = partial.engine;
        self
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::unclassified("", None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "type")]
    pub kind: DeviceType,
    /// Human label such as "Android Tablet", "unknown" when no rule fired.
    pub name: String,
    /// Reserved, always "unknown".
    pub model: String,
    /// Reserved, always "unknown".
    pub manufacturer: String,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            kind: DeviceType::Unknown,
            name: unknown(),
            model: unknown(),
            manufacturer: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Os {
    pub name: String,
    /// Dot-separated, even when the source token used underscores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Reserved, never populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

impl Default for Os {
    fn default() -> Self {
        Self {
            name: unknown(),
            version: None,
            architecture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Browser {
    pub name: String,
    pub version: String,
}

impl Default for Browser {
    fn default() -> Self {
        Self {
            name: unknown(),
            version: unknown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: String,
    pub version: String,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            name: unknown(),
            version: unknown(),
        }
    }
}

/// Mobile/tablet flag pair. Kept out of the nested serialized shape; the
/// flat shape carries it as `isMobile`/`isTablet`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FormFactor {
    pub mobile: bool,
    pub tablet: bool,
}

/// What the OS/device classifier contributes to a [`Classification`].
pub(crate) struct OsMatch {
    pub device: Device,
    pub os: Os,
    pub form_factor: FormFactor,
}

/// What the browser/engine classifier contributes to a [`Classification`].
pub(crate) struct BrowserMatch {
    pub browser: Browser,
    pub engine: Engine,
}
