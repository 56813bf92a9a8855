use tracing::trace;

use super::db;
use super::error::{Error, Result};
use super::helpers::extract_version;
use super::parser::{compile_regex, is_match, CompiledParser, RuleSpec};
use super::parser_data::{OsData, TabletData};
use super::types::{Device, DeviceType, FormFactor, Os, OsMatch, UNKNOWN};

/// Operating system and device-class detection: one ordered rule list,
/// first match wins, no match leaves everything at its default.
pub(crate) struct OsClassifier {
    parser: CompiledParser<OsData>,
}

impl OsClassifier {
    pub fn build(entries: db::OsMap) -> Result<Self> {
        let specs = entries
            .into_iter()
            .map(|(id, entry)| os_rule(id, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            parser: CompiledParser::build("os", specs)?,
        })
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.parser.rule_ids()
    }

    pub fn classify(&self, ua: &str) -> Option<OsMatch> {
        let m = self.parser.match_first(ua)?;
        let data = &m.rule.data;

        let tablet = match &data.tablet {
            TabletData::Fixed(flag) => *flag,
            TabletData::Heuristic { unless, when } => {
                unless.as_ref().is_some_and(|re| !is_match(re, ua))
                    || when.as_ref().is_some_and(|re| is_match(re, ua))
            }
        };

        let label = match (&data.tablet_label, tablet) {
            (Some(tablet_label), true) => tablet_label,
            _ => &data.label,
        };

        let version = extract_version(data.version_template.as_deref(), &m.captures);
        trace!(rule = %m.rule.id, os = %data.name, ?version, tablet, "os rule matched");

        Some(OsMatch {
            device: Device {
                kind: data.device_type,
                name: label.clone(),
                model: UNKNOWN.to_string(),
                manufacturer: UNKNOWN.to_string(),
            },
            os: Os {
                name: data.name.clone(),
                version,
                architecture: None,
            },
            form_factor: FormFactor {
                mobile: data.mobile,
                tablet,
            },
        })
    }
}

fn os_rule(id: String, entry: db::OsEntry) -> Result<RuleSpec<OsData>> {
    let device_type = match DeviceType::from_name(&entry.device) {
        Some(DeviceType::Unknown) | None => {
            return Err(Error::InvalidRule {
                rule: id,
                reason: format!("unsupported device type `{}`", entry.device),
            })
        }
        Some(kind) => kind,
    };

    let tablet = match entry.tablet {
        db::TabletEntry::Fixed(flag) => TabletData::Fixed(flag),
        db::TabletEntry::Heuristic { unless, when } => TabletData::Heuristic {
            unless: unless.as_deref().map(compile_regex).transpose()?,
            when: when.as_deref().map(compile_regex).transpose()?,
        },
    };

    Ok(RuleSpec {
        id,
        regex: entry.regex,
        require: entry.require,
        exclude: entry.exclude,
        data: OsData {
            name: entry.name,
            version_template: entry.version,
            device_type,
            label: entry.label,
            tablet_label: entry.tablet_label,
            mobile: entry.mobile,
            tablet,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    fn classifier() -> OsClassifier {
        OsClassifier::build(Registry::embedded().unwrap().oss).unwrap()
    }

    fn classify(ua: &str) -> OsMatch {
        classifier()
            .classify(ua)
            .unwrap_or_else(|| panic!("no os rule matched {ua}"))
    }

    #[test]
    fn windows_phone_wins_over_android_token() {
        let m = classify(
            "Mozilla/5.0 (Windows Phone 10.0; Android 6.0.1; Microsoft; Lumia 950) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/52.0.2743.116 Mobile Safari/537.36 Edge/15.15063",
        );
        assert_eq!(m.device.kind, DeviceType::WindowsPhone);
        assert_eq!(m.os.name, "Windows Phone");
        assert_eq!(m.os.version.as_deref(), Some("10.0"));
        assert!(m.form_factor.mobile);
        assert!(!m.form_factor.tablet);
    }

    #[test]
    fn legacy_windows_phone_os_token() {
        let m = classify("Mozilla/5.0 (compatible; MSIE 9.0; Windows Phone OS 7.5; Trident/5.0; IEMobile/9.0)");
        assert_eq!(m.os.version.as_deref(), Some("7.5"));
    }

    #[test]
    fn windows_phone_without_version() {
        let m = classify("Mozilla/4.0 (compatible; MSIE 7.0; Windows Phone)");
        assert_eq!(m.device.kind, DeviceType::WindowsPhone);
        assert_eq!(m.os.version, None);
    }

    #[test]
    fn ipad_is_tablet() {
        let m = classify(
            "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
        );
        assert_eq!(m.device.kind, DeviceType::Ios);
        assert_eq!(m.device.name, "iPad");
        assert_eq!(m.os.name, "iOS");
        assert_eq!(m.os.version.as_deref(), Some("16.6"));
        assert!(m.form_factor.mobile);
        assert!(m.form_factor.tablet);
    }

    #[test]
    fn iphone_version_is_dotted() {
        let m = classify(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        );
        assert_eq!(m.device.name, "iPhone");
        assert_eq!(m.os.version.as_deref(), Some("17.0.3"));
        assert!(!m.form_factor.tablet);
    }

    #[test]
    fn ipod_is_not_tablet() {
        let m = classify(
            "Mozilla/5.0 (iPod touch; CPU iPhone OS 12_5_7 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1.2 Mobile/15E148 Safari/604.1",
        );
        assert_eq!(m.device.kind, DeviceType::Ios);
        assert_eq!(m.device.name, "iPod");
        assert_eq!(m.os.version.as_deref(), Some("12.5.7"));
        assert!(m.form_factor.mobile);
        assert!(!m.form_factor.tablet);
    }

    #[test]
    fn android_phone() {
        let m = classify(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36",
        );
        assert_eq!(m.device.kind, DeviceType::Android);
        assert_eq!(m.device.name, "Android Phone");
        assert_eq!(m.os.version.as_deref(), Some("14"));
        assert!(m.form_factor.mobile);
        assert!(!m.form_factor.tablet);
    }

    #[test]
    fn android_without_mobile_token_is_tablet() {
        let m = classify(
            "Mozilla/5.0 (Linux; Android 13; Pixel Tablet) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        );
        assert_eq!(m.device.name, "Android Tablet");
        assert!(m.form_factor.tablet);
    }

    #[test]
    fn android_tablet_word_wins_over_mobile_token() {
        let m = classify("Mozilla/5.0 (Android 4.4; Tablet; rv:41.0) Gecko/41.0 Firefox/41.0 Mobile");
        assert!(m.form_factor.tablet);
    }

    #[test]
    fn android_tablet_model_codes() {
        for ua in [
            "Mozilla/5.0 (Linux; Android 11; SM-T870) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0 Mobile Safari/537.36",
            "Mozilla/5.0 (Linux; Android 9; KFTRWI) AppleWebKit/537.36 (KHTML, like Gecko) Silk/108.6 Mobile Safari/537.36",
        ] {
            assert!(classify(ua).form_factor.tablet, "expected tablet for {ua}");
        }
    }

    #[test]
    fn opera_mobi_token_is_not_tablet() {
        // "Mobi" without "Mobile" still counts as a phone.
        let m = classify("Opera/9.80 (Android 2.3.3; Linux; Opera Mobi/ADR-1111101157; U; en) Presto/2.9.201 Version/11.50");
        assert_eq!(m.device.kind, DeviceType::Android);
        assert_eq!(m.device.name, "Android Phone");
        assert_eq!(m.os.version.as_deref(), Some("2.3.3"));
        assert!(m.form_factor.mobile);
        assert!(!m.form_factor.tablet);
    }

    #[test]
    fn iphone_with_macintosh_token_is_ios() {
        let m = classify("Mozilla/5.0 (iPhone; CPU iPhone OS 4_3 like Mac OS X; Macintosh) AppleWebKit/533.17.9");
        assert_eq!(m.device.kind, DeviceType::Ios);
        assert_eq!(m.device.name, "iPhone");
        assert_eq!(m.os.name, "iOS");
        assert_eq!(m.os.version.as_deref(), Some("4.3"));
    }

    #[test]
    fn windows_desktop() {
        let m = classify("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36");
        assert_eq!(m.device.kind, DeviceType::Pc);
        assert_eq!(m.os.name, "Windows");
        assert_eq!(m.os.version.as_deref(), Some("10.0"));
        assert_eq!(m.form_factor, FormFactor::default());
    }

    #[test]
    fn macos_version_is_dotted() {
        let m = classify(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.1 Safari/605.1.15",
        );
        assert_eq!(m.device.kind, DeviceType::Pc);
        assert_eq!(m.os.name, "macOS");
        assert_eq!(m.os.version.as_deref(), Some("10.15.7"));
    }

    #[test]
    fn mac_os_x_token_with_iphone_is_not_macos() {
        // No version token after "iPhone", so the iOS rules pass; the macOS
        // guard must still reject it.
        let c = classifier();
        let m = c.classify("Mozilla/5.0 (Macintosh; iPhone; Mac OS X 10_9)");
        assert!(m.map_or(true, |m| m.os.name != "macOS"));
    }

    #[test]
    fn linux_desktop_has_no_version() {
        let m = classify("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0");
        assert_eq!(m.device.kind, DeviceType::Pc);
        assert_eq!(m.os.name, "Linux");
        assert_eq!(m.os.version, None);
    }

    #[test]
    fn android_without_version_is_not_linux() {
        assert!(classifier().classify("Mozilla/5.0 (Linux; Android; Mobile)").is_none());
    }

    #[test]
    fn nothing_matches() {
        let c = classifier();
        assert!(c.classify("").is_none());
        assert!(c.classify("curl/8.4.0").is_none());
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        let entries: db::OsMap =
            serde_yaml::from_str("x:\n  regex: 'X'\n  name: X\n  device: fridge\n  label: X\n").unwrap();
        assert!(matches!(
            OsClassifier::build(entries),
            Err(Error::InvalidRule { rule, .. }) if rule == "x"
        ));
    }
}
