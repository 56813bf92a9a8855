use std::path::Path;
use std::sync::OnceLock;

use rayon::prelude::*;
use tracing::debug;

use super::browser::BrowserClassifier;
use super::error::Result;
use super::helpers::clamp_input;
use super::os::OsClassifier;
use super::registry::Registry;
use super::types::Classification;

/// Classifies User-Agent strings into device, OS, browser and engine facts.
///
/// Building compiles the registry once; classification afterwards only
/// reads it, so a single `Classifier` can be shared freely across threads.
pub struct Classifier {
    os: OsClassifier,
    browser: BrowserClassifier,
}

impl Classifier {
    /// Build from the registry shipped with the crate.
    pub fn new() -> Result<Self> {
        Self::with_registry(Registry::embedded()?)
    }

    /// Load `oss.yml` and `browsers.yml` from `dir` and build.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_registry(Registry::from_dir(dir)?)
    }

    pub fn with_registry(registry: Registry) -> Result<Self> {
        let Registry { oss, browsers } = registry;
        let (os, browser) = rayon::join(
            || OsClassifier::build(oss),
            || BrowserClassifier::build(browsers),
        );
        let classifier = Self {
            os: os?,
            browser: browser?,
        };
        debug!(
            os_rules = classifier.os.rule_ids().count(),
            browser_rules = classifier.browser.rule_ids().count(),
            "classifier ready"
        );
        Ok(classifier)
    }

    /// OS/device rule ids in evaluation order.
    pub fn os_rules(&self) -> Vec<&str> {
        self.os.rule_ids().collect()
    }

    /// Browser/engine rule ids in evaluation order.
    pub fn browser_rules(&self) -> Vec<&str> {
        self.browser.rule_ids().collect()
    }

    pub fn classify(&self, ua: &str) -> Classification {
        self.classify_with_platform(ua, None)
    }

    /// Classify `ua`. `platform` is copied into the result verbatim and has
    /// no influence on classification.
    ///
    /// Never fails: anything unrecognised stays at its "unknown" default.
    pub fn classify_with_platform(&self, ua: &str, platform: Option<&str>) -> Classification {
        let input = clamp_input(ua);
        if input.len() < ua.len() {
            debug!(len = ua.len(), kept = input.len(), "input truncated before matching");
        }
        let mut result = Classification::unclassified(ua, platform);

        // The two classifiers write disjoint parts of the record.
        if let Some(partial) = self.os.classify(input) {
            result = result.with_os(partial);
        }
        if let Some(partial) = self.browser.classify(input) {
            result = result.with_browser(partial);
        }
        result
    }

    /// Classify many strings in parallel. Output order follows input order.
    pub fn classify_batch<S>(&self, uas: &[S]) -> Vec<Classification>
    where
        S: AsRef<str> + Sync,
    {
        uas.par_iter().map(|ua| self.classify(ua.as_ref())).collect()
    }
}

static SHARED: OnceLock<Classifier> = OnceLock::new();

/// Process-wide classifier built from the embedded registry on first use.
pub fn shared() -> &'static Classifier {
    SHARED.get_or_init(|| {
        // The embedded registry is covered by the crate's own tests.
        Classifier::new().expect("embedded registry must compile")
    })
}

/// Classify `ua` with the shared classifier.
pub fn classify(ua: &str) -> Classification {
    shared().classify(ua)
}

/// Classify `ua` with the shared classifier, recording a platform hint.
pub fn classify_with_platform(ua: &str, platform: Option<&str>) -> Classification {
    shared().classify_with_platform(ua, platform)
}
