use tracing::trace;

use super::db;
use super::error::Result;
use super::helpers::{capture_or_empty, extract_version, normalize_version};
use super::parser::{captures, compile_regex, CompiledParser, RuleSpec};
use super::parser_data::{BrowserData, EngineData};
use super::types::{Browser, BrowserMatch, Engine, UNKNOWN};

/// Browser and rendering-engine detection. Rules are ordered most specific
/// first; the first one that fires decides both browser and engine.
pub(crate) struct BrowserClassifier {
    parser: CompiledParser<BrowserData>,
}

impl BrowserClassifier {
    pub fn build(entries: db::BrowserMap) -> Result<Self> {
        let specs = entries
            .into_iter()
            .map(|(id, entry)| browser_rule(id, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            parser: CompiledParser::build("browser", specs)?,
        })
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.parser.rule_ids()
    }

    pub fn classify(&self, ua: &str) -> Option<BrowserMatch> {
        let m = self.parser.match_first(ua)?;
        let data = &m.rule.data;

        let version = extract_version(data.version_template.as_deref(), &m.captures)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let engine = resolve_engine(ua, data);
        trace!(rule = %m.rule.id, browser = %data.name, %version, engine = %engine.name, "browser rule matched");

        Some(BrowserMatch {
            browser: Browser {
                name: data.name.clone(),
                version,
            },
            engine,
        })
    }
}

/// The legacy engine overrides only when its marker is present. Otherwise
/// the rule's engine label applies, with the version of its token if any.
fn resolve_engine(ua: &str, data: &BrowserData) -> Engine {
    if let Some(legacy) = &data.legacy_engine {
        if let Some(version) = engine_token(ua, legacy) {
            return Engine {
                name: legacy.name.clone(),
                version: version.unwrap_or_else(|| UNKNOWN.to_string()),
            };
        }
    }

    match &data.engine {
        Some(engine) => Engine {
            name: engine.name.clone(),
            version: engine_token(ua, engine)
                .flatten()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        },
        None => Engine::default(),
    }
}

/// `None` if the engine marker is absent, `Some(None)` if present without a
/// version.
fn engine_token(ua: &str, engine: &EngineData) -> Option<Option<String>> {
    let caps = captures(engine.regex.as_ref()?, ua)?;
    let version = capture_or_empty(&caps, 1);
    Some((!version.is_empty()).then(|| normalize_version(version)))
}

fn browser_rule(id: String, entry: db::BrowserEntry) -> Result<RuleSpec<BrowserData>> {
    let engine = entry
        .engine
        .map(|e| -> Result<_> {
            Ok(EngineData {
                name: e.name,
                regex: e.regex.as_deref().map(compile_regex).transpose()?,
            })
        })
        .transpose()?;

    let legacy_engine = entry
        .legacy_engine
        .map(|e| -> Result<_> {
            Ok(EngineData {
                name: e.name,
                regex: Some(compile_regex(&e.regex)?),
            })
        })
        .transpose()?;

    Ok(RuleSpec {
        id,
        regex: entry.regex,
        require: entry.require,
        exclude: entry.exclude,
        data: BrowserData {
            name: entry.name,
            version_template: entry.version,
            engine,
            legacy_engine,
        },
    })
}
