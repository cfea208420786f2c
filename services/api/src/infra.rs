use metrics_exporter_prometheus::PrometheusHandle;
use risk_advisor::workflows::holdings::CsvInstrumentSource;
use risk_advisor::workflows::profiling::{
    AnswerSheet, BucketKey, Instrument, InstrumentSource, ProfileRecord, ProfileRepository,
    RepositoryError, SourceError, SubjectId,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Latest record per subject; a re-assessment replaces the previous one.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<SubjectId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn save(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".into()))?;
        guard.insert(record.subject_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, subject_id: &SubjectId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".into()))?;
        Ok(guard.get(subject_id).cloned())
    }
}

/// Fixed universe handed out unchanged on every call.
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticInstrumentSource {
    instruments: Vec<Instrument>,
}

impl StaticInstrumentSource {
    pub(crate) fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }
}

impl InstrumentSource for StaticInstrumentSource {
    fn universe(&self) -> Result<Vec<Instrument>, SourceError> {
        Ok(self.instruments.clone())
    }
}

/// Universe backing the running service: a holdings export when one is configured,
/// otherwise the built-in demo universe.
#[derive(Debug, Clone)]
pub(crate) enum ConfiguredSource {
    Csv(CsvInstrumentSource),
    Static(StaticInstrumentSource),
}

impl ConfiguredSource {
    pub(crate) fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::Csv(CsvInstrumentSource::new(path)),
            None => Self::Static(StaticInstrumentSource::new(demo_universe())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Csv(source) => source.path().display().to_string(),
            Self::Static(_) => "built-in demo universe".to_string(),
        }
    }
}

impl InstrumentSource for ConfiguredSource {
    fn universe(&self) -> Result<Vec<Instrument>, SourceError> {
        match self {
            Self::Csv(source) => source.universe(),
            Self::Static(source) => source.universe(),
        }
    }
}

pub(crate) fn demo_universe() -> Vec<Instrument> {
    vec![
        Instrument::new("UST-2030", BucketKey::AAA_A, 4.15),
        Instrument::new("MSFT-2031", BucketKey::AAA_A, 4.61),
        Instrument::new("JPM-2032", BucketKey::AAA_A, 5.12),
        Instrument::new("VZ-2031", BucketKey::BBB, 5.74),
        Instrument::new("F-2029", BucketKey::BBB, 6.40),
        Instrument::new("ORCL-2034", BucketKey::BBB, 5.88),
        Instrument::new("NFLX-2030", BucketKey::BB, 6.85),
        Instrument::new("CCL-2029", BucketKey::BB, 7.60),
        Instrument::new("RCL-2031", BucketKey::B, 8.20),
        Instrument::new("HYG", BucketKey::ETF, 7.10),
        Instrument::new("LQD", BucketKey::ETF, 5.20),
        Instrument::new("DISTRESSED-2027", "ccc", 14.50),
    ]
}

/// Parse a `key=value` questionnaire answer from the command line.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("answer '{raw}' has an empty key"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Answers arrive as JSON strings or numbers; both are kept as text for the scorer.
pub(crate) fn deserialize_answers<'de, D>(deserializer: D) -> Result<AnswerSheet, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            Value::Number(number) => Ok((key, number.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "answer '{key}' must be a string or number, got {other}"
            ))),
        })
        .collect()
}
