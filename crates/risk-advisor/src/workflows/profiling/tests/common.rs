use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::profiling::allocation::{AllocationUnit, TargetAllocation};
use crate::workflows::profiling::archetypes::{ArchetypeDirectory, RiskArchetype};
use crate::workflows::profiling::domain::{AnswerSheet, BucketKey, Instrument, SubjectId};
use crate::workflows::profiling::repository::{
    InstrumentSource, ProfileRecord, ProfileRepository, RepositoryError, SourceError,
};
use crate::workflows::profiling::scoring::{ScoringEngine, WeightTable};
use crate::workflows::profiling::service::RiskProfileService;

pub(super) fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

pub(super) fn band(id: &str, name: &str, min_score: f64, max_score: f64) -> RiskArchetype {
    RiskArchetype {
        id: id.to_string(),
        name: name.to_string(),
        min_score,
        max_score,
        target_allocation: TargetAllocation::new(
            AllocationUnit::Auto,
            [(BucketKey::AAA_A, 60.0), (BucketKey::BBB, 40.0)],
        ),
    }
}

/// The two conservative bands used throughout the boundary scenarios.
pub(super) fn conservative_directory() -> ArchetypeDirectory {
    ArchetypeDirectory::new(vec![
        band("conservative_a", "Conservative A", 0.0, 0.9),
        band("conservative_b", "Conservative B", 0.9, 1.25),
    ])
    .expect("contiguous bands")
}

pub(super) fn three_band_directory() -> ArchetypeDirectory {
    ArchetypeDirectory::new(vec![
        band("low", "Low", 0.0, 1.0),
        band("mid", "Mid", 1.0, 2.0),
        band("high", "High", 2.0, 3.0),
    ])
    .expect("contiguous bands")
}

pub(super) fn percentage_archetype() -> RiskArchetype {
    RiskArchetype {
        id: "balanced".to_string(),
        name: "Balanced".to_string(),
        min_score: 0.0,
        max_score: 3.0,
        target_allocation: TargetAllocation::new(
            AllocationUnit::Auto,
            [(BucketKey::AAA_A, 30.0), (BucketKey::BBB, 70.0)],
        ),
    }
}

pub(super) fn instrument(symbol: &str, bucket: &str, yield_pct: f64) -> Instrument {
    Instrument::new(symbol, bucket, yield_pct)
}

/// Three AAA names at 5/6/7% and seven BBB names at 8%.
pub(super) fn scenario_universe() -> Vec<Instrument> {
    let mut universe = vec![
        instrument("UST-A", BucketKey::AAA_A, 5.0),
        instrument("UST-B", BucketKey::AAA_A, 6.0),
        instrument("UST-C", BucketKey::AAA_A, 7.0),
    ];
    for index in 0..7 {
        universe.push(instrument(&format!("CORP-{index}"), BucketKey::BBB, 8.0));
    }
    universe
}

pub(super) fn weight_table() -> WeightTable {
    WeightTable::new(
        [("risk_tolerance", 0.2), ("investment_horizon", 0.1)],
        ["client_name", "account_number"],
    )
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> AnswerSheet {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn build_service(
    source: StaticSource,
) -> (
    RiskProfileService<MemoryRepository, StaticSource>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = RiskProfileService::new(
        ScoringEngine::new(weight_table()),
        three_band_directory(),
        repository.clone(),
        Arc::new(source),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubjectId, ProfileRecord>>>,
}

impl ProfileRepository for MemoryRepository {
    fn save(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.subject_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, subject_id: &SubjectId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(subject_id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn save(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _subject_id: &SubjectId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticSource {
    pub(super) instruments: Vec<Instrument>,
    pub(super) offline: bool,
}

impl StaticSource {
    pub(super) fn with(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments,
            offline: false,
        }
    }

    pub(super) fn offline() -> Self {
        Self {
            instruments: Vec::new(),
            offline: true,
        }
    }
}

impl InstrumentSource for StaticSource {
    fn universe(&self) -> Result<Vec<Instrument>, SourceError> {
        if self.offline {
            return Err(SourceError::Unavailable("market data feed down".to_string()));
        }
        Ok(self.instruments.clone())
    }
}
