use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use risko::analyses::AnalysisId;
use risko::scoring::AnalysisResult;
use risko::{AnalysisRecord, AnalysisRepository, RepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local analysis store; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryAnalysisRepository {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<AnalysisRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("analysis store lock poisoned".to_string()))
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(
        &self,
        owner_id: &str,
        result: AnalysisResult,
        created_at: DateTime<Utc>,
    ) -> Result<AnalysisRecord, RepositoryError> {
        let id = AnalysisId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = AnalysisRecord {
            id,
            owner_id: owner_id.to_string(),
            created_at,
            result,
        };
        self.guard()?.push(record.clone());
        Ok(record)
    }

    fn for_owner(&self, owner_id: &str) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let mut records: Vec<AnalysisRecord> = self
            .guard()?
            .iter()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(self.guard()?.clone())
    }
}
