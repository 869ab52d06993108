//! Application service joining the scoring engine, persistence and partner access.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::analyses::{AnalysisRecord, AnalysisRepository, RepositoryError, RiskStatistics};
use crate::config::{AppConfig, GeocoderKind};
use crate::error::AppError;
use crate::report::{DetailedRiskReport, RiskVisualization};
use crate::scoring::{
    AnalysisError, AnalysisResult, Geocoder, GeocoderBackend, GeocodingProvider, NominatimProvider,
    OfflineProvider, RiskEngine, ZoneTables,
};

/// Owner recorded for analyses made through the public routes.
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// One address to analyse, as accepted by every analysis route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzeRequest {
    pub address: String,
    #[serde(default)]
    pub building_age: Option<u32>,
}

impl AnalyzeRequest {
    pub fn new(address: impl Into<String>, building_age: Option<u32>) -> Self {
        Self {
            address: address.into(),
            building_age,
        }
    }
}

/// Static API keys and the batch ceiling for partner routes.
#[derive(Debug, Clone)]
pub struct PartnerAccess {
    api_keys: HashSet<String>,
    max_batch_size: usize,
}

impl PartnerAccess {
    pub fn new<I, S>(api_keys: I, max_batch_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api_keys: api_keys.into_iter().map(Into::into).collect(),
            max_batch_size,
        }
    }

    /// Resolve the caller's key. The key itself is the owner id.
    pub fn authorize<'a>(&self, api_key: Option<&'a str>) -> Result<&'a str, RiskServiceError> {
        let key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(RiskServiceError::MissingApiKey)?;
        if self.api_keys.contains(key) {
            Ok(key)
        } else {
            Err(RiskServiceError::InvalidApiKey)
        }
    }
}

pub struct RiskService<P, R> {
    engine: Arc<RiskEngine<P>>,
    repository: Arc<R>,
    access: PartnerAccess,
}

impl<P, R> RiskService<P, R>
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    pub fn new(engine: Arc<RiskEngine<P>>, repository: Arc<R>, access: PartnerAccess) -> Self {
        Self {
            engine,
            repository,
            access,
        }
    }

    /// Analyse one address and record it under the anonymous owner.
    ///
    /// Storage is best-effort: a failed insert is logged and the result is
    /// still returned.
    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<AnalysisResult, RiskServiceError> {
        let result = self.resolve(request).await?;
        self.record(ANONYMOUS_OWNER, &result);
        Ok(result)
    }

    pub async fn detailed(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<DetailedRiskReport, RiskServiceError> {
        let result = self.resolve(request).await?;
        Ok(DetailedRiskReport::new(result))
    }

    pub async fn visualize(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<RiskVisualization, RiskServiceError> {
        let result = self.resolve(request).await?;
        let address = result.address.clone();
        RiskVisualization::from_result(&result).ok_or(RiskServiceError::AddressNotFound(address))
    }

    /// Analyse a partner batch sequentially. Unresolved and blank addresses
    /// are dropped. Every entry is scored before anything is stored, then
    /// each kept result is recorded under the caller's key.
    pub async fn batch_analyze(
        &self,
        api_key: Option<&str>,
        requests: &[AnalyzeRequest],
    ) -> Result<Vec<AnalysisResult>, RiskServiceError> {
        let owner = self.access.authorize(api_key)?;
        let limit = self.access.max_batch_size;
        if requests.len() > limit {
            return Err(RiskServiceError::BatchTooLarge {
                limit,
                received: requests.len(),
            });
        }

        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            match self.resolve(request).await {
                Ok(result) => results.push(result),
                Err(RiskServiceError::AddressNotFound(address))
                | Err(RiskServiceError::BlankAddress(address)) => {
                    debug!(address = %address, "batch entry dropped");
                }
                Err(other) => return Err(other),
            }
        }

        for result in &results {
            self.record(owner, result);
        }

        info!(
            requested = requests.len(),
            analysed = results.len(),
            "partner batch completed"
        );
        Ok(results)
    }

    pub async fn premium_analyze(
        &self,
        api_key: Option<&str>,
        request: &AnalyzeRequest,
    ) -> Result<DetailedRiskReport, RiskServiceError> {
        let owner = self.access.authorize(api_key)?;
        let result = self.resolve(request).await?;
        self.record(owner, &result);
        Ok(DetailedRiskReport::new(result))
    }

    pub fn statistics(
        &self,
        api_key: Option<&str>,
        region: Option<&str>,
    ) -> Result<RiskStatistics, RiskServiceError> {
        self.access.authorize(api_key)?;
        let records = self.repository.all()?;
        Ok(RiskStatistics::from_records(region, &records))
    }

    pub fn analyses(&self, api_key: Option<&str>) -> Result<Vec<AnalysisRecord>, RiskServiceError> {
        let owner = self.access.authorize(api_key)?;
        Ok(self.repository.for_owner(owner)?)
    }

    fn record(&self, owner: &str, result: &AnalysisResult) {
        if let Err(err) = self.repository.insert(owner, result.clone(), Utc::now()) {
            warn!(owner, address = %result.address, error = %err, "analysis not persisted");
        }
    }

    async fn resolve(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, RiskServiceError> {
        if request.address.trim().is_empty() {
            return Err(RiskServiceError::BlankAddress(request.address.clone()));
        }

        let result = self
            .engine
            .analyze(&request.address, request.building_age)
            .await?;
        if result.is_resolved() {
            Ok(result)
        } else {
            Err(RiskServiceError::AddressNotFound(result.address))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RiskServiceError {
    #[error("Address not found: {0}")]
    AddressNotFound(String),
    #[error("Address must not be empty")]
    BlankAddress(String),
    #[error("Maximum {limit} addresses per batch (received {received})")]
    BatchTooLarge { limit: usize, received: usize },
    #[error("API key required")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RiskServiceError> for AppError {
    fn from(value: RiskServiceError) -> Self {
        match value {
            RiskServiceError::AddressNotFound(_) => AppError::NotFound(value.to_string()),
            RiskServiceError::BlankAddress(_) | RiskServiceError::BatchTooLarge { .. } => {
                AppError::BadRequest(value.to_string())
            }
            RiskServiceError::MissingApiKey | RiskServiceError::InvalidApiKey => {
                AppError::Unauthorized(value.to_string())
            }
            RiskServiceError::Analysis(err) => AppError::Analysis(err),
            RiskServiceError::Repository(err) => AppError::Repository(err),
        }
    }
}

/// Build the configured engine: provider, zone tables and fallback mode.
pub fn build_engine(config: &AppConfig) -> Result<RiskEngine<GeocoderBackend>, AppError> {
    let geocoding = &config.geocoding;
    let backend = match geocoding.provider {
        GeocoderKind::Nominatim => GeocoderBackend::Nominatim(NominatimProvider::new(
            geocoding.base_url.clone(),
            &geocoding.user_agent,
            geocoding.timeout,
        )?),
        GeocoderKind::Offline => GeocoderBackend::Offline(OfflineProvider),
    };

    let zones = match &config.scoring.zone_table_path {
        Some(path) => {
            info!(path = %path.display(), "loading zone tables from file");
            ZoneTables::from_path(path)?
        }
        None => ZoneTables::turkey(),
    };

    Ok(RiskEngine::new(
        Geocoder::new(backend, geocoding.settings()),
        Arc::new(zones),
        config.scoring.fallback_mode,
    ))
}

pub fn partner_access(config: &AppConfig) -> PartnerAccess {
    PartnerAccess::new(
        config.b2b.api_keys.iter().cloned(),
        config.b2b.max_batch_size,
    )
}
