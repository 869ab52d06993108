//! Multi-hazard risk scoring for Turkish street addresses.
//!
//! An address is geocoded, scored for earthquake, flood, fire and landslide
//! exposure from static zone tables, and folded into one weighted score with
//! a qualitative level.

pub mod analyses;
pub mod config;
pub mod error;
pub mod recommendations;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use analyses::{AnalysisRecord, AnalysisRepository, RepositoryError, RiskStatistics};
pub use error::AppError;
pub use router::risk_router;
pub use service::{AnalyzeRequest, PartnerAccess, RiskService, RiskServiceError};
