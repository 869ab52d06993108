//! Address risk scoring pipeline.

pub mod aggregate;
pub mod domain;
pub mod engine;
pub mod fallback;
pub mod geocoder;
pub mod hazards;
pub mod zones;

pub use aggregate::overall;
pub use domain::{AnalysisResult, Coordinate, Hazard, RiskLevel, RiskScoreSet};
pub use engine::{AnalysisError, RiskEngine};
pub use fallback::{Band, FallbackMode};
pub use geocoder::{
    city_table_lookup, normalize_address, GeocodeError, GeocodeMatch, GeocodeSource, Geocoder,
    GeocoderBackend, GeocoderSettings, GeocodingProvider, NominatimProvider, OfflineProvider,
    COUNTRY_CENTROID,
};
pub use hazards::{earthquake_risk, fire_risk, flood_risk, landslide_risk, FactorError};
pub use zones::{
    BaseRisks, BoundingBox, BoxFactor, CityProfile, FactorKind, FaultZone, PopulationDensity,
    ZoneDescriptor, ZoneTableError, ZoneTables,
};
