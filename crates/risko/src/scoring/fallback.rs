use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a calculator picks a value inside its degraded-mode band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Always the centre of the band.
    #[default]
    Midpoint,
    /// Uniformly sampled inside the band on every call.
    Random,
}

impl FallbackMode {
    pub fn pick(self, band: Band) -> f64 {
        match self {
            Self::Midpoint => band.midpoint(),
            Self::Random => rand::thread_rng().gen_range(band.low..=band.high),
        }
    }
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "midpoint" | "deterministic" => Ok(Self::Midpoint),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown fallback mode '{other}'")),
        }
    }
}

/// Closed score interval used by degraded-mode heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}
