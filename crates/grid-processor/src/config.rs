//! Configuration for the resampler and the end-to-end pipeline.

use geo_common::{GeoError, GeoResult, MODIS_SPHERE_RADIUS};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for swath resampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Sphere radius used for great-circle distances (meters).
    pub earth_radius_m: f64,

    /// Maximum great-circle distance between a cell center and the input
    /// point assigned to it (meters).
    pub radius_of_influence_m: f64,

    /// Candidates within this distance of the best one are treated as
    /// equidistant and resolved by the lowest input index (meters).
    pub tie_tolerance_m: f64,

    /// Assignment strategy.
    pub mode: ResampleMode,

    /// Run per-cell nearest-neighbor queries on the rayon pool.
    pub parallel: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: MODIS_SPHERE_RADIUS,
            radius_of_influence_m: 5_000.0,
            tie_tolerance_m: 1e-6,
            mode: ResampleMode::Nearest,
            parallel: true,
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; unparseable values are logged and
    /// ignored. Range checks are left to [`ProcessorConfig::validate`].
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_f64("RESAMPLE_EARTH_RADIUS_M") {
            config.earth_radius_m = val;
        }

        if let Some(val) = env_f64("RESAMPLE_RADIUS_M") {
            config.radius_of_influence_m = val;
        }

        if let Some(val) = env_f64("RESAMPLE_TIE_TOLERANCE_M") {
            config.tie_tolerance_m = val;
        }

        if let Ok(val) = std::env::var("RESAMPLE_MODE") {
            match ResampleMode::parse(&val) {
                Ok(mode) => config.mode = mode,
                Err(e) => warn!(error = %e, "Ignoring RESAMPLE_MODE"),
            }
        }

        if let Ok(val) = std::env::var("RESAMPLE_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Builder-style radius override.
    pub fn with_radius(mut self, radius_of_influence_m: f64) -> Self {
        self.radius_of_influence_m = radius_of_influence_m;
        self
    }

    /// Builder-style mode override.
    pub fn with_mode(mut self, mode: ResampleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GeoResult<()> {
        if !(self.earth_radius_m.is_finite() && self.earth_radius_m > 0.0) {
            return Err(GeoError::invalid_parameter(
                "earth_radius_m",
                format!("{} must be > 0", self.earth_radius_m),
            ));
        }

        if !(self.radius_of_influence_m.is_finite() && self.radius_of_influence_m > 0.0) {
            return Err(GeoError::invalid_parameter(
                "radius_of_influence_m",
                format!("{} must be > 0", self.radius_of_influence_m),
            ));
        }

        if !(self.tie_tolerance_m.is_finite() && self.tie_tolerance_m >= 0.0) {
            return Err(GeoError::invalid_parameter(
                "tie_tolerance_m",
                format!("{} must be >= 0", self.tie_tolerance_m),
            ));
        }

        Ok(())
    }
}

fn env_f64(name: &str) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(variable = name, value = %val, "Ignoring unparseable value");
            None
        }
    }
}

/// How swath points are assigned to target cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMode {
    /// Each cell takes the nearest valid input within the radius.
    /// A single point may fill many cells.
    #[default]
    Nearest,
    /// Each input point is offered only to its own nearest cell; a cell
    /// keeps the closest offered point within the radius.
    Bucket,
}

impl ResampleMode {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> GeoResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bucket" => Ok(Self::Bucket),
            other => Err(GeoError::invalid_parameter(
                "mode",
                format!("'{}', expected 'nearest' or 'bucket'", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bucket => "bucket",
        }
    }
}

impl std::fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
