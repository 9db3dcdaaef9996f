//! Planner configuration.

use std::str::FromStr;
use std::time::Duration;

use super::fare::FareModel;

/// Maximum walking distance from a point to a route it can board or leave.
pub const DEFAULT_PROXIMITY_THRESHOLD_M: f64 = 200.0;

/// Maximum gap between two routes at a transfer point.
pub const DEFAULT_TRANSFER_TOLERANCE_M: f64 = 100.0;

/// Fraction step between transfer samples along the first route.
pub const DEFAULT_SAMPLE_STEP: f64 = 0.005;

/// Maximum number of itineraries returned per plan.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Errors reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("{name}: cannot parse '{value}'")]
    Parse { name: &'static str, value: String },

    /// A variable parses but is outside its allowed range
    #[error("{name}: {reason}")]
    OutOfRange {
        name: &'static str,
        reason: &'static str,
    },
}

/// Configuration parameters for journey planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Walking distance limit to board or alight a route (meters).
    pub proximity_threshold_m: f64,

    /// Maximum gap between routes at a transfer (meters).
    pub transfer_tolerance_m: f64,

    /// Sampling step along the first leg when searching for transfers.
    pub sample_step: f64,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Fare model used to price every leg.
    pub fare_model: FareModel,

    /// Number of transfer pairs evaluated concurrently.
    /// Higher values issue more store queries at once.
    pub pair_concurrency: usize,

    /// Upper bound on one whole plan (seconds).
    pub search_timeout_secs: u64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        proximity_threshold_m: f64,
        transfer_tolerance_m: f64,
        sample_step: f64,
        max_results: usize,
        fare_model: FareModel,
        pair_concurrency: usize,
        search_timeout_secs: u64,
    ) -> Self {
        Self {
            proximity_threshold_m,
            transfer_tolerance_m,
            sample_step,
            max_results,
            fare_model,
            pair_concurrency,
            search_timeout_secs,
        }
    }

    /// Returns the search timeout as a Duration.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Defaults overlaid with any `PLANNER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`, then validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "PLANNER_PROXIMITY_THRESHOLD_M")? {
            config.proximity_threshold_m = v;
        }
        if let Some(v) = parse_var(&lookup, "PLANNER_TRANSFER_TOLERANCE_M")? {
            config.transfer_tolerance_m = v;
        }
        if let Some(v) = parse_var(&lookup, "PLANNER_SAMPLE_STEP")? {
            config.sample_step = v;
        }
        if let Some(v) = parse_var(&lookup, "PLANNER_MAX_RESULTS")? {
            config.max_results = v;
        }
        if let Some(v) = parse_var(&lookup, "PLANNER_PAIR_CONCURRENCY")? {
            config.pair_concurrency = v;
        }
        if let Some(v) = parse_var(&lookup, "PLANNER_SEARCH_TIMEOUT_SECS")? {
            config.search_timeout_secs = v;
        }
        if let Some(name) = lookup("PLANNER_FARE_MODEL") {
            config.fare_model = FareModel::from_name(name.trim()).ok_or(ConfigError::Parse {
                name: "PLANNER_FARE_MODEL",
                value: name,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.proximity_threshold_m) {
            return Err(out_of_range("proximity_threshold_m", "must be positive"));
        }
        if !positive(self.transfer_tolerance_m) {
            return Err(out_of_range("transfer_tolerance_m", "must be positive"));
        }
        if !positive(self.sample_step) || self.sample_step > 1.0 {
            return Err(out_of_range("sample_step", "must be within (0, 1]"));
        }
        if self.max_results == 0 {
            return Err(out_of_range("max_results", "must be at least 1"));
        }
        if self.pair_concurrency == 0 {
            return Err(out_of_range("pair_concurrency", "must be at least 1"));
        }
        if self.search_timeout_secs == 0 {
            return Err(out_of_range("search_timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_m: DEFAULT_PROXIMITY_THRESHOLD_M,
            transfer_tolerance_m: DEFAULT_TRANSFER_TOLERANCE_M,
            sample_step: DEFAULT_SAMPLE_STEP,
            max_results: DEFAULT_MAX_RESULTS,
            fare_model: FareModel::STEPPED,
            pair_concurrency: 8,
            search_timeout_secs: 10,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { name, value }),
    }
}

fn out_of_range(name: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::OutOfRange { name, reason }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.proximity_threshold_m, 200.0);
        assert_eq!(config.transfer_tolerance_m, 100.0);
        assert_eq!(config.sample_step, 0.005);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.fare_model, FareModel::STEPPED);
        assert_eq!(config.pair_concurrency, 8);
        assert_eq!(config.search_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(150.0, 50.0, 0.01, 3, FareModel::PER_KILOMETER, 2, 4);

        assert_eq!(config.proximity_threshold_m, 150.0);
        assert_eq!(config.transfer_tolerance_m, 50.0);
        assert_eq!(config.sample_step, 0.01);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.fare_model, FareModel::PER_KILOMETER);
        assert_eq!(config.pair_concurrency, 2);
        assert_eq!(config.search_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("PLANNER_PROXIMITY_THRESHOLD_M", "300"),
            ("PLANNER_MAX_RESULTS", " 3 "),
            ("PLANNER_FARE_MODEL", "per_km"),
        ]))
        .unwrap();

        assert_eq!(config.proximity_threshold_m, 300.0);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.fare_model, FareModel::PER_KILOMETER);
        assert_eq!(config.transfer_tolerance_m, 100.0);
    }

    #[test]
    fn unparseable_value() {
        let err = PlannerConfig::from_lookup(lookup(&[("PLANNER_SAMPLE_STEP", "tiny")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                name: "PLANNER_SAMPLE_STEP",
                ..
            }
        ));
    }

    #[test]
    fn unknown_fare_model() {
        let err = PlannerConfig::from_lookup(lookup(&[("PLANNER_FARE_MODEL", "flat")])).unwrap_err();
        assert!(err.to_string().contains("flat"));
    }

    #[test]
    fn rejects_out_of_range() {
        for (name, value) in [
            ("PLANNER_PROXIMITY_THRESHOLD_M", "0"),
            ("PLANNER_TRANSFER_TOLERANCE_M", "-1"),
            ("PLANNER_SAMPLE_STEP", "1.5"),
            ("PLANNER_MAX_RESULTS", "0"),
            ("PLANNER_PAIR_CONCURRENCY", "0"),
            ("PLANNER_SEARCH_TIMEOUT_SECS", "0"),
        ] {
            let result = PlannerConfig::from_lookup(lookup(&[(name, value)]));
            assert!(
                matches!(result, Err(ConfigError::OutOfRange { .. })),
                "{name}={value} should be rejected"
            );
        }
    }
}
