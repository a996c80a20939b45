use crate::facts::Quarter;
use crate::scoring::{
    KpiWeights, ScoreBand, WeightError, DEFAULT_MAX_THRESHOLD, DEFAULT_MIN_THRESHOLD,
    DEFAULT_ORDER_BASELINE, DEFAULT_PRODUCT_WEIGHT,
};
use std::env;
use std::fmt;

pub const DEFAULT_BONUS_THRESHOLD: f64 = 85.0;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
    pub quarter: Quarter,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let quarter = match env::var("INCENTIVE_QUARTER") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Quarter::new)
                .ok_or(ConfigError::InvalidQuarter(raw))?,
            Err(_) => Quarter::Q1,
        };

        Ok(Self {
            environment,
            engine: EngineConfig::from_env()?,
            telemetry: TelemetryConfig { log_level },
            quarter,
        })
    }
}

/// Scoring parameters shared read-only by every task of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub bonus_threshold: f64,
    /// Orders expected per representative per quarter.
    pub order_baseline: f64,
    pub default_product_weight: f64,
    pub kpi_weights: KpiWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bonus_threshold: DEFAULT_BONUS_THRESHOLD,
            order_baseline: DEFAULT_ORDER_BASELINE,
            default_product_weight: DEFAULT_PRODUCT_WEIGHT,
            kpi_weights: KpiWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let min_threshold = read_number("INCENTIVE_MIN_THRESHOLD", DEFAULT_MIN_THRESHOLD)?;
        let max_threshold = read_number("INCENTIVE_MAX_THRESHOLD", DEFAULT_MAX_THRESHOLD)?;
        let band = ScoreBand::new(min_threshold, max_threshold).ok_or(
            ConfigError::InvalidThresholds {
                min: min_threshold,
                max: max_threshold,
            },
        )?;

        let mut kpi_weights = KpiWeights::with_band(band);
        if let Ok(raw) = env::var("INCENTIVE_KPI_WEIGHTS") {
            let overrides =
                KpiWeights::parse_overrides(&raw).map_err(ConfigError::InvalidKpiWeights)?;
            kpi_weights = kpi_weights
                .with_overrides(&overrides)
                .map_err(ConfigError::InvalidKpiWeights)?;
        }

        // Scores unknown product groups; must be positive like scorecard rows.
        let default_product_weight =
            read_number("INCENTIVE_DEFAULT_PRODUCT_WEIGHT", DEFAULT_PRODUCT_WEIGHT)?;
        if default_product_weight <= 0.0 {
            return Err(ConfigError::InvalidDefaultProductWeight(default_product_weight));
        }

        Ok(Self {
            bonus_threshold: read_number("INCENTIVE_BONUS_THRESHOLD", DEFAULT_BONUS_THRESHOLD)?,
            order_baseline: read_number("INCENTIVE_ORDER_BASELINE", DEFAULT_ORDER_BASELINE)?,
            default_product_weight,
            kpi_weights,
        })
    }
}

fn read_number(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    InvalidQuarter(String),
    InvalidThresholds { min: f64, max: f64 },
    InvalidDefaultProductWeight(f64),
    InvalidKpiWeights(WeightError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a finite number (got '{value}')")
            }
            ConfigError::InvalidQuarter(value) => {
                write!(f, "INCENTIVE_QUARTER must be 1, 2, 3 or 4 (got '{value}')")
            }
            ConfigError::InvalidThresholds { min, max } => write!(
                f,
                "INCENTIVE_MIN_THRESHOLD ({min}) must be below INCENTIVE_MAX_THRESHOLD ({max})"
            ),
            ConfigError::InvalidDefaultProductWeight(value) => write!(
                f,
                "INCENTIVE_DEFAULT_PRODUCT_WEIGHT must be greater than 0 (got {value})"
            ),
            ConfigError::InvalidKpiWeights(_) => write!(f, "INCENTIVE_KPI_WEIGHTS is invalid"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidKpiWeights(source) => Some(source),
            ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidQuarter(_)
            | ConfigError::InvalidThresholds { .. }
            | ConfigError::InvalidDefaultProductWeight(_) => None,
        }
    }
}
