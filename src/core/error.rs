use thiserror::Error;

/// Faults in the configuration handed to the engine.
///
/// These are programmer or deployment errors and surface when the
/// configuration is loaded, never while resolving gameplay.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Tier table is empty")]
    EmptyTierTable,

    #[error("Duplicate tier threshold: level {0}")]
    DuplicateThreshold(u32),

    #[error("Tier at level {level}: {field} = {value} is out of range")]
    OutOfRange {
        level: u32,
        field: &'static str,
        value: f64,
    },

    #[error("Tier at level {level}: {field} decreases relative to the tier below")]
    NotMonotonic { level: u32, field: &'static str },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Failure to hand a re-arm task to the host scheduler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("No async runtime available to schedule re-arm")]
    RuntimeUnavailable,

    #[error("Scheduler is shutting down")]
    ShuttingDown,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
