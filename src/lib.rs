// Library interface for whooprs modules
// The binary and the integration tests both go through this crate root

pub mod charts;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod import;
pub mod insights;
pub mod logging;
pub mod models;
pub mod summary;
pub mod trends;
pub mod units;

// Re-export commonly used types for convenience
pub use models::*;
pub use config::AppConfig;
pub use constants::{RecoveryZone, StatusColor, Thresholds};
pub use error::{ConfigError, ExportError, Result, WhoopError};
pub use import::{ApiPage, RecordSet};
pub use insights::{Insight, InsightCategory, InsightGenerator, InsightLevel};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use summary::{DailySnapshot, SummaryStats};
pub use trends::{TrendCalculator, TrendConfig, TrendData, TrendDirection, TrendStats};
