use crate::error::{QuiverError, Result};
use crate::types::geometry::{TargetGeometry, DEFAULT_RING_COUNT, DEFAULT_TOTAL_SIZE};
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = ".quiverstats/store.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuiverConfig {
    pub target: Option<TargetConfig>,
    pub session: Option<SessionConfig>,
    pub store: Option<StoreConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub total_size: Option<f64>,
    pub ring_count: Option<u32>,
}

/// What `confirm` does with shots the store refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedSubmissionPolicy {
    #[default]
    Drop,
    Retain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub failed_submissions: FailedSubmissionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl QuiverConfig {
    pub fn geometry(&self) -> Result<TargetGeometry> {
        let target = self.target.as_ref();
        TargetGeometry::new(
            target
                .and_then(|target| target.total_size)
                .unwrap_or(DEFAULT_TOTAL_SIZE),
            target
                .and_then(|target| target.ring_count)
                .unwrap_or(DEFAULT_RING_COUNT),
        )
    }

    pub fn failed_submissions(&self) -> FailedSubmissionPolicy {
        self.session
            .as_ref()
            .map(|session| session.failed_submissions)
            .unwrap_or_default()
    }

    pub fn store_path(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|store| store.path.as_deref())
            .unwrap_or(DEFAULT_STORE_PATH)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(target) = &self.target {
            if let Some(total_size) = target.total_size {
                if !total_size.is_finite() || total_size <= 0.0 {
                    return Err(QuiverError::ConfigParse(format!(
                        "target.total_size must be greater than 0 (found {total_size})"
                    )));
                }
            }
            if target.ring_count == Some(0) {
                return Err(QuiverError::ConfigParse(
                    "target.ring_count must be greater than 0".to_string(),
                ));
            }
        }

        if self.store_path().trim().is_empty() {
            return Err(QuiverError::ConfigParse(
                "store.path cannot be empty".to_string(),
            ));
        }

        const ALLOWED_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = self.log_level().to_ascii_lowercase();
        if !ALLOWED_LEVELS.contains(&level.as_str()) {
            return Err(QuiverError::ConfigParse(format!(
                "logging.level must be one of {} (found {})",
                ALLOWED_LEVELS.join(", "),
                self.log_level()
            )));
        }

        Ok(())
    }
}
