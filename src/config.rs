use std::{env, str::FromStr, time::Duration};

use secrecy::SecretString;

use crate::{
    errors::{AppError, AppResult},
    models::domain::MaterialType,
    services::retry::RetryPolicy,
};

const DEFAULT_TRACKED_MATERIALS: &str = "pdf,video,audio,quiz";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    /// Comma separated material names every new sub-bab record starts with.
    pub tracked_materials: String,
    pub progress_write_attempts: u32,
    pub asset_link_attempts: u32,
    pub asset_link_delay_ms: u64,
}

fn env_number<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "learnable-local".to_string()),
            tracked_materials: env::var("PROGRESS_TRACKED_MATERIALS")
                .unwrap_or_else(|_| DEFAULT_TRACKED_MATERIALS.to_string()),
            progress_write_attempts: env_number("PROGRESS_WRITE_ATTEMPTS", 5),
            asset_link_attempts: env_number("ASSET_LINK_ATTEMPTS", 3),
            asset_link_delay_ms: env_number("ASSET_LINK_DELAY_MS", 500),
        }
    }

    /// Parsed material list, in the order given.
    pub fn tracked_materials(&self) -> AppResult<Vec<MaterialType>> {
        let mut materials = Vec::new();
        for name in self.tracked_materials.split(',') {
            if name.trim().is_empty() {
                continue;
            }
            let material = name.parse::<MaterialType>()?;
            if !materials.contains(&material) {
                materials.push(material);
            }
        }
        Ok(materials)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.tracked_materials()?.is_empty() {
            return Err(AppError::ValidationError(
                "PROGRESS_TRACKED_MATERIALS must name at least one material".to_string(),
            ));
        }

        if self.progress_write_attempts == 0 {
            return Err(AppError::ValidationError(
                "PROGRESS_WRITE_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        if self.asset_link_attempts == 0 {
            return Err(AppError::ValidationError(
                "ASSET_LINK_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn progress_write_policy(&self) -> RetryPolicy {
        RetryPolicy::on_conflict(self.progress_write_attempts)
    }

    pub fn asset_link_policy(&self) -> RetryPolicy {
        RetryPolicy::transient(
            self.asset_link_attempts,
            Duration::from_millis(self.asset_link_delay_ms),
        )
    }

    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
            mongo_db_name: "learnable-test".to_string(),
            tracked_materials: DEFAULT_TRACKED_MATERIALS.to_string(),
            progress_write_attempts: 5,
            asset_link_attempts: 3,
            asset_link_delay_ms: 0,
        }
    }
}
