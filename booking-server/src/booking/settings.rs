//! Settings provider
//!
//! 每次操作读取一次设置快照并校验；配置错误在加载时立即失败。

use redb::WriteTransaction;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::RestaurantSettings;
use std::path::Path;

use super::storage::{BookingStorage, StorageError};

#[derive(Clone)]
pub struct SettingsProvider {
    storage: BookingStorage,
    restaurant_id: String,
}

fn storage_error(e: StorageError) -> AppError {
    AppError::database(e.to_string())
}

impl SettingsProvider {
    pub fn new(storage: BookingStorage, restaurant_id: impl Into<String>) -> Self {
        Self {
            storage,
            restaurant_id: restaurant_id.into(),
        }
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    /// Load and validate the current settings
    pub fn get(&self) -> AppResult<RestaurantSettings> {
        let settings = self
            .storage
            .get_settings(&self.restaurant_id)
            .map_err(storage_error)?;
        self.checked(settings)
    }

    /// Same as [`get`](Self::get) but inside an open write transaction
    pub fn get_txn(&self, txn: &WriteTransaction) -> AppResult<RestaurantSettings> {
        let settings = self
            .storage
            .get_settings_txn(txn, &self.restaurant_id)
            .map_err(storage_error)?;
        self.checked(settings)
    }

    fn checked(&self, settings: Option<RestaurantSettings>) -> AppResult<RestaurantSettings> {
        let settings = settings.ok_or_else(|| {
            AppError::new(ErrorCode::SettingsNotFound)
                .with_detail("restaurant_id", self.restaurant_id.clone())
        })?;
        if let Err(e) = settings.validate() {
            tracing::error!(restaurant_id = %self.restaurant_id, error = %e, "Stored settings are invalid");
            return Err(e);
        }
        Ok(settings)
    }

    /// Replace the settings after validating them
    pub fn put(&self, mut settings: RestaurantSettings) -> AppResult<RestaurantSettings> {
        settings.restaurant_id = self.restaurant_id.clone();
        settings.validate()?;
        settings.updated_at = Some(shared::util::now_millis());

        let txn = self.storage.begin_write().map_err(storage_error)?;
        self.storage
            .put_settings_txn(&txn, &settings)
            .map_err(storage_error)?;
        txn.commit()
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(
            restaurant_id = %self.restaurant_id,
            total_capacity = settings.total_capacity(),
            "Restaurant settings updated"
        );
        Ok(settings)
    }

    /// Seed settings on first start; existing settings are left untouched
    ///
    /// `seed_file` (JSON) takes precedence over the built-in defaults.
    pub fn seed_if_missing(&self, seed_file: Option<&Path>) -> AppResult<bool> {
        let existing = self
            .storage
            .get_settings(&self.restaurant_id)
            .map_err(storage_error)?;
        if existing.is_some() {
            return Ok(false);
        }

        let settings = match seed_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::settings_invalid(format!(
                        "Failed to read settings file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                serde_json::from_str::<RestaurantSettings>(&raw).map_err(|e| {
                    AppError::settings_invalid(format!("Invalid settings file: {}", e))
                })?
            }
            None => RestaurantSettings::default(),
        };

        self.put(settings)?;
        tracing::info!(restaurant_id = %self.restaurant_id, "Seeded restaurant settings");
        Ok(true)
    }
}
