use std::sync::Arc;

use crate::{
    entities::setting::{SettingKey, UpdateSettingRequest},
    errors::AppError,
    repositories::settings::SettingsRepository,
};

pub struct SettingsHandler {
    pub settings_repo: Arc<dyn SettingsRepository>,
}

impl SettingsHandler {
    pub fn new(settings_repo: Arc<dyn SettingsRepository>) -> Self {
        SettingsHandler { settings_repo }
    }

    /// Stores a setting. Unknown keys are rejected before any write.
    pub async fn update_setting(&self, request: UpdateSettingRequest) -> Result<(), AppError> {
        let key: SettingKey = request.key.parse()?;

        self.settings_repo.upsert_setting(key, &request.value).await?;

        tracing::info!(%key, "Setting updated");
        Ok(())
    }
}
