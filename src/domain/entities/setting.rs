use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Recognised `admin_settings` keys. Only the master password exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    MasterPassword,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::MasterPassword => "master_password",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master_password" => Ok(SettingKey::MasterPassword),
            _ => Err(AppError::InvalidRequest("Invalid setting key".into())),
        }
    }
}

/// Any value is stored as-is. An empty master password reads back as unset.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: String,
}
