//! Runtime error settings shared by all requests.
//!
//! Requests never read the store directly while rendering: they take one
//! [`ErrorSettings`] snapshot up front and use it for the whole request.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::errors::ErrorOverrides;
use crate::metrics::{ERROR_OVERRIDES_CONFIGURED, MAINTENANCE_MODE_ACTIVE};

/// Maintenance mode parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Maintenance {
    /// Sent as the error detail
    pub message: String,
    /// Seconds for the `Retry-After` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Immutable view of the settings for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSettings {
    pub overrides: ErrorOverrides,
    pub maintenance: Option<Maintenance>,
}

#[derive(Debug, Default)]
pub struct SettingsStore {
    current: RwLock<Arc<ErrorSettings>>,
}

impl SettingsStore {
    pub fn new(settings: ErrorSettings) -> Self {
        record(&settings);
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    pub fn snapshot(&self) -> Arc<ErrorSettings> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_overrides(&self, overrides: ErrorOverrides) {
        for key in overrides.unknown_keys() {
            warn!("Override for unknown error kind '{}' will never apply", key);
        }
        info!("Replacing error override table ({} entries)", overrides.len());
        self.update(|settings| settings.overrides = overrides);
    }

    pub fn set_maintenance(&self, maintenance: Option<Maintenance>) {
        match &maintenance {
            Some(m) => info!("Entering maintenance mode: {}", m.message),
            None => info!("Leaving maintenance mode"),
        }
        self.update(|settings| settings.maintenance = maintenance);
    }

    /// Swap in a modified copy; snapshots already handed out are unaffected
    fn update(&self, apply: impl FnOnce(&mut ErrorSettings)) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = ErrorSettings::clone(&current);
        apply(&mut next);
        record(&next);
        *current = Arc::new(next);
    }
}

fn record(settings: &ErrorSettings) {
    ERROR_OVERRIDES_CONFIGURED.set(settings.overrides.len() as i64);
    MAINTENANCE_MODE_ACTIVE.set(i64::from(settings.maintenance.is_some()));
}
