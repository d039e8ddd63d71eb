//! Interfaces to the external services the lifecycle depends on.
//!
//! The state machine itself performs no I/O. Callers use these traits to
//! gather its inputs (the actor's position, the current settings) before
//! invoking the pure transition functions.

use async_trait::async_trait;
use hazard_map_hazard_models::{
    Coordinates, Position, PositionFailure, SystemSetting, UserRole,
};

pub use crate::social::SocialPublisher;
use crate::TrustPolicy;

/// Errors from the settings store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The store could not be reached or read.
    #[error("Settings unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Device geolocation.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Returns the device's current position.
    ///
    /// # Errors
    ///
    /// Returns the [`PositionFailure`] reported by the device.
    async fn current_position(&self) -> Result<Coordinates, PositionFailure>;
}

/// Configuration store holding [`SystemSetting`] records.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads every system setting.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the store cannot be read.
    async fn load_settings(&self) -> Result<Vec<SystemSetting>, SettingsError>;
}

/// Acquires the position to pass into a transition for an actor of `role`.
///
/// Coordinators and admins act remotely, so no acquisition is attempted
/// for them and the result is [`Position::NotProvided`].
pub async fn acquire_position(provider: &dyn PositionProvider, role: UserRole) -> Position {
    if role.has_elevated_trust() {
        return Position::NotProvided;
    }

    match provider.current_position().await {
        Ok(coordinates) => Position::Fix { coordinates },
        Err(reason) => {
            log::warn!("Position acquisition failed: {reason}");
            Position::Unavailable { reason }
        }
    }
}

/// Loads the current [`TrustPolicy`] from `store`.
///
/// # Errors
///
/// Returns [`SettingsError`] if the store cannot be read.
pub async fn load_trust_policy(store: &dyn SettingsStore) -> Result<TrustPolicy, SettingsError> {
    let settings = store.load_settings().await?;
    Ok(TrustPolicy::from_settings(&settings))
}
