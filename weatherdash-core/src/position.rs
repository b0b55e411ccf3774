//! Device position lookup.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,

    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information unavailable")]
    Unavailable,

    #[error("Location request timed out")]
    Timeout,
}

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Position supplied up front, e.g. from `--lat/--lon`. `None` means no positioning is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Position>);

impl FixedPosition {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self(Some(Position { latitude, longitude }))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Position, LocationError> {
        self.0.ok_or(LocationError::Unsupported)
    }
}
