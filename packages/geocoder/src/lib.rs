#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding for hazard reports.
//!
//! Turns the coordinates captured at report time into a human-readable
//! address plus the state and LGA used for jurisdiction classification.
//! Geocoding is best-effort: [`reverse_geocode_or_raw`] never fails and
//! falls back to the raw coordinate string.

pub mod nominatim;

use async_trait::async_trait;
use hazard_map_hazard_models::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use nominatim::NominatimGeocoder;

/// An address resolved from a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocodedAddress {
    /// Short display address (e.g., `"Herbert Macaulay Way, Yaba, Lagos"`).
    pub display_name: String,
    /// State name, if the provider returned one.
    pub state: Option<String>,
    /// Local Government Area, if the provider returned one.
    pub lga: Option<String>,
}

impl ReverseGeocodedAddress {
    /// The fallback used when geocoding fails: the raw coordinates.
    #[must_use]
    pub fn raw(coordinates: Coordinates) -> Self {
        Self {
            display_name: coordinates.to_string(),
            state: None,
            lga: None,
        }
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A service that resolves coordinates to an address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves `coordinates` to an address, or `None` if the provider has
    /// no address for that point.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<ReverseGeocodedAddress>, GeocodeError>;
}

/// Reverse-geocodes `coordinates`, falling back to the raw coordinate
/// string (`"lat, lng"` to six decimals) on any failure or empty result.
pub async fn reverse_geocode_or_raw(
    geocoder: &dyn ReverseGeocoder,
    coordinates: Coordinates,
) -> ReverseGeocodedAddress {
    match geocoder.reverse(coordinates).await {
        Ok(Some(address)) => address,
        Ok(None) => {
            log::debug!("No address found for {coordinates}");
            ReverseGeocodedAddress::raw(coordinates)
        }
        Err(e) => {
            log::warn!("Reverse geocoding failed for {coordinates}: {e}");
            ReverseGeocodedAddress::raw(coordinates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<ReverseGeocodedAddress>);

    #[async_trait]
    impl ReverseGeocoder for Fixed {
        async fn reverse(
            &self,
            _coordinates: Coordinates,
        ) -> Result<Option<ReverseGeocodedAddress>, GeocodeError> {
            Ok(self.0.clone())
        }
    }

    struct Limited;

    #[async_trait]
    impl ReverseGeocoder for Limited {
        async fn reverse(
            &self,
            _coordinates: Coordinates,
        ) -> Result<Option<ReverseGeocodedAddress>, GeocodeError> {
            Err(GeocodeError::RateLimited)
        }
    }

    fn point() -> Coordinates {
        Coordinates::new(6.524_4, 3.379_2).unwrap()
    }

    #[tokio::test]
    async fn returns_provider_address() {
        let address = ReverseGeocodedAddress {
            display_name: "Ikorodu Road, Lagos".to_string(),
            state: Some("Lagos".to_string()),
            lga: Some("Kosofe".to_string()),
        };
        let geocoder = Fixed(Some(address.clone()));
        assert_eq!(reverse_geocode_or_raw(&geocoder, point()).await, address);
    }

    #[tokio::test]
    async fn failure_falls_back_to_coordinates() {
        let result = reverse_geocode_or_raw(&Limited, point()).await;
        assert_eq!(result.display_name, "6.524400, 3.379200");
        assert_eq!(result.state, None);
    }

    #[tokio::test]
    async fn empty_result_falls_back_to_coordinates() {
        let result = reverse_geocode_or_raw(&Fixed(None), point()).await;
        assert_eq!(result, ReverseGeocodedAddress::raw(point()));
    }
}
