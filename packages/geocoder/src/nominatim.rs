//! Nominatim / OpenStreetMap reverse geocoder client.
//!
//! The public instance allows **1 request per second** at most; callers
//! geocoding in bulk must rate limit themselves.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use async_trait::async_trait;
use hazard_map_hazard_models::Coordinates;

use crate::{GeocodeError, ReverseGeocodedAddress, ReverseGeocoder};

/// Public Nominatim reverse endpoint.
pub const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Number of leading `display_name` components kept in the short address.
const DISPLAY_NAME_PARTS: usize = 3;

const USER_AGENT: &str = concat!("hazard-map/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoder backed by a Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a client for the reverse endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a geocoder that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<ReverseGeocodedAddress>, GeocodeError> {
        let lat = coordinates.lat.to_string();
        let lon = coordinates.lng.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        let body: serde_json::Value = resp.error_for_status()?.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim reverse response.
///
/// Nominatim answers points with no nearby feature with
/// `{"error": "Unable to geocode"}`, which maps to `Ok(None)`.
fn parse_response(body: &serde_json::Value) -> Result<Option<ReverseGeocodedAddress>, GeocodeError> {
    let object = body.as_object().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an object".to_string(),
    })?;

    if object.contains_key("error") {
        return Ok(None);
    }

    let Some(display_name) = object
        .get("display_name")
        .and_then(serde_json::Value::as_str)
        .map(shorten_display_name)
        .filter(|s| !s.is_empty())
    else {
        return Ok(None);
    };

    let address = object.get("address");
    let field = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            address
                .and_then(|a| a.get(*key))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
    };

    Ok(Some(ReverseGeocodedAddress {
        display_name,
        state: field(&["state"]),
        lga: field(&["county", "state_district", "city"]),
    }))
}

/// Keeps the leading components of a Nominatim `display_name`; the tail
/// (postcode, country) adds nothing for a hazard report.
fn shorten_display_name(display_name: &str) -> String {
    display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(DISPLAY_NAME_PARTS)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_reverse_result() {
        let body = serde_json::json!({
            "lat": "6.5244",
            "lon": "3.3792",
            "display_name": "Herbert Macaulay Way, Yaba, Lagos Mainland, Lagos, 101245, Nigeria",
            "address": {
                "road": "Herbert Macaulay Way",
                "suburb": "Yaba",
                "county": "Lagos Mainland",
                "state": "Lagos",
                "country": "Nigeria"
            }
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.display_name, "Herbert Macaulay Way, Yaba, Lagos Mainland");
        assert_eq!(result.state.as_deref(), Some("Lagos"));
        assert_eq!(result.lga.as_deref(), Some("Lagos Mainland"));
    }

    #[test]
    fn lga_falls_back_to_state_district() {
        let body = serde_json::json!({
            "display_name": "Kubwa Expressway, Bwari, FCT, Nigeria",
            "address": {
                "state_district": "Bwari",
                "state": "Federal Capital Territory"
            }
        });
        let result = parse_response(&body).unwrap().unwrap();
        assert_eq!(result.lga.as_deref(), Some("Bwari"));
    }

    #[test]
    fn unable_to_geocode_is_none() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn non_object_is_parse_error() {
        let body = serde_json::json!([]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn short_names_are_kept_whole() {
        assert_eq!(shorten_display_name("Lekki, Lagos"), "Lekki, Lagos");
    }
}
