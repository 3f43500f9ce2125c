// src/geocode.rs
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ServerError;

/// Sentinel the geocoder sometimes leaves in a formatted address when a
/// component could not be resolved. Such addresses are treated as invalid.
const PLACEHOLDER_TOKEN: &str = "undefined";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct Geolocation {
    pub lat: f64,
    pub lng: f64,
    /// Canonical address string; replaces whatever the user typed.
    pub canonical_address: String,
}

/// Seam for the submission pipeline so tests can stub the network.
pub trait Geocode {
    fn geocode(&self, address: &str) -> Result<Geolocation, ServerError>;
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

pub struct GeocodeClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self, ServerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(360))
            .build()
            .map_err(|e| ServerError::Geocode(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl Geocode for GeocodeClient {
    fn geocode(&self, address: &str) -> Result<Geolocation, ServerError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", &self.api_key)])
            .send()
            .map_err(|e| ServerError::Geocode(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::Geocode(format!(
                "geocoding API HTTP {status}: {text}"
            )));
        }

        let payload: GeocodeResponse = resp
            .json()
            .map_err(|e| ServerError::Geocode(format!("bad geocoding payload: {e}")))?;

        resolve(payload)
    }
}

/// Turn a geocoding payload into a location, or a validation error the
/// user can act on. Pure so it can be tested without the network.
pub fn resolve(payload: GeocodeResponse) -> Result<Geolocation, ServerError> {
    if payload.status == STATUS_ZERO_RESULTS {
        return Err(ServerError::Validation(
            "Please enter a correct address".into(),
        ));
    }
    if payload.status != STATUS_OK {
        return Err(ServerError::Geocode(format!(
            "geocoding failed with status {}",
            payload.status
        )));
    }

    let Some(first) = payload.results.into_iter().next() else {
        return Err(ServerError::Validation(
            "Please enter a correct address".into(),
        ));
    };

    if first.formatted_address.contains(PLACEHOLDER_TOKEN) {
        return Err(ServerError::Validation(
            "Please enter a correct address".into(),
        ));
    }

    Ok(Geolocation {
        lat: first.geometry.location.lat,
        lng: first.geometry.location.lng,
        canonical_address: first.formatted_address,
    })
}
