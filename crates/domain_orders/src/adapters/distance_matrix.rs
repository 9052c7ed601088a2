//! Google Distance Matrix Adapter
//!
//! Implements [`DistanceProvider`] against the Google Distance Matrix REST
//! API. One origin and one destination are sent per request and the road
//! distance of the single resulting element is returned in metres.
//!
//! # Error Handling
//!
//! Every failure becomes a [`DistanceError`]:
//! - transport failures -> `DistanceError::Request`
//! - timeouts -> `DistanceError::Timeout`
//! - non-2xx responses -> `DistanceError::HttpStatus`
//! - top-level status other than `OK` -> `DistanceError::Rejected`
//! - element status other than `OK` -> `DistanceError::NoRoute`
//! - missing rows, elements or distance -> `DistanceError::MalformedResponse`
//!
//! Lookups are not retried.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use core_kernel::DomainPort;

use crate::coordinates::Coordinates;
use crate::error::DistanceError;
use crate::ports::DistanceProvider;

/// Configuration for the distance matrix adapter
#[derive(Debug, Clone)]
pub struct DistanceMatrixConfig {
    /// Base URL of the Maps API (e.g., "https://maps.googleapis.com/maps/api")
    pub base_url: String,

    /// API key sent with each request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Distance provider backed by the Google Distance Matrix API
#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrix {
    config: DistanceMatrixConfig,
    client: reqwest::Client,
}

impl GoogleDistanceMatrix {
    /// Creates a new adapter with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `DistanceError::Request` if the HTTP client cannot be built
    pub fn new(config: DistanceMatrixConfig) -> Result<Self, DistanceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DistanceError::Request(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/distancematrix/json", self.config.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DistanceError {
        if error.is_timeout() {
            DistanceError::Timeout(self.config.timeout_secs * 1000)
        } else {
            DistanceError::Request(error.to_string())
        }
    }
}

impl DomainPort for GoogleDistanceMatrix {}

#[async_trait]
impl DistanceProvider for GoogleDistanceMatrix {
    #[instrument(skip_all, fields(origin = %origin, destination = %destination))]
    async fn distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<u32, DistanceError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("origins", origin.to_string()),
                ("destinations", destination.to_string()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DistanceError::HttpStatus(status.as_u16()));
        }

        let body: DistanceMatrixResponse = response
            .json()
            .await
            .map_err(|e| DistanceError::MalformedResponse(e.to_string()))?;

        let distance = parse_distance(body)?;
        debug!(distance, "Distance lookup succeeded");
        Ok(distance)
    }
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    value: u64,
}

fn parse_distance(body: DistanceMatrixResponse) -> Result<u32, DistanceError> {
    if body.status != "OK" {
        let detail = match body.error_message {
            Some(message) => format!("{}: {}", body.status, message),
            None => body.status,
        };
        return Err(DistanceError::Rejected(detail));
    }

    let element = body
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| DistanceError::MalformedResponse("no matrix element".to_string()))?;

    if element.status != "OK" {
        return Err(DistanceError::NoRoute(element.status));
    }

    let metres = element
        .distance
        .ok_or_else(|| DistanceError::MalformedResponse("element has no distance".to_string()))?
        .value;

    u32::try_from(metres)
        .map_err(|_| DistanceError::MalformedResponse(format!("distance {} out of range", metres)))
}
