//! Main enrichment client implementation

use crate::config::ClientConfig;
use crate::draft::{into_items, StopDraft};
use crate::error::{BackendError, BackendResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use wanderlist_core::model::ItineraryItem;
use wanderlist_core::traits::{EnrichmentResult, PlaceEnrichment};
use wanderlist_geo::Coordinate;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Client for the AI place-enrichment backend.
///
/// Wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff on retryable failures
/// - Request correlation IDs for tracing
/// - Schema validation of every response at the boundary
#[derive(Clone)]
pub struct EnrichClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl EnrichClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> BackendResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("wanderlist-enrich/0.3"),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a POST request with retry
    #[instrument(skip(self, body), fields(request_id))]
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        let url = join_url(&self.config.base_url, path);
        let retry = &self.config.retry;
        let mut last_error: Option<BackendError> = None;

        for attempt in 0..retry.max_attempts {
            if attempt > 0 {
                let delay = retry.delay_for_attempt(attempt);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
                tokio::time::sleep(delay).await;
            }

            let request_id = Uuid::new_v4().to_string();
            let start = Instant::now();
            let result = self.execute_single(&request_id, &url, body).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(value) => {
                    debug!(request_id = %request_id, attempt = attempt + 1, elapsed_ms, "Request succeeded");
                    return Ok(value);
                }
                Err(e) => {
                    if e.is_retryable() && attempt + 1 < retry.max_attempts {
                        debug!(request_id = %request_id, error = %e, "Request failed, will retry");
                        last_error = Some(e);
                    } else {
                        warn!(request_id = %request_id, error = %e, "Request failed, not retrying");
                        return Err(e);
                    }
                }
            }
        }

        Err(BackendError::RetriesExhausted {
            attempts: retry.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single<T: DeserializeOwned, B: Serialize>(
        &self,
        request_id: &str,
        url: &str,
        body: &B,
    ) -> BackendResult<T> {
        let mut request = self
            .inner
            .post(url)
            .header(X_REQUEST_ID, request_id)
            .json(body);

        if let Some(ref key) = self.config.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> BackendResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(BackendError::Request)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(BackendError::api_response(status.as_u16(), message))
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LookupRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Deserialize)]
struct LookupResponse {
    place: Option<StopDraft>,
}

#[derive(Serialize)]
struct ItineraryRequest<'a> {
    location: &'a str,
}

#[derive(Serialize)]
struct RoadTripRequest<'a> {
    start: &'a str,
    destination: &'a str,
}

#[derive(Deserialize)]
struct StopsResponse {
    stops: Vec<StopDraft>,
}

#[derive(Serialize)]
struct OptimizeRequest<'a> {
    context: &'a str,
    names: &'a [String],
}

#[derive(Deserialize)]
struct OptimizeResponse {
    names: Vec<String>,
}

#[derive(Serialize)]
struct ReverseGeocodeRequest {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct ReverseGeocodeResponse {
    name: String,
}

impl PlaceEnrichment for EnrichClient {
    async fn lookup(
        &self,
        name: &str,
        context: Option<&str>,
    ) -> EnrichmentResult<Option<ItineraryItem>> {
        let response: LookupResponse = self
            .post("v1/places/lookup", &LookupRequest { query: name, context })
            .await?;

        match response.place {
            Some(draft) => Ok(Some(draft.into_item()?)),
            None => Ok(None),
        }
    }

    async fn generate_itinerary(&self, location: &str) -> EnrichmentResult<Vec<ItineraryItem>> {
        let response: StopsResponse = self
            .post("v1/itineraries/generate", &ItineraryRequest { location })
            .await?;
        Ok(into_items(response.stops)?)
    }

    async fn generate_road_trip_stops(
        &self,
        start: &str,
        destination: &str,
    ) -> EnrichmentResult<Vec<ItineraryItem>> {
        let response: StopsResponse = self
            .post("v1/road-trips/suggest", &RoadTripRequest { start, destination })
            .await?;
        Ok(into_items(response.stops)?)
    }

    async fn optimize_order(
        &self,
        context: &str,
        names: &[String],
    ) -> EnrichmentResult<Vec<String>> {
        let response: OptimizeResponse = self
            .post("v1/itineraries/optimize", &OptimizeRequest { context, names })
            .await?;
        Ok(response.names)
    }

    async fn reverse_geocode(&self, position: Coordinate) -> EnrichmentResult<String> {
        let response: ReverseGeocodeResponse = self
            .post(
                "v1/geocode/reverse",
                &ReverseGeocodeRequest {
                    latitude: position.latitude,
                    longitude: position.longitude,
                },
            )
            .await?;
        Ok(response.name)
    }
}
