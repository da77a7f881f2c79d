use std::{future::Future, time::Duration};

use serde::Deserialize;
use tracing::debug;

const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Wherever a position fix comes from. Failure carries the
/// source-supplied reason, surfaced to the user verbatim.
pub trait PositionSource {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, String>> + Send;
}

/// A source pinned to fixed coordinates (e.g. from the environment).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, String> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStatus {
    Idle,
    Locating,
    Ready {
        city: Option<String>,
        country: Option<String>,
    },
    Error(String),
}

impl LocationStatus {
    /// City/country to attach to a vote. Anything but `Ready` omits both;
    /// location never gates a submission.
    pub fn fields(&self) -> (Option<String>, Option<String>) {
        match self {
            LocationStatus::Ready { city, country } => (city.clone(), country.clone()),
            _ => (None, None),
        }
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            LocationStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Best-effort voter-location lookup: position fix, then reverse
/// geocoding. Runs alongside the poll fetch and never blocks the ballot.
pub struct GeoEnricher<S> {
    source: Option<S>,
    geocoder: ReverseGeocoder,
    status: LocationStatus,
}

impl<S: PositionSource> GeoEnricher<S> {
    pub fn new(source: Option<S>) -> Self {
        Self {
            source,
            geocoder: ReverseGeocoder::new(NOMINATIM_REVERSE_URL),
            status: LocationStatus::Idle,
        }
    }

    pub fn status(&self) -> &LocationStatus {
        &self.status
    }

    /// Runs the idle → locating → ready/error cycle once. Safe to call
    /// again to retry after an error.
    pub async fn request_location(&mut self) {
        let Some(source) = &self.source else {
            self.status = LocationStatus::Error("Location not supported on this device".into());
            return;
        };
        self.status = LocationStatus::Locating;

        let position =
            match tokio::time::timeout(POSITION_TIMEOUT, source.current_position()).await {
                Err(_) => {
                    self.status = LocationStatus::Error("Location request timed out.".into());
                    return;
                }
                Ok(Err(reason)) => {
                    let reason = if reason.trim().is_empty() {
                        "Location access denied.".to_string()
                    } else {
                        reason
                    };
                    self.status = LocationStatus::Error(reason);
                    return;
                }
                Ok(Ok(position)) => position,
            };

        match self.geocoder.reverse(position).await {
            Ok((city, country)) => {
                debug!(?city, ?country, "resolved voter location");
                self.status = LocationStatus::Ready { city, country };
            }
            Err(err) => {
                debug!(%err, "reverse geocoding failed");
                self.status = LocationStatus::Error("Unable to fetch location details.".into());
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    address: Option<GeocodeAddress>,
}

struct ReverseGeocoder {
    http: reqwest::Client,
    endpoint: String,
}

impl ReverseGeocoder {
    fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    async fn reverse(
        &self,
        pos: Coordinates,
    ) -> anyhow::Result<(Option<String>, Option<String>)> {
        let resp: GeocodeResponse = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", pos.latitude.to_string()),
                ("lon", pos.longitude.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let address = resp.address.unwrap_or_default();
        Ok((resolve_city(&address), non_empty(address.country)))
    }
}

/// City fallback chain: city, town, village, county — first non-empty wins.
fn resolve_city(address: &GeocodeAddress) -> Option<String> {
    [
        &address.city,
        &address.town,
        &address.village,
        &address.county,
    ]
    .into_iter()
    .find_map(|v| non_empty(v.clone()))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
