use std::{env, path::PathBuf};

use crate::geo::Coordinates;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8002/api/v1";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Local storage root for the device id and admin session. `None`
    /// when no writable directory could be resolved.
    pub data_dir: Option<PathBuf>,
    /// Fixed coordinates standing in for a geolocation fix, if the
    /// environment provides them.
    pub position: Option<Coordinates>,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base_url = env::var("TBF_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let data_dir = env::var("TBF_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join("tbf-poll")));

        let position = match (env::var("TBF_GEO_LAT"), env::var("TBF_GEO_LON")) {
            (Ok(lat), Ok(lon)) => match (lat.trim().parse(), lon.trim().parse()) {
                (Ok(latitude), Ok(longitude)) => Some(Coordinates {
                    latitude,
                    longitude,
                }),
                _ => {
                    tracing::warn!("ignoring unparseable TBF_GEO_LAT/TBF_GEO_LON");
                    None
                }
            },
            _ => None,
        };

        Self {
            api_base_url,
            data_dir,
            position,
        }
    }
}
