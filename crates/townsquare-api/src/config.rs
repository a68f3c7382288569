//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use townsquare_areas::domain::geometry::TownMap;
use townsquare_core::error::DomainError;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_MAP: &str = include_str!("../assets/default_map.json");

/// Settings the server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Map file new towns are built from; the bundled map when unset.
    pub town_map_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `TOWN_MAP_PATH` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let town_map_path = lookup("TOWN_MAP_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            town_map_path,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Loads the configured map, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Map` wrapping `DomainError::Infrastructure` if the
    /// file cannot be read or parsed.
    pub fn load_town_map(&self) -> Result<TownMap, AppError> {
        let Some(path) = &self.town_map_path else {
            return Ok(TownMap::from_json(DEFAULT_MAP)?);
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Infrastructure(format!("cannot read map {}: {e}", path.display()))
        })?;
        Ok(TownMap::from_json(&raw)?)
    }
}
