//! Page-server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBSITE_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub website_dir: PathBuf,
}

impl ServerConfig {
    /// - `PORT`: listen port, default 3000
    /// - `WEBSITE_DIR`: static front-end bundle, default `./public`
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, String> {
        Self::from_raw(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("WEBSITE_DIR").ok().as_deref(),
        )
    }

    fn from_raw(port: Option<&str>, website_dir: Option<&str>) -> Result<Self, String> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("invalid PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };
        let website_dir = PathBuf::from(website_dir.unwrap_or(DEFAULT_WEBSITE_DIR));
        Ok(Self { port, website_dir })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
