//! Environment-driven server configuration
//!
//! Connection settings come from the environment (optionally seeded from a
//! `.env` file loaded in main): `GOALTIME_HOSTNAME`, `GOALTIME_USERNAME`
//! and `GOALTIME_PASSWORD`. The password is optional here; when absent the
//! client prompts for it interactively at login time.

use anyhow::{Context, Result};
use std::env;

/// Environment variable holding the server base URL
pub const HOSTNAME_VAR: &str = "GOALTIME_HOSTNAME";
/// Environment variable holding the login username
pub const USERNAME_VAR: &str = "GOALTIME_USERNAME";
/// Environment variable holding the login password (optional)
pub const PASSWORD_VAR: &str = "GOALTIME_PASSWORD";

/// Connection settings for the remote goal-tracking server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server, e.g. `https://goals.example.com`
    pub hostname: String,
    /// Login username
    pub username: String,
    /// Login password; `None` means prompt interactively
    pub password: Option<String>,
}

impl ServerConfig {
    /// Load the configuration from the environment
    ///
    /// Hostname and username are required; the password may be omitted in
    /// favor of an interactive prompt.
    pub fn from_env() -> Result<Self> {
        let hostname = env::var(HOSTNAME_VAR)
            .with_context(|| format!("{} is not set", HOSTNAME_VAR))?;
        let username = env::var(USERNAME_VAR)
            .with_context(|| format!("{} is not set", USERNAME_VAR))?;
        let password = env::var(PASSWORD_VAR).ok();

        Ok(Self {
            hostname,
            username,
            password,
        })
    }
}
