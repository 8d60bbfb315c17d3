//! HTTP client for the remote goal-tracking server
//!
//! A thin session-based client: `login` POSTs credentials and the server
//! answers with a session cookie, which the shared cookie store attaches to
//! every later request. Clones share the underlying connection pool and
//! cookie store, so one logged-in client can serve as both the event source
//! and the goal source of a [`goaltime_core::Tracker`].
//!
//! No retry logic lives here; failures surface unmodified to the caller.

use goaltime_core::{EventSource, Goal, GoalSource, LogEntry, TrackerError};
use serde::{Deserialize, Serialize};
use url::Url;

/// Errors from the API client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {endpoint} failed")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered {status} for {endpoint}")]
    UnexpectedStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

type Result<T> = std::result::Result<T, ClientError>;

/// Session-based client for the goal-tracking server API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LogsResponse {
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct GoalsResponse {
    goals: Vec<WireGoal>,
}

/// Goal record as the server serializes it
#[derive(Debug, Deserialize)]
struct WireGoal {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    parent_goal_ids: Vec<String>,
}

impl From<WireGoal> for Goal {
    fn from(wire: WireGoal) -> Self {
        Goal {
            id: wire.id,
            name: wire.name,
            parent_ids: wire.parent_goal_ids,
        }
    }
}

impl ApiClient {
    /// Create a client bound to the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source: e,
        })?;

        // Url::join treats a path without a trailing slash as a file
        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_string();
            path.push('/');
            url.set_path(&path);
        }

        let http = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: base_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    fn endpoint(&self, suffix: &str) -> Result<Url> {
        self.base_url
            .join(suffix)
            .map_err(|e| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, suffix),
                source: e,
            })
    }

    /// Log in and establish the session cookie
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoint("login")?;
        log::info!("Logging in to {} as {}", self.base_url, username);

        let response = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .map_err(|e| ClientError::Http {
                endpoint: "login".to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: "login".to_string(),
                status: response.status(),
            });
        }

        Ok(())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        suffix: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(suffix)?;

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| ClientError::Http {
                endpoint: suffix.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: suffix.to_string(),
                status: response.status(),
            });
        }

        response.json().map_err(|e| ClientError::Decode {
            endpoint: suffix.to_string(),
            source: e,
        })
    }

    /// Fetch raw log entries covering the last `age` days
    pub fn logs(&self, age: i64) -> Result<Vec<LogEntry>> {
        log::debug!("Fetching logs with age={} days", age);
        let response: LogsResponse = self.get_json("logs", &[("age", age.to_string())])?;
        Ok(response.logs)
    }

    /// Fetch goals matching the given query parameter
    fn goals(&self, key: &str, value: &str) -> Result<Vec<Goal>> {
        let response: GoalsResponse = self.get_json("goals", &[(key, value.to_string())])?;
        Ok(response.goals.into_iter().map(Goal::from).collect())
    }
}

impl EventSource for ApiClient {
    fn fetch_events(&self, lookback_days: i64) -> goaltime_core::Result<Vec<LogEntry>> {
        self.logs(lookback_days).map_err(TrackerError::source)
    }
}

impl GoalSource for ApiClient {
    fn fetch_goal(&self, id: &str) -> goaltime_core::Result<Option<Goal>> {
        let mut goals = self.goals("_id", id).map_err(TrackerError::source)?;

        if goals.len() > 1 {
            log::warn!("More than one goal with id {} found", id);
        }

        Ok(if goals.is_empty() {
            None
        } else {
            Some(goals.swap_remove(0))
        })
    }

    fn fetch_goals_by_name(&self, name: &str) -> goaltime_core::Result<Vec<Goal>> {
        self.goals("name", name).map_err(TrackerError::source)
    }
}
