//! Environment configuration for the server process.

use std::time::Duration;

use duomatch_room::MatchConfig;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Process configuration, read from `DUOMATCH_*` environment variables
/// with defaults for everything.
///
/// | variable                   | default          |
/// |----------------------------|------------------|
/// | `DUOMATCH_BIND`            | `127.0.0.1:8080` |
/// | `DUOMATCH_START_GRACE_MS`  | `500`            |
/// | `DUOMATCH_HANDOFF_GRACE_MS`| `500`            |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Delay between a successful join and the role/turn announcement.
    pub start_grace: Duration,
    /// Delay between a rematch request and the opening-turn signal.
    pub handoff_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = MatchConfig::default();
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            start_grace: defaults.start_grace,
            handoff_grace: defaults.handoff_grace,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the environment, validating every
    /// variable that is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("DUOMATCH_BIND") {
            config.bind_addr = addr;
        }
        if let Ok(value) = std::env::var("DUOMATCH_START_GRACE_MS") {
            config.start_grace = parse_millis("DUOMATCH_START_GRACE_MS", &value)?;
        }
        if let Ok(value) = std::env::var("DUOMATCH_HANDOFF_GRACE_MS") {
            config.handoff_grace =
                parse_millis("DUOMATCH_HANDOFF_GRACE_MS", &value)?;
        }

        Ok(config)
    }

    /// The matchmaker settings carried by this configuration.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            start_grace: self.start_grace,
            handoff_grace: self.handoff_grace,
            ..MatchConfig::default()
        }
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Invalid { var, value: value.to_owned() })
}
