#![expect(
    clippy::module_name_repetitions,
    reason = "Configuration types intentionally mirror the module name for clarity"
)]

use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::{Backoff, Constant, Zero};

const DEFAULT_CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const DEFAULT_INITIAL_BACKOFF_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF_DURATION: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Configuration for feed connection behavior.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Config {
    /// Reconnection strategy configuration
    pub reconnect: ReconnectConfig,
    /// Upper bound on a single connect attempt
    pub connect_timeout: Duration,
    /// Interval for sending client pings while open. `None` disables them.
    pub ping_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reconnect: ReconnectConfig::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_DURATION,
            ping_interval: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn with_ping_interval(mut self, ping_interval: Duration) -> Self {
        self.ping_interval = Some(ping_interval);
        self
    }
}

/// Delay between a closed connection and the next attempt.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Pacing {
    /// Retry right away
    Immediate,
    /// Wait the same duration every time
    Fixed(Duration),
    /// Exponential backoff with jitter, reset after every successful open
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl Default for Pacing {
    fn default() -> Self {
        Self::Exponential {
            initial: DEFAULT_INITIAL_BACKOFF_DURATION,
            max: DEFAULT_MAX_BACKOFF_DURATION,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

/// Configuration for automatic reconnection behavior.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconnectConfig {
    /// Maximum number of consecutive failed attempts before giving up.
    /// `None` means infinite retries.
    pub max_attempts: Option<u32>,
    /// Delay strategy between attempts
    pub pacing: Pacing,
}

impl ReconnectConfig {
    /// Unbounded retries with no delay.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            max_attempts: None,
            pacing: Pacing::Immediate,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Builds a fresh delay strategy. Retry counting is handled separately
    /// through `max_attempts`, so the strategy itself never gives up.
    #[must_use]
    pub fn backoff(&self) -> Box<dyn Backoff + Send> {
        match &self.pacing {
            Pacing::Immediate => Box::new(Zero {}),
            Pacing::Fixed(delay) => Box::new(Constant::new(*delay)),
            Pacing::Exponential {
                initial,
                max,
                multiplier,
            } => Box::new(
                ExponentialBackoffBuilder::default()
                    .with_initial_interval(*initial)
                    .with_max_interval(*max)
                    .with_multiplier(*multiplier)
                    .with_max_elapsed_time(None)
                    .build(),
            ),
        }
    }
}
