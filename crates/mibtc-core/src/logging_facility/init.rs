//! Logging initialization

use serde::Deserialize;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output profile, selectable from the `logging.profile` config key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output, `mibtc=debug`
    #[default]
    Development,
    /// JSON lines, `mibtc=info`
    Production,
    /// No output; tests install the capture layer instead
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "mibtc=debug",
            Profile::Production | Profile::Test => "mibtc=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// `RUST_LOG` wins over the profile's default filter. Only the first call in
/// a process has an effect.
pub fn init(profile: Profile) {
    init_with_filter(profile, None);
}

/// Like [`init`], with an explicit filter taking the place of the profile default
///
/// Precedence: `RUST_LOG`, then `filter`, then the profile default.
pub fn init_with_filter(profile: Profile, filter: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let fallback = filter.unwrap_or(profile.default_filter()).to_string();
        let env_filter =
            || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(env_filter())
                    .init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
