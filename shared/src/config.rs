use crate::error::Error;
use aws_sdk_s3 as s3;
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Ten days, the validity window handed out to annotators.
pub const DEFAULT_LINK_TTL: u64 = 864_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// From `LINK_TTL`, seconds a pre-signed frame link stays valid.
    pub link_ttl: u64,

    /// From `LOG_LEVEL`.
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            link_ttl: DEFAULT_LINK_TTL,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("LINK_TTL") {
            config.link_ttl = match raw.trim().parse::<u64>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(Error::Config(format!(
                        "LINK_TTL must be a positive number of seconds, got {raw:?}"
                    )))
                }
            };
        }

        if let Some(raw) = lookup("LOG_LEVEL") {
            config.log_level = Level::from_str(raw.trim())
                .map_err(|_| Error::Config(format!("unknown LOG_LEVEL {raw:?}")))?;
        }

        Ok(config)
    }
}

pub async fn get_s3_client() -> s3::Client {
    let cfg = aws_config::load_from_env().await;

    s3::Client::new(&cfg)
}

pub fn get_service_cfg() -> Result<Config, Error> {
    Config::from_lookup(|key| env::var(key).ok())
}
