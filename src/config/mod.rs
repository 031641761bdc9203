use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Duration;

pub const DEFAULT_PASSKEY: &str = "VICTORY2024CEO";
pub const DEFAULT_CEO_NAME: &str = "Chief Executive Officer";

/// Runtime settings for the console. Every field has a default matching the
/// stock dashboard, so an empty environment yields a working setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub passkey: String,
    pub max_devices: usize,
    pub session_timeout: Duration,
    pub device_stale_after: Duration,
    pub security_log_cap: usize,
    pub live_update_every: std::time::Duration,
    pub session_check_every: std::time::Duration,
    pub simulation_every: std::time::Duration,
    pub data_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passkey: DEFAULT_PASSKEY.to_string(),
            max_devices: 2,
            session_timeout: Duration::hours(1),
            device_stale_after: Duration::hours(24),
            security_log_cap: 100,
            live_update_every: std::time::Duration::from_secs(10),
            session_check_every: std::time::Duration::from_secs(60),
            simulation_every: std::time::Duration::from_secs(15),
            data_dir: default_data_dir(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let passkey = dotenvy::var("CEO_PASSKEY").unwrap_or(defaults.passkey);
        let max_devices = parse_var("CEO_MAX_DEVICES")?.unwrap_or(defaults.max_devices);
        let session_timeout = duration_var("CEO_SESSION_TIMEOUT_SECS", Duration::try_seconds)?
            .unwrap_or(defaults.session_timeout);
        let device_stale_after = duration_var("CEO_DEVICE_STALE_HOURS", Duration::try_hours)?
            .unwrap_or(defaults.device_stale_after);
        let security_log_cap =
            parse_var("CEO_SECURITY_LOG_CAP")?.unwrap_or(defaults.security_log_cap);
        let live_update_every = parse_var::<u64>("CEO_LIVE_UPDATE_SECS")?
            .map(std::time::Duration::from_secs)
            .unwrap_or(defaults.live_update_every);
        let session_check_every = parse_var::<u64>("CEO_SESSION_CHECK_SECS")?
            .map(std::time::Duration::from_secs)
            .unwrap_or(defaults.session_check_every);
        let simulation_every = parse_var::<u64>("CEO_SIMULATION_SECS")?
            .map(std::time::Duration::from_secs)
            .unwrap_or(defaults.simulation_every);
        let data_dir = dotenvy::var("CEO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let bind_addr = dotenvy::var("CEO_BIND_ADDR").unwrap_or(defaults.bind_addr);

        if max_devices == 0 {
            anyhow::bail!("CEO_MAX_DEVICES must be at least 1");
        }
        if passkey.trim().is_empty() {
            anyhow::bail!("CEO_PASSKEY must not be empty");
        }

        Ok(Self {
            passkey,
            max_devices,
            session_timeout,
            device_stale_after,
            security_log_cap,
            live_update_every,
            session_check_every,
            simulation_every,
            data_dir,
            bind_addr,
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        Err(_) => Ok(None),
    }
}

/// Reads a whole-unit count and converts it with `unit`. Zero, negative and
/// unrepresentable counts are startup errors.
fn duration_var(name: &str, unit: fn(i64) -> Option<Duration>) -> Result<Option<Duration>> {
    parse_var::<i64>(name)?
        .map(|count| {
            unit(count)
                .filter(|d| *d > Duration::zero())
                .with_context(|| format!("{name} out of range: {count}"))
        })
        .transpose()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("ceo-console"))
        .unwrap_or_else(|| PathBuf::from("ceodb"))
}
