use crate::common::PanelError;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "TICKETDROP_";

/// Panel timing and policy knobs
/// Layered: built-in defaults < config.toml < TICKETDROP_* env vars
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Throughput resample period for multi-item transfers
    pub sample_interval_ms: u64,
    /// A drop below `previous * rollover_ratio` counts as a new item
    pub rollover_ratio: f64,
    /// How long the broadcast undo notice stays up
    pub undo_window_ms: u64,
    pub error_notice_ms: u64,
    /// Product name used in the email subject and body
    pub app_name: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            rollover_ratio: 0.5,
            undo_window_ms: 1500,
            error_notice_ms: 5000,
            app_name: "TicketDrop".to_string(),
        }
    }
}

impl PanelConfig {
    /// Load config from `path`, or from the platform config dir when `None`.
    /// A missing file is not an error, defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, PanelError> {
        let file = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut figment = Figment::from(Serialized::defaults(PanelConfig::default()));
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Loading panel config");
            figment = figment.merge(Toml::file(file));
        }

        let config: PanelConfig = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config.sanitized())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }

    pub fn error_notice(&self) -> Duration {
        Duration::from_millis(self.error_notice_ms)
    }

    // interval() panics on a zero period, ratio outside [0,1] makes every sample a rollover
    fn sanitized(mut self) -> Self {
        if self.sample_interval_ms == 0 {
            tracing::warn!("sample_interval_ms must be positive, using default");
            self.sample_interval_ms = PanelConfig::default().sample_interval_ms;
        }
        if !(0.0..=1.0).contains(&self.rollover_ratio) {
            tracing::warn!(
                ratio = self.rollover_ratio,
                "rollover_ratio out of range, using default"
            );
            self.rollover_ratio = PanelConfig::default().rollover_ratio;
        }
        self
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ticketdrop").map(|dirs| dirs.config_dir().join("config.toml"))
}
