use anyhow::Context;
use growthcore::prelude::{MalformedPolicy, PipelineConfig, SmoothingStrategy, DEFAULT_WINDOW};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://covidtracking.com/api";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub api_base: String,
    pub window: usize,
    pub strategy: SmoothingStrategy,
    pub malformed_policy: MalformedPolicy,
    pub bridge_port: u16,
    pub request_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            window: DEFAULT_WINDOW,
            strategy: SmoothingStrategy::default(),
            malformed_policy: MalformedPolicy::default(),
            bridge_port: 9000,
            request_timeout_secs: 10,
        }
    }
}

impl BotConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading bot config {}", path_ref.display()))?;
        let config: BotConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing bot config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line flags win over whatever the file said.
    pub fn apply_overrides(
        &mut self,
        window: Option<usize>,
        strategy: Option<SmoothingStrategy>,
        abort_on_malformed: bool,
    ) {
        if let Some(window) = window {
            self.window = window;
        }
        if let Some(strategy) = strategy {
            self.strategy = strategy;
        }
        if abort_on_malformed {
            self.malformed_policy = MalformedPolicy::Abort;
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            window: self.window,
            strategy: self.strategy,
            malformed_policy: self.malformed_policy,
        }
    }

    pub fn bridge_address(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.bridge_port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_matches_pipeline_defaults() {
        let cfg = BotConfig::default();
        assert_eq!(cfg.to_pipeline_config(), PipelineConfig::default());
        assert_eq!(cfg.bridge_address().port(), 9000);
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"window: 5\nstrategy: window-mean\nmalformed_policy: abort\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = BotConfig::load(&path).unwrap();
        assert_eq!(cfg.window, 5);
        assert_eq!(cfg.strategy, SmoothingStrategy::WindowMean);
        assert_eq!(cfg.malformed_policy, MalformedPolicy::Abort);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"window: [not, a, number]\n").unwrap();
        let path = temp.into_temp_path();
        let err = BotConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing bot config"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = BotConfig::default();
        cfg.apply_overrides(Some(9), Some(SmoothingStrategy::CarryOver), true);
        assert_eq!(cfg.window, 9);
        assert_eq!(cfg.strategy, SmoothingStrategy::CarryOver);
        assert_eq!(cfg.malformed_policy, MalformedPolicy::Abort);

        cfg.apply_overrides(None, None, false);
        assert_eq!(cfg.window, 9);
    }
}
