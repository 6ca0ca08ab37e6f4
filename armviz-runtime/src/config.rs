use std::{path::Path, time::Duration};

use armviz_core::LinkLengths;

pub trait Configurable: Clone {
    fn global(&self) -> &GlobalConfig;
}

/// Armviz global configuration.
#[derive(Clone, Debug)]
pub struct GlobalConfig {
    /// Name of the binary.
    pub bin_name: String,
    /// Whether the application runs as daemon.
    pub daemon: bool,
}

impl Configurable for GlobalConfig {
    fn global(&self) -> &GlobalConfig {
        self
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            bin_name: String::new(),
            daemon: false,
        }
    }
}

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Address of the trajectory planning service.
    pub url: String,
    /// Request timeout in milliseconds.
    pub timeout: u64,
}

impl PlannerConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            url: crate::consts::DEFAULT_PLANNER_URL.to_string(),
            timeout: crate::consts::DEFAULT_PLANNER_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Animation tick period in milliseconds.
    pub tick_interval: u64,
}

impl PlaybackConfig {
    /// Tick period, never shorter than a millisecond.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval.max(1))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: crate::consts::DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq)]
#[serde(default)]
pub struct ArmConfig {
    pub l1: f32,
    pub l2: f32,
    pub l3: f32,
    /// Planned motion duration in seconds.
    pub duration: f32,
    /// Planned motion sampling step in seconds.
    pub dt: f32,
}

impl ArmConfig {
    /// Link lengths, bounded by the control ranges.
    pub fn lengths(&self) -> LinkLengths {
        LinkLengths::clamped(self.l1, self.l2, self.l3)
    }

    /// Motion duration, bounded by the control range.
    pub fn duration(&self) -> f32 {
        let range = crate::consts::DURATION_RANGE;
        self.duration.clamp(*range.start(), *range.end())
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        let lengths = LinkLengths::default();

        Self {
            l1: lengths.l1,
            l2: lengths.l2,
            l3: lengths.l3,
            duration: crate::consts::DEFAULT_DURATION,
            dt: crate::consts::DEFAULT_DT,
        }
    }
}

#[derive(Clone, Debug, Default, serde_derive::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory to write rendered frames to.
    pub directory: Option<std::path::PathBuf>,
    /// Write every new trajectory to a CSV trace.
    pub trace: bool,
}

/// Runtime configuration.
#[derive(Clone, Debug, Default, serde_derive::Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planning service configuration.
    pub planner: PlannerConfig,
    /// Playback configuration.
    pub playback: PlaybackConfig,
    /// Canvas configuration.
    pub canvas: CanvasConfig,
    /// Arm and motion configuration.
    pub arm: ArmConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Read a TOML configuration file.
pub fn from_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> crate::runtime::Result<T> {
    let contents = std::fs::read_to_string(path)?;
    from_str(&contents)
}

/// Parse a TOML configuration.
pub fn from_str<T: serde::de::DeserializeOwned>(contents: &str) -> crate::runtime::Result<T> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: Config = from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.planner.url, "http://localhost:8000");
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.arm.lengths(), LinkLengths::new(100.0, 80.0, 60.0));
        assert!(config.output.directory.is_none());
    }

    #[test]
    fn test_config_partial() {
        let config: Config = from_str(
            r#"
            [planner]
            url = "http://planner.local:9000"

            [playback]
            tick_interval = 20

            [arm]
            l1 = 120.0
            l3 = 250.0
            duration = 30.0

            [output]
            directory = "/tmp/armviz"
            trace = true
            "#,
        )
        .unwrap();

        assert_eq!(config.planner.url, "http://planner.local:9000");
        assert_eq!(config.planner.timeout(), Duration::from_secs(5));
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(20));
        assert_eq!(config.arm.lengths(), LinkLengths::new(120.0, 80.0, 100.0));
        assert_eq!(config.arm.duration(), 10.0);
        assert_eq!(config.arm.dt, 0.05);
        assert_eq!(
            config.output.directory,
            Some(std::path::PathBuf::from("/tmp/armviz"))
        );
        assert!(config.output.trace);
    }

    #[test]
    fn test_config_invalid() {
        let config = from_str::<Config>("[playback]\ntick_interval = \"fast\"");

        assert!(config.is_err());
    }
}
