use crate::cli::{Args, RateUnit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "ActivityUnit")]
    pub activity_unit: String,

    #[serde(rename = "Promiscuous")]
    pub promiscuous: bool,

    #[serde(rename = "Logging")]
    pub logging: bool,

    #[serde(rename = "LogInterval")]
    pub log_interval: u64,

    #[serde(rename = "UpdateInterval")]
    pub update_interval: u64,

    #[serde(rename = "TimeoutMinutes")]
    pub timeout_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            activity_unit: "k".to_string(),
            promiscuous: false,
            logging: false,
            log_interval: 3600,
            update_interval: 0,
            timeout_minutes: 0,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".ifwatch");
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path)?;
                return Ok(toml::from_str(&content)?);
            }
        }

        Ok(Self::default())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".ifwatch");
            let content = toml::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }

    /// Command-line arguments win over whatever the config file said.
    pub fn apply_args(&mut self, args: &Args) {
        self.activity_unit = args.unit.as_key().to_string();
        if args.promisc {
            self.promiscuous = true;
        }
        if args.logging_requested() {
            self.logging = true;
        }
        self.log_interval = args.log_interval;
        self.update_interval = args.update_interval;
        self.timeout_minutes = args.timeout_minutes;
    }

    #[must_use]
    pub fn get_activity_unit(&self) -> RateUnit {
        RateUnit::from_key(&self.activity_unit).unwrap_or(RateUnit::Kilobits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get_activity_unit(), RateUnit::Kilobits);
        assert!(!config.promiscuous);
        assert_eq!(config.log_interval, 3600);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            activity_unit: "K".to_string(),
            promiscuous: true,
            logging: true,
            log_interval: 60,
            update_interval: 2,
            timeout_minutes: 10,
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.get_activity_unit(), RateUnit::Kilobytes);
        assert!(parsed.promiscuous);
        assert_eq!(parsed.log_interval, 60);
    }

    #[test]
    fn test_apply_args_overrides() {
        let mut config = Config::default();
        let args = Args {
            unit: RateUnit::Kilobytes,
            promisc: true,
            logfile: Some("traffic.log".to_string()),
            log_interval: 120,
            ..Default::default()
        };

        config.apply_args(&args);
        assert_eq!(config.get_activity_unit(), RateUnit::Kilobytes);
        assert!(config.promiscuous);
        assert!(config.logging);
        assert_eq!(config.log_interval, 120);
    }
}
