use crate::domains::density::IntervalTable;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub channel: ChannelConfig,
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub socket_url: String,
    /// Replay envelopes from a JSON Lines file instead of the socket.
    #[serde(default)]
    pub replay_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub refresh_period_path: String,
    pub mobiles_size_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub radius_m: f64,
    pub band_count: usize,
    pub wedge_count: usize,
    pub zoom_percent: f64,
    #[serde(default)]
    pub intervals: IntervalTable,
}

impl AppConfig {
    /// Defaults, then the optional TOML file, then `SITAC__SECTION__KEY`
    /// environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&AppConfig::default())?)
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("SITAC")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig {
                socket_url: "ws://localhost:8080/mobiles".to_string(),
                replay_file: None,
            },
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                refresh_period_path: "refreshPeriod".to_string(),
                mobiles_size_path: "mobilesSize".to_string(),
            },
            display: DisplayConfig {
                radius_m: 10_000.0,
                band_count: 7,
                wedge_count: 12,
                zoom_percent: 100.0,
                intervals: IntervalTable::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_overrides_display_section() {
        let text = r#"
            [channel]
            socket_url = "ws://sim:9000/ws"

            [api]
            base_url = "http://sim:9000"
            refresh_period_path = "period"
            mobiles_size_path = "size"

            [display]
            radius_m = 5000.0
            band_count = 5
            wedge_count = 8
            zoom_percent = 200.0
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(config.display.band_count, 5);
        assert_eq!(config.display.intervals, IntervalTable::default());
        assert!(config.channel.replay_file.is_none());
    }

    #[test]
    fn test_load_without_file_falls_back_to_defaults() {
        let config = AppConfig::load("does-not-exist").unwrap();
        assert_eq!(config.display.radius_m, 10_000.0);
        assert_eq!(config.display.wedge_count, 12);
    }
}
