use std::fs;

use serde::Deserialize;

/// All options the daemon understands, loaded from a JSON file. Any field
/// may be omitted; CLI flags override file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credentials: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub calendar: String,
    #[serde(default)]
    pub days: i64,
    #[serde(default)]
    pub lifx_token: String,
    #[serde(default)]
    pub lifx_light_id: String,
    #[serde(default)]
    pub lifx_light_label: String,
    #[serde(default)]
    pub lifx_busy_color: String,
    #[serde(default)]
    pub lifx_free_color: String,
    #[serde(default)]
    pub reload_interval_seconds: i64,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("open config: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("decode config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{\"calendar\":\"primary\"}").unwrap();
        assert_eq!(config.calendar, "primary");
        assert_eq!(config.days, 0);
        assert_eq!(config.lifx_busy_color, "");
        assert_eq!(config.reload_interval_seconds, 0);
    }

    #[test]
    fn from_file_reads_all_keys() {
        let path = env::temp_dir().join(format!("onair_cfg_{}.json", std::process::id()));
        fs::write(
            &path,
            "{\"credentials\":\"creds.json\",\"token\":\"token.json\",\
             \"calendar\":\"primary\",\"days\":2,\"lifx_token\":\"t\",\
             \"lifx_light_id\":\"l1\",\"lifx_light_label\":\"Desk\",\
             \"lifx_busy_color\":\"red\",\"lifx_free_color\":\"green\",\
             \"reload_interval_seconds\":30}",
        )
        .unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.credentials, "creds.json");
        assert_eq!(config.token, "token.json");
        assert_eq!(config.days, 2);
        assert_eq!(config.lifx_light_id, "l1");
        assert_eq!(config.reload_interval_seconds, 30);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.starts_with("open config:"));
    }
}
