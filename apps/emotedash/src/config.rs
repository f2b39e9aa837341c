use std::{collections::HashMap, fs};

#[derive(Debug)]
pub struct Settings {
    pub api_base_url: String,
    pub managing: Option<String>,
    pub session_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3010".into(),
            managing: None,
            session_token: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("emotedash.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("EMOTEDASH_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("EMOTEDASH_MANAGING") {
        settings.managing = Some(v);
    }
    if let Ok(v) = std::env::var("EMOTEDASH_SESSION_TOKEN") {
        settings.session_token = Some(v);
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("managing") {
            settings.managing = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("session_token") {
            settings.session_token = Some(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_overrides_defaults() {
        let mut settings = Settings::default();
        apply_file_config(
            &mut settings,
            "api_base_url = \"https://dash.example.com\"\nmanaging = \"77829817\"\n",
        );

        assert_eq!(settings.api_base_url, "https://dash.example.com");
        assert_eq!(settings.managing.as_deref(), Some("77829817"));
        assert!(settings.session_token.is_none());
    }

    #[test]
    fn malformed_file_config_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_config(&mut settings, "api_base_url = [not toml");

        assert_eq!(settings.api_base_url, Settings::default().api_base_url);
    }
}
