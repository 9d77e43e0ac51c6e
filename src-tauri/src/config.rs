use calc_engine::{SessionOptions, SizeThresholds};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_dev_env")]
    pub dev_env: String,

    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

impl AppConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            thresholds: SizeThresholds {
                small: self.display.small_threshold,
                extra_small: self.display.extra_small_threshold,
            },
            tape_limit: self.session.tape_limit,
        }
    }

    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

/// The subset of configuration the webview is allowed to see.
#[derive(Debug, Serialize, Deserialize)]
pub struct FrontendConfig {
    pub app_name: String,
    pub dev_env: String,
    pub display: DisplayConfig,
    pub features: HashMap<String, bool>,
}

impl From<&AppConfig> for FrontendConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            dev_env: config.dev_env.clone(),
            display: config.display.clone(),
            features: config.features.clone(),
        }
    }
}

fn default_dev_env() -> String {
    "dev".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    pub small_threshold: usize,
    pub extra_small_threshold: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_tape_limit")]
    pub tape_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tape_limit: default_tape_limit(),
        }
    }
}

fn default_tape_limit() -> usize {
    50
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LoggingFormatConfig,
    pub levels: LoggingLevelsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingFormatConfig {
    pub show_time: bool,
    pub location: LoggingLocationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLocationConfig {
    pub enabled: bool,
    pub show_file: bool,
    pub show_line: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLevelsConfig {
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
    pub critical: bool,
}

static CONFIG: RwLock<Option<&'static AppConfig>> = RwLock::new(None);

pub fn get_config() -> &'static AppConfig {
    if let Some(cfg) = *CONFIG.read().unwrap_or_else(PoisonError::into_inner) {
        return cfg;
    }

    let mut write = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(cfg) = *write {
        return cfg;
    }

    let cfg =
        Box::leak(Box::new(load_config().unwrap_or_else(|e| {
            panic!("Failed to load configuration: {}", e)
        })));
    *write = Some(cfg);
    cfg
}

#[cfg(test)]
pub fn reset_config() {
    let mut write = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    *write = None;
}

fn load_config() -> Result<AppConfig, ConfigError> {
    // CARGO_MANIFEST_DIR points at src-tauri under cargo; from the repo
    // root the files live under src-tauri/.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let base_path = std::path::Path::new(&manifest_dir);

    let resolve = |name: &str| {
        if base_path.join(name).exists() {
            base_path.join(name)
        } else {
            std::path::Path::new("src-tauri").join(name)
        }
    };

    let builder = Config::builder()
        // Load default config (mandatory)
        .add_source(File::from(resolve("global_config.yaml")).required(true))
        // Load production config if in prod
        .add_source(File::from(resolve("production_config.yaml")).required(false))
        // Load local override
        .add_source(File::from(resolve(".global_config.yaml")).required(false))
        // Map nested env vars like CALC__DISPLAY__SMALL_THRESHOLD=8
        .add_source(Environment::with_prefix("CALC").separator("__"));

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use serial_test::serial;
    use std::env;

    struct EnvGuard(&'static str);
    impl EnvGuard {
        fn new(key: &'static str, val: &str) -> Self {
            reset_config();
            env::set_var(key, val);
            Self(key)
        }
    }
    impl Drop for EnvGuard {
        fn drop(&mut self) {
            env::remove_var(self.0);
            reset_config();
        }
    }

    #[test]
    #[serial]
    fn test_load_config() {
        let config = load_config();
        assert!(config.is_ok(), "Failed to load config: {:?}", config.err());

        let config = config.unwrap();
        assert_eq!(config.app_name, "Keypad Calculator");
        assert_eq!(config.display.small_threshold, 6);
        assert_eq!(config.display.extra_small_threshold, 9);
        assert_eq!(config.session.tape_limit, 50);
    }

    #[test]
    fn test_minimal_yaml_deserializes() {
        let yaml = r#"
app_name: "Calc"
display:
  small_threshold: 6
  extra_small_threshold: 9
logging:
  verbose: false
  format:
    show_time: false
    location: { enabled: false, show_file: false, show_line: false }
  levels: { debug: false, info: true, warning: true, error: true, critical: true }
"#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("minimal config should load");
        assert_eq!(config.app_name, "Calc");
        assert_eq!(config.dev_env, "dev");
        assert_eq!(config.session.tape_limit, 50);
        assert!(!config.feature_enabled("keyboard_input"));
    }

    #[test]
    #[serial]
    fn test_session_options_from_config() {
        let config = load_config().expect("Should load config");
        let options = config.session_options();
        assert_eq!(options.thresholds, SizeThresholds::default());
        assert_eq!(options.tape_limit, 50);
    }

    #[test]
    #[serial]
    fn test_env_var_override_precedence() {
        let _guard = EnvGuard::new("CALC__APP_NAME", "Desk Calc");

        let config = load_config().expect("Should load config");
        assert_eq!(config.app_name, "Desk Calc");
    }

    #[test]
    #[serial]
    fn test_type_coercion_numeric() {
        let _guard1 = EnvGuard::new("CALC__DISPLAY__SMALL_THRESHOLD", "4");
        let _guard2 = EnvGuard::new("CALC__SESSION__TAPE_LIMIT", "10");

        let config = load_config().expect("Should load config");
        assert_eq!(config.display.small_threshold, 4);
        assert_eq!(config.session.tape_limit, 10);
        assert_eq!(config.session_options().thresholds.small, 4);
    }

    #[test]
    #[serial]
    fn test_type_coercion_boolean() {
        {
            let _guard = EnvGuard::new("CALC__LOGGING__FORMAT__SHOW_TIME", "false");
            let config = load_config().expect("Should load config");
            assert!(!config.logging.format.show_time);
        }

        {
            let _guard = EnvGuard::new("CALC__LOGGING__FORMAT__LOCATION__ENABLED", "1");
            let config = load_config().expect("Should load config");
            assert!(config.logging.format.location.enabled);
        }
    }

    #[test]
    #[serial]
    fn test_get_config_is_cached() {
        reset_config();
        let a = get_config() as *const AppConfig;
        let b = get_config() as *const AppConfig;
        assert_eq!(a, b);
        reset_config();
    }

    #[test]
    #[serial]
    fn test_frontend_config_excludes_logging() {
        let config = load_config().expect("Should load config");
        assert!(config.feature_enabled("keyboard_input"));
        assert!(!config.feature_enabled("missing"));

        let frontend_config = FrontendConfig::from(&config);
        let json = serde_json::to_value(&frontend_config).unwrap();

        assert_eq!(json["app_name"], "Keypad Calculator");
        assert_eq!(json["display"]["small_threshold"], 6);
        assert!(json.get("logging").is_none());
    }
}
