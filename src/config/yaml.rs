// src/config/yaml.rs
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    DEFAULT_OPENROUTER_BASE_URL, DEFAULT_OPENROUTER_MODEL, DEFAULT_TAVILY_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};

const CONFIG_FILE_NAMES: [&str; 2] = ["stormer.yaml", "stormer.yml"];

/// Non-secret settings after the env > YAML > default merge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MergedSettings {
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub openrouter_timeout_secs: f64,
    pub tavily_base_url: String,
    pub tavily_timeout_secs: f64,
}

impl Default for MergedSettings {
    fn default() -> Self {
        Self {
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_timeout_secs: DEFAULT_TIMEOUT_SECS,
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            tavily_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Find a YAML configuration file in the standard locations.
///
/// Search order: `./stormer.yaml`, `./stormer.yml`, then
/// `$HOME/.stormer/config.yaml`. First hit wins.
pub fn find_yaml_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    find_yaml_config_in(cwd.as_deref(), home.as_deref())
}

pub(crate) fn find_yaml_config_in(cwd: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(cwd) = cwd {
        for name in CONFIG_FILE_NAMES {
            let candidate = cwd.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    let home_config = home?.join(".stormer").join("config.yaml");
    if home_config.is_file() {
        return Some(home_config);
    }

    None
}

/// Load and parse a YAML configuration file.
///
/// Files that cannot be read or parsed, or that do not contain a mapping,
/// are treated as absent. Any `api_key` entries under the service sections
/// are stripped: credentials are only accepted from the environment.
pub fn load_yaml_config(path: &Path) -> Option<Value> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!("Ignoring unreadable config file {}: {}", path.display(), err);
            return None;
        }
    };

    let mut value: Value = match serde_yaml::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            debug!("Ignoring malformed config file {}: {}", path.display(), err);
            return None;
        }
    };

    if !value.is_mapping() {
        debug!("Ignoring config file {}: not a mapping", path.display());
        return None;
    }

    for section in ["openrouter", "tavily"] {
        if let Some(Value::Mapping(map)) = value.get_mut(section) {
            map.remove("api_key");
        }
    }

    Some(value)
}

/// Merge YAML settings with environment overrides on top of the defaults.
/// Each field resolves independently: env var > YAML value > default.
pub(crate) fn merge_settings(
    yaml: Option<&Value>,
    env: &HashMap<String, String>,
) -> MergedSettings {
    let mut settings = MergedSettings::default();

    if let Some(yaml) = yaml {
        if let Some(section) = yaml.get("openrouter") {
            apply_yaml_str(section, "model", &mut settings.openrouter_model);
            apply_yaml_str(section, "base_url", &mut settings.openrouter_base_url);
            apply_yaml_timeout(section, &mut settings.openrouter_timeout_secs);
        }
        if let Some(section) = yaml.get("tavily") {
            apply_yaml_str(section, "base_url", &mut settings.tavily_base_url);
            apply_yaml_timeout(section, &mut settings.tavily_timeout_secs);
        }
    }

    apply_env_str(env, "OPENROUTER_MODEL", &mut settings.openrouter_model);
    apply_env_str(env, "OPENROUTER_BASE_URL", &mut settings.openrouter_base_url);
    apply_env_timeout(env, "OPENROUTER_TIMEOUT", &mut settings.openrouter_timeout_secs);
    apply_env_str(env, "TAVILY_BASE_URL", &mut settings.tavily_base_url);
    apply_env_timeout(env, "TAVILY_TIMEOUT", &mut settings.tavily_timeout_secs);

    settings
}

fn apply_yaml_str(section: &Value, key: &str, slot: &mut String) {
    if let Some(value) = section.get(key).and_then(Value::as_str) {
        *slot = value.to_string();
    }
}

fn apply_yaml_timeout(section: &Value, slot: &mut f64) {
    // as_f64 accepts both integer and float YAML scalars
    if let Some(value) = section.get("timeout").and_then(Value::as_f64) {
        *slot = value;
    }
}

fn apply_env_str(env: &HashMap<String, String>, key: &str, slot: &mut String) {
    if let Some(value) = env.get(key).filter(|v| !v.is_empty()) {
        *slot = value.clone();
    }
}

fn apply_env_timeout(env: &HashMap<String, String>, key: &str, slot: &mut f64) {
    if let Some(value) = env.get(key).filter(|v| !v.is_empty()) {
        match value.parse::<f64>() {
            Ok(secs) => *slot = secs,
            Err(_) => debug!("Ignoring unparseable {}: {:?}", key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_find_prefers_yaml_over_yml_in_cwd() {
        let cwd = tempfile::tempdir().unwrap();
        std::fs::write(cwd.path().join("stormer.yaml"), "openrouter: {}\n").unwrap();
        std::fs::write(cwd.path().join("stormer.yml"), "openrouter: {}\n").unwrap();

        let found = find_yaml_config_in(Some(cwd.path()), None).unwrap();
        assert_eq!(found, cwd.path().join("stormer.yaml"));
    }

    #[test]
    fn test_find_falls_back_to_yml_extension() {
        let cwd = tempfile::tempdir().unwrap();
        std::fs::write(cwd.path().join("stormer.yml"), "openrouter: {}\n").unwrap();

        let found = find_yaml_config_in(Some(cwd.path()), None).unwrap();
        assert_eq!(found, cwd.path().join("stormer.yml"));
    }

    #[test]
    fn test_find_falls_back_to_home_config() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let home_config = home.path().join(".stormer").join("config.yaml");
        std::fs::create_dir_all(home_config.parent().unwrap()).unwrap();
        std::fs::write(&home_config, "openrouter: {}\n").unwrap();

        let found = find_yaml_config_in(Some(cwd.path()), Some(home.path())).unwrap();
        assert_eq!(found, home_config);

        // a working-directory file still wins over the home config
        std::fs::write(cwd.path().join("stormer.yaml"), "openrouter: {}\n").unwrap();
        let found = find_yaml_config_in(Some(cwd.path()), Some(home.path())).unwrap();
        assert_eq!(found, cwd.path().join("stormer.yaml"));
    }

    #[test]
    fn test_find_returns_none_when_nothing_present() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();

        assert!(find_yaml_config_in(Some(cwd.path()), Some(home.path())).is_none());
        assert!(find_yaml_config_in(None, None).is_none());
    }

    #[test]
    fn test_load_valid_yaml() {
        let file = write_temp_yaml("openrouter:\n  model: some/model\n");
        let value = load_yaml_config(file.path()).unwrap();
        assert_eq!(
            value.get("openrouter").unwrap().get("model").unwrap().as_str(),
            Some("some/model")
        );
    }

    #[test]
    fn test_malformed_yaml_is_treated_as_absent() {
        let file = write_temp_yaml("openrouter: [unclosed\n  nonsense: {{{\n");
        assert!(load_yaml_config(file.path()).is_none());
    }

    #[test]
    fn test_non_mapping_yaml_is_treated_as_absent() {
        let file = write_temp_yaml("- just\n- a\n- list\n");
        assert!(load_yaml_config(file.path()).is_none());

        let file = write_temp_yaml("scalar-only\n");
        assert!(load_yaml_config(file.path()).is_none());
    }

    #[test]
    fn test_missing_file_is_treated_as_absent() {
        assert!(load_yaml_config(Path::new("/nonexistent/stormer.yaml")).is_none());
    }

    #[test]
    fn test_api_keys_are_stripped_on_load() {
        let file = write_temp_yaml(
            "openrouter:\n  api_key: leaked-key\n  model: some/model\ntavily:\n  api_key: leaked-key\n",
        );
        let value = load_yaml_config(file.path()).unwrap();

        assert!(value.get("openrouter").unwrap().get("api_key").is_none());
        assert!(value.get("tavily").unwrap().get("api_key").is_none());
        // other keys survive
        assert!(value.get("openrouter").unwrap().get("model").is_some());
    }

    #[test]
    fn test_merge_defaults_when_no_sources() {
        let settings = merge_settings(None, &HashMap::new());
        assert_eq!(settings, MergedSettings::default());
    }

    #[test]
    fn test_yaml_overrides_defaults_per_field() {
        let yaml: Value = serde_yaml::from_str(
            "openrouter:\n  base_url: https://yaml.example/v1\n  timeout: 3\n",
        )
        .unwrap();

        let settings = merge_settings(Some(&yaml), &HashMap::new());
        assert_eq!(settings.openrouter_base_url, "https://yaml.example/v1");
        assert_eq!(settings.openrouter_timeout_secs, 3.0);
        // fields the YAML does not mention keep their defaults
        assert_eq!(settings.openrouter_model, DEFAULT_OPENROUTER_MODEL);
        assert_eq!(settings.tavily_base_url, DEFAULT_TAVILY_BASE_URL);
    }

    #[test]
    fn test_env_overrides_yaml_per_field() {
        let yaml: Value = serde_yaml::from_str(
            "openrouter:\n  model: yaml/model\n  timeout: 3\ntavily:\n  timeout: 3\n",
        )
        .unwrap();

        let env = HashMap::from([
            ("OPENROUTER_MODEL".to_string(), "env/model".to_string()),
            ("TAVILY_TIMEOUT".to_string(), "7.5".to_string()),
        ]);

        let settings = merge_settings(Some(&yaml), &env);
        assert_eq!(settings.openrouter_model, "env/model");
        assert_eq!(settings.tavily_timeout_secs, 7.5);
        // YAML still wins over defaults where env is silent
        assert_eq!(settings.openrouter_timeout_secs, 3.0);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let env = HashMap::from([
            ("OPENROUTER_MODEL".to_string(), String::new()),
            ("OPENROUTER_TIMEOUT".to_string(), String::new()),
        ]);

        let settings = merge_settings(None, &env);
        assert_eq!(settings.openrouter_model, DEFAULT_OPENROUTER_MODEL);
        assert_eq!(settings.openrouter_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_yaml_with_unexpected_value_types_is_tolerated() {
        // model is a list, timeout is a string: both ignored, defaults kept
        let yaml: Value = serde_yaml::from_str(
            "openrouter:\n  model: [not, a, string]\n  timeout: soon\n",
        )
        .unwrap();

        let settings = merge_settings(Some(&yaml), &HashMap::new());
        assert_eq!(settings.openrouter_model, DEFAULT_OPENROUTER_MODEL);
        assert_eq!(settings.openrouter_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
