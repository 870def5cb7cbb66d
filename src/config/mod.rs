use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "members_url")]
    pub members: Option<String>,
    pub members_format: Option<String>,
    #[serde(alias = "underlives_url")]
    pub underlives: Option<String>,
    pub base_url: Option<String>,
    pub route_mode: Option<String>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub include_graduated: Option<bool>,
    pub show_absent: Option<bool>,
    pub show_cycle: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".psyllium").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# psyllium config
#
# Location (default):
#   ~/.psyllium/config.yml

# Datasets (URL or local path)
members: https://example.github.io/nogi-psyllium/data/members.json
# members_format: csv
underlives: https://example.github.io/nogi-psyllium/data/underlives.json

# Shareable links
base_url: https://example.github.io/nogi-psyllium/
route_mode: path

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080

# Output
output_format: text
no_color: false
show_cycle: true

# Default view
include_graduated: false
show_absent: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.route_mode.as_deref(), Some("path"));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.show_absent, Some(false));
    }

    #[test]
    fn missing_config_allowed_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(load_config(&path, true).unwrap().members.is_none());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert!(cfg.underlives.unwrap().ends_with("underlives.json"));
    }

    #[test]
    fn url_aliases_are_accepted() {
        let cfg: ConfigFile =
            serde_yaml::from_str("members_url: ./m.csv\nunderlives_url: ./u.json\n").unwrap();
        assert_eq!(cfg.members.as_deref(), Some("./m.csv"));
        assert_eq!(cfg.underlives.as_deref(), Some("./u.json"));
    }
}
