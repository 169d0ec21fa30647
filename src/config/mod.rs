use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    #[serde(alias = "input_dir")]
    pub input: Option<String>,
    pub region: Option<i64>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    #[serde(alias = "search")]
    pub name: Option<String>,
    pub guild: Option<String>,
    pub union: Option<String>,
    pub realm: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub top20: Option<bool>,
    pub page: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub discard_stale: Option<bool>,
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
    Some(home_dir()?.join(".crowrank").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
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
    r#"# crowrank config
#
# Location (default):
#   ~/.crowrank/config.yml

# Data source (choose one)
# api_base: https://rankings.example.com/api
# input: ./snapshots        # directory with metadata.json and <region>.json
region: 2020

# Network
timeout: 10
# proxy: http://127.0.0.1:8080
# Drop responses to superseded region requests instead of applying
# whichever arrives last.
discard_stale: false

# Filters (empty = no constraint)
name: ""
guild: ""
union: ""
# A realm group (SEA201) matches every realm under it; group/realm is exact.
realm: ""

# Sorting: rank, name, score, guild, union, realm, realm_group, weapon_type, delta_rank
sort_by: rank
sort_order: asc
top20: false
page: 1

# Export (optional)
# output: ./rankings.html
# output_format: html

no_color: false
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
        assert_eq!(cfg.region, Some(2020));
        assert_eq!(cfg.sort_by.as_deref(), Some("rank"));
        assert_eq!(cfg.top20, Some(false));
        assert_eq!(cfg.discard_stale, Some(false));
    }

    #[test]
    fn missing_file_is_allowed_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).unwrap_err().contains("not found"));
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.sort_order.as_deref(), Some("asc"));
    }

    #[test]
    fn search_is_an_alias_for_name() {
        let cfg: ConfigFile =
            serde_yaml::from_str("search: ana\nrealm: SEA201\ninput_dir: ./snaps\n").unwrap();
        assert_eq!(cfg.name.as_deref(), Some("ana"));
        assert_eq!(cfg.input.as_deref(), Some("./snaps"));
        assert_eq!(cfg.realm.as_deref(), Some("SEA201"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
        assert_eq!(expand_tilde("rel/x.yml"), PathBuf::from("rel/x.yml"));
    }
}
