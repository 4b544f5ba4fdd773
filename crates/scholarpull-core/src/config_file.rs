use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Config;

pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";
pub const DB_PATH_ENV: &str = "SCHOLARPULL_DB";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub query: Option<QueryConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub serpapi_key: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    pub num: Option<u32>,
    pub hl: Option<String>,
    pub sort: Option<String>,
    pub no_cache: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: Option<String>,
    pub persist_limit: Option<usize>,
}

/// Platform config directory path: `<config_dir>/scholarpull/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scholarpull").join("config.toml"))
}

/// Load config by cascading CWD `.scholarpull.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".scholarpull.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<S, T>(
    overlay: Option<&S>,
    base: Option<&S>,
    field: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (ba, oa) = (base.api.as_ref(), overlay.api.as_ref());
    let (bq, oq) = (base.query.as_ref(), overlay.query.as_ref());
    let (bs, os) = (base.storage.as_ref(), overlay.storage.as_ref());
    ConfigFile {
        api: Some(ApiConfig {
            serpapi_key: pick(oa, ba, |a| a.serpapi_key.clone()),
            base_url: pick(oa, ba, |a| a.base_url.clone()),
        }),
        query: Some(QueryConfig {
            num: pick(oq, bq, |q| q.num),
            hl: pick(oq, bq, |q| q.hl.clone()),
            sort: pick(oq, bq, |q| q.sort.clone()),
            no_cache: pick(oq, bq, |q| q.no_cache),
        }),
        storage: Some(StorageConfig {
            db_path: pick(os, bs, |s| s.db_path.clone()),
            persist_limit: pick(os, bs, |s| s.persist_limit),
        }),
    }
}

/// Resolve a [`Config`] from a config file and an environment lookup.
/// Environment values override file values; unset values fall back to
/// [`Config::default`]. Blank environment values count as unset.
pub fn resolve(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Config {
    let defaults = Config::default();
    let api = file.api.as_ref();
    let query = file.query.as_ref();
    let storage = file.storage.as_ref();
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    Config {
        serpapi_key: env(SERPAPI_KEY_ENV).or_else(|| api.and_then(|a| a.serpapi_key.clone())),
        base_url: api
            .and_then(|a| a.base_url.clone())
            .unwrap_or(defaults.base_url),
        num: query.and_then(|q| q.num).unwrap_or(defaults.num),
        hl: query.and_then(|q| q.hl.clone()).unwrap_or(defaults.hl),
        sort: query.and_then(|q| q.sort.clone()).unwrap_or(defaults.sort),
        no_cache: query.and_then(|q| q.no_cache).unwrap_or(defaults.no_cache),
        db_path: env(DB_PATH_ENV)
            .or_else(|| storage.and_then(|s| s.db_path.clone()))
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path),
        persist_limit: storage
            .and_then(|s| s.persist_limit)
            .unwrap_or(defaults.persist_limit),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}
