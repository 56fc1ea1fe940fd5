use crate::error::{MaturityError, Result};
use crate::types::config::MaturityConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "maturity.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".maturity/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/maturity/config.toml";

/// Layers global, repository and local files; `None` when none exist.
pub fn load_config(root: &Path) -> Result<Option<MaturityConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<MaturityConfig>> {
    let layers = global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_LOCAL_FILE)])
        .filter(|path| path.exists())
        .collect::<Vec<_>>();
    if layers.is_empty() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    for path in &layers {
        tracing::debug!(path = %path.display(), "merging config layer");
        merge_toml(&mut merged, read_toml_value(path)?);
    }

    let cfg: MaturityConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| MaturityError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

/// Loads and validates, falling back to built-in defaults.
pub fn load_validated(root: &Path) -> Result<(MaturityConfig, bool)> {
    let loaded = load_config(root)?;
    let found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    cfg.validate()?;
    Ok((cfg, found))
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| MaturityError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
