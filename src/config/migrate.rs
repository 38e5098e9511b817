use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Every top-level key a complete config file carries, with its default.
fn expected_fields() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(AppError::Config("default config is not a mapping".into())),
        Err(e) => Err(AppError::Config(e.to_string())),
    }
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AppError::Config(format!(
            "{} is not a key/value document",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(format!(
            "cannot parse {}: {e}",
            path.display()
        ))),
    }
}

/// Names of fields missing from the file at `path`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let present = read_mapping(path)?;
    let expected = expected_fields()?;

    Ok(expected
        .keys()
        .filter(|k| !present.contains_key(k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing field with its default, keeping existing values.
/// Returns the names of the fields added.
pub fn add_missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let mut present = read_mapping(path)?;
    let expected = expected_fields()?;

    let mut added = Vec::new();
    for (key, default) in expected {
        if !present.contains_key(&key) {
            if let Some(name) = key.as_str() {
                added.push(name.to_string());
            }
            present.insert(key, default);
        }
    }

    if !added.is_empty() {
        let yaml = serde_yaml::to_string(&Value::Mapping(present))
            .map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, yaml)?;
    }

    Ok(added)
}
