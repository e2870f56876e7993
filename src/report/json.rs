use crate::error::{Result, ShowcaseError};
use crate::types::snapshot::Snapshot;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Pretty JSON (two-space indent) with object keys sorted at every level.
pub fn to_json(snapshot: &Snapshot) -> Result<String> {
    let value = sort_keys(serde_json::to_value(snapshot)?);
    let mut rendered = serde_json::to_string_pretty(&value)?;
    rendered.push('\n');
    Ok(rendered)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(snapshot)?)?;
    info!(
        "wrote {} repositories to {}",
        snapshot.repos.len(),
        path.display()
    );
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    debug!("reading snapshot from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        ShowcaseError::configuration(format!(
            "cannot read snapshot {}: {e}; run `showcase collect` first",
            path.display()
        ))
    })?;
    Ok(serde_json::from_str(&content)?)
}
