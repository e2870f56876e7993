use crate::error::{Result, ShowcaseError};
use crate::types::config::{Override, SiteConfig};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

const OVERRIDE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        return Err(ShowcaseError::configuration(format!(
            "{} not found; create it with at least `github_organisation: <org>` \
             (add `username` and `token` for authenticated requests)",
            path.display()
        )));
    }
    debug!("loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let cfg: SiteConfig = serde_yaml::from_str(&content).map_err(|e| {
        ShowcaseError::configuration(format!("{}: {}", path.display(), e))
    })?;
    cfg.validate()?;
    if cfg.credentials().is_none() {
        warn!("no username/token configured; forge requests will be unauthenticated");
    }
    Ok(cfg)
}

/// Reads every `*.yml`/`*.yaml` file directly under `dir`, ordered by file name.
/// A missing directory yields no overrides.
pub fn load_overrides(dir: &Path) -> Result<Vec<Override>> {
    if !dir.is_dir() {
        debug!("no override directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut overrides = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ShowcaseError::configuration(e.to_string()))?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| OVERRIDE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        if !entry.file_type().is_file() || !is_yaml {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        overrides.push(read_override(name, path)?);
    }
    debug!("loaded {} override(s) from {}", overrides.len(), dir.display());
    Ok(overrides)
}

fn read_override(name: &str, path: &Path) -> Result<Override> {
    let content = std::fs::read_to_string(path)?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| ShowcaseError::configuration(format!("{}: {}", path.display(), e)))?;
    let fields = match yaml {
        serde_yaml::Value::Null => serde_json::Map::new(),
        other => match serde_json::to_value(other) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ShowcaseError::configuration(format!(
                    "{}: expected a mapping of field names to values",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(ShowcaseError::configuration(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        },
    };

    let parsed = Override::from_fields(name, fields)?;
    if parsed.multiplier() < 0.0 {
        warn!(
            "{}: negative score_multiplier {} will invert the ranking",
            path.display(),
            parsed.multiplier()
        );
    }
    Ok(parsed)
}
