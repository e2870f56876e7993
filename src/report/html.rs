use crate::collect::merge::sort_by_score;
use crate::error::{Result, ShowcaseError};
use crate::types::snapshot::Snapshot;
use minijinja::{context, Environment};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "index.html";

/// Renders the page: the top `featured_count` repositories by score are
/// `featured_repos`, the remainder `other_repos`.
pub fn render_page(template: &str, snapshot: &Snapshot, featured_count: usize) -> Result<String> {
    let mut repos = snapshot.repos.clone();
    sort_by_score(&mut repos);
    let split = featured_count.min(repos.len());
    let (featured, other) = repos.split_at(split);

    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, template)?;
    let rendered = env.get_template(TEMPLATE_NAME)?.render(context! {
        featured_repos => featured,
        other_repos => other,
        name => &snapshot.name,
        organisation_name => &snapshot.organisation_name,
        collected_at => snapshot.collected_at.to_rfc3339(),
    })?;
    Ok(rendered)
}

pub fn write_page(
    template_path: &Path,
    snapshot: &Snapshot,
    featured_count: usize,
    out_path: &Path,
) -> Result<()> {
    debug!("loading template from {}", template_path.display());
    let template = fs::read_to_string(template_path).map_err(|e| {
        ShowcaseError::configuration(format!(
            "cannot read template {}: {e}",
            template_path.display()
        ))
    })?;
    let page = render_page(&template, snapshot, featured_count)?;
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, page)?;
    info!("rendered {}", out_path.display());
    Ok(())
}
