pub mod merge;
pub mod project;
pub mod score;

use crate::error::{Result, ShowcaseError};
use crate::forge::{ForgeClient, Transport};
use crate::types::config::{Override, SiteConfig};
use crate::types::repository::Repository;
use crate::types::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Runs fetch, projection, scoring and merge, producing the snapshot to persist.
pub fn collect<T: Transport>(
    client: &ForgeClient<T>,
    config: &SiteConfig,
    overrides: &[Override],
    now: DateTime<Utc>,
) -> Result<Snapshot> {
    let listed = client.organisation_repos(&config.github_organisation)?;
    let listed_count = listed.len();
    let mut repos = project::dedupe_by_name(listed);
    info!(
        "fetched {} repositories for {} ({} after removing duplicates)",
        listed_count,
        config.github_organisation,
        repos.len()
    );

    for repo in repos.iter_mut() {
        let releases = client.releases(repo)?;
        repo.apply_releases(&releases);
        debug!("{}: {} release(s)", repo.name, repo.release_count);
    }

    score::add_scores(&mut repos, now);
    repos.sort_by(|a, b| {
        b.score
            .unwrap_or_default()
            .total_cmp(&a.score.unwrap_or_default())
    });
    add_readmes(client, &mut repos, config.readme_count)?;

    let records = repos
        .into_iter()
        .map(Repository::into_record)
        .collect::<Result<Vec<_>>>()?;
    let mut merged = merge::merge(records, overrides);
    merge::sort_by_score(&mut merged);
    info!(
        "merged {} override(s) into {} record(s)",
        overrides.len(),
        merged.len()
    );

    Ok(Snapshot {
        name: config.site_name(),
        organisation_name: config.organisation_name(),
        collected_at: now,
        repos: merged,
    })
}

fn add_readmes<T: Transport>(
    client: &ForgeClient<T>,
    repos: &mut [Repository],
    count: usize,
) -> Result<()> {
    for repo in repos.iter_mut().take(count) {
        repo.readme = match client.readme(repo) {
            Ok(text) => Some(Some(text)),
            Err(ShowcaseError::MissingReadme { url }) => {
                info!("{} has no readme ({url})", repo.name);
                Some(None)
            }
            Err(e) => return Err(e),
        };
    }
    Ok(())
}
