use crate::types::repository::Repository;
use std::collections::HashSet;
use tracing::debug;

/// Collapses pagination duplicates by name. The first entry seen for a name is
/// kept and listing order is preserved.
pub fn dedupe_by_name(repos: Vec<Repository>) -> Vec<Repository> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(repos.len());
    for repo in repos {
        if seen.insert(repo.name.clone()) {
            unique.push(repo);
        } else {
            debug!("dropping duplicate listing entry for {}", repo.name);
        }
    }
    unique
}
