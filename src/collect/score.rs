use crate::types::repository::Repository;
use chrono::{DateTime, Duration, Utc};
use std::f64::consts::LN_2;

pub const ACTIVITY_HALF_LIFE_DAYS: i64 = 7;
pub const HALF_COUNT: f64 = 3.0;

/// Exponential decay with the given half-life: 1.0 at `now`, 0.5 one half-life earlier.
pub fn decay(t: DateTime<Utc>, half_life: Duration, now: DateTime<Utc>) -> f64 {
    let elapsed_secs = (now - t).num_milliseconds() as f64 / 1000.0;
    let half_life_secs = half_life.num_milliseconds() as f64 / 1000.0;
    (-elapsed_secs * LN_2 / half_life_secs).exp()
}

/// Saturating growth towards 1: 0.5 once `count` reaches `half_count`.
/// Missing or non-positive counts contribute nothing.
pub fn tend_to(count: Option<f64>, half_count: f64) -> f64 {
    match count {
        Some(c) if c > 0.0 => 1.0 - (-c * LN_2 / half_count).exp(),
        _ => 0.0,
    }
}

pub fn score(repo: &Repository, now: DateTime<Utc>) -> f64 {
    let half_life = Duration::days(ACTIVITY_HALF_LIFE_DAYS);
    let mut score = 0.0;
    if !repo.description.is_empty() {
        score += 1.0;
    }
    if repo.homepage.is_some() {
        score += 1.0;
    }
    score += decay(repo.pushed_at, half_life, now);
    score += tend_to(Some(repo.release_count as f64), HALF_COUNT);
    if repo.release_count > 0 {
        if let Some(release_date) = repo.release_date {
            score += decay(release_date, half_life, now);
        }
    }
    score += tend_to(Some(repo.stargazers_count as f64), HALF_COUNT);
    score
}

pub fn add_scores(repos: &mut [Repository], now: DateTime<Utc>) {
    for repo in repos.iter_mut() {
        repo.score = Some(score(repo, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::repository::tests::sample;
    use chrono::TimeZone;

    const EPSILON: f64 = 1e-9;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn tend_to_is_zero_at_zero_and_half_at_half_count() {
        assert_eq!(tend_to(Some(0.0), 3.0), 0.0);
        assert_eq!(tend_to(Some(0.0), 0.5), 0.0);
        assert!((tend_to(Some(3.0), 3.0) - 0.5).abs() < EPSILON);
        assert!((tend_to(Some(10.0), 10.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn tend_to_ignores_negative_and_missing_counts() {
        assert_eq!(tend_to(Some(-1.0), 3.0), 0.0);
        assert_eq!(tend_to(Some(-100.0), 0.0), 0.0);
        assert_eq!(tend_to(None, 3.0), 0.0);
    }

    #[test]
    fn tend_to_grows_monotonically_below_one() {
        let mut previous = 0.0;
        for c in 0..40 {
            let value = tend_to(Some(c as f64), HALF_COUNT);
            assert!(value >= previous);
            assert!(value < 1.0);
            previous = value;
        }
    }

    #[test]
    fn decay_is_one_now_and_half_after_one_half_life() {
        let half_life = Duration::days(7);
        assert_eq!(decay(now(), half_life, now()), 1.0);
        let week_ago = now() - Duration::days(7);
        assert!((decay(week_ago, half_life, now()) - 0.5).abs() < EPSILON);
        let fortnight_ago = now() - Duration::days(14);
        assert!((decay(fortnight_ago, half_life, now()) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn decay_decreases_with_age() {
        let half_life = Duration::days(7);
        let mut previous = f64::INFINITY;
        for hours in (0..2000).step_by(37) {
            let value = decay(now() - Duration::hours(hours), half_life, now());
            assert!(value < previous);
            assert!(value > 0.0);
            previous = value;
        }
    }

    #[test]
    fn score_without_release_date_omits_release_recency() {
        let mut repo = sample("roary");
        repo.pushed_at = now() - Duration::days(7);
        repo.release_count = 3;
        repo.stargazers_count = 3;
        assert!((score(&repo, now()) - 1.5).abs() < EPSILON);
    }

    #[test]
    fn score_sums_every_signal() {
        let mut repo = sample("ariba");
        repo.description = "Antimicrobial resistance identification".to_string();
        repo.homepage = Some("https://ariba.example".to_string());
        repo.pushed_at = now();
        repo.release_count = 3;
        repo.release_date = Some(now() - Duration::days(7));
        repo.stargazers_count = 3;
        // 1 + 1 + 1 + 0.5 + 0.5 + 0.5
        assert!((score(&repo, now()) - 4.5).abs() < EPSILON);
    }

    #[test]
    fn score_of_abandoned_repository_is_near_zero() {
        let mut repo = sample("old");
        repo.pushed_at = now() - Duration::days(3650);
        let value = score(&repo, now());
        assert!(value.is_finite());
        assert!(value >= 0.0 && value < 1e-6);
    }

    #[test]
    fn add_scores_fills_every_record() {
        let mut repos = vec![sample("a"), sample("b")];
        add_scores(&mut repos, now());
        assert!(repos
            .iter()
            .all(|repo| repo.score.map(f64::is_finite).unwrap_or(false)));
    }
}
