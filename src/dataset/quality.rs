//! Simulated dirty data on the user set: absent emails and copied
//! names/emails across distinct users.
//!
//! Non-unique names and emails are part of the dataset; the Users table
//! carries no uniqueness constraint on those columns.

use super::models::User;
use super::names;
use super::random_source::RandomSource;
use crate::config::QualitySettings;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub missing_emails: usize,
    pub duplication_passes: usize,
    pub emails_copied: usize,
}

/// Assigns a name-derived email to each user, or leaves it absent with
/// probability `missing_probability`. Returns how many were left absent.
pub fn inject_missing_emails(
    users: &mut [User],
    missing_probability: f64,
    rng: &mut RandomSource,
) -> usize {
    let mut missing = 0;
    for user in users.iter_mut() {
        if rng.chance(missing_probability) {
            user.email = None;
            missing += 1;
        } else {
            user.email = Some(names::email_for(&user.name, rng));
        }
    }
    missing
}

/// Number of duplication passes for a population, truncated toward zero.
pub fn duplication_passes(population: usize, rate: f64) -> usize {
    (population as f64 * rate).floor() as usize
}

/// Copies the name (and sometimes the email) of a random user onto another
/// random user. Indices are drawn with replacement and may coincide.
/// Returns how many passes also copied the email.
pub fn inject_duplicates(
    users: &mut [User],
    passes: usize,
    email_copy_probability: f64,
    rng: &mut RandomSource,
) -> usize {
    if users.is_empty() {
        return 0;
    }
    let mut emails_copied = 0;
    for _ in 0..passes {
        let target = rng.index(users.len());
        let source = rng.index(users.len());
        users[target].name = users[source].name.clone();
        if rng.chance(email_copy_probability) {
            users[target].email = users[source].email.clone();
            emails_copied += 1;
        }
    }
    emails_copied
}

/// Runs both passes: missing emails first, then duplication.
pub fn apply_data_quality(
    users: &mut [User],
    settings: &QualitySettings,
    rng: &mut RandomSource,
) -> QualityReport {
    let missing_emails = inject_missing_emails(users, settings.email_missing_probability, rng);
    let passes = duplication_passes(users.len(), settings.duplicate_rate);
    let emails_copied = inject_duplicates(users, passes, settings.email_copy_probability, rng);
    debug!(
        "Data quality: {} emails left absent, {} duplication passes ({} with email)",
        missing_emails, passes, emails_copied
    );
    QualityReport {
        missing_emails,
        duplication_passes: passes,
        emails_copied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::models::{Gender, Genre, UserTier};
    use std::collections::HashSet;

    fn users(count: u32) -> Vec<User> {
        (1..=count)
            .map(|user_id| User {
                user_id,
                name: format!("Listener Number{}", user_id),
                gender: Gender::Male,
                tier: UserTier::Basic,
                registration_year: 2020,
                favorite_genre: Genre::Rock,
                total_listens: 0,
                email: None,
            })
            .collect()
    }

    #[test]
    fn test_missing_email_rate() {
        let mut rng = RandomSource::new(21);
        let mut users = users(4000);
        let missing = inject_missing_emails(&mut users, 0.05, &mut rng);

        assert_eq!(missing, users.iter().filter(|u| u.email.is_none()).count());
        // expected 200, allow generous slack
        assert!((120..=280).contains(&missing));
    }

    #[test]
    fn test_emails_derived_from_names() {
        let mut rng = RandomSource::new(22);
        let mut users = users(50);
        inject_missing_emails(&mut users, 0.0, &mut rng);
        for user in &users {
            let email = user.email.as_ref().unwrap();
            assert!(email.starts_with(&format!("listener.number{}", user.user_id)));
        }
    }

    #[test]
    fn test_probability_one_leaves_every_email_absent() {
        let mut rng = RandomSource::new(23);
        let mut users = users(30);
        assert_eq!(inject_missing_emails(&mut users, 1.0, &mut rng), 30);
    }

    #[test]
    fn test_duplication_passes_truncate() {
        assert_eq!(duplication_passes(1100, 0.02), 22);
        assert_eq!(duplication_passes(49, 0.02), 0);
        assert_eq!(duplication_passes(1000, 0.0), 0);
    }

    #[test]
    fn test_duplicates_create_shared_names() {
        let mut rng = RandomSource::new(24);
        let mut users = users(100);
        inject_missing_emails(&mut users, 0.0, &mut rng);
        inject_duplicates(&mut users, 40, 1.0, &mut rng);

        let distinct_names: HashSet<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert!(distinct_names.len() < 100);
        // ids are never touched
        let ids: Vec<u32> = users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicates_without_email_copy_keep_emails() {
        let mut rng = RandomSource::new(25);
        let mut users = users(100);
        inject_missing_emails(&mut users, 0.0, &mut rng);
        let emails_before: Vec<Option<String>> = users.iter().map(|u| u.email.clone()).collect();

        let copied = inject_duplicates(&mut users, 40, 0.0, &mut rng);

        assert_eq!(copied, 0);
        let emails_after: Vec<Option<String>> = users.iter().map(|u| u.email.clone()).collect();
        assert_eq!(emails_before, emails_after);
    }

    #[test]
    fn test_apply_data_quality_reports_passes() {
        let mut rng = RandomSource::new(26);
        let mut users = users(1100);
        let report = apply_data_quality(&mut users, &QualitySettings::default(), &mut rng);
        assert_eq!(report.duplication_passes, 22);
        assert!(report.emails_copied <= 22);
    }
}
