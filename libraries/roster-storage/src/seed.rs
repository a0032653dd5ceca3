//! Sample data for development databases

use roster_core::{error::Result, types::CreateUser, UserRepository};
use tracing::{info, warn};

/// Result of a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Users already present; seeding is skipped when non-zero
    pub existing: i64,
    pub created: usize,
    pub failed: usize,
}

impl SeedReport {
    pub fn skipped(&self) -> bool {
        self.existing > 0
    }
}

fn sample(
    first_name: &str,
    last_name: &str,
    country: &str,
    city: &str,
    email: &str,
    avatar: &str,
) -> CreateUser {
    CreateUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        country: country.to_string(),
        city: city.to_string(),
        email: email.to_string(),
        phone_number: Some("+84935682466".to_string()),
        avatar: Some(avatar.to_string()),
    }
}

/// The four sample users
pub fn sample_users() -> Vec<CreateUser> {
    vec![
        sample(
            "John",
            "Doe",
            "United States",
            "New York",
            "john.doe@example.com",
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        ),
        sample(
            "Jane",
            "Smith",
            "Canada",
            "Toronto",
            "jane.smith@example.com",
            "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
        ),
        sample(
            "Ahmed",
            "Hassan",
            "Egypt",
            "Cairo",
            "ahmed.hassan@example.com",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
        ),
        sample(
            "Maria",
            "Garcia",
            "Spain",
            "Madrid",
            "maria.garcia@example.com",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
        ),
    ]
}

/// Insert the sample users unless the directory already has entries.
///
/// A failing insert is logged and counted; the remaining samples are still
/// attempted.
pub async fn seed_if_empty(repo: &dyn UserRepository) -> Result<SeedReport> {
    let existing = repo.count().await?;
    if existing > 0 {
        info!(existing, "Directory already populated, skipping seed");
        return Ok(SeedReport {
            existing,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport::default();
    for user in sample_users() {
        let email = user.email.clone();
        match repo.create(user).await {
            Ok(created) => {
                info!(id = created.id, email = %created.email, "Created sample user");
                report.created += 1;
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Failed to create sample user");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Delete everything, then seed
pub async fn reset(repo: &dyn UserRepository) -> Result<SeedReport> {
    let removed = repo.clear().await?;
    info!(removed, "Cleared directory");
    seed_if_empty(repo).await
}
