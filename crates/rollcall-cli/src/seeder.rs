//! Fake data for development.
//!
//! Seeded accounts all use [`SEED_EMAIL_DOMAIN`], so [`clear_seeded_data`]
//! can remove them (and, through the foreign keys, their subjects, enrollments
//! and sessions) without touching real accounts.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use rollcall_core::{Role, hash_password_with_cost};
use rollcall_db::Store;
use rollcall_models::{Account, NewAccount, Subject};

pub const SEED_EMAIL_DOMAIN: &str = "seed.rollcall.test";

/// Password of every seeded account.
pub const SEED_PASSWORD: &str = "password123";

const SUBJECT_NAMES: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Computer Science",
    "Economics",
    "Art",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub subjects_per_teacher: usize,
    pub enrollments_per_student: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 5,
            students: 30,
            subjects_per_teacher: 2,
            enrollments_per_student: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub teachers: usize,
    pub students: usize,
    pub subjects: usize,
    pub enrollments: usize,
}

/// Fake accounts of one role sharing `password_hash`.
pub fn generate_accounts(role: Role, count: usize, password_hash: &str) -> Vec<NewAccount> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+{}{}@{}",
                first_name.to_lowercase().replace(' ', ""),
                last_name.to_lowercase().replace(' ', ""),
                role.as_str(),
                idx,
                SEED_EMAIL_DOMAIN
            );

            NewAccount {
                email,
                password_hash: password_hash.to_string(),
                name: format!("{first_name} {last_name}"),
                role,
            }
        })
        .collect()
}

/// Subject names for the teacher at `teacher_idx`. Names stay distinct across
/// teachers.
pub fn subject_names(teacher_idx: usize, count: usize) -> Vec<String> {
    (0..count)
        .map(|n| {
            let slot = teacher_idx * count + n;
            let base = SUBJECT_NAMES[slot % SUBJECT_NAMES.len()];
            format!("{} {}", base, slot / SUBJECT_NAMES.len() + 1)
        })
        .collect()
}

async fn insert_accounts(store: &Store, accounts: Vec<NewAccount>) -> anyhow::Result<Vec<Account>> {
    let mut inserted = Vec::with_capacity(accounts.len());
    for account in accounts {
        inserted.push(store.accounts.insert_hashed(account).await?);
    }
    Ok(inserted)
}

pub async fn seed_all(store: &Store, config: &SeedConfig) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} teachers and {} students...",
        config.teachers, config.students
    );

    let cost = store.accounts.hash_cost();
    let password_hash = tokio::task::spawn_blocking(move || {
        hash_password_with_cost(SEED_PASSWORD, cost).map_err(|e| e.error)
    })
    .await??;

    let teachers = insert_accounts(
        store,
        generate_accounts(Role::Teacher, config.teachers, &password_hash),
    )
    .await?;
    let students = insert_accounts(
        store,
        generate_accounts(Role::Student, config.students, &password_hash),
    )
    .await?;

    let mut subjects: Vec<Subject> = Vec::new();
    for (idx, teacher) in teachers.iter().enumerate() {
        for name in subject_names(idx, config.subjects_per_teacher) {
            subjects.push(store.subjects.create(teacher.id, &name).await?);
        }
    }

    let mut enrollments = 0;
    if !subjects.is_empty() {
        let per_student = config.enrollments_per_student.min(subjects.len());
        for student in &students {
            let offset: usize = (0..subjects.len()).fake();
            for n in 0..per_student {
                let subject = &subjects[(offset + n) % subjects.len()];
                store.subjects.enroll(student.id, subject.id).await?;
                enrollments += 1;
            }
        }
    }

    let summary = SeedSummary {
        teachers: teachers.len(),
        students: students.len(),
        subjects: subjects.len(),
        enrollments,
    };
    tracing::info!(?summary, "Seed complete");
    println!(
        "✅ Seeded {} teachers, {} students, {} subjects, {} enrollments in {:.2?}",
        summary.teachers,
        summary.students,
        summary.subjects,
        summary.enrollments,
        start_time.elapsed()
    );
    println!("   Every seeded account signs in with password `{SEED_PASSWORD}`");

    Ok(summary)
}

/// Deletes every seeded account. Returns how many were removed.
pub async fn clear_seeded_data(store: &Store) -> anyhow::Result<u64> {
    println!("🗑️  Clearing seeded accounts (@{SEED_EMAIL_DOMAIN})...");
    let deleted = store.accounts.delete_by_email_domain(SEED_EMAIL_DOMAIN).await?;
    println!("✅ Removed {deleted} seeded accounts");
    Ok(deleted)
}
