//! Default user accounts, inserted on first startup.

use super::{queries, Database, DbError};

const DEFAULT_USERS: &[(&str, &str, &str, &str)] = &[
    ("1", "admin@college.edu", "Admin Organizer", "organizer"),
    ("2", "volunteer@college.edu", "John Volunteer", "volunteer"),
    ("3", "student@college.edu", "Jane Student", "participant"),
];

/// Insert the default users if the users table is empty. Safe to call on
/// every startup.
pub fn seed_initial_users(db: &Database) -> Result<(), DbError> {
    if queries::count_users(db)? > 0 {
        return Ok(());
    }

    for (id, email, name, role) in DEFAULT_USERS {
        queries::insert_user(
            db,
            &queries::UserRow {
                id: id.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                role: role.to_string(),
            },
        )?;
    }

    tracing::info!("seeded {} default users", DEFAULT_USERS.len());
    Ok(())
}
