// src/models/mod.rs

pub mod account;
pub mod post;
pub mod session;
pub mod view;

/// Whether a sqlx error is a UNIQUE violation on the given `table.column`.
///
/// The upsert idiom absorbs collisions on its conflict target; violations on
/// any *other* unique column surface as errors and are classified here.
pub(crate) fn is_unique_violation(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .message()
            .contains(&format!("UNIQUE constraint failed: {column}")),
        _ => false,
    }
}
