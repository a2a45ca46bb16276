pub mod content;
pub mod progress;
pub mod results;
pub mod users;

/// Alias for "anything that can run a SQLite query": the pool for
/// standalone reads, `&mut *tx` inside a transaction.
pub trait SqliteExec<'e>: sqlx::Executor<'e, Database = sqlx::Sqlite> {}

impl<'e, T> SqliteExec<'e> for T where T: sqlx::Executor<'e, Database = sqlx::Sqlite> {}
