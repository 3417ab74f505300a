// Database access: trait seam plus the PostgreSQL driver
pub mod adapter;
pub mod postgresql;

pub use adapter::{Database, DbError, Session};
pub use postgresql::PostgresDatabase;
