// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut PgConnection` taken
// from a transaction. Functions that issue more than one statement take the
// connection directly.

pub mod auth;
pub mod course;
pub mod problem;
pub mod submission;
pub mod test_result;
pub mod user;
