pub mod executor;
pub mod manager;
pub mod models;
pub mod organizations;
pub mod postings;
pub mod rows;
pub mod users;

pub use executor::{DbRow, Executor, PgExecutor};
pub use manager::{DatabaseError, DatabaseManager};
pub use organizations::OrganizationRepository;
pub use postings::PostingRepository;
pub use users::UserRepository;
