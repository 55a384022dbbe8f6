// One module per resource; each handler extracts, validates and delegates to a repository.
pub mod applications;
pub mod organizations;
pub mod postings;
pub mod users;
