pub mod nginx;
pub mod observability;
