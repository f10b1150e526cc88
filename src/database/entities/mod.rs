pub mod projects;
pub mod tasks;
pub mod tenants;
pub mod users;
