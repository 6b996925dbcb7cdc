pub mod auth;
pub mod events;
pub mod guests;
pub mod members;
pub mod rbac;
pub mod suppliers;
