// src/models.rs

pub mod auth;
pub mod events;
pub mod guests;
pub mod rbac;
pub mod suppliers;
