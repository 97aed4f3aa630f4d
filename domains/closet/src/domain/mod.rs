//! Domain layer for the Closet domain

pub mod entities;
pub mod notifications;
