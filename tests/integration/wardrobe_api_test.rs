//! API endpoint integration tests
//!
//! Tests for the wardrobe and outfit endpoints over in-memory collaborators.

#![allow(dead_code)]

mod auth;
mod common;
mod outfits;
mod wardrobe;
