//! Shared utilities and common types for the device lending backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT claims carrying the caller identity
//! - Common validation logic

pub mod jwt;
pub mod validation;
