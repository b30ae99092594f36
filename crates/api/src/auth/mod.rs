//! Token validation for the authenticated write path.
//!
//! Credential management and login live in an external session
//! provider; this service only validates the bearer tokens it issues.

pub mod jwt;
