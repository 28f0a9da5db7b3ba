//! Domain logic for the SkinLedger authentication core.
//!
//! Everything in this crate is pure: no database handles, no HTTP types.
//! The `db` and `api` crates build on these rules.

pub mod credentials;
pub mod error;
pub mod hashing;
pub mod lockout;
pub mod types;
