//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the table, the
//! DTOs used to write it, and any client-facing projection.

pub mod session;
pub mod user;
