//! SkinLedger authentication API.
//!
//! Exposes config, state, error handling and routes so the binary and the
//! integration tests build the same application.

pub mod auth;
pub mod background;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
