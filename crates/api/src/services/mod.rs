//! Business logic behind the HTTP handlers. Handlers stay thin: they extract,
//! delegate here, and shape the response.

pub mod auth;
