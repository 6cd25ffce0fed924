//! Core types for the Inkline engagement engine.
//!
//! This crate is deliberately free of HTTP and async dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod account;
pub mod content;
pub mod engagement;
pub mod error;
pub mod limits;
pub mod moderation;
pub mod notify;
pub mod ranking;

pub use error::{Error, ErrorKind, Result};
