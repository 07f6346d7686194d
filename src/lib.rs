//! mssh - Message Stream Shell.
//!
//! This library exposes the core modules for use in integration tests.

pub mod commands;
pub mod config;
pub mod element;
pub mod error;
pub mod persistence;
pub mod session;
pub mod shortcuts;
pub mod transport;
