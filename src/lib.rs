//! Library crate for replay-trivia, exposing modules for binaries and tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod provider;
pub mod routes;
pub mod services;
pub mod state;
