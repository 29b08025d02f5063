mod client;
mod config;
mod error;
mod models;

pub use client::SpotifyProvider;
pub use config::SpotifyConfig;
pub use error::{SpotifyError, SpotifyResult};
