//! Personal access token endpoints.

pub mod client;
pub mod models;

pub use client::TokenClient;
pub use models::{CreatedToken, PublicTokenInfo};
