//! Instance profile endpoints.

pub mod client;
pub mod models;

pub use client::ProfilesClient;
pub use models::InstanceProfile;
