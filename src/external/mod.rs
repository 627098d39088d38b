//! Outbound HTTP plumbing shared by every provider adapter

pub mod client;
pub mod response;

pub use client::HTTP_CLIENT;
