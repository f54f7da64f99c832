//! Typed async client for the roombook REST API.
//!
//! One method per endpoint. Every failure is returned to the caller as an
//! [`Error`]; nothing is retried or swallowed here.

pub mod client;
pub mod error;
pub mod transport;

mod bookings;
mod rooms;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
