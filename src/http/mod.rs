//! HTTP client module
//!
//! Thin wrapper over `reqwest` shared by the transfer source and the notifier.
//!
//! # Features
//!
//! - **Base URL joining**: Relative paths resolve against a configured base
//! - **Default headers**: API keys attached once at construction
//! - **TLS toggle**: Certificate verification can be switched off explicitly
//!
//! Status codes are not interpreted here. Callers decide what a 429 or a
//! 5xx means for them.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};

#[cfg(test)]
mod tests;
