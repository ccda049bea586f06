//! High-level Rust client for ZSA's Keymapp gRPC API.
//!
//! The recommended API surface is:
//! - [`KeymappClient`] for RPC operations
//! - [`Rgb`] for LED colors
//! - [`KeymappEndpoint`] and [`ConnectOptions`] for choosing where and how to connect
//! - [`transport`] for the gRPC adapter and the [`transport::KeyboardService`] seam
//!
//! [`proto`] exposes raw generated protobuf types for advanced use cases.

mod client;
mod color;
mod endpoint;
/// Raw generated protobuf and gRPC types used by the Keymapp API.
pub mod proto;
mod protocol;
#[cfg(feature = "python")]
mod python;
/// Transport adapters for reaching a Keymapp daemon.
pub mod transport;

/// Errors returned by high-level client operations.
pub use client::{ClientError, KeymappClient, KeymappStatus, LedError};
/// LED color value accepted by the lighting APIs.
pub use color::{ColorParseError, Rgb};
/// Endpoint selection and connection settings.
pub use endpoint::{
    CONFIG_DIR_ENV, ConnectOptions, DEFAULT_WINDOWS_ADDRESS, KeymappEndpoint, Platform,
    default_endpoint, default_endpoint_for,
};
/// Success-flag normalization shared by every mutating call.
pub use protocol::{SuccessReply, expect_success};
