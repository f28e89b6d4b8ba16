//! Shared models for `mactrace`.
//!
//! Everything in here is free of network IO: the hardware address codec, the
//! device/interface references the search engine passes around, runtime
//! configuration and the credentials file format.

pub mod config;
pub mod credentials;
pub mod network;
