//! The MAC tracing engine.
//!
//! [`search::SearchEngine`] walks switch to switch: it asks the current device
//! where it learned the address ([`locator`]), checks whether a switch sits
//! behind that port ([`topology`]) and either stops there or moves on to the
//! neighbor. Device access goes through the [`session`] traits; the SSH
//! implementation lives in [`network::ssh`].

pub mod error;
pub mod locator;
pub mod network;
pub mod search;
pub mod session;
pub mod topology;
