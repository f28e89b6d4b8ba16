//! Cisco IOS command syntax and output parsing.
//!
//! Every function here is pure: builders return the exact command text sent to
//! the switch, parsers take the text the switch printed back. The filters
//! (`| i ...`) are part of the contract, since the parsers rely on the device
//! having already narrowed the output down.

pub mod cdp;
pub mod mac_table;
pub mod port_channel;
pub mod prompt;

mod parse;

pub use parse::ParseError;
