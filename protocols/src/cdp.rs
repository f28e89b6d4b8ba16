//! CDP neighbor queries.
//!
//! The summary query filters on the capability column: `S I` only matches
//! neighbors advertising both *Switch* and *IGMP*, which is how switches and
//! routers announce themselves while phones, APs and hosts do not.

use mactrace_common::network::interface::InterfaceRef;

use crate::parse::{self, ParseError};

pub const DEVICE_ID_LABEL: &str = "Device ID:";
pub const ADDRESS_LABEL: &str = "IP address:";

pub fn switch_summary_command(intf: &InterfaceRef) -> String {
    format!("show cdp neighbors {intf} | i S I")
}

pub fn device_id_command(intf: &InterfaceRef) -> String {
    format!("show cdp neighbors {intf} det | i {DEVICE_ID_LABEL}")
}

pub fn address_command(intf: &InterfaceRef) -> String {
    format!("show cdp neighbors {intf} det | i {ADDRESS_LABEL}")
}

/// Anything left after the capability filter is a switch or router.
pub fn has_switch_neighbor(summary: &str) -> bool {
    summary.lines().any(|line| !line.trim().is_empty())
}

pub fn parse_device_id(output: &str) -> Result<String, ParseError> {
    let line: &str = parse::first_line_with(output, DEVICE_ID_LABEL)?;
    Ok(parse::last_token(line, DEVICE_ID_LABEL)?.to_string())
}

/// Management address of the neighbor.
///
/// A neighbor may list several (`Entry address(es)` and `Management
/// address(es)`); the first one is used.
pub fn parse_address(output: &str) -> Result<String, ParseError> {
    let line: &str = parse::first_line_with(output, ADDRESS_LABEL)?;
    Ok(parse::last_token(line, ADDRESS_LABEL)?.to_string())
}
