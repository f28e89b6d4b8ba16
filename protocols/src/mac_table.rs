//! `show mac address-table` lookups.

use mactrace_common::network::{interface::InterfaceRef, mac::HardwareAddress};

use crate::parse::{self, ParseError};

pub fn lookup_command(address: &HardwareAddress) -> String {
    format!("show mac address-table | i {address}")
}

/// Extracts the port an address was learned on.
///
/// IOS prints `VLAN  MAC  TYPE  PORTS`, so the port is the last column. When
/// the address shows up more than once the last row wins.
pub fn parse_interface(
    output: &str,
    address: &HardwareAddress,
) -> Result<InterfaceRef, ParseError> {
    let needle: String = address.to_string();
    let line: &str = parse::last_line_with(output, &needle)?;
    let port: &str = parse::last_token(line, &needle)?;
    Ok(InterfaceRef::new(port))
}
