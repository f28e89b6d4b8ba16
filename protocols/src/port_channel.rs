//! EtherChannel member lookup.

use mactrace_common::network::interface::InterfaceRef;

use crate::parse::{self, ParseError};

pub const MEMBERS_LABEL: &str = "Members";

pub fn members_command(port_channel: &InterfaceRef) -> String {
    format!("show interface {port_channel} | i {MEMBERS_LABEL}")
}

/// Picks the last listed member as the link to probe for CDP.
pub fn parse_member(output: &str) -> Result<InterfaceRef, ParseError> {
    let line: &str = parse::first_line_with(output, MEMBERS_LABEL)?;
    let member: &str = parse::last_token(line, "channel:")?;
    Ok(InterfaceRef::new(member))
}
