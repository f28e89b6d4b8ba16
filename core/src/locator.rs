//! Finds the local port a hardware address was learned on.

use mactrace_common::network::{interface::InterfaceRef, mac::HardwareAddress};
use mactrace_protocols::{ParseError, mac_table};

use crate::error::SearchError;
use crate::session::{self, DeviceSession};

/// Looks the address up in the device's address table.
///
/// A table without the address is [`SearchError::AddressNotFound`]; a row
/// that cannot be read is reported separately.
pub async fn locate(
    session: &mut dyn DeviceSession,
    address: &HardwareAddress,
) -> Result<InterfaceRef, SearchError> {
    let command: String = mac_table::lookup_command(address);
    let output: String = session::run_command(session, &command).await?;

    mac_table::parse_interface(&output, address).map_err(|e| match e {
        ParseError::NoMatchingLine(_) => SearchError::AddressNotFound {
            address: *address,
            device: session.host().to_string(),
        },
        source => SearchError::UnexpectedOutput {
            device: session.host().to_string(),
            command,
            source,
        },
    })
}
