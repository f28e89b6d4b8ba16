//! # Topology Resolution
//!
//! Answers "is there another switch behind this port, and how do I reach it?"
//! using CDP. Port-channels are resolved to one of their member links first,
//! since the bundle itself never shows up as a CDP local interface.

use mactrace_common::network::{device::NeighborInfo, interface::InterfaceRef};
use mactrace_protocols::{ParseError, cdp, port_channel};
use tracing::debug;

use crate::error::SearchError;
use crate::session::{self, DeviceSession};

/// Queries CDP for a switch or router on `interface`.
///
/// Returns an empty [`NeighborInfo`] when only end hosts are connected. When
/// a neighbor exists, each detail field that cannot be read is left empty on
/// its own instead of failing the lookup.
pub async fn neighbor_on(
    session: &mut dyn DeviceSession,
    interface: &InterfaceRef,
) -> Result<NeighborInfo, SearchError> {
    let summary: String =
        session::run_command(session, &cdp::switch_summary_command(interface)).await?;
    if !cdp::has_switch_neighbor(&summary) {
        return Ok(NeighborInfo::none());
    }

    let id_output: String =
        session::run_command(session, &cdp::device_id_command(interface)).await?;
    let address_output: String =
        session::run_command(session, &cdp::address_command(interface)).await?;

    Ok(NeighborInfo {
        device_id: optional_field(cdp::parse_device_id(&id_output), "device id", interface),
        address: optional_field(cdp::parse_address(&address_output), "address", interface),
    })
}

/// Picks the member link of a port-channel to probe for CDP.
pub async fn resolve_aggregation_member(
    session: &mut dyn DeviceSession,
    port_channel: &InterfaceRef,
) -> Result<InterfaceRef, SearchError> {
    let output: String =
        session::run_command(session, &port_channel::members_command(port_channel)).await?;

    port_channel::parse_member(&output).map_err(|e| {
        debug!(interface = %port_channel, "member list unreadable: {e}");
        SearchError::AggregationWithoutMembers {
            device: session.host().to_string(),
            interface: port_channel.to_string(),
        }
    })
}

fn optional_field(
    parsed: Result<String, ParseError>,
    field: &str,
    interface: &InterfaceRef,
) -> Option<String> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(%interface, "neighbor {field} unparsable: {e}");
            None
        }
    }
}
