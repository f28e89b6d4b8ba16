//! # Device Model
//!
//! The two records the traversal hands from one hop to the next: where to
//! connect ([`DeviceRef`]) and what CDP reported behind an interface
//! ([`NeighborInfo`]).

use std::fmt;

/// A device to open a session to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRef {
    /// Address or hostname used for the connection.
    pub host: String,
    /// CDP identity, when the device was reached through a neighbor.
    pub name: Option<String>,
}

impl DeviceRef {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim().to_string(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// The name shown to the user, falling back to the host.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if name != &self.host => write!(f, "{name} ({})", self.host),
            _ => f.write_str(&self.host),
        }
    }
}

/// Result of a CDP query on one interface.
///
/// Both fields absent means nothing switch-like answers on that port, so the
/// address lives on the segment itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborInfo {
    pub device_id: Option<String>,
    pub address: Option<String>,
}

impl NeighborInfo {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.device_id.is_none() && self.address.is_none()
    }

    /// The device to walk to next, if the neighbor reported an address.
    pub fn next_device(&self) -> Option<DeviceRef> {
        self.address
            .as_ref()
            .map(|address| DeviceRef::new(address.as_str()).with_name(self.device_id.clone()))
    }
}
