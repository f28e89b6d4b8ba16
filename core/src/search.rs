//! # Search Engine
//!
//! The hop-by-hop walk from a starting switch to the port a hardware address
//! is attached to.
//!
//! Every iteration opens one session, asks the device where it learned the
//! address and looks for a CDP neighbor behind that port:
//!
//! * **Plain port without a switch neighbor**: the address is resolved here.
//! * **Plain port with a neighbor**: move on to the neighbor.
//! * **Port-channel**: probe a member link and move on to whatever it reports,
//!   without treating a missing neighbor as the end of the walk.
//!
//! The session is closed before the next device is contacted, on every path.

use std::mem;

use mactrace_common::config::DEFAULT_MAX_HOPS;
use mactrace_common::network::{
    device::{DeviceRef, NeighborInfo},
    interface::InterfaceRef,
    mac::HardwareAddress,
};
use tracing::{debug, info, warn};

use crate::error::{SearchError, SessionError};
use crate::session::{self, DeviceSession, SessionConnector};
use crate::{locator, topology};

/// One device visited during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub device: DeviceRef,
    /// Port the address was learned on at this device.
    pub interface: InterfaceRef,
}

/// Where the address was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub device: DeviceRef,
    pub interface: InterfaceRef,
    /// Every device visited, starting device first and the resolving one last.
    pub path: Vec<Hop>,
}

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Connecting { device: DeviceRef },
    AddressLearned { device: DeviceRef, interface: InterfaceRef },
    AggregationMember { port_channel: InterfaceRef, member: InterfaceRef },
    CheckingInterface { interface: InterfaceRef },
    Advancing { next: DeviceRef },
}

#[derive(Debug)]
pub enum SearchPhase {
    Searching,
    Resolved(Location),
    Failed(SearchError),
}

/// Mutable state of one run, owned by [`SearchEngine::run`].
#[derive(Debug)]
pub struct SearchState {
    pub continue_search: bool,
    pub current_device: DeviceRef,
    path: Vec<Hop>,
    phase: SearchPhase,
}

impl SearchState {
    pub fn new(start: DeviceRef) -> Self {
        Self {
            continue_search: true,
            current_device: start,
            path: Vec::new(),
            phase: SearchPhase::Searching,
        }
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn hops(&self) -> usize {
        self.path.len()
    }

    fn resolve(&mut self, interface: InterfaceRef) {
        self.phase = SearchPhase::Resolved(Location {
            device: self.current_device.clone(),
            interface,
            path: mem::take(&mut self.path),
        });
        self.continue_search = false;
    }

    fn fail(&mut self, error: SearchError) {
        self.phase = SearchPhase::Failed(error);
        self.continue_search = false;
    }

    fn advance(&mut self, next: DeviceRef) {
        self.current_device = next;
    }

    fn into_outcome(self) -> Result<Location, SearchError> {
        match self.phase {
            SearchPhase::Resolved(location) => Ok(location),
            SearchPhase::Failed(error) => Err(error),
            SearchPhase::Searching => unreachable!("search loop exited while still searching"),
        }
    }
}

/// Result of visiting one device.
enum Visit {
    Resolved(InterfaceRef),
    Advance(DeviceRef),
}

type EventCallback = Box<dyn Fn(&SearchEvent) + Send + Sync>;

pub struct SearchEngine {
    connector: Box<dyn SessionConnector>,
    max_hops: usize,
    on_event: Option<EventCallback>,
}

impl SearchEngine {
    pub fn new(connector: Box<dyn SessionConnector>) -> Self {
        Self {
            connector,
            max_hops: DEFAULT_MAX_HOPS,
            on_event: None,
        }
    }

    /// Caps the number of devices visited. A limit of 0 fails before the
    /// first connection.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn on_event(mut self, callback: impl Fn(&SearchEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// Walks from `start` until `address` is resolved or the walk fails.
    pub async fn run(
        &self,
        start: DeviceRef,
        address: &HardwareAddress,
    ) -> Result<Location, SearchError> {
        info!("Searching for MAC address {address} starting at {start}");
        let mut state = SearchState::new(start);

        while state.continue_search {
            if state.hops() >= self.max_hops {
                state.fail(SearchError::HopLimitExceeded {
                    hops: state.hops(),
                });
                break;
            }

            let device: DeviceRef = state.current_device.clone();
            match self.visit(&device, address, &mut state.path).await {
                Ok(Visit::Resolved(interface)) => state.resolve(interface),
                Ok(Visit::Advance(next)) => state.advance(next),
                Err(e) => state.fail(e),
            }
        }

        state.into_outcome()
    }

    /// Opens a session to `device`, inspects it and closes the session again.
    async fn visit(
        &self,
        device: &DeviceRef,
        address: &HardwareAddress,
        path: &mut Vec<Hop>,
    ) -> Result<Visit, SearchError> {
        self.emit(SearchEvent::Connecting {
            device: device.clone(),
        });

        let mut session: Box<dyn DeviceSession> =
            session::establish(self.connector.as_ref(), device)
                .await
                .map_err(|source| SearchError::Connection {
                    device: device.to_string(),
                    source,
                })?;

        let visit = self.inspect(session.as_mut(), device, address, path).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close session to {device}: {e}");
        }

        visit
    }

    async fn inspect(
        &self,
        session: &mut dyn DeviceSession,
        device: &DeviceRef,
        address: &HardwareAddress,
        path: &mut Vec<Hop>,
    ) -> Result<Visit, SearchError> {
        let interface: InterfaceRef = locator::locate(session, address).await?;
        debug!(%device, %interface, "address learned");

        path.push(Hop {
            device: device.clone(),
            interface: interface.clone(),
        });
        self.emit(SearchEvent::AddressLearned {
            device: device.clone(),
            interface: interface.clone(),
        });

        if interface.is_aggregation() {
            let member: InterfaceRef =
                topology::resolve_aggregation_member(session, &interface).await?;
            self.emit(SearchEvent::AggregationMember {
                port_channel: interface.clone(),
                member: member.clone(),
            });

            let neighbor: NeighborInfo = topology::neighbor_on(session, &member).await?;
            if neighbor.is_absent() {
                // Unlike a plain port this is not treated as the answer; the
                // walk tries to continue and fails on the missing address.
                warn!("No CDP neighbor on {member}, member of {interface} on {device}");
            }
            return self.advance_to(&neighbor);
        }

        let neighbor: NeighborInfo = topology::neighbor_on(session, &interface).await?;
        if neighbor.is_absent() {
            info!("Resolved {address} to {interface} on {device}");
            return Ok(Visit::Resolved(interface));
        }

        self.emit(SearchEvent::CheckingInterface {
            interface: interface.clone(),
        });
        self.advance_to(&neighbor)
    }

    fn advance_to(&self, neighbor: &NeighborInfo) -> Result<Visit, SearchError> {
        let Some(next) = neighbor.next_device() else {
            let name: String = neighbor
                .device_id
                .clone()
                .unwrap_or_else(|| String::from("unknown neighbor"));
            return Err(SearchError::Connection {
                device: name.clone(),
                source: SessionError::MissingAddress { neighbor: name },
            });
        };

        debug!(next = %next, "advancing");
        self.emit(SearchEvent::Advancing { next: next.clone() });
        Ok(Visit::Advance(next))
    }

    fn emit(&self, event: SearchEvent) {
        if let Some(callback) = &self.on_event {
            callback(&event);
        }
    }
}
