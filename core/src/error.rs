use mactrace_common::network::mac::HardwareAddress;
use mactrace_protocols::ParseError;
use thiserror::Error;

/// Failures of the command channel to a single device.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {host}: {reason}")]
    Connect { host: String, reason: String },
    #[error("authentication rejected by {host}")]
    Authentication { host: String },
    #[error("could not enter privileged mode on {host}: {reason}")]
    PrivilegeEscalation { host: String, reason: String },
    #[error("timed out on {host} waiting for `{command}`")]
    Timeout { host: String, command: String },
    #[error("channel error on {host}: {reason}")]
    Channel { host: String, reason: String },
    #[error("{host} closed the session")]
    Closed { host: String },
    #[error("neighbor {neighbor} did not report a reachable address")]
    MissingAddress { neighbor: String },
}

/// Terminal outcomes of a search that did not locate the address.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("could not open a session to {device}: {source}")]
    Connection {
        device: String,
        #[source]
        source: SessionError,
    },
    #[error("{address} is not in the address table of {device}")]
    AddressNotFound {
        address: HardwareAddress,
        device: String,
    },
    #[error("port-channel {interface} on {device} lists no member links")]
    AggregationWithoutMembers { device: String, interface: String },
    #[error("unexpected output from `{command}` on {device}: {source}")]
    UnexpectedOutput {
        device: String,
        command: String,
        #[source]
        source: ParseError,
    },
    #[error("command failed on {device}: {source}")]
    Command {
        device: String,
        #[source]
        source: SessionError,
    },
    #[error("gave up after visiting {hops} devices")]
    HopLimitExceeded { hops: usize },
}
