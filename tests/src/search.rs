use mactrace_common::network::device::DeviceRef;
use mactrace_common::network::mac::{self, HardwareAddress};
use mactrace_core::error::{SearchError, SessionError};
use mactrace_core::search::{Location, SearchEngine};

use crate::support::{FakeNetwork, FakeSwitch, Journal, count};

const TARGET: &str = "aabb.ccdd.eeff";

fn target() -> HardwareAddress {
    assert!(mac::validate_characters("AABB.CCDD.EEFF"));
    assert!(mac::validate_length("AABB.CCDD.EEFF"));
    let address = mac::canonicalize("AABB.CCDD.EEFF").unwrap();
    assert_eq!(address.to_string(), TARGET);
    address
}

async fn trace(network: FakeNetwork, start: &str) -> (Result<Location, SearchError>, Journal) {
    let journal = network.journal();
    let engine = SearchEngine::new(Box::new(network));
    let outcome = engine.run(DeviceRef::new(start), &target()).await;
    (outcome, journal)
}

fn opened_hosts(journal: &Journal) -> Vec<String> {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| e.strip_suffix(" open").map(str::to_string))
        .collect()
}

#[tokio::test]
async fn resolves_on_first_switch_without_neighbor() {
    let network = FakeNetwork::default().with(
        "10.0.0.1",
        FakeSwitch::new("SW1")
            .learned(10, "0011.2233.4455", "Gi1/0/9")
            .learned(10, TARGET, "Gi1/0/1"),
    );

    let (outcome, journal) = trace(network, "10.0.0.1").await;
    let location = outcome.unwrap();

    assert_eq!(location.device.host, "10.0.0.1");
    assert_eq!(location.device.display_name(), "10.0.0.1");
    assert_eq!(location.interface.name(), "Gi1/0/1");
    assert_eq!(count(&journal, "10.0.0.1 close"), 1);
}

#[tokio::test]
async fn port_channel_leads_to_next_switch() {
    let network = FakeNetwork::default()
        .with(
            "10.0.0.1",
            FakeSwitch::new("SW1")
                .learned(10, TARGET, "Po1")
                .channel("Po1", &["Gi1/0/23", "Gi1/0/24"])
                .switch_neighbor("Gi1/0/24", "SW2", "10.0.0.2"),
        )
        .with(
            "10.0.0.2",
            FakeSwitch::new("SW2").learned(10, TARGET, "Gi1/0/5"),
        );

    let (outcome, journal) = trace(network, "10.0.0.1").await;
    let location = outcome.unwrap();

    assert_eq!(opened_hosts(&journal), vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(location.device.display_name(), "SW2");
    assert_eq!(location.interface.name(), "Gi1/0/5");

    let entries = journal.lock().unwrap().clone();
    let members = entries
        .iter()
        .position(|e| e == "10.0.0.1 run show interface Po1 | i Members")
        .unwrap();
    let cdp = entries
        .iter()
        .position(|e| e.starts_with("10.0.0.1 run show cdp"))
        .unwrap();
    assert!(members < cdp);
}

#[tokio::test]
async fn second_hop_without_entry_is_not_found() {
    let network = FakeNetwork::default()
        .with(
            "10.0.0.1",
            FakeSwitch::new("SW1")
                .learned(10, TARGET, "Gi1/0/48")
                .switch_neighbor("Gi1/0/48", "SW2", "10.0.0.2"),
        )
        .with(
            "10.0.0.2",
            FakeSwitch::new("SW2").learned(10, "0011.2233.4455", "Gi1/0/3"),
        );

    let (outcome, journal) = trace(network, "10.0.0.1").await;

    match outcome {
        Err(SearchError::AddressNotFound { address, device }) => {
            assert_eq!(address.to_string(), TARGET);
            assert_eq!(device, "10.0.0.2");
        }
        other => panic!("expected AddressNotFound, got {other:?}"),
    }
    assert_eq!(count(&journal, "10.0.0.2 close"), 1);
    assert_eq!(count(&journal, "10.0.0.1 close"), 1);
}

#[tokio::test]
async fn phones_do_not_count_as_switches() {
    let network = FakeNetwork::default().with(
        "10.0.0.1",
        FakeSwitch::new("SW1")
            .learned(20, TARGET, "Gi1/0/12")
            .phone("Gi1/0/12", "SEP00AABBCCDDEE"),
    );

    let (outcome, journal) = trace(network, "10.0.0.1").await;
    let location = outcome.unwrap();

    assert_eq!(location.interface.name(), "Gi1/0/12");
    // The summary filter already rules the phone out; no detail queries follow.
    let details = journal
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.contains(" det "))
        .count();
    assert_eq!(details, 0);
}

#[tokio::test]
async fn walks_three_switches() {
    let network = FakeNetwork::default()
        .with(
            "10.0.0.1",
            FakeSwitch::new("CORE")
                .learned(10, TARGET, "Te1/1/1")
                .switch_neighbor("Te1/1/1", "DIST1", "10.0.1.1"),
        )
        .with(
            "10.0.1.1",
            FakeSwitch::new("DIST1")
                .learned(10, TARGET, "Po10")
                .channel("Po10", &["Gi1/0/47", "Gi1/0/48"])
                .switch_neighbor("Gi1/0/48", "ACC7", "10.0.2.7"),
        )
        .with(
            "10.0.2.7",
            FakeSwitch::new("ACC7").learned(10, TARGET, "Gi1/0/30"),
        );

    let (outcome, journal) = trace(network, "10.0.0.1").await;
    let location = outcome.unwrap();

    assert_eq!(location.device.display_name(), "ACC7");
    assert_eq!(location.interface.name(), "Gi1/0/30");
    let ports: Vec<&str> = location.path.iter().map(|hop| hop.interface.name()).collect();
    assert_eq!(ports, vec!["Te1/1/1", "Po10", "Gi1/0/30"]);

    let entries = journal.lock().unwrap();
    let opens = entries.iter().filter(|e| e.ends_with(" open")).count();
    let closes = entries.iter().filter(|e| e.ends_with(" close")).count();
    assert_eq!(opens, 3);
    assert_eq!(closes, 3);
}

#[tokio::test]
async fn unreachable_start_is_a_connection_error() {
    let (outcome, journal) = trace(FakeNetwork::default(), "192.0.2.1").await;

    assert!(matches!(
        outcome,
        Err(SearchError::Connection {
            source: SessionError::Connect { .. },
            ..
        })
    ));
    assert_eq!(opened_hosts(&journal), vec!["192.0.2.1"]);
}

#[tokio::test]
async fn user_mode_login_is_escalated_once() {
    let network = FakeNetwork::default().with(
        "10.0.0.1",
        FakeSwitch::new("SW1")
            .user_mode()
            .learned(10, TARGET, "Gi1/0/1"),
    );

    let (outcome, journal) = trace(network, "10.0.0.1").await;

    assert!(outcome.is_ok());
    assert_eq!(count(&journal, "10.0.0.1 enable"), 1);
    let entries = journal.lock().unwrap();
    assert_eq!(entries[1], "10.0.0.1 enable");
}
