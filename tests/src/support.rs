//! Simulated switches that answer the way IOS does.
//!
//! Each fake renders the full `show` output and then applies the `| i` filter
//! line by line, so the parsers see exactly what a real device would send.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mactrace_common::network::device::DeviceRef;
use mactrace_core::error::SessionError;
use mactrace_core::session::{DeviceSession, SessionConnector};

const INCLUDE: &str = " | i ";

pub type Journal = Arc<Mutex<Vec<String>>>;

pub struct CdpEntry {
    pub local_port: String,
    pub device_id: String,
    pub capabilities: String,
    pub address: Option<String>,
}

#[derive(Default)]
pub struct FakeSwitch {
    pub name: String,
    pub user_mode: bool,
    pub mac_table: Vec<(u16, String, String)>,
    pub cdp: Vec<CdpEntry>,
    pub channels: HashMap<String, Vec<String>>,
}

impl FakeSwitch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn user_mode(mut self) -> Self {
        self.user_mode = true;
        self
    }

    pub fn learned(mut self, vlan: u16, mac: &str, port: &str) -> Self {
        self.mac_table.push((vlan, mac.to_string(), port.to_string()));
        self
    }

    pub fn switch_neighbor(mut self, local_port: &str, device_id: &str, address: &str) -> Self {
        self.cdp.push(CdpEntry {
            local_port: local_port.to_string(),
            device_id: device_id.to_string(),
            capabilities: String::from("R S I"),
            address: Some(address.to_string()),
        });
        self
    }

    pub fn phone(mut self, local_port: &str, device_id: &str) -> Self {
        self.cdp.push(CdpEntry {
            local_port: local_port.to_string(),
            device_id: device_id.to_string(),
            capabilities: String::from("H P M"),
            address: Some(String::from("10.99.0.10")),
        });
        self
    }

    pub fn channel(mut self, port_channel: &str, members: &[&str]) -> Self {
        self.channels.insert(
            port_channel.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    fn respond(&self, command: &str) -> String {
        let (base, filter) = match command.split_once(INCLUDE) {
            Some((base, filter)) => (base.trim(), Some(filter.trim())),
            None => (command.trim(), None),
        };

        let full: String = self.render(base);
        match filter {
            Some(pattern) => full
                .lines()
                .filter(|line| line.contains(pattern))
                .collect::<Vec<&str>>()
                .join("\n"),
            None => full,
        }
    }

    fn render(&self, base: &str) -> String {
        if base == "show mac address-table" {
            return self.render_mac_table();
        }
        if let Some(port) = base.strip_prefix("show cdp neighbors ") {
            return match port.strip_suffix(" det") {
                Some(port) => self.render_cdp_detail(port),
                None => self.render_cdp_summary(port),
            };
        }
        if let Some(port) = base.strip_prefix("show interface ") {
            return self.render_interface(port);
        }
        String::new()
    }

    fn render_mac_table(&self) -> String {
        let mut out = String::from(
            "          Mac Address Table\n-------------------------------------------\n\n\
             Vlan    Mac Address       Type        Ports\n\
             ----    -----------       --------    -----\n",
        );
        for (vlan, mac, port) in &self.mac_table {
            out.push_str(&format!(" {vlan:>3}    {mac}    DYNAMIC     {port}\n"));
        }
        out.push_str(&format!(
            "Total Mac Addresses for this criterion: {}\n",
            self.mac_table.len()
        ));
        out
    }

    fn render_cdp_summary(&self, port: &str) -> String {
        let mut out = String::from(
            "Capability Codes: R - Router, T - Trans Bridge, B - Source Route Bridge\n\
             \x20                 S - Switch, H - Host, I - IGMP, r - Repeater, P - Phone,\n\
             \x20                 D - Remote, C - CVTA, M - Two-port Mac Relay\n\n\
             Device ID        Local Intrfce     Holdtme    Capability  Platform  Port ID\n",
        );
        for entry in self.cdp.iter().filter(|e| e.local_port == port) {
            out.push_str(&format!(
                "{:<16} {:<17} 150        {:<11} WS-C3850  Gig 1/0/48\n",
                entry.device_id, entry.local_port, entry.capabilities
            ));
        }
        out.push_str("\nTotal cdp entries displayed : 1\n");
        out
    }

    fn render_cdp_detail(&self, port: &str) -> String {
        let mut out = String::new();
        for entry in self.cdp.iter().filter(|e| e.local_port == port) {
            out.push_str("-------------------------\n");
            out.push_str(&format!("Device ID: {}\n", entry.device_id));
            out.push_str("Entry address(es): \n");
            if let Some(address) = &entry.address {
                out.push_str(&format!("  IP address: {address}\n"));
            }
            out.push_str("Platform: cisco WS-C3850-48P,  Capabilities: Switch IGMP \n");
            out.push_str(&format!(
                "Interface: {},  Port ID (outgoing port): GigabitEthernet1/0/48\n",
                entry.local_port
            ));
            out.push_str("Holdtime : 150 sec\n\nManagement address(es): \n");
            if let Some(address) = &entry.address {
                out.push_str(&format!("  IP address: {address}\n"));
            }
        }
        out
    }

    fn render_interface(&self, port: &str) -> String {
        let mut out = format!(
            "{port} is up, line protocol is up (connected)\n  Hardware is EtherChannel, address is 00aa.bbcc.dd01\n  MTU 1500 bytes, BW 2000000 Kbit/sec\n"
        );
        if let Some(members) = self.channels.get(port) {
            out.push_str(&format!(
                "  Members in this channel: {} \n",
                members.join(" ")
            ));
        }
        out.push_str("  ARP type: ARPA, ARP Timeout 04:00:00\n");
        out
    }
}

#[derive(Default)]
pub struct FakeNetwork {
    switches: HashMap<String, Arc<FakeSwitch>>,
    pub journal: Journal,
}

impl FakeNetwork {
    pub fn with(mut self, host: &str, switch: FakeSwitch) -> Self {
        self.switches.insert(host.to_string(), Arc::new(switch));
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

#[async_trait]
impl SessionConnector for FakeNetwork {
    async fn open(&self, device: &DeviceRef) -> Result<Box<dyn DeviceSession>, SessionError> {
        record(&self.journal, format!("{} open", device.host));
        let switch = self
            .switches
            .get(&device.host)
            .cloned()
            .ok_or_else(|| SessionError::Connect {
                host: device.host.clone(),
                reason: String::from("connection timed out"),
            })?;

        let prompt = if switch.user_mode {
            format!("{}>", switch.name)
        } else {
            format!("{}#", switch.name)
        };
        Ok(Box::new(FakeSession {
            host: device.host.clone(),
            switch,
            prompt,
            journal: self.journal.clone(),
        }))
    }
}

struct FakeSession {
    host: String,
    switch: Arc<FakeSwitch>,
    prompt: String,
    journal: Journal,
}

#[async_trait]
impl DeviceSession for FakeSession {
    fn host(&self) -> &str {
        &self.host
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        record(&self.journal, format!("{} run {command}", self.host));
        Ok(self.switch.respond(command))
    }

    async fn escalate_privilege(&mut self) -> Result<(), SessionError> {
        record(&self.journal, format!("{} enable", self.host));
        self.prompt = format!("{}#", self.switch.name);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        record(&self.journal, format!("{} close", self.host));
        Ok(())
    }
}

fn record(journal: &Journal, entry: String) {
    journal.lock().unwrap().push(entry);
}

pub fn count(journal: &Journal, entry: &str) -> usize {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.as_str() == entry)
        .count()
}
