use std::time::Instant;

use anyhow::Context;
use colored::*;

use mactrace_common::config::Config;
use mactrace_common::credentials::Credentials;
use mactrace_common::network::device::DeviceRef;
use mactrace_common::network::mac::HardwareAddress;
use mactrace_core::error::SearchError;
use mactrace_core::network::ssh::SshConnector;
use mactrace_core::search::{Location, SearchEngine, SearchEvent};

use crate::commands::CommandLine;
use crate::terminal::{colors, input, print, spinner};

/// Runs one interactive trace. Returns whether the address was located.
pub async fn trace(args: &CommandLine, cfg: &Config) -> anyhow::Result<bool> {
    let credentials: Credentials = Credentials::load(&args.credentials)
        .with_context(|| format!("loading credentials from {}", args.credentials.display()))?;

    let start: DeviceRef = input::ask_device(args.device.as_deref())?;
    let address: HardwareAddress = input::ask_address(args.mac.as_deref())?;

    print::header("starting trace", cfg.quiet);
    print::print_status(format!(
        "Searching for MAC address {}, standby...",
        address.to_string().color(colors::MAC_ADDR)
    ));
    if let Some(vendor) = address.vendor() {
        print::print_status(format!("Vendor: {vendor}"));
    }

    let quiet: u8 = cfg.quiet;
    let engine = SearchEngine::new(Box::new(SshConnector::new(credentials, cfg)))
        .with_max_hops(cfg.max_hops)
        .on_event(move |event| report_progress(event, quiet));

    let start_time: Instant = Instant::now();
    spinner::start(format!("Connecting to {start}..."));
    let outcome: Result<Location, SearchError> = engine.run(start, &address).await;
    spinner::finish();

    match outcome {
        Ok(location) => {
            print_location(&location, &address, cfg);
            print::print_status(format!(
                "Trace finished in {:.2}s",
                start_time.elapsed().as_secs_f64()
            ));
            Ok(true)
        }
        Err(e) => {
            print_failure(&e);
            Ok(false)
        }
    }
}

fn report_progress(event: &SearchEvent, quiet: u8) {
    match event {
        SearchEvent::Connecting { device } => {
            spinner::set_message(format!("Connecting to {device}..."));
        }
        SearchEvent::AddressLearned { device, interface } if quiet < 2 => {
            print::print_status(format!(
                "{} learned the address on {}",
                device.display_name().color(colors::DEVICE),
                interface.to_string().color(colors::INTERFACE)
            ));
        }
        SearchEvent::AggregationMember {
            port_channel,
            member,
        } if quiet < 2 => {
            print::print_status(format!(
                "{port_channel} is a port-channel, checking member {member} for a neighbor"
            ));
        }
        SearchEvent::CheckingInterface { interface } if quiet < 2 => {
            print::print_status(format!("Checking interface {interface} for more info"));
        }
        SearchEvent::Advancing { next } if quiet < 2 => {
            print::print_status(format!(
                "Address is not on current device, will check on {}...",
                next.display_name().color(colors::DEVICE)
            ));
        }
        _ => {}
    }
}

fn print_location(location: &Location, address: &HardwareAddress, cfg: &Config) {
    print::header("address located", cfg.quiet);
    print::success(format!(
        "MAC address {} is on device {} attached to interface {}",
        address.to_string().color(colors::MAC_ADDR),
        location.device.display_name().color(colors::DEVICE).bold(),
        location.interface.to_string().color(colors::INTERFACE).bold()
    ));

    if cfg.quiet > 0 {
        return;
    }

    print::fat_separator();
    for (idx, hop) in location.path.iter().enumerate() {
        print::tree_head(idx, hop.device.display_name());
        let mut details: Vec<(String, ColoredString)> = vec![(
            String::from("Host"),
            hop.device.host.color(colors::TEXT_DEFAULT),
        )];
        details.push((
            String::from("Port"),
            hop.interface.to_string().color(colors::INTERFACE),
        ));
        print::as_tree_one_level(details);
    }
}

fn print_failure(error: &SearchError) {
    match error {
        SearchError::AddressNotFound { device, .. } => {
            print::failure(format!(
                "Address not detected on {device}, try again later or make sure correct MAC address has been entered"
            ));
            print::note(
                "This does not mean the device is not plugged in. It just means the switch has not seen the device yet or in the recent past",
            );
        }
        other => print::failure(other),
    }
}
