//! Interactive prompts for the starting device and the MAC address.

use anyhow::bail;
use console::Term;
use mactrace_common::network::device::DeviceRef;
use mactrace_common::network::mac::{self, AddressError, HardwareAddress};

use crate::terminal::print;

const DEVICE_QUESTION: &str =
    "Input device hostname or IP address to start looking for a MAC address: ";
const MAC_QUESTION: &str =
    "Type in MAC address you want to search for (must be 12 hexadecimal characters): ";
const RETRY_HINT: &str = "Input a valid MAC address...";

fn ask(question: &str) -> anyhow::Result<String> {
    let term = Term::stdout();
    term.write_str(&format!("\r\n{question}"))?;
    let answer: String = term.read_line()?;

    // Off a terminal an empty read means stdin is exhausted.
    if answer.is_empty() && !term.is_term() {
        bail!("input closed before an answer was given");
    }
    Ok(answer.trim().to_string())
}

pub fn ask_device(preset: Option<&str>) -> anyhow::Result<DeviceRef> {
    if let Some(host) = preset.filter(|host| !host.trim().is_empty()) {
        return Ok(DeviceRef::new(host));
    }
    loop {
        let host: String = ask(DEVICE_QUESTION)?;
        if !host.is_empty() {
            return Ok(DeviceRef::new(host));
        }
    }
}

/// Asks until the input is a valid MAC address. An invalid preset falls
/// through to the prompt.
pub fn ask_address(preset: Option<&str>) -> anyhow::Result<HardwareAddress> {
    read_address(
        preset,
        || ask(MAC_QUESTION),
        |problem| {
            print::failure(problem);
            print::print_status(RETRY_HINT);
        },
    )
}

fn read_address(
    preset: Option<&str>,
    mut next_line: impl FnMut() -> anyhow::Result<String>,
    mut reject: impl FnMut(AddressError),
) -> anyhow::Result<HardwareAddress> {
    let mut candidate: Option<String> = preset.map(str::to_string);

    loop {
        let input: String = match candidate.take() {
            Some(preset) => preset,
            None => next_line()?,
        };

        match mac::canonicalize(&input) {
            Ok(address) => return Ok(address),
            Err(problem) => reject(problem),
        }
    }
}
