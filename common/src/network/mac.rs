//! # Hardware Address Codec
//!
//! Validates user supplied MAC addresses and converts them into the dotted
//! notation used by the switch address tables (`aabb.ccdd.eeff`).
//!
//! Accepted delimiters are `.`, `-`, `:` and space, in any position. The
//! pipeline is always characters -> length -> canonicalize; the two validators
//! are pure predicates so an interactive caller can loop on them.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::util::MacAddr;
use thiserror::Error;

const DELIMITERS: [char; 4] = ['.', '-', ':', ' '];
const HEX_DIGITS: usize = 12;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum AddressError {
    #[error("Invalid character detected")]
    InvalidCharacter,
    #[error("MAC address is not the correct length")]
    InvalidLength { found: usize },
}

/// A validated 48-bit hardware address.
///
/// `Display` renders the canonical dotted form, which is also the exact
/// string matched against `show mac address-table` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddress(MacAddr);

impl HardwareAddress {
    pub fn octets(&self) -> [u8; 6] {
        let MacAddr(a, b, c, d, e, f) = self.0;
        [a, b, c, d, e, f]
    }

    /// Colon separated form (`aa:bb:cc:dd:ee:ff`).
    pub fn to_colon_string(&self) -> String {
        self.0.to_string()
    }

    /// Identify the vendor of the address from its OUI prefix.
    pub fn vendor(&self) -> Option<String> {
        let db = get_oui_db().as_ref()?;
        match db.lookup_by_mac(&self.to_colon_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets();
        write!(f, "{a:02x}{b:02x}.{c:02x}{d:02x}.{e:02x}{g:02x}")
    }
}

impl FromStr for HardwareAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize(s)
    }
}

/// Retrieves or initializes the **Organizationally unique identifier** database.
fn get_oui_db() -> &'static Option<Oui> {
    OUI_DB.get_or_init(|| Oui::default().ok())
}

fn strip_delimiters(input: &str) -> String {
    input.chars().filter(|c| !DELIMITERS.contains(c)).collect()
}

/// Returns `true` when the input, minus delimiters, is made of hex digits only.
pub fn validate_characters(input: &str) -> bool {
    let stripped: String = strip_delimiters(input);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns `true` when exactly 12 characters remain after removing delimiters.
pub fn validate_length(input: &str) -> bool {
    strip_delimiters(input).chars().count() == HEX_DIGITS
}

/// Runs both validators, in order, and builds the address.
///
/// Unvalidated input is rejected with the first failing check instead of
/// being formatted.
pub fn canonicalize(input: &str) -> Result<HardwareAddress, AddressError> {
    if !validate_characters(input) {
        return Err(AddressError::InvalidCharacter);
    }
    let stripped: String = strip_delimiters(input);
    if !validate_length(input) {
        return Err(AddressError::InvalidLength {
            found: stripped.chars().count(),
        });
    }

    let value: u64 =
        u64::from_str_radix(&stripped, 16).map_err(|_| AddressError::InvalidCharacter)?;
    let bytes: [u8; 8] = value.to_be_bytes();

    Ok(HardwareAddress(MacAddr::new(
        bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    )))
}
