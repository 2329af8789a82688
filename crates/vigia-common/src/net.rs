use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors produced by the gateway address transform.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    /// The address is not a dotted quad with an integer last octet, or
    /// the offset would leave the 0-255 octet range.
    #[error("invalid address format: {0}")]
    InvalidFormat(String),
}

/// Mapping between the stored endpoint address and the address actually
/// probed. Some deployments ping a secondary/gateway host whose last
/// octet sits one above or below the stored address.
///
/// `to_probe_address` and `to_stored_address` are inverses:
///
/// ```
/// use vigia_common::net::GatewayOffset;
///
/// let offset = GatewayOffset::PlusOne;
/// let probe = offset.to_probe_address("10.0.0.5").unwrap();
/// assert_eq!(probe, "10.0.0.6");
/// assert_eq!(offset.to_stored_address(&probe).unwrap(), "10.0.0.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatewayOffset {
    /// Probe the stored address itself.
    Identity,
    /// Probe last octet + 1.
    PlusOne,
    /// Probe last octet - 1.
    MinusOne,
}

impl Default for GatewayOffset {
    fn default() -> Self {
        Self::Identity
    }
}

impl FromStr for GatewayOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "plus-one" => Ok(Self::PlusOne),
            "minus-one" => Ok(Self::MinusOne),
            _ => Err(format!("unknown gateway offset: {s}")),
        }
    }
}

impl std::fmt::Display for GatewayOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::PlusOne => write!(f, "plus-one"),
            Self::MinusOne => write!(f, "minus-one"),
        }
    }
}

impl GatewayOffset {
    /// Maps a stored address to the address that should be probed.
    pub fn to_probe_address(&self, stored: &str) -> Result<String, AddressError> {
        match self {
            Self::Identity => Ok(stored.to_string()),
            Self::PlusOne => shift_last_octet(stored, 1),
            Self::MinusOne => shift_last_octet(stored, -1),
        }
    }

    /// Maps a probed address back to the stored form. Inverse of
    /// [`to_probe_address`](Self::to_probe_address).
    pub fn to_stored_address(&self, probed: &str) -> Result<String, AddressError> {
        match self {
            Self::Identity => Ok(probed.to_string()),
            Self::PlusOne => shift_last_octet(probed, -1),
            Self::MinusOne => shift_last_octet(probed, 1),
        }
    }
}

fn shift_last_octet(address: &str, delta: i16) -> Result<String, AddressError> {
    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() < 4 {
        return Err(AddressError::InvalidFormat(address.to_string()));
    }
    let last: i16 = parts[parts.len() - 1]
        .parse()
        .map_err(|_| AddressError::InvalidFormat(address.to_string()))?;
    let shifted = last + delta;
    if !(0..=255).contains(&last) || !(0..=255).contains(&shifted) {
        return Err(AddressError::InvalidFormat(address.to_string()));
    }
    let prefix = &parts[..parts.len() - 1];
    Ok(format!("{}.{shifted}", prefix.join(".")))
}
