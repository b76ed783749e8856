//! Observed network state for a server
//!
//! The observed side of a reconcile call. Fetched fresh from the provider
//! before each reconcile and after each mutating operation; never cached
//! across reconcile calls.

use crate::desired::{PacketFilterId, SwitchId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned MAC address.
///
/// Assigned when the provider creates an interface and never chosen by
/// the caller. Reconnecting an interface to the switch it is already on
/// keeps the MAC; detach/reattach cycles do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(mac: impl Into<String>) -> Self {
        Self(mac.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scope of the switch an interface is plugged into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchScope {
    /// Provider-managed shared segment
    Shared,
    /// User-created switch
    User,
}

/// A live switch connection on one interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchBinding {
    pub id: SwitchId,
    pub scope: SwitchScope,
}

impl SwitchBinding {
    pub fn shared(id: SwitchId) -> Self {
        Self {
            id,
            scope: SwitchScope::Shared,
        }
    }

    pub fn user(id: SwitchId) -> Self {
        Self {
            id,
            scope: SwitchScope::User,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.scope == SwitchScope::Shared
    }
}

/// One observed interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Provider-assigned MAC
    pub mac_address: MacAddress,

    /// Current switch connection, if plugged in
    pub switch: Option<SwitchBinding>,

    /// Attached packet filter, if any
    pub packet_filter: Option<PacketFilterId>,
}

impl Interface {
    pub fn unplugged(mac: impl Into<String>) -> Self {
        Self {
            mac_address: MacAddress::new(mac),
            switch: None,
            packet_filter: None,
        }
    }

    pub fn with_switch(mut self, binding: SwitchBinding) -> Self {
        self.switch = Some(binding);
        self
    }

    pub fn with_packet_filter(mut self, filter: PacketFilterId) -> Self {
        self.packet_filter = Some(filter);
        self
    }
}

/// Ordered interface list of one server, as last read from the provider.
///
/// Slot 0 holds the shared/base interface when one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedServer {
    pub interfaces: Vec<Interface>,

    /// When this snapshot was read
    pub fetched_at: DateTime<Utc>,
}

impl ObservedServer {
    pub fn new(interfaces: Vec<Interface>) -> Self {
        Self {
            interfaces,
            fetched_at: Utc::now(),
        }
    }

    /// A server with no interfaces at all
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn slot(&self, slot: usize) -> Option<&Interface> {
        self.interfaces.get(slot)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Ordered MAC addresses, one per slot
    pub fn mac_addresses(&self) -> Vec<&MacAddress> {
        self.interfaces.iter().map(|i| &i.mac_address).collect()
    }
}
