//! Desired network description for a server
//!
//! The desired side of a reconcile call. Slot 0 is the base NIC (the one
//! that may join the provider-managed shared segment); additional NICs
//! occupy slots 1..N in declaration order. Slot order is positional and
//! significant.

use crate::error::{NicError, Result};
use serde::{Deserialize, Serialize};

/// Sakura Cloud switch ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SwitchId(pub u64);

impl std::fmt::Display for SwitchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sakura Cloud packet filter ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PacketFilterId(pub u64);

impl std::fmt::Display for PacketFilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Desired binding for the base NIC (slot 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseNic {
    /// Join the provider-managed shared segment
    #[default]
    Shared,
    /// Keep the NIC but leave it unplugged
    Disconnected,
    /// Connect to a specific switch
    Switch(SwitchId),
}

/// Desired binding for an additional NIC (slots 1..N)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NicTarget {
    /// Keep the NIC but leave it unplugged
    #[default]
    Disconnected,
    /// Connect to a specific switch
    Switch(SwitchId),
}

/// Desired network attachments for one server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesiredNics {
    /// Base NIC binding (slot 0)
    pub base: BaseNic,

    /// Additional NIC bindings, positional (slot = index + 1)
    pub additional: Vec<NicTarget>,

    /// Packet filter per slot, positional from slot 0.
    /// Slots past the end of this list carry no filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packet_filters: Vec<Option<PacketFilterId>>,
}

impl DesiredNics {
    /// Base NIC on the shared segment, nothing else
    pub fn shared() -> Self {
        Self::default()
    }

    /// Fully unplugged base NIC, nothing else
    pub fn disconnected() -> Self {
        Self {
            base: BaseNic::Disconnected,
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: BaseNic) -> Self {
        self.base = base;
        self
    }

    pub fn with_additional(mut self, targets: impl Into<Vec<NicTarget>>) -> Self {
        self.additional = targets.into();
        self
    }

    pub fn with_packet_filters(
        mut self,
        filters: impl Into<Vec<Option<PacketFilterId>>>,
    ) -> Self {
        self.packet_filters = filters.into();
        self
    }

    /// Total number of NIC slots this description asks for
    pub fn slot_count(&self) -> usize {
        1 + self.additional.len()
    }

    /// Desired packet filter for a slot
    pub fn filter_for_slot(&self, slot: usize) -> Option<PacketFilterId> {
        self.packet_filters.get(slot).copied().flatten()
    }

    /// Check internal consistency before planning
    pub fn validate(&self) -> Result<()> {
        if self.packet_filters.len() > self.slot_count() {
            return Err(NicError::InvalidSpec(format!(
                "{} packet filters for {} NIC slots",
                self.packet_filters.len(),
                self.slot_count()
            )));
        }
        Ok(())
    }
}
