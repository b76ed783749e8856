//! Planned network operations

use crate::desired::{PacketFilterId, SwitchId};
use serde::{Deserialize, Serialize};

/// One step of a convergence plan.
///
/// Slot indices always refer to positions in the server's interface list
/// at the time the op runs, so removals are planned highest slot first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NetworkOp {
    /// Append a new interface slot (provider assigns the MAC)
    AddInterface,

    /// Delete the interface at a slot
    RemoveInterface { slot: usize },

    /// Connect slot 0 to the shared segment
    ConnectShared,

    /// Disconnect slot 0 from the shared segment
    DisconnectShared,

    /// Connect a slot to a specific switch
    Connect { slot: usize, switch: SwitchId },

    /// Unplug a slot from its user switch
    Disconnect { slot: usize },

    /// Attach a packet filter to a slot
    AttachFilter { slot: usize, filter: PacketFilterId },

    /// Detach the packet filter from a slot
    DetachFilter { slot: usize },
}

impl std::fmt::Display for NetworkOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkOp::AddInterface => write!(f, "add-interface"),
            NetworkOp::RemoveInterface { slot } => write!(f, "remove-interface[{}]", slot),
            NetworkOp::ConnectShared => write!(f, "connect-shared"),
            NetworkOp::DisconnectShared => write!(f, "disconnect-shared"),
            NetworkOp::Connect { slot, switch } => write!(f, "connect[{}]->{}", slot, switch),
            NetworkOp::Disconnect { slot } => write!(f, "disconnect[{}]", slot),
            NetworkOp::AttachFilter { slot, filter } => {
                write!(f, "attach-filter[{}]->{}", slot, filter)
            }
            NetworkOp::DetachFilter { slot } => write!(f, "detach-filter[{}]", slot),
        }
    }
}

/// Ordered convergence plan produced by `reconcile`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Operations in execution order
    pub ops: Vec<NetworkOp>,

    /// Whether the plan mutates anything
    pub has_changes: bool,
}

impl Plan {
    pub fn new(ops: Vec<NetworkOp>) -> Self {
        let has_changes = !ops.is_empty();
        Self { ops, has_changes }
    }

    pub fn empty() -> Self {
        Self {
            ops: Vec::new(),
            has_changes: false,
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for op in &self.ops {
            match op {
                NetworkOp::AddInterface => summary.add += 1,
                NetworkOp::RemoveInterface { .. } => summary.remove += 1,
                NetworkOp::ConnectShared | NetworkOp::Connect { .. } => summary.connect += 1,
                NetworkOp::DisconnectShared | NetworkOp::Disconnect { .. } => {
                    summary.disconnect += 1
                }
                NetworkOp::AttachFilter { .. } => summary.filter += 1,
                NetworkOp::DetachFilter { .. } => summary.filter += 1,
            }
        }
        summary
    }
}

/// Counts of planned operations by kind
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSummary {
    pub add: usize,
    pub remove: usize,
    pub connect: usize,
    pub disconnect: usize,
    pub filter: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to add, {} to remove, {} to connect, {} to disconnect, {} filter changes",
            self.add, self.remove, self.connect, self.disconnect, self.filter
        )
    }
}
