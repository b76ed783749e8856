//! Plan computation
//!
//! `reconcile` is a pure function from (desired, observed) to an ordered
//! operation plan. It performs no IO, never retries, and emits nothing
//! for slots that are already correct — in particular an interface
//! already plugged into the right switch is left alone, because a
//! disconnect/reconnect cycle would reassign its MAC and drop the link.

use crate::desired::{BaseNic, DesiredNics, NicTarget};
use crate::error::Result;
use crate::observed::{ObservedServer, SwitchBinding};
use crate::op::{NetworkOp, Plan};

/// Compute the ordered operations converging `observed` to `desired`.
///
/// Plan order: grow slots, fix slot 0, fix additional slots, shrink
/// (disconnect then remove, highest slot first), then packet filters.
pub fn reconcile(desired: &DesiredNics, observed: &ObservedServer) -> Result<Plan> {
    desired.validate()?;

    let want = desired.slot_count();
    let have = observed.len();
    let mut ops = Vec::new();

    // Grow first so every desired slot exists before any connect targets it.
    for _ in have..want {
        ops.push(NetworkOp::AddInterface);
    }

    plan_base_slot(desired.base, observed.slot(0).and_then(|i| i.switch), &mut ops);

    for (i, target) in desired.additional.iter().enumerate() {
        let slot = i + 1;
        let bound = observed.slot(slot).and_then(|i| i.switch);
        plan_additional_slot(slot, *target, bound, &mut ops);
    }

    // Shrink last, highest slot first so earlier indices stay stable.
    for slot in (want..have).rev() {
        if let Some(binding) = observed.slot(slot).and_then(|i| i.switch) {
            if binding.is_shared() {
                ops.push(NetworkOp::DisconnectShared);
            } else {
                ops.push(NetworkOp::Disconnect { slot });
            }
        }
        ops.push(NetworkOp::RemoveInterface { slot });
    }

    for slot in 0..want {
        let want_filter = desired.filter_for_slot(slot);
        let have_filter = observed.slot(slot).and_then(|i| i.packet_filter);
        match (want_filter, have_filter) {
            (Some(f), Some(g)) if f == g => {}
            (Some(f), Some(_)) => {
                ops.push(NetworkOp::DetachFilter { slot });
                ops.push(NetworkOp::AttachFilter { slot, filter: f });
            }
            (Some(f), None) => ops.push(NetworkOp::AttachFilter { slot, filter: f }),
            (None, Some(_)) => ops.push(NetworkOp::DetachFilter { slot }),
            (None, None) => {}
        }
    }

    let plan = Plan::new(ops);
    tracing::debug!(
        ops = plan.len(),
        slots = want,
        observed = have,
        "computed convergence plan"
    );
    Ok(plan)
}

fn plan_base_slot(base: BaseNic, bound: Option<SwitchBinding>, ops: &mut Vec<NetworkOp>) {
    match base {
        BaseNic::Shared => match bound {
            Some(b) if b.is_shared() => {}
            Some(_) => {
                ops.push(NetworkOp::Disconnect { slot: 0 });
                ops.push(NetworkOp::ConnectShared);
            }
            None => ops.push(NetworkOp::ConnectShared),
        },
        BaseNic::Switch(id) => match bound {
            // Same switch already connected: keep the binding (and the MAC).
            Some(b) if !b.is_shared() && b.id == id => {}
            Some(b) if b.is_shared() => {
                ops.push(NetworkOp::DisconnectShared);
                ops.push(NetworkOp::Connect { slot: 0, switch: id });
            }
            Some(_) => {
                ops.push(NetworkOp::Disconnect { slot: 0 });
                ops.push(NetworkOp::Connect { slot: 0, switch: id });
            }
            None => ops.push(NetworkOp::Connect { slot: 0, switch: id }),
        },
        BaseNic::Disconnected => match bound {
            Some(b) if b.is_shared() => ops.push(NetworkOp::DisconnectShared),
            Some(_) => ops.push(NetworkOp::Disconnect { slot: 0 }),
            None => {}
        },
    }
}

fn plan_additional_slot(
    slot: usize,
    target: NicTarget,
    bound: Option<SwitchBinding>,
    ops: &mut Vec<NetworkOp>,
) {
    match (target, bound) {
        (NicTarget::Disconnected, Some(_)) => ops.push(NetworkOp::Disconnect { slot }),
        (NicTarget::Disconnected, None) => {}
        // Same switch already connected: no-op.
        (NicTarget::Switch(id), Some(b)) if !b.is_shared() && b.id == id => {}
        (NicTarget::Switch(id), Some(_)) => {
            ops.push(NetworkOp::Disconnect { slot });
            ops.push(NetworkOp::Connect { slot, switch: id });
        }
        (NicTarget::Switch(id), None) => ops.push(NetworkOp::Connect { slot, switch: id }),
    }
}
