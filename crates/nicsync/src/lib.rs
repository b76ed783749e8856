//! NIC reconciliation core for Sakura Cloud servers
//!
//! This crate computes the minimal ordered sequence of network operations
//! needed to converge a server's observed interface list to a desired
//! declarative description, without ever touching the network itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            Caller (deploy tooling)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │ DesiredNics
//! ┌─────────────────▼───────────────────────────────┐
//! │                   nicsync                       │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  reconcile(desired, observed) -> Plan    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │  NicApplier  │  │  trait NicTransport  │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └─────────────────────────┬───────────────────────┘
//!                           │
//!                  ┌────────▼────────┐
//!                  │  nicsync-sakura │
//!                  │  (usacloud CLI) │
//!                  └─────────────────┘
//! ```
//!
//! `reconcile` is a pure function; executing the plan is the transport's
//! job. The [`apply::NicApplier`] drives a plan through a transport,
//! re-reading the server after every mutation so partial failures are
//! reported against fresh state.

pub mod apply;
pub mod desired;
pub mod error;
pub mod observed;
pub mod op;
pub mod reconcile;
pub mod transport;

// Re-exports
pub use apply::{ApplyReport, NicApplier, OpResult, RetryConfig};
pub use desired::{BaseNic, DesiredNics, NicTarget, PacketFilterId, SwitchId};
pub use error::{NicError, Result};
pub use observed::{Interface, MacAddress, ObservedServer, SwitchBinding, SwitchScope};
pub use op::{NetworkOp, Plan, PlanSummary};
pub use reconcile::reconcile;
pub use transport::NicTransport;
