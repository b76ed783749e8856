//! Sakura Cloud transport for nicsync
//!
//! Implements the `NicTransport` trait over the `usacloud` CLI, so a
//! convergence plan computed by `nicsync` can be driven against real
//! servers.
//!
//! # Requirements
//!
//! - `usacloud` CLI must be installed and configured
//! - Authentication is managed through usacloud configuration
//!
//! # Example
//!
//! ```ignore
//! use nicsync::{DesiredNics, NicApplier, NicTransport, reconcile};
//! use nicsync_sakura::{SakuraNicTransport, Zone};
//!
//! let transport = SakuraNicTransport::new(Zone::parse("tk1a")?);
//!
//! let observed = transport.read_server("113300000001").await?;
//! let plan = reconcile(&desired, &observed)?;
//! let report = NicApplier::new(&transport).apply("113300000001", &plan).await?;
//! ```

pub mod error;
pub mod transport;
pub mod usacloud;
pub mod zone;

pub use error::{Result, SakuraError};
pub use transport::SakuraNicTransport;
pub use usacloud::{InterfaceInfo, ResourceId, ServerInfo, SwitchInfo, Usacloud};
pub use zone::Zone;
