//! Transport abstraction for executing network operations
//!
//! The reconciler never talks to the cloud itself; a transport does.
//! `nicsync-sakura` implements this trait over the `usacloud` CLI, and
//! tests implement it over an in-memory server.

use crate::desired::{PacketFilterId, SwitchId};
use crate::error::Result;
use crate::observed::ObservedServer;
use async_trait::async_trait;

/// Executes individual network operations against one server.
///
/// Slot indices refer to the server's interface list as returned by
/// `read_server` at call time. Callers must serialize operations against
/// a given server ID; no concurrent mutation of one server's interface
/// set is supported.
#[async_trait]
pub trait NicTransport: Send + Sync {
    /// Fetch the server's current interface list
    async fn read_server(&self, server_id: &str) -> Result<ObservedServer>;

    /// Append a new interface slot
    async fn create_interface(&self, server_id: &str) -> Result<()>;

    /// Delete the interface at a slot
    async fn delete_interface(&self, server_id: &str, slot: usize) -> Result<()>;

    /// Connect slot 0 to the shared segment
    async fn connect_shared(&self, server_id: &str) -> Result<()>;

    /// Disconnect slot 0 from the shared segment
    async fn disconnect_shared(&self, server_id: &str) -> Result<()>;

    /// Connect a slot to a switch
    async fn connect_switch(
        &self,
        server_id: &str,
        slot: usize,
        switch: SwitchId,
    ) -> Result<()>;

    /// Unplug a slot from its user switch
    async fn disconnect_switch(&self, server_id: &str, slot: usize) -> Result<()>;

    /// Attach a packet filter to a slot
    async fn attach_filter(
        &self,
        server_id: &str,
        slot: usize,
        filter: PacketFilterId,
    ) -> Result<()>;

    /// Detach the packet filter from a slot
    async fn detach_filter(&self, server_id: &str, slot: usize) -> Result<()>;
}
