//! In-memory cloud used by the convergence tests.
//!
//! Behaves like the real provider where it matters for planning: MACs are
//! assigned at interface creation and survive connect/disconnect, but a
//! removed slot's MAC is gone for good.

use async_trait::async_trait;
use nicsync::{
    Interface, NicTransport, ObservedServer, PacketFilterId, Result, SwitchBinding, SwitchId,
};
use std::sync::Mutex;

pub const SHARED_SEGMENT: SwitchId = SwitchId(112800442260);

pub struct InMemoryCloud {
    interfaces: Mutex<Vec<Interface>>,
    mac_seq: Mutex<u32>,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self {
            interfaces: Mutex::new(Vec::new()),
            mac_seq: Mutex::new(0),
        }
    }

    fn next_mac(&self) -> String {
        let mut seq = self.mac_seq.lock().unwrap();
        *seq += 1;
        format!("9C:A3:BA:00:02:{:02X}", *seq)
    }
}

#[async_trait]
impl NicTransport for InMemoryCloud {
    async fn read_server(&self, _server_id: &str) -> Result<ObservedServer> {
        Ok(ObservedServer::new(self.interfaces.lock().unwrap().clone()))
    }

    async fn create_interface(&self, _server_id: &str) -> Result<()> {
        let mac = self.next_mac();
        self.interfaces
            .lock()
            .unwrap()
            .push(Interface::unplugged(mac));
        Ok(())
    }

    async fn delete_interface(&self, _server_id: &str, slot: usize) -> Result<()> {
        self.interfaces.lock().unwrap().remove(slot);
        Ok(())
    }

    async fn connect_shared(&self, _server_id: &str) -> Result<()> {
        self.interfaces.lock().unwrap()[0].switch =
            Some(SwitchBinding::shared(SHARED_SEGMENT));
        Ok(())
    }

    async fn disconnect_shared(&self, _server_id: &str) -> Result<()> {
        self.interfaces.lock().unwrap()[0].switch = None;
        Ok(())
    }

    async fn connect_switch(
        &self,
        _server_id: &str,
        slot: usize,
        switch: SwitchId,
    ) -> Result<()> {
        self.interfaces.lock().unwrap()[slot].switch = Some(SwitchBinding::user(switch));
        Ok(())
    }

    async fn disconnect_switch(&self, _server_id: &str, slot: usize) -> Result<()> {
        self.interfaces.lock().unwrap()[slot].switch = None;
        Ok(())
    }

    async fn attach_filter(
        &self,
        _server_id: &str,
        slot: usize,
        filter: PacketFilterId,
    ) -> Result<()> {
        self.interfaces.lock().unwrap()[slot].packet_filter = Some(filter);
        Ok(())
    }

    async fn detach_filter(&self, _server_id: &str, slot: usize) -> Result<()> {
        self.interfaces.lock().unwrap()[slot].packet_filter = None;
        Ok(())
    }
}
