//! NicTransport implementation over usacloud
//!
//! Slot indices are resolved to interface IDs by re-reading the server at
//! call time, so a transport call always acts on the live slot layout
//! rather than a cached one.

use crate::error::SakuraError;
use crate::usacloud::{InterfaceInfo, ServerInfo, Usacloud};
use crate::zone::Zone;
use async_trait::async_trait;
use nicsync::{
    Interface, MacAddress, NicTransport, ObservedServer, PacketFilterId, SwitchBinding,
    SwitchId, SwitchScope,
};

/// Sakura Cloud transport
pub struct SakuraNicTransport {
    usacloud: Usacloud,
}

impl SakuraNicTransport {
    pub fn new(zone: Zone) -> Self {
        Self {
            usacloud: Usacloud::new(zone),
        }
    }

    /// Transport bound to another zone; the receiver is left untouched.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self {
            usacloud: self.usacloud.with_zone(zone),
        }
    }

    pub fn zone(&self) -> &Zone {
        self.usacloud.zone()
    }

    /// Resolve a slot index to the live interface at that position
    async fn interface_at(
        &self,
        server_id: &str,
        slot: usize,
    ) -> Result<InterfaceInfo, SakuraError> {
        let server = self.usacloud.read_server(server_id).await?;
        server
            .interfaces
            .into_iter()
            .nth(slot)
            .ok_or_else(|| SakuraError::InterfaceNotFound {
                server: server_id.to_string(),
                slot,
            })
    }
}

/// Map usacloud server output to the reconciler's observed model
pub(crate) fn to_observed(server: &ServerInfo) -> ObservedServer {
    let interfaces = server
        .interfaces
        .iter()
        .map(|info| Interface {
            mac_address: MacAddress::new(&info.mac_address),
            switch: info.switch.as_ref().map(|sw| SwitchBinding {
                id: SwitchId(sw.id.value()),
                scope: if sw.is_shared() {
                    SwitchScope::Shared
                } else {
                    SwitchScope::User
                },
            }),
            packet_filter: info
                .packet_filter
                .as_ref()
                .map(|pf| PacketFilterId(pf.id.value())),
        })
        .collect();
    ObservedServer::new(interfaces)
}

#[async_trait]
impl NicTransport for SakuraNicTransport {
    async fn read_server(&self, server_id: &str) -> nicsync::Result<ObservedServer> {
        let server = self.usacloud.read_server(server_id).await?;
        Ok(to_observed(&server))
    }

    async fn create_interface(&self, server_id: &str) -> nicsync::Result<()> {
        let interface = self.usacloud.create_interface(server_id).await?;
        tracing::info!(server_id, interface_id = %interface.id, "created interface");
        Ok(())
    }

    async fn delete_interface(&self, server_id: &str, slot: usize) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, slot).await?;
        self.usacloud.delete_interface(&interface.id.to_string()).await?;
        tracing::info!(server_id, slot, interface_id = %interface.id, "deleted interface");
        Ok(())
    }

    async fn connect_shared(&self, server_id: &str) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, 0).await?;
        self.usacloud
            .connect_to_shared(&interface.id.to_string())
            .await?;
        tracing::info!(server_id, "connected slot 0 to shared segment");
        Ok(())
    }

    async fn disconnect_shared(&self, server_id: &str) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, 0).await?;
        self.usacloud.disconnect(&interface.id.to_string()).await?;
        tracing::info!(server_id, "disconnected slot 0 from shared segment");
        Ok(())
    }

    async fn connect_switch(
        &self,
        server_id: &str,
        slot: usize,
        switch: SwitchId,
    ) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, slot).await?;
        self.usacloud
            .connect_to_switch(&interface.id.to_string(), &switch.to_string())
            .await?;
        tracing::info!(server_id, slot, %switch, "connected slot to switch");
        Ok(())
    }

    async fn disconnect_switch(&self, server_id: &str, slot: usize) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, slot).await?;
        self.usacloud.disconnect(&interface.id.to_string()).await?;
        tracing::info!(server_id, slot, "disconnected slot");
        Ok(())
    }

    async fn attach_filter(
        &self,
        server_id: &str,
        slot: usize,
        filter: PacketFilterId,
    ) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, slot).await?;
        self.usacloud
            .connect_packet_filter(&interface.id.to_string(), &filter.to_string())
            .await?;
        tracing::info!(server_id, slot, %filter, "attached packet filter");
        Ok(())
    }

    async fn detach_filter(&self, server_id: &str, slot: usize) -> nicsync::Result<()> {
        let interface = self.interface_at(server_id, slot).await?;
        self.usacloud
            .disconnect_packet_filter(&interface.id.to_string())
            .await?;
        tracing::info!(server_id, slot, "detached packet filter");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_observed_maps_scope_and_ids() {
        let server: ServerInfo = serde_json::from_str(
            r#"{
                "ID": "1",
                "Name": "web01",
                "Interfaces": [
                    {
                        "ID": "101",
                        "MACAddress": "9C:A3:BA:30:00:01",
                        "Switch": {"ID": "5", "Scope": "shared"},
                        "PacketFilter": null
                    },
                    {
                        "ID": "102",
                        "MACAddress": "9C:A3:BA:30:00:02",
                        "Switch": {"ID": "42", "Scope": "user"},
                        "PacketFilter": {"ID": "7"}
                    }
                ]
            }"#,
        )
        .unwrap();

        let observed = to_observed(&server);
        assert_eq!(observed.len(), 2);
        assert!(observed.slot(0).unwrap().switch.unwrap().is_shared());
        let slot1 = observed.slot(1).unwrap();
        assert_eq!(slot1.switch.unwrap().id, SwitchId(42));
        assert_eq!(slot1.switch.unwrap().scope, SwitchScope::User);
        assert_eq!(slot1.packet_filter, Some(PacketFilterId(7)));
        assert_eq!(slot1.mac_address.as_str(), "9C:A3:BA:30:00:02");
    }

    #[test]
    fn test_to_observed_empty_server() {
        let server: ServerInfo =
            serde_json::from_str(r#"{"ID": "1", "Name": "bare"}"#).unwrap();
        let observed = to_observed(&server);
        assert!(observed.is_empty());
    }
}
