//! usacloud CLI wrapper
//!
//! Wraps the usacloud CLI commands needed for NIC reconciliation:
//! server reads and interface create/delete/connect/disconnect.

use crate::error::{Result, SakuraError};
use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

/// usacloud CLI wrapper, bound to one zone
#[derive(Debug, Clone)]
pub struct Usacloud {
    zone: Zone,
}

impl Usacloud {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Rebind to another zone. The receiver stays bound to its own zone.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self { zone }
    }

    /// Check if usacloud is installed and authenticated
    pub async fn check_auth(&self) -> Result<UsacloudAuth> {
        let which = Command::new("which").arg("usacloud").output().await?;

        if !which.status.success() {
            return Err(SakuraError::UsacloudNotFound);
        }

        let output = self
            .run_command(&["auth-status", "--output-type", "json"])
            .await?;

        let auth: UsacloudAuth = serde_json::from_str(&output)?;
        Ok(auth)
    }

    /// Run a usacloud command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("usacloud");
        cmd.arg("--zone").arg(self.zone.as_str());
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: usacloud --zone {} {}", self.zone, args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SakuraError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Read a server with its interface list
    pub async fn read_server(&self, id: &str) -> Result<ServerInfo> {
        let output = self
            .run_command(&["server", "read", id, "--output-type", "json"])
            .await?;

        let trimmed = output.trim();
        // usacloud emits a single object for reads, but list-shaped output
        // shows up on some versions.
        if trimmed.starts_with('[') {
            let mut servers: Vec<ServerInfo> = serde_json::from_str(trimmed)?;
            if servers.is_empty() {
                return Err(SakuraError::ServerNotFound(id.to_string()));
            }
            Ok(servers.remove(0))
        } else {
            let server: ServerInfo = serde_json::from_str(trimmed)?;
            Ok(server)
        }
    }

    /// Create a new interface on a server (appended as the last slot)
    pub async fn create_interface(&self, server_id: &str) -> Result<InterfaceInfo> {
        let output = self
            .run_command(&[
                "interface",
                "create",
                "--server-id",
                server_id,
                "--output-type",
                "json",
                "--yes",
            ])
            .await?;

        let interface: InterfaceInfo = serde_json::from_str(output.trim())?;
        Ok(interface)
    }

    /// Delete an interface
    pub async fn delete_interface(&self, interface_id: &str) -> Result<()> {
        self.run_command(&["interface", "delete", interface_id, "--yes"])
            .await?;
        Ok(())
    }

    /// Connect an interface to the shared segment
    pub async fn connect_to_shared(&self, interface_id: &str) -> Result<()> {
        self.run_command(&["interface", "connect-to-shared", interface_id, "--yes"])
            .await?;
        Ok(())
    }

    /// Connect an interface to a switch
    pub async fn connect_to_switch(&self, interface_id: &str, switch_id: &str) -> Result<()> {
        self.run_command(&[
            "interface",
            "connect-to-switch",
            interface_id,
            "--switch-id",
            switch_id,
            "--yes",
        ])
        .await?;
        Ok(())
    }

    /// Disconnect an interface from its segment or switch
    pub async fn disconnect(&self, interface_id: &str) -> Result<()> {
        self.run_command(&["interface", "disconnect", interface_id, "--yes"])
            .await?;
        Ok(())
    }

    /// Attach a packet filter to an interface
    pub async fn connect_packet_filter(
        &self,
        interface_id: &str,
        filter_id: &str,
    ) -> Result<()> {
        self.run_command(&[
            "interface",
            "connect-to-packet-filter",
            interface_id,
            "--packet-filter-id",
            filter_id,
            "--yes",
        ])
        .await?;
        Ok(())
    }

    /// Detach the packet filter from an interface
    pub async fn disconnect_packet_filter(&self, interface_id: &str) -> Result<()> {
        self.run_command(&["interface", "disconnect-from-packet-filter", interface_id, "--yes"])
            .await?;
        Ok(())
    }
}

/// sacloud numeric resource ID.
///
/// The API and the CLI disagree on representation: IDs arrive both as
/// JSON numbers and as strings. Always serialized back as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u64);

impl ResourceId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(ResourceId(n)),
            Repr::Str(s) => s
                .parse::<u64>()
                .map(ResourceId)
                .map_err(|_| serde::de::Error::custom(format!("invalid resource ID: {}", s))),
        }
    }
}

/// Authentication status from usacloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsacloudAuth {
    #[serde(rename = "Account")]
    pub account: Option<AccountInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Server information from usacloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(rename = "ID")]
    pub id: ResourceId,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Interfaces", default)]
    pub interfaces: Vec<InterfaceInfo>,
}

/// Interface information from usacloud, slot order preserved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceInfo {
    #[serde(rename = "ID")]
    pub id: ResourceId,

    #[serde(rename = "MACAddress")]
    pub mac_address: String,

    #[serde(rename = "Switch")]
    pub switch: Option<SwitchInfo>,

    #[serde(rename = "PacketFilter")]
    pub packet_filter: Option<PacketFilterInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchInfo {
    #[serde(rename = "ID")]
    pub id: ResourceId,

    /// "shared" for the shared segment, "user" for user switches
    #[serde(rename = "Scope")]
    pub scope: Option<String>,
}

impl SwitchInfo {
    pub fn is_shared(&self) -> bool {
        self.scope.as_deref() == Some("shared")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketFilterInfo {
    #[serde(rename = "ID")]
    pub id: ResourceId,
}
