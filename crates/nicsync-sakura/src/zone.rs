//! Sakura Cloud zone handling
//!
//! A zone is part of the client's configuration context. Rather than
//! mutating a shared client's zone in place and restoring it afterwards,
//! callers get a rebound clone via `with_zone`; the original client is
//! never touched, so there is nothing to restore on any exit path.

use crate::error::{Result, SakuraError};
use serde::{Deserialize, Serialize};

const ZONES: &[&str] = &["tk1a", "tk1b", "tk1v", "is1a", "is1b"];

/// Validated Sakura Cloud zone name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    pub fn parse(name: &str) -> Result<Self> {
        if ZONES.contains(&name) {
            Ok(Self(name.to_string()))
        } else {
            Err(SakuraError::InvalidZone(format!(
                "{} (知っているゾーン: {})",
                name,
                ZONES.join(", ")
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self("tk1a".to_string())
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
