// Logical datasets mirrored from the remote workbook.
//
// Each dataset owns one sheet, one cache key holding the raw rows and one freshness key.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const CACHE_KEY_PREFIX: &str = "sharepoint_cached_";
pub const FRESHNESS_KEY_PREFIX: &str = "sharepoint_last_refresh_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Clients,
    ClientRecords,
    WorkOrders,
    Tubing,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown dataset: {0}")]
pub struct UnknownDataset(pub String);

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Clients,
        Dataset::ClientRecords,
        Dataset::WorkOrders,
        Dataset::Tubing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Clients => "clients",
            Dataset::ClientRecords => "client_records",
            Dataset::WorkOrders => "workorders",
            Dataset::Tubing => "tubing",
        }
    }

    pub fn sheet(&self) -> &'static str {
        match self {
            Dataset::Clients => "Clients",
            Dataset::ClientRecords => "Client Records",
            Dataset::WorkOrders => "Work Orders",
            Dataset::Tubing => "Tubing Registry",
        }
    }

    pub fn cache_key(&self) -> String {
        format!("{CACHE_KEY_PREFIX}{}", self.name())
    }

    pub fn freshness_key(&self) -> String {
        format!("{FRESHNESS_KEY_PREFIX}{}", self.name())
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = UnknownDataset;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = match raw.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "work_orders" => "workorders".to_string(),
            other => other.to_string(),
        };
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.name() == wanted)
            .ok_or_else(|| UnknownDataset(raw.to_string()))
    }
}
