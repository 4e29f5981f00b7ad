//! Asset display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_timestamp, join_or_dash, or_dash};
use crate::client::models::Asset;

/// Asset display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AssetDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "TYPE")]
    pub asset_type: String,

    #[tabled(rename = "IP")]
    pub ips: String,

    #[tabled(rename = "CRITICALITY")]
    pub criticality: String,

    #[tabled(rename = "OWNER")]
    pub owner: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "LAST SEEN")]
    pub last_seen: String,
}

impl From<&Asset> for AssetDisplay {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            asset_type: or_dash(Some(&asset.asset_type)),
            ips: join_or_dash(&asset.ip_addresses),
            criticality: asset.criticality.to_string(),
            owner: or_dash(Some(&asset.owner)),
            status: asset.status.to_string(),
            last_seen: format_timestamp(asset.last_seen.as_deref().unwrap_or_default()),
        }
    }
}

impl From<Asset> for AssetDisplay {
    fn from(asset: Asset) -> Self {
        AssetDisplay::from(&asset)
    }
}
