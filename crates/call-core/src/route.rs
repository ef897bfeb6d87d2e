use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkAdapterType {
    #[default]
    Unknown,
    Ethernet,
    Wifi,
    Cellular,
    Vpn,
    Loopback,
    AnyAddress,
    Cellular2G,
    Cellular3G,
    Cellular4G,
    Cellular5G,
}

/// Last transport route reported by the media engine. Passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkRoute {
    pub local_adapter_type: NetworkAdapterType,
}

impl NetworkRoute {
    pub fn new(local_adapter_type: NetworkAdapterType) -> Self {
        Self { local_adapter_type }
    }
}
