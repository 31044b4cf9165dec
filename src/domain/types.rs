use serde::{Deserialize, Serialize};

/// An object id as SWIS reports it: numeric in the core schema, a GUID in NCM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Guid(String),
}

/// Terminal state of an NCM transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Complete,
    Error,
    Unknown,
}

/// Summary of a finished NCM transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResults {
    pub status: TransferStatus,
    #[serde(rename = "RequestedScript")]
    pub requested_script: Option<String>,
    #[serde(rename = "RequestedReboot")]
    pub requested_reboot: Option<bool>,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
    #[serde(rename = "DeviceOutput")]
    pub device_output: Option<String>,
    #[serde(rename = "UserName")]
    pub user_name: Option<String>,
}
