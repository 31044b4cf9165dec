pub mod engine;
pub mod node;
pub mod snmp;
pub mod transfer;
pub mod types;
