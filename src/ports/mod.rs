//! Port traits separating the domain from file and config access.

pub mod config_port;
pub mod data_port;
