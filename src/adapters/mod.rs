//! Concrete adapter implementations for ports, plus output rendering.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod output;
