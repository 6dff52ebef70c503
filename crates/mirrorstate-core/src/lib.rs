pub mod config;
pub mod logging;

pub mod checksum;
pub mod file_state;
pub mod remote;
