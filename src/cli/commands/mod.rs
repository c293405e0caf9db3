//! Command implementations.

pub mod init;
pub mod serve;
pub mod version;
