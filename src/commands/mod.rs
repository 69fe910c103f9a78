pub mod ask;
pub mod chunks;
pub mod init;
