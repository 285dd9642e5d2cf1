pub mod init_tracing;
pub mod timing;
