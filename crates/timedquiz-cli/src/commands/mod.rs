pub mod init;
pub mod take;
pub mod theme;
pub mod validate;
