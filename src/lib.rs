pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod layer;
pub mod layout;
pub mod record;
pub mod template;

pub mod init;
