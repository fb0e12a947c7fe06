pub mod check;
mod command_result;
pub mod helper;
pub mod init;
pub mod resolve;
pub mod update;

pub use command_result::*;
