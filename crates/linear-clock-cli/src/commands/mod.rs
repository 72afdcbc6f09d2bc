pub mod config;
pub mod focus;
pub mod range;
pub mod session;
pub mod sink;
pub mod status;
pub mod task;
pub mod transfer;
pub mod watch;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;
