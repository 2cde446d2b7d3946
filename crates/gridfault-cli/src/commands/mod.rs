pub mod config;
pub mod delegate;
pub mod report;
pub mod resolve;
pub mod team;
pub mod watch;
