//! Core functionality: finding, running, and understanding the VPN CLI.

pub mod dispatch;
pub mod interpreter;
pub mod locator;
pub mod public_ip;
pub mod runner;
pub mod system;
