//! Chrome around the active tab.

pub mod footer;
pub mod header;
