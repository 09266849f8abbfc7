//! Exit codes for the `inamsos` binary. Part of the public contract.

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Unreadable/invalid policy or request input
pub const DENIED: i32 = 3; // Access decision was DENY
