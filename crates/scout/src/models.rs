//! These models represent the objects passed between the bridge and the agent backend
//!
//! The agent host speaks its own message format, where every message carries a loose
//! `type` (or `role`) string and content that is either a plain string or a list of
//! blocks. We always immediately convert that format into the internal structs at the
//! provider boundary, so nothing past `providers` ever inspects wire discriminants.
pub mod answer;
pub mod envelope;
pub mod message;
pub mod role;
