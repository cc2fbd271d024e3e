// Core moderation module - access gating, target validation and the limits
// every moderation command shares.
// Following the same pattern as the warnings module: pure logic plus ports.

pub mod access_gate;
pub mod channel_lock;
pub mod moderation_models;
pub mod moderation_policy;
pub mod target_validator;

pub use access_gate::*;
pub use channel_lock::*;
pub use moderation_models::*;
pub use moderation_policy::*;
pub use target_validator::*;
