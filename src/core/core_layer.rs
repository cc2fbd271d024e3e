// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "time/duration.rs"]
pub mod time;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "warnings/mod.rs"]
pub mod warnings;

#[path = "search/mod.rs"]
pub mod search;
