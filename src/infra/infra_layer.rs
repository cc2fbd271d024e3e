// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "warnings/mod.rs"]
pub mod warnings;

#[path = "search/mod.rs"]
pub mod search;
