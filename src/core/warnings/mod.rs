// Core warnings module - moderator-issued warnings with retention.

pub mod warning_models;
pub mod warning_service;

pub use warning_models::*;
pub use warning_service::*;
