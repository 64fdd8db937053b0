//! Shared upkeep data models consumed by the core library and plugin crates.

pub mod change;
pub mod dependency;
pub mod options;
pub mod pull_request;
pub mod repository;

pub use change::*;
pub use dependency::*;
pub use options::*;
pub use pull_request::*;
pub use repository::*;
