pub mod config;
pub mod error;
pub mod git;
pub mod initializer;
pub mod marker;
pub mod notice;
pub mod signoff;
pub mod ui;
pub mod version;
pub mod workspace;

pub use error::{InitError, Result};
pub use initializer::{BranchInitializer, Summary};
