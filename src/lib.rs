pub mod catalog;
pub mod changelog;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod orchestration;
pub mod process;
pub mod ui;

pub use error::{DeployError, Result};
