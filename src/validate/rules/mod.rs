//! Validation rules
//!
//! - [`common`]: Rules shared by every category
//! - [`integration`]: Integration manifest rules
//! - [`content`]: File-presence rules for frontend and script categories

pub mod common;
pub mod content;
pub mod integration;
