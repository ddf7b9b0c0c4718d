//! Shared utilities.

pub mod html;
