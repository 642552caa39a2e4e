// src/core/mod.rs

pub mod dom;
pub mod sanitize;

pub use dom::{css, Fragment, Page};
