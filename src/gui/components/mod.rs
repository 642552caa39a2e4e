// src/gui/components/mod.rs
pub mod action_table;
pub mod toolbar;
