//! Per-chat category trees.
//!
//! The [`tree`] engine owns every rule about the hierarchy; [`db`] persists
//! it; [`bot`], [`api`] and [`mcp`] are thin surfaces over the engine.

pub mod api;
pub mod bot;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tree;
