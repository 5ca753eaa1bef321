//! Chat widget for the Facultad Politécnica information bot: a conversation
//! controller over three plain-text HTTP endpoints, rendered as a terminal
//! widget.

pub mod app;
pub mod backend;
pub mod classify;
pub mod config;
pub mod controller;
pub mod events;
pub mod state;
pub mod ui;
