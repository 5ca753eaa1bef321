//! UI components for the chat widget

pub mod composer;
pub mod widget;

pub use composer::{Composer, ComposerResult};
pub use widget::ChatWidget;
