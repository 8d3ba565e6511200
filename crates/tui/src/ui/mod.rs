//! UI layer: the root view, the event loop, components, theming and layout
//! helpers.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod scheduling;
pub mod theme;
pub mod utils;
