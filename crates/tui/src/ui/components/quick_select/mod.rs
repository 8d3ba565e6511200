pub mod panels;
mod quick_select_component;
mod state;

pub use quick_select_component::QuickSelectComponent;
pub use state::{QuickSelectEntry, QuickSelectProps, QuickSelectState};
