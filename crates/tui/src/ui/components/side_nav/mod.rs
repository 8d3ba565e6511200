pub mod filter;
mod side_nav_component;
mod state;

pub use filter::{FilteredItem, FilteredSection, FilteredSubItem, HighlightedText, filter_navigation};
pub use side_nav_component::SideNavComponent;
pub use state::{NavRow, SideNavState};
