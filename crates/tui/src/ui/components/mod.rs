//! UI components: side navigation, guide page, data grid, cell popover and
//! quick select.

pub mod cell_popover;
pub mod common;
pub mod component;
pub mod data_grid;
pub mod guide_page;
pub mod quick_select;
pub mod side_nav;

pub use cell_popover::CellPopoverComponent;
pub(crate) use component::Component;
pub use guide_page::GuidePageComponent;
pub use quick_select::QuickSelectComponent;
pub use side_nav::SideNavComponent;
