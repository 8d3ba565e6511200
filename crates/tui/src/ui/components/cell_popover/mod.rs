mod cell_popover_component;
mod state;

pub use cell_popover_component::CellPopoverComponent;
pub use state::{CellPopoverState, KeyPropagation, PopoverKeyResult};
