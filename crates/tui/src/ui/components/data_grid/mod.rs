mod data_grid_component;
pub mod demo;
mod state;

pub use data_grid_component::DataGridComponent;
pub use state::{CellPosition, DataGridState};
