mod guide_page_component;
mod state;

pub use guide_page_component::GuidePageComponent;
pub use state::{GuidePageState, PageDemo, ResolvedPage};
