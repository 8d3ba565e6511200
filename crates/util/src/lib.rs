//! Helpers shared by the guidekit CLI and TUI: manifest loading, user
//! preferences, case-insensitive matching, and date-range labelling.

pub mod date_handling;
pub mod navigation_io;
pub mod path_processing;
pub mod preferences;
pub mod text_processing;

pub use date_handling::{DEFAULT_DATE_FORMAT, pretty_duration};
pub use navigation_io::{NavigationLoadError, builtin_navigation, load_navigation};
pub use path_processing::expand_tilde;
pub use preferences::{PreferencesError, UserPreferences};
pub use text_processing::{contains_case_insensitive, find_case_insensitive, fold_case};
