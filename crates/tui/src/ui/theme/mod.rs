//! Theme styling for the guide.
//!
//! Two palettes (Nord and Dracula) map onto semantic roles; components style
//! themselves through `Theme` and the helpers in `theme_helpers` rather than
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable that overrides the persisted theme preference.
pub const THEME_ENV: &str = "TUI_THEME";

/// Identifiers accepted by `--theme`, `TUI_THEME` and the preferences file.
pub const THEME_IDS: [&str; 2] = ["nord", "dracula"];

/// Theme plus the identifier it was resolved from.
pub struct LoadedTheme {
    pub id: &'static str,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_id(id: &'static str) -> Self {
        let theme: Box<dyn Theme> = match id {
            "dracula" => Box::new(DraculaTheme::new()),
            _ => Box::new(NordTheme::new()),
        };
        Self { id, theme }
    }
}

fn resolve(name: &str) -> Option<&'static str> {
    let normalized = name.trim().to_ascii_lowercase();
    THEME_IDS.iter().copied().find(|id| *id == normalized)
}

/// Selects a theme: explicit request, then `TUI_THEME`, then the persisted
/// preference, then Nord.
pub fn load(requested: Option<&str>, preferred: Option<&str>) -> LoadedTheme {
    if let Some(id) = requested.and_then(resolve) {
        return LoadedTheme::from_id(id);
    }
    if let Ok(name) = env::var(THEME_ENV)
        && let Some(id) = resolve(&name)
    {
        return LoadedTheme::from_id(id);
    }
    if let Some(id) = preferred.and_then(resolve) {
        return LoadedTheme::from_id(id);
    }
    debug!("No theme override found; using nord");
    LoadedTheme::from_id(THEME_IDS[0])
}

/// The theme following `current` in `THEME_IDS`.
pub fn next(current: &str) -> LoadedTheme {
    let idx = THEME_IDS.iter().position(|id| *id == current).unwrap_or(0);
    LoadedTheme::from_id(THEME_IDS[(idx + 1) % THEME_IDS.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_request_wins() {
        temp_env::with_var(THEME_ENV, Some("nord"), || {
            assert_eq!(load(Some("Dracula"), None).id, "dracula");
        });
    }

    #[test]
    fn preference_used_without_overrides() {
        temp_env::with_var_unset(THEME_ENV, || {
            assert_eq!(load(None, Some("dracula")).id, "dracula");
            assert_eq!(load(Some("unknown"), None).id, "nord");
        });
    }

    #[test]
    fn next_cycles_through_ids() {
        assert_eq!(next("nord").id, "dracula");
        assert_eq!(next("dracula").id, "nord");
    }
}
