//! Loading and validating navigation manifests.
//!
//! Manifests are YAML or JSON lists of sections. The format is chosen from the
//! file extension; anything that is not `.json` is read as YAML.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use guidekit_types::NavigationSection;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Guide manifest compiled into the binary, used when no file is given.
pub const BUILTIN_GUIDE_MANIFEST: &str = include_str!("../assets/guide.yaml");

#[derive(Debug, Error)]
pub enum NavigationLoadError {
    #[error("failed to read navigation manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in navigation manifest {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON in navigation manifest {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("navigation manifest {path} is invalid: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Counts reported by `guidekit check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationSummary {
    pub sections: usize,
    pub items: usize,
    pub hidden_items: usize,
    pub sub_sections: usize,
}

/// Reads, parses and validates a manifest from disk.
pub fn load_navigation(path: &Path) -> Result<Vec<NavigationSection>, NavigationLoadError> {
    let source = fs::read_to_string(path).map_err(|source| NavigationLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let sections: Vec<NavigationSection> = if is_json {
        serde_json::from_str(&source).map_err(|source| NavigationLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&source).map_err(|source| NavigationLoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    validate_navigation(&sections).map_err(|reason| NavigationLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    debug!(path = %path.display(), sections = sections.len(), "Loaded navigation manifest");
    Ok(sections)
}

/// Parses the manifest compiled into the binary.
pub fn builtin_navigation() -> Result<Vec<NavigationSection>, NavigationLoadError> {
    let path = PathBuf::from("<builtin>");
    let sections: Vec<NavigationSection> =
        serde_yaml::from_str(BUILTIN_GUIDE_MANIFEST).map_err(|source| NavigationLoadError::Yaml {
            path: path.clone(),
            source,
        })?;
    validate_navigation(&sections).map_err(|reason| NavigationLoadError::Invalid { path, reason })?;
    Ok(sections)
}

/// Rejects manifests whose routes would be ambiguous.
///
/// Duplicate section types or item paths are errors. Items without a name are
/// only logged; the filter never matches them.
pub fn validate_navigation(sections: &[NavigationSection]) -> Result<(), String> {
    let mut kinds = HashSet::new();
    let mut paths = HashSet::new();
    for section in sections {
        if !kinds.insert(section.kind.as_str()) {
            return Err(format!("duplicate section type {:?}", section.kind));
        }
        for item in &section.items {
            if item.path.trim().is_empty() {
                return Err(format!("item {:?} in section {:?} has an empty path", item.name, section.kind));
            }
            if !paths.insert(item.path.as_str()) {
                return Err(format!("duplicate item path {:?}", item.path));
            }
            if item.name.trim().is_empty() {
                warn!(path = %item.path, section = %section.kind, "Navigation item has no name and will never match");
            }
        }
    }
    Ok(())
}

pub fn summarize(sections: &[NavigationSection]) -> NavigationSummary {
    sections.iter().fold(
        NavigationSummary {
            sections: sections.len(),
            ..Default::default()
        },
        |mut summary, section| {
            summary.items += section.items.len();
            summary.hidden_items += section.items.iter().filter(|item| item.hidden).count();
            summary.sub_sections += section.items.iter().map(|item| item.sections.len()).sum::<usize>();
            summary
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifest_is_valid() {
        let sections = builtin_navigation().unwrap();
        let summary = summarize(&sections);
        assert!(summary.sections >= 2);
        assert!(sections.iter().flat_map(|s| &s.items).any(|i| i.path == "date-picker"));
        assert!(sections.iter().flat_map(|s| &s.items).any(|i| i.path == "data-grid"));
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.json");
        fs::write(
            &path,
            r#"[{"type":"components","name":"Components","items":[{"name":"Button","path":"button","hidden":true}]}]"#,
        )
        .unwrap();
        let sections = load_navigation(&path).unwrap();
        assert_eq!(
            summarize(&sections),
            NavigationSummary {
                sections: 1,
                items: 1,
                hidden_items: 1,
                sub_sections: 0
            }
        );
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.yaml");
        fs::write(
            &path,
            "- type: a\n  name: A\n  items:\n    - {name: One, path: one}\n- type: b\n  name: B\n  items:\n    - {name: Uno, path: one}\n",
        )
        .unwrap();
        let error = load_navigation(&path).unwrap_err();
        assert!(matches!(error, NavigationLoadError::Invalid { .. }));
        assert!(error.to_string().contains("duplicate item path"));
    }

    #[test]
    fn missing_file_and_bad_yaml_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_navigation(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, NavigationLoadError::Io { .. }));

        let path = dir.path().join("bad.yaml");
        fs::write(&path, "- type: [unterminated").unwrap();
        assert!(matches!(load_navigation(&path).unwrap_err(), NavigationLoadError::Yaml { .. }));
    }
}
