//! Navigation manifest model.
//!
//! A manifest is an ordered list of sections, each owning its items, each
//! item owning its sub-sections. Manifests are authored in YAML or JSON and
//! use camelCase keys (`isNew`) plus `type` for the section identifier.

use serde::{Deserialize, Serialize};

/// A top-level group in the side navigation (for example "Components").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSection {
    /// Stable identifier of the section; serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<NavigationItem>,
}

/// A single guide page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    /// Display name. A missing name deserializes to an empty string and the
    /// item is then never matched by the filter.
    #[serde(default)]
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub sections: Vec<SubSection>,
    /// Short introduction rendered at the top of the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// An anchored heading within a guide page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Body text rendered under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NavigationItem {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_sections(mut self, sections: Vec<SubSection>) -> Self {
        self.sections = sections;
        self
    }

    /// Number of sub-sections that carry a non-empty title.
    pub fn titled_section_count(&self) -> usize {
        self.sections.iter().filter(|s| s.title().is_some()).count()
    }
}

impl SubSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            body: None,
        }
    }

    /// Title, treating an empty string the same as a missing one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_defaults_optional_fields() {
        let yaml = r#"
- type: components
  name: Components
  items:
    - name: Button
      path: button
    - path: broken
    - name: Badge
      path: badge
      isNew: true
      sections:
        - id: colors
          title: Colors
        - id: untitled
"#;
        let sections: Vec<NavigationSection> = serde_yaml::from_str(yaml).unwrap();
        let items = &sections[0].items;
        assert_eq!(sections[0].kind, "components");
        assert!(!items[0].hidden);
        assert!(items[0].sections.is_empty());
        assert_eq!(items[1].name, "");
        assert!(items[2].is_new);
        assert_eq!(items[2].titled_section_count(), 1);
    }

    #[test]
    fn section_serializes_kind_as_type() {
        let section = NavigationSection {
            kind: "layout".into(),
            name: "Layout".into(),
            items: vec![NavigationItem::new("Flex", "flex")],
        };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["type"], "layout");
        assert_eq!(json["items"][0]["isNew"], false);
    }
}
