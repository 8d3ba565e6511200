//! Search filtering for the guide's side navigation.
//!
//! `filter_navigation` is a pure function over the manifest. It selects the
//! sections, items and sub-sections that match a search term, labels the
//! matches for highlighting, and flags items that must be rendered expanded
//! because one of their sub-sections matched. The source tree is only read.

use std::ops::Range;

use guidekit_types::{NavigationItem, NavigationSection, Route};
use guidekit_util::{contains_case_insensitive, find_case_insensitive, fold_case};
use serde::Serialize;

/// A label with the matched part of the search term marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedText {
    pub text: String,
    /// Byte range of the first match, on char boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Range<usize>>,
}

impl HighlightedText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: None,
        }
    }

    /// Marks the first case-insensitive occurrence of `term`, if any.
    pub fn highlighted(text: impl Into<String>, term: &str) -> Self {
        let text = text.into();
        let highlight = find_case_insensitive(&text, term);
        Self { text, highlight }
    }

    /// Splits the text into `(before, matched, after)`.
    pub fn segments(&self) -> (&str, &str, &str) {
        match &self.highlight {
            Some(range) => (
                &self.text[..range.start],
                &self.text[range.clone()],
                &self.text[range.end..],
            ),
            None => (&self.text, "", ""),
        }
    }
}

/// A section that kept at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredSection {
    /// The section's `type`.
    pub id: String,
    pub name: String,
    pub items: Vec<FilteredItem>,
}

/// An item that matched, with its resolved sub-items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredItem {
    /// `"{section type}-{path}"`
    pub id: String,
    pub path: String,
    /// `"#/{path}"`
    pub href: String,
    pub label: HighlightedText,
    pub is_new: bool,
    pub sub_items: Vec<FilteredSubItem>,
    pub is_selected: bool,
    /// A sub-section title matched an active search term.
    pub force_expand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredSubItem {
    /// `"subSection-{id}"`
    pub id: String,
    pub anchor: String,
    /// `"#/{path}#{id}"`
    pub href: String,
    pub label: HighlightedText,
}

/// Filters `sections` by `search_term`, marking the item at `current_path` as
/// selected.
///
/// Matching is a case-insensitive substring test. An empty term matches every
/// visible item. Sections left without items are dropped, so a term that
/// matches nothing yields an empty vector.
pub fn filter_navigation(sections: &[NavigationSection], search_term: &str, current_path: &str) -> Vec<FilteredSection> {
    let term = fold_case(search_term);

    sections
        .iter()
        .filter_map(|section| {
            let items: Vec<FilteredItem> = section
                .items
                .iter()
                .filter_map(|item| {
                    let force_expand = match_item(item, &term)?;
                    Some(build_item(&section.kind, item, &term, current_path, force_expand))
                })
                .collect();

            (!items.is_empty()).then(|| FilteredSection {
                id: section.kind.clone(),
                name: section.name.clone(),
                items,
            })
        })
        .collect()
}

/// `Some(force_expand)` when the item matches, `None` otherwise.
fn match_item(item: &NavigationItem, term: &str) -> Option<bool> {
    if item.hidden || item.name.is_empty() {
        return None;
    }
    let sub_section_matches = !term.is_empty()
        && item
            .sections
            .iter()
            .filter_map(|section| section.title())
            .any(|title| contains_case_insensitive(title, term));
    if sub_section_matches {
        return Some(true);
    }
    contains_case_insensitive(&item.name, term).then_some(false)
}

fn build_item(section_kind: &str, item: &NavigationItem, term: &str, current_path: &str, force_expand: bool) -> FilteredItem {
    let href = Route::new(item.path.clone()).page_href();
    let label = if term.is_empty() {
        HighlightedText::plain(item.name.clone())
    } else {
        HighlightedText::highlighted(item.name.clone(), term)
    };
    FilteredItem {
        id: format!("{}-{}", section_kind, item.path),
        path: item.path.clone(),
        sub_items: resolve_sub_items(item, &href, term),
        href,
        label,
        is_new: item.is_new,
        is_selected: item.path == current_path,
        force_expand,
    }
}

/// Titled sub-sections matching `term` (all of them when it is empty).
///
/// A solitary titled sub-section is not listed unless a search is active.
fn resolve_sub_items(item: &NavigationItem, href: &str, term: &str) -> Vec<FilteredSubItem> {
    if term.is_empty() && item.titled_section_count() <= 1 {
        return Vec::new();
    }

    item.sections
        .iter()
        .filter_map(|section| section.title().map(|title| (section.id.as_str(), title)))
        .filter(|(_, title)| contains_case_insensitive(title, term))
        .map(|(id, title)| FilteredSubItem {
            id: format!("subSection-{id}"),
            anchor: id.to_string(),
            href: format!("{href}#{id}"),
            label: if term.is_empty() {
                HighlightedText::plain(title)
            } else {
                HighlightedText::highlighted(title, term)
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidekit_types::SubSection;

    fn components() -> Vec<NavigationSection> {
        vec![NavigationSection {
            kind: "components".into(),
            name: "Components".into(),
            items: vec![
                NavigationItem::new("Button", "button"),
                NavigationItem::new("Badge", "badge")
                    .with_sections(vec![SubSection::new("colors", "Colors"), SubSection::new("sizes", "Sizes")]),
            ],
        }]
    }

    fn item<'a>(result: &'a [FilteredSection], path: &str) -> Option<&'a FilteredItem> {
        result.iter().flat_map(|s| &s.items).find(|i| i.path == path)
    }

    #[test]
    fn empty_term_keeps_everything_and_multi_sub_sections() {
        let result = filter_navigation(&components(), "", "button");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].items.len(), 2);

        let button = item(&result, "button").unwrap();
        assert!(button.sub_items.is_empty());
        assert!(button.is_selected);
        assert_eq!(button.id, "components-button");
        assert_eq!(button.href, "#/button");

        let badge = item(&result, "badge").unwrap();
        assert_eq!(badge.sub_items.len(), 2);
        assert_eq!(badge.sub_items[0].id, "subSection-colors");
        assert_eq!(badge.sub_items[0].href, "#/badge#colors");
        assert_eq!(badge.sub_items[0].label.highlight, None);
        assert!(!badge.force_expand);
        assert!(!badge.is_selected);
    }

    #[test]
    fn sub_section_match_forces_expansion() {
        let result = filter_navigation(&components(), "colors", "");
        assert_eq!(result[0].items.len(), 1);

        let badge = &result[0].items[0];
        assert_eq!(badge.path, "badge");
        assert!(badge.force_expand);
        assert_eq!(badge.sub_items.len(), 1);
        assert_eq!(badge.sub_items[0].label.segments(), ("", "Colors", ""));
    }

    #[test]
    fn term_is_case_insensitive_and_highlights_name() {
        let result = filter_navigation(&components(), "BUT", "");
        let button = item(&result, "button").unwrap();
        assert_eq!(button.label.segments(), ("", "But", "ton"));
        assert!(!button.force_expand);
        assert!(item(&result, "badge").is_none());
    }

    #[test]
    fn name_matches_itself_with_final_sigma() {
        let sections = vec![NavigationSection {
            kind: "greek".into(),
            name: "Greek".into(),
            items: vec![NavigationItem::new("ΟΔΟΣ", "odos")],
        }];
        let result = filter_navigation(&sections, "ΟΔΟΣ", "");
        let odos = item(&result, "odos").unwrap();
        assert_eq!(odos.label.segments(), ("", "ΟΔΟΣ", ""));
        assert!(item(&filter_navigation(&sections, "οδος", ""), "odos").is_some());
    }

    #[test]
    fn no_match_yields_empty_result() {
        assert!(filter_navigation(&components(), "zzz", "button").is_empty());
    }

    #[test]
    fn name_match_with_unmatched_sub_sections_drops_sub_list() {
        let result = filter_navigation(&components(), "badge", "");
        let badge = item(&result, "badge").unwrap();
        assert!(badge.sub_items.is_empty());
        assert!(!badge.force_expand);
    }

    #[test]
    fn solitary_sub_section_only_listed_during_search() {
        let sections = vec![NavigationSection {
            kind: "display".into(),
            name: "Display".into(),
            items: vec![
                NavigationItem::new("Tooltip", "tooltip").with_sections(vec![
                    SubSection::new("placement", "Placement"),
                    SubSection {
                        id: "untitled".into(),
                        title: None,
                        body: None,
                    },
                ]),
            ],
        }];
        assert!(filter_navigation(&sections, "", "")[0].items[0].sub_items.is_empty());

        let searched = filter_navigation(&sections, "place", "");
        assert_eq!(searched[0].items[0].sub_items.len(), 1);
        assert!(searched[0].items[0].force_expand);
    }

    #[test]
    fn hidden_and_nameless_items_never_match() {
        let mut hidden = NavigationItem::new("Secret", "secret");
        hidden.hidden = true;
        let nameless = NavigationItem::new("", "nameless").with_sections(vec![SubSection::new("a", "Alpha")]);
        let sections = vec![NavigationSection {
            kind: "misc".into(),
            name: "Misc".into(),
            items: vec![hidden, nameless],
        }];
        assert!(filter_navigation(&sections, "", "secret").is_empty());
        assert!(filter_navigation(&sections, "alpha", "").is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_untouched() {
        let sections = components();
        let before = sections.clone();
        for term in ["", "b", "colors", "SIZES", "zzz"] {
            let first = filter_navigation(&sections, term, "badge");
            let second = filter_navigation(&sections, term, "badge");
            assert_eq!(first, second);
        }
        assert_eq!(sections, before);
    }

    #[test]
    fn exactly_one_item_selected_for_each_current_path() {
        let sections = components();
        for path in ["button", "badge"] {
            let result = filter_navigation(&sections, "", path);
            let selected: Vec<_> = result.iter().flat_map(|s| &s.items).filter(|i| i.is_selected).collect();
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].path, path);
        }
    }
}
