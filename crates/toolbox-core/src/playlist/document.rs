//! Document trees the extractor can query.
//!
//! The extractor never touches a global document: callers hand it anything
//! implementing [`ElementTree`], either a parsed HTML page or a static list
//! of elements.

use scraper::{Html, Selector};
use std::collections::BTreeMap;

use super::error::PlaylistError;

/// Queryable element tree (the subset of a DOM the extractor needs).
pub trait ElementTree {
    /// For every element carrying all of `classes`, in document order, the value
    /// of its `data-*` attribute named by the dataset key `attribute`.
    fn data_attribute_values(
        &self,
        classes: &[String],
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PlaylistError>;
}

/// Maps a dataset key to its HTML attribute (`key` → `data-key`,
/// `videoId` → `data-video-id`).
pub fn data_attribute_name(dataset_key: &str) -> Result<String, PlaylistError> {
    let valid = !dataset_key.is_empty()
        && dataset_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(PlaylistError::InvalidAttribute(dataset_key.to_string()));
    }
    let mut name = String::with_capacity(dataset_key.len() + 8);
    name.push_str("data-");
    for c in dataset_key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    Ok(name)
}

/// Checks that every class can be dropped into a `.class` selector unescaped.
pub(crate) fn validate_classes(classes: &[String]) -> Result<(), PlaylistError> {
    if classes.is_empty() {
        return Err(PlaylistError::NoItemClasses);
    }
    for class in classes {
        let mut chars = class.chars();
        let first = chars.next();
        let second = chars.next();
        let starts_badly = match (first, second) {
            (None, _) => true,
            (Some(c), _) if c.is_ascii_digit() => true,
            (Some('-'), Some(c)) if c.is_ascii_digit() => true,
            _ => false,
        };
        let bad_char = class
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        if starts_badly || bad_char {
            return Err(PlaylistError::InvalidClass(class.clone()));
        }
    }
    Ok(())
}

/// Compound class selector, e.g. `.pod-item.video-pod__item.simple`.
fn class_selector(classes: &[String]) -> String {
    classes.iter().map(|c| format!(".{c}")).collect()
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl ElementTree for HtmlDocument {
    fn data_attribute_values(
        &self,
        classes: &[String],
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PlaylistError> {
        validate_classes(classes)?;
        let attr = data_attribute_name(attribute)?;
        let selector_text = class_selector(classes);
        let selector = Selector::parse(&selector_text).map_err(|e| PlaylistError::Selector {
            selector: selector_text.clone(),
            reason: e.to_string(),
        })?;
        Ok(self
            .html
            .select(&selector)
            .map(|el| el.value().attr(&attr).map(String::from))
            .collect())
    }
}

/// In-memory element for callers that already hold item data.
#[derive(Debug, Clone, Default)]
pub struct StaticElement {
    pub classes: Vec<String>,
    /// Dataset entries keyed by dataset name (`key`, not `data-key`).
    pub dataset: BTreeMap<String, String>,
}

impl StaticElement {
    pub fn new<S: AsRef<str>>(classes: &[S]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.as_ref().to_string()).collect(),
            dataset: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.dataset.insert(key.to_string(), value.to_string());
        self
    }

    fn has_all(&self, classes: &[String]) -> bool {
        classes.iter().all(|c| self.classes.contains(c))
    }
}

/// Flat element list in document order.
#[derive(Debug, Clone, Default)]
pub struct StaticTree {
    pub elements: Vec<StaticElement>,
}

impl StaticTree {
    pub fn new(elements: Vec<StaticElement>) -> Self {
        Self { elements }
    }
}

impl ElementTree for StaticTree {
    fn data_attribute_values(
        &self,
        classes: &[String],
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PlaylistError> {
        validate_classes(classes)?;
        data_attribute_name(attribute)?;
        Ok(self
            .elements
            .iter()
            .filter(|el| el.has_all(classes))
            .map(|el| el.dataset.get(attribute).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dataset_key_maps_to_data_attribute() {
        assert_eq!(data_attribute_name("key").unwrap(), "data-key");
        assert_eq!(data_attribute_name("videoId").unwrap(), "data-video-id");
        assert!(data_attribute_name("").is_err());
        assert!(data_attribute_name("a-b").is_err());
    }

    #[test]
    fn validate_classes_rejects_unusable_markers() {
        assert!(validate_classes(&classes(&["pod-item", "video-pod__item"])).is_ok());
        assert!(matches!(
            validate_classes(&[]),
            Err(PlaylistError::NoItemClasses)
        ));
        for bad in ["", "1abc", "-2x", "a b", "a.b", "x>y"] {
            match validate_classes(&classes(&[bad])) {
                Err(PlaylistError::InvalidClass(c)) => assert_eq!(c, bad),
                other => panic!("expected InvalidClass for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn html_document_requires_every_class() {
        let doc = HtmlDocument::parse(
            r#"<html><body>
                <div class="pod-item video-pod__item simple" data-key="BV1"></div>
                <div class="pod-item video-pod__item" data-key="BV2"></div>
                <div class="simple video-pod__item pod-item active" data-key="BV3"></div>
                <div class="pod-item video-pod__item simple"></div>
            </body></html>"#,
        );
        let values = doc
            .data_attribute_values(&classes(&["pod-item", "video-pod__item", "simple"]), "key")
            .unwrap();
        assert_eq!(
            values,
            vec![Some("BV1".to_string()), Some("BV3".to_string()), None]
        );
    }

    #[test]
    fn html_document_nested_items_in_document_order() {
        let doc = HtmlDocument::parse(
            r#"<ul>
                <li class="item" data-key="outer"><span class="item" data-key="inner"></span></li>
                <li class="item" data-key="last"></li>
            </ul>"#,
        );
        let values = doc.data_attribute_values(&classes(&["item"]), "key").unwrap();
        assert_eq!(
            values,
            vec![
                Some("outer".to_string()),
                Some("inner".to_string()),
                Some("last".to_string())
            ]
        );
    }

    #[test]
    fn static_tree_filters_by_classes() {
        let tree = StaticTree::new(vec![
            StaticElement::new(&["a", "b"]).with_data("key", "1"),
            StaticElement::new(&["a"]).with_data("key", "2"),
            StaticElement::new(&["b", "a", "c"]),
        ]);
        let values = tree.data_attribute_values(&classes(&["a", "b"]), "key").unwrap();
        assert_eq!(values, vec![Some("1".to_string()), None]);
    }
}
