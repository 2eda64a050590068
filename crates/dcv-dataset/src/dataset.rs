use std::collections::BTreeMap;

use dcv_types::Tag;

use crate::element::{Element, ElementValue};

/// An ordered `Tag → Element` table.
///
/// Produced once per request by a parser and dropped when the request
/// completes; nothing in the vault mutates or caches a parsed dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    elements: BTreeMap<Tag, Element>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, replacing any element with the same tag.
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.tag, element)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, tag: Tag, vr: &str, value: ElementValue) -> Self {
        self.insert(Element::new(tag, vr, value));
        self
    }

    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.elements.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }
}

impl FromIterator<Element> for Dataset {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(|e| (e.tag, e)).collect(),
        }
    }
}
