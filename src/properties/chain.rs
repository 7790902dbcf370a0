//! # Persistent Property Chain
//!
//! A singly-linked, structurally shared list of property deltas.
//!
//! Each node holds one [`Property`] and points at the chain state it was
//! appended to. Appending never touches an existing node; it allocates a new
//! head. Two chains derived from the same ancestor share that ancestor's nodes
//! and never see each other's additions.
//!
//! ```text
//!   base ──► [k=1] ──► ∅
//!              ▲
//!   a ──► [x=a]┘
//!   b ──► [y=b] ──► [k=1] (shared)
//! ```
//!
//! Merging happens on read ([`PropertyChain::to_properties`]), so the hot path
//! (derive a new adapter with one more property) is a single allocation.

use std::fmt;
use std::sync::Arc;

use super::{Properties, Property};

struct Node {
    property: Property,
    previous: PropertyChain,
}

/// Immutable chain of properties. Cloning shares the head.
#[derive(Clone, Default)]
pub struct PropertyChain {
    head: Option<Arc<Node>>,
}

impl PropertyChain {
    /// The empty chain, which carries no property.
    pub fn empty() -> Self {
        Self { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns a new chain with `property` as its head.
    pub fn append(&self, property: impl Into<Property>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                property: property.into(),
                previous: self.clone(),
            })),
        }
    }

    /// Appends each property in order.
    ///
    /// An empty sequence yields a chain whose head is the same allocation as
    /// `self` (see [`PropertyChain::ptr_eq`]).
    pub fn append_all<I, P>(&self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Property>,
    {
        properties
            .into_iter()
            .fold(self.clone(), |chain, property| chain.append(property))
    }

    /// True when both chains have the very same head node.
    pub fn ptr_eq(&self, other: &PropertyChain) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Walks from the most recently appended property to the oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Number of nodes, including shadowed duplicates.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Merges the chain into a fresh [`Properties`] snapshot.
    ///
    /// For a key appended more than once the most recent value wins. Keys
    /// appear in the order they were first appended.
    pub fn to_properties(&self) -> Properties {
        let nodes: Vec<&Property> = self.iter().collect();

        // Oldest first: re-inserting a key keeps its slot and takes the new value.
        let mut properties = Properties::new();
        for property in nodes.into_iter().rev() {
            properties.insert(property.key.clone(), property.value.clone());
        }
        properties
    }
}

impl Drop for PropertyChain {
    // Unlink uniquely owned nodes one at a time so dropping a deep chain
    // does not recurse once per node.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.previous.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for PropertyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|p| (&p.key, &p.value)))
            .finish()
    }
}

/// Iterator over a chain, newest first.
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Property;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.previous.head.as_deref();
        Some(&node.property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyValue;

    #[test]
    fn test_empty_chain_has_no_properties() {
        let chain = PropertyChain::empty();
        assert!(chain.is_empty());
        assert!(chain.to_properties().is_empty());
        assert!(chain.ptr_eq(&PropertyChain::default()));
    }

    #[test]
    fn test_append_does_not_touch_ancestor() {
        let base = PropertyChain::empty().append(("k", 1));
        let derived = base.append(("x", "a"));

        assert_eq!(base.depth(), 1);
        assert_eq!(derived.depth(), 2);
        assert!(!base.to_properties().contains_key("x"));
    }

    #[test]
    fn test_siblings_are_isolated() {
        let base = PropertyChain::empty().append(("k", 1));
        let a = base.append(("x", "a"));
        let b = base.append(("y", "b"));

        let a_props = a.to_properties();
        let b_props = b.to_properties();
        assert!(a_props.contains_key("x") && !a_props.contains_key("y"));
        assert!(b_props.contains_key("y") && !b_props.contains_key("x"));
        assert_eq!(a_props.get("k"), b_props.get("k"));
    }

    #[test]
    fn test_most_recent_value_wins() {
        let chain = PropertyChain::empty()
            .append(("key", "first"))
            .append(("other", 1))
            .append(("key", "second"))
            .append(("key", "third"));

        let properties = chain.to_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("key"), Some(&PropertyValue::from("third")));

        let keys: Vec<_> = properties.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["key", "other"]);
    }

    #[test]
    fn test_append_all_empty_keeps_head() {
        let chain = PropertyChain::empty().append(("k", 1));
        let same = chain.append_all(Vec::<Property>::new());
        assert!(same.ptr_eq(&chain));

        let grown = chain.append_all([("a", 1), ("b", 2)]);
        assert!(!grown.ptr_eq(&chain));
        assert_eq!(grown.depth(), 3);
    }

    #[test]
    fn test_merge_is_repeatable() {
        let chain = PropertyChain::empty().append(("a", 1)).append(("a", 2)).append(("b", true));
        assert_eq!(chain.to_properties(), chain.to_properties());
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut chain = PropertyChain::empty();
        for i in 0..200_000 {
            chain = chain.append(("i", i));
        }
        assert_eq!(chain.to_properties().get("i"), Some(&PropertyValue::Int(199_999)));
        drop(chain);
    }
}
