use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use super::Value;

/// A scope that names can be resolved in: the root of the data being
/// queried, a nested container, or one item of an array.
///
/// Names are looked up verbatim. A dot in a name is part of its spelling and
/// never means navigation, so `cpu.count` is a single lookup.
pub trait Container {
    /// Resolve `name` in this scope.
    fn property(&self, name: &str) -> Option<Property<'_>>;

    fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

impl<T: Container + ?Sized> Container for &T {
    fn property(&self, name: &str) -> Option<Property<'_>> {
        (**self).property(name)
    }

    fn has_property(&self, name: &str) -> bool {
        (**self).has_property(name)
    }
}

/// A resolved property.
pub enum Property<'a> {
    /// A single typed value.
    Simple(Cow<'a, Value>),
    /// A nested scope.
    Container(Box<dyn Container + 'a>),
    /// An ordered sequence of scopes.
    Array(Vec<Box<dyn Container + 'a>>),
}

impl Property<'_> {
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Property::Simple(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Simple(v) => f.debug_tuple("Simple").field(v).finish(),
            Property::Container(_) => f.write_str("Container(..)"),
            Property::Array(items) => write!(f, "Array(len = {})", items.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Simple(Value),
    Container(PropertyTree),
    Array(Vec<PropertyTree>),
}

/// An in-memory property tree.
///
/// ```
/// use rsl::{PropertyTree, Quantity};
///
/// let host = PropertyTree::new()
///     .with_value("cpu.count", 4_i64)
///     .with_container("os", PropertyTree::new().with_value("name", "Linux"))
///     .with_array(
///         "disks",
///         [PropertyTree::new().with_value("size", "512GB".parse::<Quantity>().unwrap())],
///     );
/// assert_eq!(host.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTree {
    nodes: HashMap<String, Node>,
}

impl PropertyTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_value(name, value);
        self
    }

    #[must_use]
    pub fn with_container(mut self, name: impl Into<String>, tree: PropertyTree) -> Self {
        self.nodes.insert(name.into(), Node::Container(tree));
        self
    }

    #[must_use]
    pub fn with_array(
        mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = PropertyTree>,
    ) -> Self {
        self.nodes
            .insert(name.into(), Node::Array(items.into_iter().collect()));
        self
    }

    /// Set or replace a simple value.
    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.nodes.insert(name.into(), Node::Simple(value.into()));
    }

    /// Remove a property of any shape, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.nodes.remove(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Container for PropertyTree {
    fn property(&self, name: &str) -> Option<Property<'_>> {
        let property = match self.nodes.get(name)? {
            Node::Simple(v) => Property::Simple(Cow::Borrowed(v)),
            Node::Container(tree) => Property::Container(Box::new(tree)),
            Node::Array(items) => Property::Array(
                items
                    .iter()
                    .map(|tree| Box::new(tree) as Box<dyn Container + '_>)
                    .collect(),
            ),
        };
        Some(property)
    }

    fn has_property(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names_are_flat() {
        let tree = PropertyTree::new().with_value("cpu.count", 4_i64);
        assert!(tree.has_property("cpu.count"));
        assert!(!tree.has_property("cpu"));
    }

    #[test]
    fn resolves_each_shape() {
        let tree = PropertyTree::new()
            .with_value("a", "x")
            .with_container("b", PropertyTree::new())
            .with_array("c", [PropertyTree::new(), PropertyTree::new()]);

        assert_eq!(
            tree.property("a").unwrap().value(),
            Some(&Value::Text("x".into()))
        );
        assert!(matches!(tree.property("b"), Some(Property::Container(_))));
        assert!(matches!(tree.property("c"), Some(Property::Array(ref items)) if items.len() == 2));
        assert!(tree.property("d").is_none());
    }

    #[test]
    fn insert_replaces_and_remove_deletes() {
        let mut tree = PropertyTree::new().with_container("a", PropertyTree::new());
        tree.insert_value("a", 1_i64);
        assert!(tree.property("a").unwrap().value().is_some());
        assert!(tree.remove("a"));
        assert!(!tree.remove("a"));
        assert!(tree.is_empty());
    }

    fn lookup<C: Container>(scope: C, name: &str) -> bool {
        scope.has_property(name)
    }

    #[test]
    fn reference_is_a_container() {
        let tree = PropertyTree::new().with_value("a", 1_i64);
        let as_dyn: &dyn Container = &tree;
        assert!(lookup(&tree, "a"));
        assert!(lookup(as_dyn, "a"));
    }
}
