//! The host templating engine boundary.
//!
//! Everything this crate does happens between template code and a host
//! engine's element constructor. The [`Host`] trait captures exactly the
//! primitives the scoping runtime consumes: element construction for two
//! namespaces, head access for injected style elements, lookup and removal
//! for deduplication and garbage collection, and disposal registration for
//! teardown. [`MemoryHost`] is the bundled in-memory implementation used by
//! the tests and examples.

mod memory;

pub use memory::{MemoryHost, MemoryNode};

use std::collections::BTreeMap;

use crate::fragment::DynamicValue;
use crate::runtime::ScopedProducer;

/// The construction namespace of an element call.
///
/// Style declarations only occur in the [`Html`](Namespace::Html) namespace;
/// the SVG namespace receives scope classes but is never style-intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
}

/// One property value in a [`PropertyBag`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A plain text value.
    Text(String),
    /// A boolean-style presence flag, e.g. `<style local>`.
    Flag(bool),
    /// A deferred value re-evaluated by the host on each read.
    Dynamic(DynamicValue),
}

/// An element's properties, in insertion-stable name order.
///
/// Built fluently, the way themes collect styles:
///
/// ```rust
/// use insular::PropertyBag;
///
/// let props = PropertyBag::new()
///     .flag("local")
///     .attr("class", "fancy");
/// assert!(props.has_flag("local"));
/// assert_eq!(props.text("class"), Some("fancy"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: BTreeMap<String, PropValue>,
}

impl PropertyBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text property, returning the bag for chaining.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, PropValue::Text(value.into()));
        self
    }

    /// Adds a presence flag, returning the bag for chaining.
    pub fn flag(mut self, name: &str) -> Self {
        self.set(name, PropValue::Flag(true));
        self
    }

    /// Adds a dynamic property, returning the bag for chaining.
    pub fn dynamic(mut self, name: &str, value: DynamicValue) -> Self {
        self.set(name, PropValue::Dynamic(value));
        self
    }

    /// Inserts or replaces a property.
    pub fn set(&mut self, name: &str, value: PropValue) {
        self.entries.insert(name.to_string(), value);
    }

    /// Looks up a property.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// Removes a property, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.entries.remove(name)
    }

    /// True when `name` is present as a set flag.
    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(PropValue::Flag(true)))
    }

    /// The text value of `name`, if it is a text property.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(PropValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// True when the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// One child argument of an element-construction call.
#[derive(Debug, Clone)]
pub enum Child<N> {
    /// An already-constructed node.
    Node(N),
    /// Literal text content.
    Text(String),
    /// Deferred text content, re-evaluated by the host.
    Dynamic(DynamicValue),
    /// A deferred subtree producer carrying its defining scope.
    Producer(ScopedProducer<N>),
}

impl<N> Child<N> {
    /// Creates a text child.
    pub fn text(text: impl Into<String>) -> Self {
        Child::Text(text.into())
    }

    /// Creates a dynamic text child from a producer closure.
    pub fn dynamic(producer: impl Fn() -> String + 'static) -> Self {
        Child::Dynamic(DynamicValue::new(producer))
    }
}

/// An element-construction call on its way to the host.
///
/// This is the value a before-construct hook inspects and may rewrite or
/// consume; see [`StyleGate`](crate::StyleGate).
#[derive(Debug, Clone)]
pub struct ElementCall<N> {
    pub namespace: Namespace,
    pub tag: String,
    pub props: PropertyBag,
    pub children: Vec<Child<N>>,
}

/// The primitives a host templating engine must provide.
///
/// Implementations are single-threaded and use interior mutability; every
/// method takes `&self` because construction calls re-enter the host while a
/// render callback is still on the stack.
pub trait Host: 'static {
    /// The host's renderable node handle.
    type Node: Clone + 'static;

    /// Builds an element from a tag, properties, and children.
    fn construct(
        &self,
        namespace: Namespace,
        tag: &str,
        props: &PropertyBag,
        children: Vec<Child<Self::Node>>,
    ) -> Self::Node;

    /// Appends `node` under the document head (or an equivalent mount point
    /// for injected style elements).
    fn append_to_head(&self, node: Self::Node);

    /// True when an element with this identifier already exists under the
    /// head, whether or not this runtime put it there.
    fn has_element(&self, id: &str) -> bool;

    /// Removes every style element under the head whose class list contains
    /// `class`, returning the removed identifiers.
    fn remove_styles_with_class(&self, class: &str) -> Vec<String>;

    /// Registers `callback` to run exactly once when the reactive scope
    /// enclosing the current render is torn down. Callbacks are assumed to be
    /// serialized with all other scope mutations.
    fn on_cleanup(&self, callback: Box<dyn FnOnce()>);

    /// Runs `build` in an isolated reactive root, so a detached node's
    /// internal reactivity does not tie its lifetime to the caller's scope.
    ///
    /// Hosts without a reactive runtime can keep the default, which simply
    /// invokes `build`.
    fn detached_root<R>(&self, build: impl FnOnce() -> R) -> R {
        build()
    }
}
