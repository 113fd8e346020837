//! An in-memory host: a minimal retained document for tests, examples, and
//! render-to-memory use.
//!
//! The node model holds just what the scoping runtime observes: tag, id,
//! class list (static or producer-backed), attributes, and ordered content
//! pieces. Disposal is simulated explicitly — the host queues cleanup
//! callbacks and [`MemoryHost::dispose_next`]/[`dispose_all`](MemoryHost::dispose_all)
//! run them serialized, the way a reactive host would on subtree teardown.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::fragment::DynamicValue;
use crate::host::{Child, Host, Namespace, PropValue, PropertyBag};

#[derive(Debug, Clone)]
enum ClassAttr {
    Static(String),
    Dynamic(DynamicValue),
}

impl ClassAttr {
    fn value(&self) -> String {
        match self {
            ClassAttr::Static(text) => text.clone(),
            ClassAttr::Dynamic(producer) => producer.get(),
        }
    }
}

#[derive(Debug, Clone)]
enum MemoryChild {
    Text(String),
    Dynamic(DynamicValue),
    Node(MemoryNode),
}

#[derive(Debug)]
struct NodeData {
    namespace: Namespace,
    tag: String,
    id: String,
    class: Option<ClassAttr>,
    attrs: BTreeMap<String, String>,
    children: Vec<MemoryChild>,
}

/// A node in the in-memory document.
///
/// Handles are cheap clones of shared node state. Class lists backed by a
/// dynamic producer are re-evaluated on every read, mirroring how a reactive
/// host would bind them.
#[derive(Clone)]
pub struct MemoryNode(Rc<RefCell<NodeData>>);

impl MemoryNode {
    fn build(
        namespace: Namespace,
        tag: &str,
        props: &PropertyBag,
        children: Vec<Child<MemoryNode>>,
    ) -> Self {
        let mut data = NodeData {
            namespace,
            tag: tag.to_string(),
            id: String::new(),
            class: None,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        };

        for (name, value) in props.iter() {
            match (name, value) {
                ("id", PropValue::Text(id)) => data.id = id.clone(),
                ("class", PropValue::Text(text)) => {
                    data.class = Some(ClassAttr::Static(text.clone()));
                }
                ("class", PropValue::Dynamic(producer)) => {
                    data.class = Some(ClassAttr::Dynamic(producer.clone()));
                }
                (name, PropValue::Text(text)) => {
                    data.attrs.insert(name.to_string(), text.clone());
                }
                (name, PropValue::Flag(true)) => {
                    data.attrs.insert(name.to_string(), String::new());
                }
                (_, PropValue::Flag(false)) => {}
                (name, PropValue::Dynamic(producer)) => {
                    // Non-class dynamic props are snapshotted at build time.
                    data.attrs.insert(name.to_string(), producer.get());
                }
            }
        }

        for child in children {
            match child {
                Child::Node(node) => data.children.push(MemoryChild::Node(node)),
                Child::Text(text) => data.children.push(MemoryChild::Text(text)),
                Child::Dynamic(producer) => data.children.push(MemoryChild::Dynamic(producer)),
                Child::Producer(producer) => {
                    data.children.push(MemoryChild::Node(producer.call()));
                }
            }
        }

        MemoryNode(Rc::new(RefCell::new(data)))
    }

    /// The element's tag name.
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// The construction namespace.
    pub fn namespace(&self) -> Namespace {
        self.0.borrow().namespace
    }

    /// The element identifier; empty when none was set.
    pub fn id(&self) -> String {
        self.0.borrow().id.clone()
    }

    /// The current class attribute value; empty when none was set.
    pub fn class_attr(&self) -> String {
        self.0
            .borrow()
            .class
            .as_ref()
            .map(ClassAttr::value)
            .unwrap_or_default()
    }

    /// The current class list, whitespace-split.
    pub fn class_names(&self) -> Vec<String> {
        self.class_attr()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// True when the current class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_attr().split_whitespace().any(|name| name == class)
    }

    /// A non-class, non-id attribute value.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    /// The concatenated text content, dynamic pieces evaluated, descendants
    /// included.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in self.0.borrow().children.iter() {
            match child {
                MemoryChild::Text(piece) => text.push_str(piece),
                MemoryChild::Dynamic(producer) => text.push_str(&producer.get()),
                MemoryChild::Node(node) => text.push_str(&node.text_content()),
            }
        }
        text
    }

    /// The element children, in order.
    pub fn child_elements(&self) -> Vec<MemoryNode> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|child| match child {
                MemoryChild::Node(node) => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    /// True when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &MemoryNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("MemoryNode")
            .field("tag", &data.tag)
            .field("id", &data.id)
            .field("children", &data.children.len())
            .finish()
    }
}

#[derive(Default)]
struct HostState {
    head: Vec<MemoryNode>,
    cleanups: VecDeque<Box<dyn FnOnce()>>,
}

/// The in-memory [`Host`] implementation.
///
/// Clones share one document, so a handle kept outside the renderer can
/// inspect what rendering produced.
#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<HostState>>,
}

impl MemoryHost {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The nodes currently appended under the head, in insertion order.
    pub fn head_nodes(&self) -> Vec<MemoryNode> {
        self.state.borrow().head.clone()
    }

    /// Finds a head-mounted style element by identifier.
    pub fn style_element(&self, id: &str) -> Option<MemoryNode> {
        self.state
            .borrow()
            .head
            .iter()
            .find(|node| node.tag() == "style" && node.id() == id)
            .cloned()
    }

    /// The number of cleanup callbacks not yet run.
    pub fn pending_cleanups(&self) -> usize {
        self.state.borrow().cleanups.len()
    }

    /// Runs the oldest pending cleanup callback, if any.
    pub fn dispose_next(&self) -> bool {
        let next = self.state.borrow_mut().cleanups.pop_front();
        match next {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Runs every pending cleanup callback, oldest first.
    pub fn dispose_all(&self) {
        while self.dispose_next() {}
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryHost")
            .field("head", &state.head.len())
            .field("cleanups", &state.cleanups.len())
            .finish()
    }
}

impl Host for MemoryHost {
    type Node = MemoryNode;

    fn construct(
        &self,
        namespace: Namespace,
        tag: &str,
        props: &PropertyBag,
        children: Vec<Child<MemoryNode>>,
    ) -> MemoryNode {
        MemoryNode::build(namespace, tag, props, children)
    }

    fn append_to_head(&self, node: MemoryNode) {
        self.state.borrow_mut().head.push(node);
    }

    fn has_element(&self, id: &str) -> bool {
        self.state.borrow().head.iter().any(|node| node.id() == id)
    }

    fn remove_styles_with_class(&self, class: &str) -> Vec<String> {
        let mut state = self.state.borrow_mut();
        let mut removed = Vec::new();
        state.head.retain(|node| {
            if node.tag() == "style" && node.has_class(class) {
                removed.push(node.id());
                false
            } else {
                true
            }
        });
        removed
    }

    fn on_cleanup(&self, callback: Box<dyn FnOnce()>) {
        self.state.borrow_mut().cleanups.push_back(callback);
    }
}
