//! The visual surface the controller mutates.
//!
//! `Surface` is the seam to whatever renders the demo: elements are looked up
//! by id, class, or attribute and mutated through text, class, style and
//! child operations. `Document` is the in-memory implementation every front
//! end in this workspace renders from.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::canvas::{Canvas, DrawList};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(String),
    Class(&'static str),
    Attr { name: &'static str, value: String },
}

impl Target {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementSpec {
    pub id: Option<String>,
    pub class_name: String,
    pub text: String,
    pub title: Option<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub style: Vec<(&'static str, String)>,
    pub disabled: bool,
    pub canvas: Option<(u32, u32)>,
}

impl ElementSpec {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn with_style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push((property, value.into()));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = Some((width, height));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddClass {
        target: Target,
        class: &'static str,
    },
    RemoveClasses {
        target: Target,
        classes: Vec<&'static str>,
    },
    /// Replaces the whole class list, like assigning `className`.
    SetClassName {
        target: Target,
        class_name: String,
    },
    SetText {
        target: Target,
        text: String,
    },
    SetStyle {
        target: Target,
        property: &'static str,
        value: String,
    },
    SetDisabled {
        target: Target,
        disabled: bool,
    },
    ClearChildren {
        target: Target,
    },
    AppendChild {
        parent: Target,
        child: ElementSpec,
    },
}

impl SurfaceOp {
    pub fn add_class(target: Target, class: &'static str) -> Self {
        Self::AddClass { target, class }
    }

    pub fn remove_class(target: Target, class: &'static str) -> Self {
        Self::RemoveClasses {
            target,
            classes: vec![class],
        }
    }

    pub fn set_text(target: Target, text: impl Into<String>) -> Self {
        Self::SetText {
            target,
            text: text.into(),
        }
    }

    pub fn set_style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property,
            value: value.into(),
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            SurfaceOp::AddClass { target, .. }
            | SurfaceOp::RemoveClasses { target, .. }
            | SurfaceOp::SetClassName { target, .. }
            | SurfaceOp::SetText { target, .. }
            | SurfaceOp::SetStyle { target, .. }
            | SurfaceOp::SetDisabled { target, .. }
            | SurfaceOp::ClearChildren { target } => target,
            SurfaceOp::AppendChild { parent, .. } => parent,
        }
    }
}

pub trait Surface {
    fn lookup(&self, id: &str) -> Option<NodeId>;
    fn query_class(&self, class: &str) -> Vec<NodeId>;
    fn query_attr(&self, name: &str, value: &str) -> Vec<NodeId>;

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn set_class_name(&mut self, node: NodeId, class_name: &str);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn set_disabled(&mut self, node: NodeId, disabled: bool);
    fn clear_children(&mut self, node: NodeId);
    fn append_child(&mut self, parent: NodeId, child: &ElementSpec) -> NodeId;

    fn canvas_mut(&mut self, id: &str) -> Option<&mut dyn Canvas>;

    fn resolve(&self, target: &Target) -> Vec<NodeId> {
        match target {
            Target::Id(id) => self.lookup(id).into_iter().collect(),
            Target::Class(class) => self.query_class(class),
            Target::Attr { name, value } => self.query_attr(name, value),
        }
    }

    /// Applies `op` to every matching element and returns how many matched.
    /// Missing elements are not an error.
    fn apply(&mut self, op: &SurfaceOp) -> usize {
        let nodes = self.resolve(op.target());
        if nodes.is_empty() {
            debug!(target_element = ?op.target(), "no element matched surface operation");
            return 0;
        }

        for &node in &nodes {
            match op {
                SurfaceOp::AddClass { class, .. } => self.add_class(node, class),
                SurfaceOp::RemoveClasses { classes, .. } => {
                    for class in classes {
                        self.remove_class(node, class);
                    }
                }
                SurfaceOp::SetClassName { class_name, .. } => self.set_class_name(node, class_name),
                SurfaceOp::SetText { text, .. } => self.set_text(node, text),
                SurfaceOp::SetStyle {
                    property, value, ..
                } => self.set_style(node, property, value),
                SurfaceOp::SetDisabled { disabled, .. } => self.set_disabled(node, *disabled),
                SurfaceOp::ClearChildren { .. } => self.clear_children(node),
                SurfaceOp::AppendChild { child, .. } => {
                    self.append_child(node, child);
                }
            }
        }
        nodes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    pub title: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub disabled: bool,
    pub children: Vec<NodeId>,
    pub canvas: Option<DrawList>,
    attached: bool,
}

impl Element {
    fn from_spec(spec: &ElementSpec) -> Self {
        let mut element = Self {
            id: spec.id.clone(),
            text: spec.text.clone(),
            title: spec.title.clone(),
            attrs: spec
                .attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            style: spec
                .style
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            disabled: spec.disabled,
            canvas: spec.canvas.map(|(w, h)| DrawList::new(w, h)),
            attached: true,
            ..Self::default()
        };
        element.set_class_name(&spec.class_name);
        element
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.classes.clear();
        for class in class_name.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
    }
}

/// In-memory element tree.
///
/// Nodes live in an arena. Clearing children detaches them, drops their ids
/// from the index and returns their slots to a free list that the next
/// insert reuses, so repeated runs keep the arena at a fixed size.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    free: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert_root(&mut self, spec: &ElementSpec) -> NodeId {
        self.insert(spec)
    }

    fn insert(&mut self, spec: &ElementSpec) -> NodeId {
        let element = Element::from_spec(spec);
        let node = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = element;
                slot
            }
            None => {
                self.nodes.push(element);
                self.nodes.len() - 1
            }
        };
        if let Some(id) = &spec.id {
            if let Some(previous) = self.index.insert(id.clone(), node) {
                debug!(id = %id, previous, "element id re-bound to a new node");
            }
        }
        node
    }

    /// Arena slots in use or waiting on the free list.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).filter(|element| element.attached)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.lookup(id).and_then(|node| self.node(node))
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(|element| element.text.as_str())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id).is_some_and(|element| element.has_class(class))
    }

    pub fn children(&self, id: &str) -> Vec<&Element> {
        self.get(id)
            .map(|element| {
                element
                    .children
                    .iter()
                    .filter_map(|&child| self.node(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn canvas(&self, id: &str) -> Option<&DrawList> {
        self.get(id).and_then(|element| element.canvas.as_ref())
    }

    fn attached(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, element)| element.attached)
    }

    fn detach(&mut self, node: NodeId) {
        let children = match self.nodes.get_mut(node) {
            Some(element) => {
                element.attached = false;
                std::mem::take(&mut element.children)
            }
            None => return,
        };
        if let Some(id) = self.nodes[node].id.clone() {
            if self.index.get(&id) == Some(&node) {
                self.index.remove(&id);
            }
        }
        self.free.push(node);
        for child in children {
            self.detach(child);
        }
    }
}

impl Surface for Document {
    fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.attached()
            .filter(|(_, element)| element.has_class(class))
            .map(|(node, _)| node)
            .collect()
    }

    fn query_attr(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.attached()
            .filter(|(_, element)| element.attr(name) == Some(value))
            .map(|(node, _)| node)
            .collect()
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.set_class_name(class_name);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.text = text.to_string();
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.disabled = disabled;
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = match self.nodes.get_mut(node) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        for child in children {
            self.detach(child);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: &ElementSpec) -> NodeId {
        let node = self.insert(child);
        if let Some(element) = self.nodes.get_mut(parent) {
            element.children.push(node);
        }
        node
    }

    fn canvas_mut(&mut self, id: &str) -> Option<&mut dyn Canvas> {
        let node = self.lookup(id)?;
        self.nodes
            .get_mut(node)?
            .canvas
            .as_mut()
            .map(|canvas| canvas as &mut dyn Canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_list() -> (Document, NodeId) {
        let mut doc = Document::new();
        let list = doc.insert_root(&ElementSpec::new("list").with_id("list"));
        (doc, list)
    }

    #[test]
    fn class_name_is_deduplicated_and_ordered() {
        let (mut doc, list) = doc_with_list();
        doc.set_class_name(list, "rule-step checking checking show");
        assert_eq!(doc.get("list").unwrap().class_name(), "rule-step checking show");
    }

    #[test]
    fn clearing_children_detaches_their_ids() {
        let (mut doc, list) = doc_with_list();
        doc.append_child(list, &ElementSpec::new("node").with_id("input-0"));
        doc.append_child(list, &ElementSpec::new("node").with_id("input-1"));
        assert_eq!(doc.query_class("node").len(), 2);

        doc.clear_children(list);

        assert!(doc.get("input-0").is_none());
        assert!(doc.query_class("node").is_empty());
        assert!(doc.children("list").is_empty());
    }

    #[test]
    fn cleared_slots_are_reused() {
        let (mut doc, list) = doc_with_list();
        for _ in 0..5 {
            doc.clear_children(list);
            let row = doc.append_child(list, &ElementSpec::new("row").with_id("row"));
            doc.append_child(row, &ElementSpec::new("cell").with_id("cell"));
        }

        assert_eq!(doc.node_count(), 3);
        assert_eq!(doc.query_class("cell").len(), 1);
        assert_eq!(doc.children("row").len(), 1);
        assert!(doc.has_class("cell", "cell"));
    }

    #[test]
    fn apply_reports_misses_without_failing() {
        let (mut doc, _) = doc_with_list();
        let matched = doc.apply(&SurfaceOp::set_text(Target::id("missing"), "x"));
        assert_eq!(matched, 0);
    }

    #[test]
    fn apply_reaches_every_class_member() {
        let (mut doc, list) = doc_with_list();
        for i in 0..3 {
            doc.append_child(list, &ElementSpec::new("node active").with_id(format!("n-{i}")));
        }

        let matched = doc.apply(&SurfaceOp::RemoveClasses {
            target: Target::Class("node"),
            classes: vec!["active", "processing"],
        });

        assert_eq!(matched, 3);
        assert!((0..3).all(|i| !doc.has_class(&format!("n-{i}"), "active")));
    }

    #[test]
    fn attribute_query_matches_exact_value() {
        let mut doc = Document::new();
        doc.insert_root(&ElementSpec::new("shape-btn").with_attr("data-shape", "square"));
        doc.insert_root(&ElementSpec::new("shape-btn").with_attr("data-shape", "circle"));
        assert_eq!(doc.query_attr("data-shape", "square").len(), 1);
        assert!(doc.query_attr("data-shape", "hexagon").is_empty());
    }

    #[test]
    fn canvas_is_reachable_by_id() {
        let mut doc = Document::new();
        doc.insert_root(&ElementSpec::new("").with_id("c").canvas(200, 100));
        let canvas = doc.canvas_mut("c").expect("canvas");
        assert_eq!((canvas.width(), canvas.height()), (200.0, 100.0));
        assert!(doc.canvas_mut("missing").is_none());
    }
}
