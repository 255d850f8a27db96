// File: src/memory.rs
// Purpose: In-memory document with HTML5 native constraint validation

use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

use college_forms_validation_core::{char_len, is_valid_email, is_valid_url, parse_number};

use crate::document::{Document, FieldTarget, ValidityState};

/// Input types a browser recognises; anything else behaves as `text`
const INPUT_TYPES: &[&str] = &[
    "text", "search", "tel", "url", "email", "password", "date", "month", "week", "time",
    "datetime-local", "number", "range", "color", "checkbox", "radio", "file", "hidden",
    "submit", "reset", "button", "image",
];

/// Index of a node in a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl<'a> From<NodeId> for FieldTarget<'a, NodeId> {
    fn from(id: NodeId) -> Self {
        FieldTarget::Handle(id)
    }
}

/// Element description used to build a document
///
/// ```
/// use college_forms::Element;
///
/// let email = Element::input("email")
///     .id("email")
///     .flag("required")
///     .data("validate-email", "")
///     .value("admissions@college.edu");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    value: String,
    checked: bool,
    text: String,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn form(id: &str) -> Self {
        Self::new("form").id(id)
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn input(input_type: &str) -> Self {
        Self::new("input").attr("type", input_type)
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    pub fn textarea() -> Self {
        Self::new("textarea")
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Boolean attribute such as `required` or `disabled`
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// `data-{key}` attribute
    pub fn data(self, key: &str, value: &str) -> Self {
        self.attr(&format!("data-{key}"), value)
    }

    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree
///
/// Removing a node frees its slot (and its subtree's) for the next
/// [`append`](MemoryDocument::append), so a long-lived document that keeps
/// redrawing feedback stays the same size. A `NodeId` kept past its removal
/// may later name a different node.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    focused: Option<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                element: Element::new("body"),
                parent: None,
                children: Vec::new(),
            }],
            free: Vec::new(),
            focused: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `element` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let node = Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach a node and free the slots of its whole subtree
    ///
    /// Removing the root or an already-removed node does nothing.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.node_mut(id).and_then(|node| node.parent.take()) else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != id);

        let mut freed = self.descendants(id);
        freed.push(id);
        for node in freed {
            self.nodes[node.0] = Node {
                element: Element::default(),
                parent: None,
                children: Vec::new(),
            };
            if self.focused == Some(node) {
                self.focused = None;
            }
            self.free.push(node);
        }
    }

    /// Number of live nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Setters ignore ids that do not belong to this document

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.element.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(node) = self.node_mut(id) {
            node.element.checked = checked;
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.element
                .attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.element.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].element.tag
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].element.text
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        &self.nodes[id.0].element.classes
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Texts of the feedback nodes with `class` next to the field
    pub fn feedback_texts(&self, field: NodeId, class: &str) -> Vec<String> {
        let Some(parent) = self.parent(field) else {
            return Vec::new();
        };
        self.children(parent)
            .iter()
            .filter(|child| self.classes(**child).iter().any(|c| c == class))
            .map(|child| self.text(*child).to_string())
            .collect()
    }

    /// All nodes reachable from the root, in document (pre-)order
    fn attached(&self) -> Vec<NodeId> {
        self.descendants(self.root())
    }

    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0].element.attributes.get(name).map(String::as_str)
    }

    fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].element.attributes.contains_key(name)
    }

    fn is_field(&self, id: NodeId) -> bool {
        matches!(self.tag(id), "input" | "select" | "textarea")
    }

    fn find_form(&self, form_id: &str) -> Option<NodeId> {
        self.attached()
            .into_iter()
            .find(|id| self.tag(*id) == "form" && self.attr(*id, "id") == Some(form_id))
    }

    fn owning_form(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.tag(node) == "form" {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Native validity, computed like a browser's constraint validation
    ///
    /// Length constraints apply to any non-empty value, not only user-edited ones.
    fn compute_validity(&self, id: NodeId) -> ValidityState {
        let mut validity = ValidityState::default();
        let kind = self.field_type(id);

        // Barred from constraint validation
        if matches!(kind.as_str(), "hidden" | "submit" | "reset" | "button" | "image") {
            return validity;
        }

        let element = &self.nodes[id.0].element;
        let value = element.value.as_str();

        if self.has_attr(id, "required") {
            validity.value_missing = match kind.as_str() {
                "checkbox" | "radio" => !element.checked,
                _ => value.is_empty(),
            };
        }

        if value.is_empty() {
            return validity;
        }

        match kind.as_str() {
            "email" => validity.type_mismatch = !is_valid_email(value),
            "url" => validity.type_mismatch = !is_valid_url(value),
            "number" | "range" => match parse_number(value) {
                Some(number) => {
                    let limit = |name: &str| self.attr(id, name).and_then(parse_number);
                    if let Some(min) = limit("min") {
                        validity.range_underflow = number < min;
                    }
                    if let Some(max) = limit("max") {
                        validity.range_overflow = number > max;
                    }
                }
                None => validity.bad_input = true,
            },
            _ => {}
        }

        let text_like = matches!(
            kind.as_str(),
            "text" | "search" | "url" | "tel" | "email" | "password"
        );

        if text_like || kind == "textarea" {
            let length = char_len(value);
            let limit = |name: &str| {
                self.attr(id, name)
                    .and_then(|v| v.trim().parse::<usize>().ok())
            };
            if let Some(min) = limit("minlength") {
                validity.too_short = length < min;
            }
            if let Some(max) = limit("maxlength") {
                validity.too_long = length > max;
            }
        }

        if text_like {
            if let Some(pattern) = self.attr(id, "pattern") {
                // An uncompilable pattern is ignored, as browsers do
                match Regex::new(&format!("^(?:{pattern})$")) {
                    Ok(re) => validity.pattern_mismatch = !re.is_match(value),
                    Err(err) => warn!(pattern, %err, "ignoring invalid pattern attribute"),
                }
            }
        }

        validity
    }

    fn field_type(&self, id: NodeId) -> String {
        match self.tag(id) {
            "select" if self.has_attr(id, "multiple") => "select-multiple".to_string(),
            "select" => "select-one".to_string(),
            "textarea" => "textarea".to_string(),
            _ => {
                let declared = self.attr(id, "type").unwrap_or("text").to_ascii_lowercase();
                if INPUT_TYPES.contains(&declared.as_str()) {
                    declared
                } else {
                    "text".to_string()
                }
            }
        }
    }
}

impl Document for MemoryDocument {
    type Handle = NodeId;

    fn has_form(&self, form_id: &str) -> bool {
        self.find_form(form_id).is_some()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached()
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    fn form_id_of(&self, field: &NodeId) -> Option<String> {
        let form = self.owning_form(*field)?;
        self.attr(form, "id").map(str::to_string)
    }

    fn form_fields(&self, form_id: &str) -> Vec<NodeId> {
        match self.find_form(form_id) {
            Some(form) => self
                .descendants(form)
                .into_iter()
                .filter(|id| self.is_field(*id))
                .collect(),
            None => Vec::new(),
        }
    }

    fn value(&self, field: &NodeId) -> String {
        self.nodes[field.0].element.value.clone()
    }

    fn input_type(&self, field: &NodeId) -> String {
        self.field_type(*field)
    }

    fn is_disabled(&self, field: &NodeId) -> bool {
        self.has_attr(*field, "disabled")
    }

    fn attribute(&self, field: &NodeId, name: &str) -> Option<String> {
        self.attr(*field, &name.to_ascii_lowercase()).map(str::to_string)
    }

    fn validity(&self, field: &NodeId) -> ValidityState {
        self.compute_validity(*field)
    }

    fn has_class(&self, field: &NodeId, class: &str) -> bool {
        self.classes(*field).iter().any(|c| c == class)
    }

    fn add_class(&mut self, field: &NodeId, class: &str) {
        let classes = &mut self.nodes[field.0].element.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, field: &NodeId, class: &str) {
        self.nodes[field.0].element.classes.retain(|c| c != class);
    }

    fn remove_feedback(&mut self, field: &NodeId, classes: &[&str]) {
        let Some(parent) = self.parent(*field) else {
            return;
        };
        let stale: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|child| {
                self.classes(*child)
                    .iter()
                    .any(|c| classes.contains(&c.as_str()))
            })
            .collect();
        for node in stale {
            self.remove(node);
        }
    }

    fn append_feedback(&mut self, field: &NodeId, class: &str, text: &str) {
        if let Some(parent) = self.parent(*field) {
            self.append(parent, Element::div().class(class).text(text));
        }
    }

    fn focus(&mut self, field: &NodeId) {
        self.focused = Some(*field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_field(field: Element) -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), Element::form("f"));
        let group = doc.append(form, Element::div());
        let id = doc.append(group, field);
        (doc, id)
    }

    #[test]
    fn test_required_value_missing() {
        let (doc, id) = single_field(Element::input("text").flag("required"));
        assert!(doc.validity(&id).value_missing);

        let (doc, id) = single_field(Element::input("checkbox").flag("required"));
        assert!(doc.validity(&id).value_missing);

        let (doc, id) = single_field(Element::input("checkbox").flag("required").checked(true));
        assert!(doc.validity(&id).valid());
    }

    #[test]
    fn test_type_mismatch() {
        let (doc, id) = single_field(Element::input("email").value("not-an-email"));
        assert!(doc.validity(&id).type_mismatch);

        let (doc, id) = single_field(Element::input("url").value("college.edu"));
        assert!(doc.validity(&id).type_mismatch);

        let (doc, id) = single_field(Element::input("url").value("https://college.edu"));
        assert!(doc.validity(&id).valid());
    }

    #[test]
    fn test_length_and_range() {
        let (doc, id) = single_field(Element::input("text").attr("minlength", "3").value("ab"));
        assert!(doc.validity(&id).too_short);

        let (doc, id) = single_field(Element::textarea().attr("maxlength", "3").value("abcd"));
        assert!(doc.validity(&id).too_long);

        let (doc, id) = single_field(Element::input("number").attr("min", "1").value("0"));
        assert!(doc.validity(&id).range_underflow);

        let (doc, id) = single_field(Element::input("number").attr("max", "10").value("11"));
        assert!(doc.validity(&id).range_overflow);

        let (doc, id) = single_field(Element::input("number").value("eleven"));
        assert!(doc.validity(&id).bad_input);
    }

    #[test]
    fn test_pattern() {
        let (doc, id) = single_field(Element::input("text").attr("pattern", "[0-9]{5}").value("12345"));
        assert!(doc.validity(&id).valid());

        // The pattern must match the whole value
        let (doc, id) = single_field(Element::input("text").attr("pattern", "[0-9]{5}").value("123456"));
        assert!(doc.validity(&id).pattern_mismatch);

        let (doc, id) = single_field(Element::input("text").attr("pattern", "([").value("x"));
        assert!(doc.validity(&id).valid());
    }

    #[test]
    fn test_empty_optional_value_is_valid() {
        let (doc, id) = single_field(
            Element::input("email")
                .attr("minlength", "5")
                .attr("pattern", "x+"),
        );
        assert!(doc.validity(&id).valid());
    }

    #[test]
    fn test_field_lookup_and_order() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), Element::form("collegeForm"));
        let a = doc.append(form, Element::input("text").id("name"));
        let group = doc.append(form, Element::div());
        let b = doc.append(group, Element::select().id("state"));
        let c = doc.append(form, Element::textarea().id("notes"));
        doc.append(form, Element::div().id("not-a-field"));

        assert!(doc.has_form("collegeForm"));
        assert!(!doc.has_form("name"));
        assert_eq!(doc.form_fields("collegeForm"), vec![a, b, c]);
        assert_eq!(doc.element_by_id("state"), Some(b));
        assert_eq!(doc.form_id_of(&b).as_deref(), Some("collegeForm"));
        assert_eq!(doc.input_type(&b), "select-one");
        assert_eq!(doc.input_type(&c), "textarea");
    }

    #[test]
    fn test_unknown_input_type_is_text() {
        let (doc, id) = single_field(Element::input("fancy"));
        assert_eq!(doc.input_type(&id), "text");
    }

    #[test]
    fn test_feedback_nodes_replace() {
        let (mut doc, id) = single_field(Element::input("text"));
        doc.append_feedback(&id, "invalid-feedback", "first");
        doc.append_feedback(&id, "valid-feedback", "second");
        assert_eq!(doc.feedback_texts(id, "invalid-feedback"), vec!["first".to_string()]);

        doc.remove_feedback(&id, &["invalid-feedback", "valid-feedback"]);
        assert!(doc.feedback_texts(id, "invalid-feedback").is_empty());
        assert!(doc.feedback_texts(id, "valid-feedback").is_empty());
        assert_eq!(doc.children(doc.parent(id).unwrap()), &[id]);
    }

    #[test]
    fn test_redrawn_feedback_reuses_slots() {
        let (mut doc, id) = single_field(Element::input("text"));
        doc.append_feedback(&id, "invalid-feedback", "first");
        let size = doc.len();

        for _ in 0..50 {
            doc.remove_feedback(&id, &["invalid-feedback"]);
            doc.append_feedback(&id, "invalid-feedback", "again");
        }
        assert_eq!(doc.len(), size);
        assert_eq!(doc.feedback_texts(id, "invalid-feedback"), vec!["again".to_string()]);
    }

    #[test]
    fn test_removing_a_subtree_frees_every_slot() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), Element::form("f"));
        let group = doc.append(form, Element::div());
        let field = doc.append(group, Element::input("text"));
        doc.focus(&field);
        assert_eq!(doc.len(), 4);

        doc.remove(group);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.focused(), None);

        // Removing twice is harmless
        doc.remove(group);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_setters_ignore_foreign_ids() {
        let (mut doc, id) = single_field(Element::input("checkbox").flag("required"));
        let foreign = NodeId(999);
        doc.set_value(foreign, "x");
        doc.set_checked(foreign, true);
        doc.set_attribute(foreign, "required", "");
        doc.remove_attribute(foreign, "required");
        assert!(doc.validity(&id).value_missing);

        doc.set_checked(id, true);
        assert!(doc.validity(&id).valid());

        doc.set_checked(id, false);
        doc.remove_attribute(id, "REQUIRED");
        assert!(doc.validity(&id).valid());
    }

    #[test]
    fn test_removed_nodes_are_unreachable() {
        let (mut doc, id) = single_field(Element::input("text").id("gone"));
        doc.remove(id);
        assert_eq!(doc.element_by_id("gone"), None);
        assert!(doc.form_fields("f").is_empty());
    }
}
