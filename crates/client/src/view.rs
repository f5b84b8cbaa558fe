use gridbot_protocol::{actions, directions, targets};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    #[default]
    Div,
    Button,
}

/// One node of the page. Mirrors the subset of DOM state the client touches:
/// class list, `data-*` attributes, text content and children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dataset: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    pub fn button(id: &str, label: &str) -> Self {
        Self::new(Tag::Button).with_id(id).with_text(label)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self.set_class_name(class_name);
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.dataset.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    /// Replaces the whole class list, like assigning `className`.
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes = class_name.split_whitespace().map(str::to_string).collect();
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    /// Drops all content, like assigning an empty `innerHTML`.
    pub fn clear(&mut self) {
        self.children.clear();
        self.text.clear();
    }

    /// Replaces all content with plain text, like assigning `textContent`.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        self.text = text.to_string();
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// Ids of the buttons in the standard control panel.
pub mod controls {
    pub const MOVE_UP: &str = "btn-up";
    pub const MOVE_DOWN: &str = "btn-down";
    pub const MOVE_LEFT: &str = "btn-left";
    pub const MOVE_RIGHT: &str = "btn-right";
    pub const PICK_UP: &str = "btn-pick";
    pub const DROP: &str = "btn-drop";
}

/// The page the client draws into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Standard game page: grid, holding indicator, message line, controls and export button.
    pub fn new() -> Self {
        let move_button = |id: &str, label: &str, direction: &str| {
            Element::button(id, label)
                .with_data("action", actions::MOVE)
                .with_data("direction", direction)
        };
        let [up, down, left, right] = directions::ALL;

        let panel = Element::div()
            .with_id(targets::CONTROLS)
            .with_class_name("controls")
            .with_child(move_button(controls::MOVE_UP, "Up", up))
            .with_child(move_button(controls::MOVE_LEFT, "Left", left))
            .with_child(move_button(controls::MOVE_RIGHT, "Right", right))
            .with_child(move_button(controls::MOVE_DOWN, "Down", down))
            .with_child(
                Element::button(controls::PICK_UP, "Pick up").with_data("action", actions::PICK_UP),
            )
            .with_child(Element::button(controls::DROP, "Drop").with_data("action", actions::DROP));

        let body = Element::div()
            .with_child(Element::div().with_id(targets::GRID).with_class_name("grid"))
            .with_child(
                Element::div()
                    .with_id(targets::HOLDING)
                    .with_class_name("holding empty"),
            )
            .with_child(
                Element::div()
                    .with_id(targets::MESSAGE)
                    .with_class_name("message"),
            )
            .with_child(panel)
            .with_child(Element::button(targets::EXPORT_BTN, "Export history"));

        Self { body }
    }

    /// A page with a caller-supplied layout. Regions the client looks for but cannot
    /// find are skipped.
    pub fn from_body(body: Element) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.body.find(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_mut(id)
    }

    /// Grid cell drawn at iteration position `(x, y)`.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Element> {
        let (x, y) = (x.to_string(), y.to_string());
        self.get(targets::GRID)?
            .children
            .iter()
            .find(|cell| cell.data("x") == Some(x.as_str()) && cell.data("y") == Some(y.as_str()))
    }

    /// Stable serialization of the whole tree, used to compare two views byte for byte.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_replaces_instead_of_accumulating() {
        let mut el = Element::div().with_class_name("message show success");
        el.set_class_name("message show");
        assert_eq!(el.class_name(), "message show");
        el.add_class("show");
        assert_eq!(el.classes.len(), 2);
        el.remove_class("show");
        assert_eq!(el.class_name(), "message");
    }

    #[test]
    fn set_text_drops_children() {
        let mut el = Element::div().with_child(Element::div());
        el.set_text("Empty");
        assert!(el.children.is_empty());
        assert_eq!(el.text, "Empty");
        el.clear();
        assert!(el.text.is_empty());
    }

    #[test]
    fn standard_page_has_all_regions() {
        let doc = Document::new();
        for id in [
            targets::GRID,
            targets::HOLDING,
            targets::MESSAGE,
            targets::CONTROLS,
            targets::EXPORT_BTN,
            controls::MOVE_UP,
            controls::DROP,
        ] {
            assert!(doc.get(id).is_some(), "missing {id}");
        }
        let up = doc.get(controls::MOVE_UP).unwrap();
        assert_eq!(up.tag, Tag::Button);
        assert_eq!(up.data("action"), Some("move"));
        assert_eq!(up.data("direction"), Some("up"));
        assert_eq!(doc.get(controls::PICK_UP).unwrap().data("direction"), None);
        assert!(doc.get(targets::EXPORT_BTN).unwrap().dataset.is_empty());
    }
}
