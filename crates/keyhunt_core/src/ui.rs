//! UI label store
//!
//! Labels are named text elements with a visibility flag. Nothing here
//! draws; a frontend reads the labels and presents them.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key to a label in a [`UiLayer`]
    pub struct UiKey;
}

/// A text element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiLabel {
    pub name: String,
    pub text: String,
    pub visible: bool,
}

impl UiLabel {
    pub fn new(name: impl Into<String>, text: impl Into<String>, visible: bool) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            visible,
        }
    }
}

/// All labels of a scene
#[derive(Default)]
pub struct UiLayer {
    labels: SlotMap<UiKey, UiLabel>,
}

impl UiLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_label(&mut self, label: UiLabel) -> UiKey {
        self.labels.insert(label)
    }

    pub fn remove_label(&mut self, key: UiKey) -> Option<UiLabel> {
        self.labels.remove(key)
    }

    pub fn get(&self, key: UiKey) -> Option<&UiLabel> {
        self.labels.get(key)
    }

    /// Look up a label by name
    pub fn find(&self, name: &str) -> Option<UiKey> {
        self.labels
            .iter()
            .find(|(_, label)| label.name == name)
            .map(|(key, _)| key)
    }

    /// Replace a label's text. Returns false for a stale key.
    pub fn set_text(&mut self, key: UiKey, text: impl Into<String>) -> bool {
        match self.labels.get_mut(key) {
            Some(label) => {
                label.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Show or hide a label. Returns false for a stale key.
    pub fn set_visible(&mut self, key: UiKey, visible: bool) -> bool {
        match self.labels.get_mut(key) {
            Some(label) => {
                label.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels currently shown
    pub fn visible_labels(&self) -> impl Iterator<Item = &UiLabel> {
        self.labels.values().filter(|label| label.visible)
    }
}
