//! Per-editor formatting state and the session-owned editor registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Content snapshots kept for undo/redo.
const HISTORY_LIMIT: usize = 50;

/// Formatting preferences and content for one editor instance. The
/// formatting fields carry CSS-ish values chosen by the host toolbar; the
/// content string moves through a bounded linear history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorState {
    pub editor_id: String,
    pub font_size: u32,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_color: String,
    pub background_color: String,
    pub background_text_color: String,
    pub text_decoration: String,
    pub text_align: String,
    pub line_height: String,
    pub bullet_list: String,
    pub number_list: String,
    pub link: String,
    pub capitalize: String,
    pub content: String,
    #[serde(skip)]
    history: Vec<String>,
    #[serde(skip)]
    history_index: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            editor_id: String::new(),
            font_size: 15,
            font_family: "Arial".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            background_text_color: "#ffff00".to_string(),
            text_decoration: "none".to_string(),
            text_align: "left".to_string(),
            line_height: "normal".to_string(),
            bullet_list: "default".to_string(),
            number_list: "default".to_string(),
            link: String::new(),
            capitalize: "none".to_string(),
            content: String::new(),
            history: vec![String::new()],
            history_index: 0,
        }
    }
}

impl EditorState {
    pub fn new(editor_id: impl Into<String>) -> Self {
        Self {
            editor_id: editor_id.into(),
            ..Self::default()
        }
    }

    /// Set the content and record it in the history, trimming any redo tail
    /// and capping the history at [`HISTORY_LIMIT`] entries.
    pub fn update_content(&mut self, value: &str) {
        if self.history.is_empty() {
            self.history.push(self.content.clone());
            self.history_index = 0;
        }
        if self.history[self.history_index] != value {
            self.history.truncate(self.history_index + 1);
            self.history.push(value.to_string());
            if self.history.len() > HISTORY_LIMIT {
                let excess = self.history.len() - HISTORY_LIMIT;
                self.history.drain(..excess);
            }
            self.history_index = self.history.len() - 1;
        }
        self.content = value.to_string();
    }

    /// Step back one content snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.history_index == 0 {
            return false;
        }
        self.history_index -= 1;
        if let Some(value) = self.history.get(self.history_index) {
            self.content = value.clone();
        }
        true
    }

    /// Step forward one content snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.history_index + 1 >= self.history.len() {
            return false;
        }
        self.history_index += 1;
        self.content = self.history[self.history_index].clone();
        true
    }

    /// Reset every formatting field to its default. Content and history are
    /// untouched.
    pub fn reset_to_defaults(&mut self) {
        let defaults = Self::default();
        self.font_size = defaults.font_size;
        self.font_family = defaults.font_family;
        self.font_weight = defaults.font_weight;
        self.font_style = defaults.font_style;
        self.text_color = defaults.text_color;
        self.background_color = defaults.background_color;
        self.background_text_color = defaults.background_text_color;
        self.text_decoration = defaults.text_decoration;
        self.text_align = defaults.text_align;
        self.line_height = defaults.line_height;
        self.bullet_list = defaults.bullet_list;
        self.number_list = defaults.number_list;
        self.link = defaults.link;
        self.capitalize = defaults.capitalize;
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Copy another state's formatting fields and content into this editor.
    /// The editor id stays ours; the content change goes through the history.
    pub fn import_state(&mut self, state: &EditorState) {
        self.font_size = state.font_size;
        self.font_family = state.font_family.clone();
        self.font_weight = state.font_weight.clone();
        self.font_style = state.font_style.clone();
        self.text_color = state.text_color.clone();
        self.background_color = state.background_color.clone();
        self.background_text_color = state.background_text_color.clone();
        self.text_decoration = state.text_decoration.clone();
        self.text_align = state.text_align.clone();
        self.line_height = state.line_height.clone();
        self.bullet_list = state.bullet_list.clone();
        self.number_list = state.number_list.clone();
        self.link = state.link.clone();
        self.capitalize = state.capitalize.clone();
        let content = state.content.clone();
        self.update_content(&content);
    }
}

/// Explicit registry of editor states, keyed by editor id and owned by the
/// host session. Replaces any notion of a process-wide store map.
#[derive(Debug, Clone, Default)]
pub struct EditorRegistry {
    editors: HashMap<String, EditorState>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an editor id, returning its state; an already-registered id
    /// keeps its existing state.
    pub fn register(&mut self, editor_id: &str) -> &mut EditorState {
        self.editors
            .entry(editor_id.to_string())
            .or_insert_with(|| EditorState::new(editor_id))
    }

    /// Drop an editor's state. Returns false when the id was never
    /// registered.
    pub fn unregister(&mut self, editor_id: &str) -> bool {
        self.editors.remove(editor_id).is_some()
    }

    pub fn get(&self, editor_id: &str) -> Option<&EditorState> {
        self.editors.get(editor_id)
    }

    pub fn get_mut(&mut self, editor_id: &str) -> Option<&mut EditorState> {
        self.editors.get_mut(editor_id)
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}
