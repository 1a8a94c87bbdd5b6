//! Right-click context menu model.
//!
//! The gallery builds the menu, the host shows it and feeds the chosen action back through
//! `Gallery::execute`.

use crate::thumbnail::AspectPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SelectAll,
    ClearSelection,
    InvertSelection,
    ZoomIn,
    ZoomOut,
    SetAspect(AspectPolicy),
    /// Host defined action, ignored by the gallery
    Custom(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
    /// `Some` for check/radio entries
    pub checked: Option<bool>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Entry(MenuEntry),
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    items: Vec<MenuItem>,
    /// Item under the pointer when the menu was opened
    target: Option<usize>,
}

impl ContextMenu {
    pub fn new(target: Option<usize>) -> Self {
        Self { items: Vec::new(), target }
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.items.iter().filter_map(|item| match item {
            MenuItem::Entry(entry) => Some(entry),
            MenuItem::Separator => None,
        })
    }

    pub fn add(&mut self, entry: MenuEntry) {
        self.items.push(MenuItem::Entry(entry));
    }

    pub fn separator(&mut self) {
        // no leading or doubled separators
        if matches!(self.items.last(), Some(MenuItem::Entry(_))) {
            self.items.push(MenuItem::Separator);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
            checked: None,
            enabled: true,
        }
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
