//! Selection algebra: combining a baseline selection with marquee hits, and resolving plain clicks.
//!
//! Which modifier keys select which combination is policy, kept in [`SelectionBindings`]. The precedence
//! between the modes is fixed: Intersect > Subtract > Toggle > Add > Replace.

use std::collections::BTreeSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifiers held during a pointer event
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        const LOGO  = 0b0000_1000;
    }
}

/// How marquee hits combine with the baseline selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CombineMode {
    /// hits
    #[default]
    Replace,
    /// baseline ∪ hits
    Add,
    /// baseline − hits
    Subtract,
    /// baseline ∩ hits
    Intersect,
    /// baseline ⊕ hits
    Toggle,
}

impl CombineMode {
    pub fn apply(self, baseline: &BTreeSet<usize>, hits: &BTreeSet<usize>) -> BTreeSet<usize> {
        match self {
            CombineMode::Replace => hits.clone(),
            CombineMode::Add => baseline.union(hits).copied().collect(),
            CombineMode::Subtract => baseline.difference(hits).copied().collect(),
            CombineMode::Intersect => baseline.intersection(hits).copied().collect(),
            CombineMode::Toggle => baseline.symmetric_difference(hits).copied().collect(),
        }
    }
}

/// Modifier policy for marquee and click selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionBindings {
    /// All of these held: intersect
    pub intersect: Modifiers,
    /// Any of these held: subtract
    pub subtract: Modifiers,
    /// Exactly these held: toggle (only when `marquee_toggle` is on)
    pub toggle: Modifiers,
    pub marquee_toggle: bool,
    /// Any of these held: add
    pub add: Modifiers,
    /// Any of these held on click: select the range from the anchor
    pub click_range: Modifiers,
    /// Any of these held on click: toggle the clicked item
    pub click_toggle: Modifiers,
}

impl Default for SelectionBindings {
    fn default() -> Self {
        Self {
            intersect: Modifiers::CTRL | Modifiers::ALT,
            subtract: Modifiers::ALT,
            toggle: Modifiers::CTRL,
            marquee_toggle: true,
            add: Modifiers::SHIFT | Modifiers::CTRL,
            click_range: Modifiers::SHIFT,
            click_toggle: Modifiers::CTRL,
        }
    }
}

impl SelectionBindings {
    /// Marquee mode for the held modifiers. LOGO never takes part in the decision.
    pub fn combine_mode(&self, modifiers: Modifiers) -> CombineMode {
        let mods = modifiers - Modifiers::LOGO;
        let order = [CombineMode::Intersect, CombineMode::Subtract, CombineMode::Toggle, CombineMode::Add];
        order
            .into_iter()
            .find(|mode| match mode {
                CombineMode::Intersect => !self.intersect.is_empty() && mods.contains(self.intersect),
                CombineMode::Subtract => mods.intersects(self.subtract),
                CombineMode::Toggle => self.marquee_toggle && !self.toggle.is_empty() && mods == self.toggle,
                CombineMode::Add => mods.intersects(self.add),
                CombineMode::Replace => false,
            })
            .unwrap_or(CombineMode::Replace)
    }
}

/// Outcome of a deferred click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickResolution {
    pub selection: BTreeSet<usize>,
    /// New anchor, `None` keeps the current one
    pub anchor: Option<usize>,
}

/// Resolves a click on `target`:
///
/// * range modifier with an anchor: the inclusive range between anchor and target, anchor unchanged
/// * toggle modifier: flips `target` in the current selection, anchor moves to target
/// * otherwise: exactly `{target}`, anchor moves to target
pub fn resolve_click(
    current: &BTreeSet<usize>,
    anchor: Option<usize>,
    target: usize,
    modifiers: Modifiers,
    bindings: &SelectionBindings,
) -> ClickResolution {
    if modifiers.intersects(bindings.click_range) {
        if let Some(anchor) = anchor {
            let (lo, hi) = if anchor <= target { (anchor, target) } else { (target, anchor) };
            return ClickResolution {
                selection: (lo..=hi).collect(),
                anchor: None,
            };
        }
    }

    if modifiers.intersects(bindings.click_toggle) {
        let mut selection = current.clone();
        if !selection.remove(&target) {
            selection.insert(target);
        }
        return ClickResolution {
            selection,
            anchor: Some(target),
        };
    }

    ClickResolution {
        selection: BTreeSet::from([target]),
        anchor: Some(target),
    }
}
