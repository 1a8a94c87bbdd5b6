use crate::menu::ContextMenu;

/// Notifications queued by the gallery, drained with `Gallery::take_messages()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryMessage {
    /// A commit changed the selection
    SelectionChanged,
    /// Double-click or Enter on an item
    Activated(usize),
    HoverChanged(Option<usize>),
    /// New zoom index
    ZoomChanged(usize),
    /// The range anchor (caret) moved
    AnchorChanged(Option<usize>),
    /// The host should route pointer events to the gallery until `CaptureReleased`
    CaptureRequested,
    CaptureReleased,
}

/// Pre-commit veto: receives the sorted candidate selection, returns `false` to reject it
pub type SelectionVeto = Box<dyn FnMut(&[usize]) -> bool>;

/// Called with the default context menu before it is handed to the host
pub type ContextMenuHook = Box<dyn FnMut(&mut ContextMenu)>;
