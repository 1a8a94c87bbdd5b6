//! Pointer gesture state machine: deferred clicks and marquee drags.
//!
//! ```text
//!   Idle --press--> PendingClick --move > threshold--> Dragging
//!    ^                  |                                 |
//!    +----release-------+-------------release-------------+
//! ```
//!
//! All points are in content coordinates. The machine itself never touches the gallery; it reads the
//! current selection through [`GestureContext`] and reports what to commit in a [`GestureOutcome`].

use std::collections::BTreeSet;

use crate::geometry::{Point, Rect};
use crate::selection::{resolve_click, Modifiers, SelectionBindings};

/// Default drag threshold: a move must exceed this many pixels on either axis to start a marquee
pub const DEFAULT_DRAG_THRESHOLD: i32 = 2;

/// Read access to the selection state a gesture works on
pub trait GestureContext {
    fn current_selection(&self) -> BTreeSet<usize>;
    fn anchor(&self) -> Option<usize>;
    /// Items whose tiles intersect `rect` (content coordinates)
    fn hits_in(&self, rect: Rect) -> BTreeSet<usize>;
}

/// Item pressed on, remembered until release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTarget {
    pub index: usize,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGesture {
    pub origin: Point,
    /// Selection marquee modes combine against
    pub baseline: BTreeSet<usize>,
    /// `None` for presses on empty space and adopted drags
    pub click: Option<ClickTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeDrag {
    pub origin: Point,
    pub current: Point,
    pub baseline: BTreeSet<usize>,
}

impl MarqueeDrag {
    /// Normalized marquee rectangle, both corners included
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    PendingClick(PendingGesture),
    Dragging(MarqueeDrag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureInput {
    /// Primary button went down, `hit` is the item under the pointer
    Press { point: Point, hit: Option<usize>, modifiers: Modifiers },
    /// Pointer entered with the primary button already held
    Adopt { point: Point },
    Move { point: Point, modifiers: Modifiers },
    Release { point: Point, modifiers: Modifiers },
    CaptureLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChange {
    Request,
    Release,
}

/// Side effects of one transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureOutcome {
    /// Candidate selection to run through the commit protocol
    pub commit: Option<BTreeSet<usize>>,
    /// New anchor
    pub anchor: Option<usize>,
    pub capture: Option<CaptureChange>,
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }

    /// Marquee rectangle while dragging
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            GestureState::Dragging(drag) => Some(drag.rect()),
            _ => None,
        }
    }

    /// The only transition function
    pub fn step(self, input: GestureInput, ctx: &dyn GestureContext, bindings: &SelectionBindings, threshold: i32) -> (GestureState, GestureOutcome) {
        let mut outcome = GestureOutcome::default();
        let was_idle = self.is_idle();

        let next = match (self, input) {
            (_, GestureInput::Press { point, hit, modifiers }) => {
                if was_idle {
                    outcome.capture = Some(CaptureChange::Request);
                }
                let current = ctx.current_selection();
                match hit {
                    Some(index) => GestureState::PendingClick(PendingGesture {
                        origin: point,
                        baseline: current,
                        click: Some(ClickTarget { index, modifiers }),
                    }),
                    None => {
                        let plain = (modifiers - Modifiers::LOGO).is_empty();
                        let baseline = if plain {
                            if !current.is_empty() {
                                outcome.commit = Some(BTreeSet::new());
                            }
                            BTreeSet::new()
                        } else {
                            current
                        };
                        GestureState::PendingClick(PendingGesture {
                            origin: point,
                            baseline,
                            click: None,
                        })
                    }
                }
            }

            (GestureState::Idle, GestureInput::Adopt { point }) => {
                log::debug!("[Gesture] adopting drag at {point}");
                outcome.capture = Some(CaptureChange::Request);
                GestureState::PendingClick(PendingGesture {
                    origin: point,
                    baseline: ctx.current_selection(),
                    click: None,
                })
            }
            // already tracking, an adopt is just a move
            (state, GestureInput::Adopt { point }) => return state.step(GestureInput::Move { point, modifiers: Modifiers::empty() }, ctx, bindings, threshold),

            (GestureState::Idle, GestureInput::Move { .. }) => GestureState::Idle,
            (GestureState::PendingClick(pending), GestureInput::Move { point, modifiers }) => {
                let dx = (point.x - pending.origin.x).abs();
                let dy = (point.y - pending.origin.y).abs();
                if dx > threshold || dy > threshold {
                    let drag = MarqueeDrag {
                        origin: pending.origin,
                        current: point,
                        baseline: pending.baseline,
                    };
                    outcome.commit = Some(combine(&drag, modifiers, ctx, bindings));
                    GestureState::Dragging(drag)
                } else {
                    GestureState::PendingClick(pending)
                }
            }
            (GestureState::Dragging(mut drag), GestureInput::Move { point, modifiers }) => {
                drag.current = point;
                outcome.commit = Some(combine(&drag, modifiers, ctx, bindings));
                GestureState::Dragging(drag)
            }

            (GestureState::Idle, GestureInput::Release { .. }) => GestureState::Idle,
            (GestureState::PendingClick(pending), GestureInput::Release { .. }) => {
                if let Some(click) = pending.click {
                    let resolution = resolve_click(&ctx.current_selection(), ctx.anchor(), click.index, click.modifiers, bindings);
                    outcome.commit = Some(resolution.selection);
                    outcome.anchor = resolution.anchor;
                }
                outcome.capture = Some(CaptureChange::Release);
                GestureState::Idle
            }
            (GestureState::Dragging(mut drag), GestureInput::Release { point, modifiers }) => {
                drag.current = point;
                outcome.commit = Some(combine(&drag, modifiers, ctx, bindings));
                outcome.capture = Some(CaptureChange::Release);
                GestureState::Idle
            }

            (state, GestureInput::CaptureLost) => {
                if !state.is_idle() {
                    log::debug!("[Gesture] capture lost, gesture dropped");
                }
                GestureState::Idle
            }
        };

        (next, outcome)
    }
}

fn combine(drag: &MarqueeDrag, modifiers: Modifiers, ctx: &dyn GestureContext, bindings: &SelectionBindings) -> BTreeSet<usize> {
    let mode = bindings.combine_mode(modifiers);
    let hits = ctx.hits_in(drag.rect());
    log::trace!("[Gesture] marquee {} mode {mode:?} hits {}", drag.rect(), hits.len());
    mode.apply(&drag.baseline, &hits)
}
