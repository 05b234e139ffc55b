use crate::ShotId;

/// Pointer position in the same coordinate space as the card bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a card or of its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// How the hovered view lays out its cards: the shot list stacks them
/// vertically, the timeline strip runs horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAxis {
    Vertical,
    Horizontal,
}

/// Before/after classification against a hovered card. Produced by the
/// resolver, consumed by `ShotBoard::move_shot`; this module never mutates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropIntent {
    pub target: ShotId,
    pub before: bool,
}

/// Classify the pointer against the hovered card's midpoint on the view's
/// flow axis. Both the list and the timeline delegate here, so midpoint
/// math lives in exactly one place.
pub fn resolve_drop(axis: FlowAxis, pointer: Point, target: ShotId, bounds: Bounds) -> DropIntent {
    let before = match axis {
        FlowAxis::Vertical => pointer.y < bounds.center_y(),
        FlowAxis::Horizontal => pointer.x < bounds.center_x(),
    };
    DropIntent { target, before }
}

/// X offset of the timeline insertion line relative to the container's left
/// edge: the hovered element's left edge for "before", its right edge for
/// "after". Computed from bounds alone, independent of the intent pointer.
pub fn indicator_offset(bounds: Bounds, container: Bounds, before: bool) -> f32 {
    let edge = if before { bounds.x } else { bounds.right() };
    edge - container.x
}

/// Live state of one pointer-drag sequence (down -> move* -> up).
#[derive(Debug, Clone)]
pub struct DragSession {
    dragged: ShotId,
    intent: Option<DropIntent>,
}

impl DragSession {
    pub fn begin(dragged: ShotId) -> Self {
        Self {
            dragged,
            intent: None,
        }
    }

    pub fn dragged(&self) -> ShotId {
        self.dragged
    }

    /// Record the latest hover classification. Hovering the dragged card
    /// itself clears the intent; dropping a card onto itself is a no-op.
    pub fn hover(&mut self, intent: DropIntent) {
        if intent.target == self.dragged {
            self.intent = None;
        } else {
            self.intent = Some(intent);
        }
    }

    pub fn intent(&self) -> Option<DropIntent> {
        self.intent
    }

    /// Consume the session on pointer-up, yielding the move to apply (if the
    /// drag ended over a valid target).
    pub fn finish(self) -> Option<(ShotId, DropIntent)> {
        self.intent.map(|intent| (self.dragged, intent))
    }
}
