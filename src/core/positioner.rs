//! Popup positioning.
//!
//! A `Positioner` describes where a transient window should appear
//! relative to an anchor rectangle on its parent: an anchor point on the
//! rectangle, a gravity the child extends toward, a user offset, and a
//! bitmask of fallback strategies for when the naive placement leaves
//! the monitor. `resolve_placement` runs the constraint solver in device
//! space and hands back a logical origin and possibly shrunken size.

use crate::core::geometry::{Offset, Point, PointF, Rect, RectF, Size};

/// Point on the anchor rectangle a popup is positioned relative to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Anchor {
    /// Decode a raw channel value. Unknown values degrade to `None`,
    /// which positions against the rectangle center.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Top,
            2 => Self::Bottom,
            3 => Self::Left,
            4 => Self::Right,
            5 => Self::TopLeft,
            6 => Self::BottomLeft,
            7 => Self::TopRight,
            8 => Self::BottomRight,
            _ => Self::None,
        }
    }

    /// Mirror across the vertical axis.
    pub fn flip_x(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopLeft => Self::TopRight,
            Self::BottomLeft => Self::BottomRight,
            Self::TopRight => Self::TopLeft,
            Self::BottomRight => Self::BottomLeft,
            other => other,
        }
    }

    /// Mirror across the horizontal axis.
    pub fn flip_y(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::TopLeft => Self::BottomLeft,
            Self::BottomLeft => Self::TopLeft,
            Self::TopRight => Self::BottomRight,
            Self::BottomRight => Self::TopRight,
            other => other,
        }
    }
}

/// Direction a popup extends away from its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gravity {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Gravity {
    /// Decode a raw channel value. Unknown values degrade to `None`,
    /// which centers the child on the anchor point.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Top,
            2 => Self::Bottom,
            3 => Self::Left,
            4 => Self::Right,
            5 => Self::TopLeft,
            6 => Self::BottomLeft,
            7 => Self::TopRight,
            8 => Self::BottomRight,
            _ => Self::None,
        }
    }

    /// Gravity that makes the named edge/corner of the child touch the
    /// anchor point: the point-symmetric opposite of the child anchor.
    pub fn opposite_of(anchor: Anchor) -> Self {
        match anchor {
            Anchor::None => Self::None,
            Anchor::Top => Self::Bottom,
            Anchor::Bottom => Self::Top,
            Anchor::Left => Self::Right,
            Anchor::Right => Self::Left,
            Anchor::TopLeft => Self::BottomRight,
            Anchor::BottomLeft => Self::TopRight,
            Anchor::TopRight => Self::BottomLeft,
            Anchor::BottomRight => Self::TopLeft,
        }
    }

    /// Mirror across the vertical axis.
    pub fn flip_x(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopLeft => Self::TopRight,
            Self::BottomLeft => Self::BottomRight,
            Self::TopRight => Self::TopLeft,
            Self::BottomRight => Self::BottomLeft,
            other => other,
        }
    }

    /// Mirror across the horizontal axis.
    pub fn flip_y(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::TopLeft => Self::BottomLeft,
            Self::BottomLeft => Self::TopLeft,
            Self::TopRight => Self::BottomRight,
            Self::BottomRight => Self::TopRight,
            other => other,
        }
    }
}

/// Fallback strategies to apply when the naive placement is constrained.
///
/// Per axis only the highest-precedence set bit runs: flip, then slide,
/// then resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintAdjustment(u32);

impl ConstraintAdjustment {
    pub const NONE: Self = Self(0);
    pub const SLIDE_X: Self = Self(1);
    pub const SLIDE_Y: Self = Self(2);
    pub const FLIP_X: Self = Self(4);
    pub const FLIP_Y: Self = Self(8);
    pub const RESIZE_X: Self = Self(16);
    pub const RESIZE_Y: Self = Self(32);

    /// Decode a raw channel bitmask; unknown bits are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0x3f)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 != 0
    }
}

impl std::ops::BitOr for ConstraintAdjustment {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Request-scoped placement descriptor for a transient window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positioner {
    /// Anchor rectangle in the parent's logical space.
    pub anchor_rect: Rect,
    pub anchor: Anchor,
    pub gravity: Gravity,
    /// User offset in device units.
    pub offset: Offset,
    pub constraint_adjustment: ConstraintAdjustment,
}

/// Point on the device-space anchor rectangle selected by `anchor`.
fn parent_anchor_point(anchor: Anchor, rect: &RectF) -> PointF {
    let center = rect.center();
    match anchor {
        Anchor::Top => PointF {
            x: center.x,
            y: rect.top,
        },
        Anchor::Bottom => PointF {
            x: center.x,
            y: rect.bottom,
        },
        Anchor::Left => PointF {
            x: rect.left,
            y: center.y,
        },
        Anchor::Right => PointF {
            x: rect.right,
            y: center.y,
        },
        Anchor::TopLeft => PointF {
            x: rect.left,
            y: rect.top,
        },
        Anchor::BottomLeft => PointF {
            x: rect.left,
            y: rect.bottom,
        },
        Anchor::TopRight => PointF {
            x: rect.right,
            y: rect.top,
        },
        Anchor::BottomRight => PointF {
            x: rect.right,
            y: rect.bottom,
        },
        Anchor::None => center,
    }
}

/// Offset from the anchor point to the child's top-left corner such that
/// the child extends in the direction `gravity` names.
fn child_anchor_offset(gravity: Gravity, child: PointF) -> PointF {
    match gravity {
        Gravity::Top => PointF {
            x: -child.x / 2.0,
            y: -child.y,
        },
        Gravity::Bottom => PointF {
            x: -child.x / 2.0,
            y: 0.0,
        },
        Gravity::Left => PointF {
            x: -child.x,
            y: -child.y / 2.0,
        },
        Gravity::Right => PointF {
            x: 0.0,
            y: -child.y / 2.0,
        },
        Gravity::TopLeft => PointF {
            x: -child.x,
            y: -child.y,
        },
        Gravity::BottomLeft => PointF {
            x: -child.x,
            y: 0.0,
        },
        Gravity::TopRight => PointF {
            x: 0.0,
            y: -child.y,
        },
        Gravity::BottomRight => PointF { x: 0.0, y: 0.0 },
        Gravity::None => PointF {
            x: -child.x / 2.0,
            y: -child.y / 2.0,
        },
    }
}

fn combine(parent_point: PointF, child_offset: PointF, offset: PointF) -> PointF {
    PointF {
        x: parent_point.x + child_offset.x + offset.x,
        y: parent_point.y + child_offset.y + offset.y,
    }
}

/// Amount a constrained axis may shrink by: the penetration depth,
/// clamped so the child keeps at least one device pixel.
fn shrink_amount(penetration: f64, child: f64) -> f64 {
    if child <= 2.0 {
        return 0.0;
    }
    penetration.clamp(1.0, child - 1.0)
}

/// Resolve the placement of a transient window.
///
/// `parent_frame` and `monitor_frame` are device-space rectangles; `scale`
/// is the parent monitor's DPI scale. The result is the child's origin and
/// adjusted size in the parent's logical space, truncated toward zero.
pub fn resolve_placement(
    positioner: &Positioner,
    child_size: Size,
    parent_frame: Rect,
    monitor_frame: Rect,
    scale: f64,
) -> (Point, Size) {
    let anchor_rect = RectF {
        left: parent_frame.x as f64 + positioner.anchor_rect.x as f64 * scale,
        top: parent_frame.y as f64 + positioner.anchor_rect.y as f64 * scale,
        right: parent_frame.x as f64
            + (positioner.anchor_rect.x + positioner.anchor_rect.width) as f64 * scale,
        bottom: parent_frame.y as f64
            + (positioner.anchor_rect.y + positioner.anchor_rect.height) as f64 * scale,
    };

    let mut child = PointF {
        x: child_size.width as f64 * scale,
        y: child_size.height as f64 * scale,
    };

    let mut anchor = positioner.anchor;
    let mut gravity = positioner.gravity;
    let mut offset = PointF {
        x: positioner.offset.dx as f64,
        y: positioner.offset.dy as f64,
    };

    let mut parent_point = parent_anchor_point(anchor, &anchor_rect);
    let mut child_offset = child_anchor_offset(gravity, child);
    let mut origin = combine(parent_point, child_offset, offset);

    let monitor_left = monitor_frame.x as f64;
    let monitor_top = monitor_frame.y as f64;
    let monitor_right = monitor_frame.right() as f64;
    let monitor_bottom = monitor_frame.bottom() as f64;

    let adjustment = positioner.constraint_adjustment;

    // X axis
    if origin.x < monitor_left || origin.x + child.x > monitor_right {
        if adjustment.contains(ConstraintAdjustment::FLIP_X) {
            anchor = anchor.flip_x();
            gravity = gravity.flip_x();
            parent_point = parent_anchor_point(anchor, &anchor_rect);
            child_offset = child_anchor_offset(gravity, child);
            let saved = origin;
            origin = combine(parent_point, child_offset, offset);
            // A flip that does not resolve the constraint is rejected
            if origin.x < monitor_left || origin.x + child.x > monitor_right {
                origin = saved;
            }
        } else if adjustment.contains(ConstraintAdjustment::SLIDE_X) {
            if origin.x < monitor_left {
                offset.x += monitor_left - origin.x;
                origin = combine(parent_point, child_offset, offset);
            }
            if origin.x + child.x > monitor_right {
                offset.x -= origin.x + child.x - monitor_right;
                origin = combine(parent_point, child_offset, offset);
            }
        } else if adjustment.contains(ConstraintAdjustment::RESIZE_X) {
            if origin.x < monitor_left {
                let diff = shrink_amount(monitor_left - origin.x, child.x);
                origin.x += diff;
                child.x -= diff;
            }
            if origin.x + child.x > monitor_right {
                let diff = shrink_amount(origin.x + child.x - monitor_right, child.x);
                child.x -= diff;
            }
        }
    }

    // Y axis
    if origin.y < monitor_top || origin.y + child.y > monitor_bottom {
        if adjustment.contains(ConstraintAdjustment::FLIP_Y) {
            anchor = anchor.flip_y();
            gravity = gravity.flip_y();
            parent_point = parent_anchor_point(anchor, &anchor_rect);
            child_offset = child_anchor_offset(gravity, child);
            let saved = origin;
            origin = combine(parent_point, child_offset, offset);
            if origin.y < monitor_top || origin.y + child.y > monitor_bottom {
                origin = saved;
            }
        } else if adjustment.contains(ConstraintAdjustment::SLIDE_Y) {
            if origin.y < monitor_top {
                offset.y += monitor_top - origin.y;
                origin = combine(parent_point, child_offset, offset);
            }
            if origin.y + child.y > monitor_bottom {
                offset.y -= origin.y + child.y - monitor_bottom;
                origin = combine(parent_point, child_offset, offset);
            }
        } else if adjustment.contains(ConstraintAdjustment::RESIZE_Y) {
            if origin.y < monitor_top {
                let diff = shrink_amount(monitor_top - origin.y, child.y);
                origin.y += diff;
                child.y -= diff;
            }
            if origin.y + child.y > monitor_bottom {
                let diff = shrink_amount(origin.y + child.y - monitor_bottom, child.y);
                child.y -= diff;
            }
        }
    }

    tracing::trace!(
        "Resolved placement: origin=({:.1},{:.1}) size=({:.1},{:.1}) device, scale={}",
        origin.x,
        origin.y,
        child.x,
        child.y,
        scale
    );

    (
        Point {
            x: (origin.x / scale) as i32,
            y: (origin.y / scale) as i32,
        },
        Size {
            width: (child.x / scale) as i32,
            height: (child.y / scale) as i32,
        },
    )
}
