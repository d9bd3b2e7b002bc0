//! Alignment resolution.
//!
//! Turns declarative placement requests into ordered constraint sets. Every
//! function here is pure: it reads the hierarchy, never mutates it, and
//! never talks to a solver. Committing the result is up to the caller (see
//! [`crate::Layout`]).

use anchor_core::{
    Anchor, Attribute, Capabilities, ConstraintSet, ElementId, Guide, Offset, Padding,
    PlacementError, Region, Size,
};
use tracing::{trace, warn};

/// Read access to the element hierarchy.
pub trait Hierarchy {
    /// The container of `element`, if it is attached to one.
    fn parent(&self, element: ElementId) -> Option<ElementId>;
}

/// Where an element sits vertically inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalPosition {
    #[default]
    Top,
    Bottom,
    Center,
}

/// Where an element sits horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Right,
    Center,
}

/// Side of a sibling an element is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutualPosition {
    /// Above the target
    Top,
    /// Below the target
    Bottom,
    /// To the left of the target
    Left,
    /// To the right of the target
    Right,
    /// On the target's center
    Center,
}

/// A request to place an element inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementRequest {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalAlignment,
    pub padding: Padding,
    /// Zero components leave that dimension to the alignment constraints
    pub size: Size,
    pub region: Region,
}

impl PlacementRequest {
    pub fn new(vertical: VerticalPosition, horizontal: HorizontalAlignment) -> Self {
        Self {
            vertical,
            horizontal,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Measure offsets from the container's safe area when the host has one.
    pub fn in_safe_area(mut self) -> Self {
        self.region = Region::SafeArea;
        self
    }
}

/// A request to place an element next to a sibling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutualPlacement {
    pub position: MutualPosition,
    /// `Center` additionally aligns the centers horizontally
    pub alignment: HorizontalAlignment,
    pub padding: Padding,
    /// Center displacement, used by [`MutualPosition::Center`] only
    pub offset: Offset,
}

impl MutualPlacement {
    pub fn new(position: MutualPosition) -> Self {
        Self {
            position,
            alignment: HorizontalAlignment::default(),
            padding: Padding::ZERO,
            offset: Offset::ZERO,
        }
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }
}

/// Horizontal edges copied by [`mirror_horizontal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalMirror {
    Left,
    Right,
    All,
}

/// Vertical edges copied by [`mirror_vertical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalMirror {
    Top,
    Bottom,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    fn attribute(self) -> Attribute {
        match self {
            Dimension::Width => Attribute::Width,
            Dimension::Height => Attribute::Height,
        }
    }
}

/// Place `child` inside its container.
///
/// Constraints come out in a fixed order: the vertical one, then the
/// horizontal ones, then fixed sizes. A non-zero width replaces the soft
/// horizontal containment pair.
pub fn try_resolve_container_placement<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    child: ElementId,
    request: &PlacementRequest,
    capabilities: Capabilities,
) -> Result<ConstraintSet, PlacementError> {
    let container = hierarchy
        .parent(child)
        .ok_or(PlacementError::MissingContainer { element: child })?;
    let region = request.region.guide(capabilities);
    let padding = &request.padding;
    let mut set = ConstraintSet::new();

    match request.vertical {
        VerticalPosition::Top => {
            set.push(child.top().equal_to(container.top().in_guide(region), padding.top));
        }
        VerticalPosition::Bottom => {
            set.push(
                child
                    .bottom()
                    .equal_to(container.bottom().in_guide(region), -padding.bottom),
            );
        }
        VerticalPosition::Center => {
            set.push(child.center_y().equal_to(container.center_y(), 0.0));
        }
    }

    push_horizontal(
        &mut set,
        child,
        container,
        region,
        request.horizontal,
        padding,
        request.size.width != 0.0,
    );
    set.extend(resolve_fixed_size(child, request.size));

    trace!(%child, %container, count = set.len(), "resolved container placement");
    Ok(set)
}

/// Like [`try_resolve_container_placement`], but a missing container is
/// logged and yields an empty set.
pub fn resolve_container_placement<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    child: ElementId,
    request: &PlacementRequest,
    capabilities: Capabilities,
) -> ConstraintSet {
    try_resolve_container_placement(hierarchy, child, request, capabilities).unwrap_or_else(|err| {
        warn!(%child, "{}", err);
        ConstraintSet::new()
    })
}

/// Place `child` against a sibling.
pub fn resolve_mutual_placement(
    child: ElementId,
    target: ElementId,
    placement: &MutualPlacement,
) -> ConstraintSet {
    let padding = &placement.padding;
    let mut set = ConstraintSet::new();

    match placement.position {
        MutualPosition::Top => {
            set.push(child.bottom().equal_to(target.top(), -padding.top));
        }
        MutualPosition::Bottom => {
            set.push(child.top().equal_to(target.bottom(), padding.bottom));
        }
        MutualPosition::Left => {
            set.push(child.trailing().equal_to(target.leading(), -padding.left));
            set.push(child.center_y().equal_to(target.center_y(), 0.0));
        }
        MutualPosition::Right => {
            set.push(child.leading().equal_to(target.trailing(), padding.right));
            set.push(child.center_y().equal_to(target.center_y(), 0.0));
        }
        MutualPosition::Center => {
            set.extend(copy_center(child, target, placement.offset));
        }
    }

    // Added on top of the position, even when the center was already placed
    // with an offset.
    if placement.alignment == HorizontalAlignment::Center {
        set.push(child.center_x().equal_to(target.center_x(), 0.0));
    }

    trace!(%child, %target, count = set.len(), "resolved mutual placement");
    set
}

/// One fixed-value equality per non-zero dimension, width first.
pub fn resolve_fixed_size(child: ElementId, size: Size) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    if size.width != 0.0 {
        set.push(child.width().equal_to_constant(size.width));
    }
    if size.height != 0.0 {
        set.push(child.height().equal_to_constant(size.height));
    }
    set
}

/// Pin all four edges of `child` to a guide of its container.
pub fn try_fill_container<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    child: ElementId,
    padding: &Padding,
    guide: Guide,
    capabilities: Capabilities,
) -> Result<ConstraintSet, PlacementError> {
    let container = hierarchy
        .parent(child)
        .ok_or(PlacementError::MissingContainer { element: child })?;
    let guide = match guide {
        Guide::SafeArea if !capabilities.safe_area => Guide::Bounds,
        other => other,
    };

    let set: ConstraintSet = [
        child.top().equal_to(container.top().in_guide(guide), padding.top),
        child.bottom().equal_to(container.bottom().in_guide(guide), -padding.bottom),
        child.leading().equal_to(container.leading().in_guide(guide), padding.left),
        child.trailing().equal_to(container.trailing().in_guide(guide), -padding.right),
    ]
    .into_iter()
    .collect();

    trace!(%child, %container, ?guide, "resolved fill");
    Ok(set)
}

/// Like [`try_fill_container`], but a missing container is logged and
/// yields an empty set.
pub fn fill_container<H: Hierarchy + ?Sized>(
    hierarchy: &H,
    child: ElementId,
    padding: &Padding,
    guide: Guide,
    capabilities: Capabilities,
) -> ConstraintSet {
    try_fill_container(hierarchy, child, padding, guide, capabilities).unwrap_or_else(|err| {
        warn!(%child, "{}", err);
        ConstraintSet::new()
    })
}

/// Copy the leading and/or trailing edge of `target`'s guide.
pub fn mirror_horizontal(
    child: ElementId,
    target: ElementId,
    options: HorizontalMirror,
    padding: &Padding,
    guide: Guide,
) -> ConstraintSet {
    let leading = child.leading().equal_to(target.leading().in_guide(guide), padding.left);
    let trailing = child
        .trailing()
        .equal_to(target.trailing().in_guide(guide), -padding.right);

    match options {
        HorizontalMirror::Left => [leading].into_iter().collect(),
        HorizontalMirror::Right => [trailing].into_iter().collect(),
        HorizontalMirror::All => [leading, trailing].into_iter().collect(),
    }
}

/// Copy the top and/or bottom edge of `target`'s guide.
pub fn mirror_vertical(
    child: ElementId,
    target: ElementId,
    options: VerticalMirror,
    padding: &Padding,
    guide: Guide,
) -> ConstraintSet {
    let top = child.top().equal_to(target.top().in_guide(guide), padding.top);
    let bottom = child
        .bottom()
        .equal_to(target.bottom().in_guide(guide), -padding.bottom);

    match options {
        VerticalMirror::Top => [top].into_iter().collect(),
        VerticalMirror::Bottom => [bottom].into_iter().collect(),
        VerticalMirror::All => [top, bottom].into_iter().collect(),
    }
}

/// Put `child`'s center on `target`'s center, displaced by `offset`.
pub fn copy_center(child: ElementId, target: ElementId, offset: Offset) -> ConstraintSet {
    [
        child.center_x().equal_to(target.center_x(), offset.x),
        child.center_y().equal_to(target.center_y(), offset.y),
    ]
    .into_iter()
    .collect()
}

/// Size one dimension of `child` relative to `target`'s guide, then align
/// it horizontally against `target`.
///
/// Matching the width fixes the horizontal extent, so the soft containment
/// pair is left out in that case, as with an explicit width.
pub fn match_dimension(
    child: ElementId,
    target: ElementId,
    dimension: Dimension,
    multiplier: f64,
    guide: Guide,
    alignment: HorizontalAlignment,
) -> ConstraintSet {
    let attribute = dimension.attribute();
    let mut set = ConstraintSet::new();
    set.push(
        child
            .anchor(attribute)
            .equal_to_scaled(target.anchor(attribute).in_guide(guide), multiplier),
    );
    push_horizontal(
        &mut set,
        child,
        target,
        Guide::Bounds,
        alignment,
        &Padding::ZERO,
        dimension == Dimension::Width,
    );
    set
}

/// Fixed size from optional components, height first. Unlike
/// [`resolve_fixed_size`] a zero is a real size here.
pub fn specify_size(child: ElementId, width: Option<f64>, height: Option<f64>) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    if let Some(height) = height {
        set.push(child.height().equal_to_constant(height));
    }
    if let Some(width) = width {
        set.push(child.width().equal_to_constant(width));
    }
    set
}

/// The hard horizontal anchor for `alignment`, followed by its soft
/// containment pair unless the width is fixed.
fn push_horizontal(
    set: &mut ConstraintSet,
    child: ElementId,
    container: ElementId,
    region: Guide,
    alignment: HorizontalAlignment,
    padding: &Padding,
    width_fixed: bool,
) {
    let leading: Anchor = container.leading().in_guide(region);
    let trailing: Anchor = container.trailing().in_guide(region);

    match alignment {
        HorizontalAlignment::Center => {
            set.push(child.center_x().equal_to(container.center_x(), 0.0));
            if !width_fixed {
                set.push(child.leading().less_or_equal_to(leading, padding.left));
                set.push(child.trailing().equal_to(trailing, -padding.right));
            }
        }
        HorizontalAlignment::Left => {
            set.push(child.leading().equal_to(leading, padding.left));
            if !width_fixed {
                set.push(child.trailing().less_or_equal_to(trailing, 0.0));
            }
        }
        HorizontalAlignment::Right => {
            set.push(child.trailing().equal_to(trailing, -padding.right));
            if !width_fixed {
                set.push(child.leading().less_or_equal_to(leading, padding.left));
            }
        }
    }
}
