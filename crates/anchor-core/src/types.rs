//! Core value types: element handles, anchors and the scalars placements use.

use std::fmt;

/// Opaque handle to a layoutable element owned by the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl ElementId {
    /// Anchor on this element's frame.
    pub const fn anchor(self, attribute: Attribute) -> Anchor {
        Anchor::new(self, attribute)
    }

    pub const fn top(self) -> Anchor {
        self.anchor(Attribute::Top)
    }

    pub const fn bottom(self) -> Anchor {
        self.anchor(Attribute::Bottom)
    }

    pub const fn leading(self) -> Anchor {
        self.anchor(Attribute::Leading)
    }

    pub const fn trailing(self) -> Anchor {
        self.anchor(Attribute::Trailing)
    }

    pub const fn center_x(self) -> Anchor {
        self.anchor(Attribute::CenterX)
    }

    pub const fn center_y(self) -> Anchor {
        self.anchor(Attribute::CenterY)
    }

    pub const fn width(self) -> Anchor {
        self.anchor(Attribute::Width)
    }

    pub const fn height(self) -> Anchor {
        self.anchor(Attribute::Height)
    }
}

/// Unique identifier for an activated constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(pub u64);

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

/// The edge, center or dimension of an element an anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterX,
    CenterY,
    Width,
    Height,
}

impl Attribute {
    /// The axis this attribute measures along.
    pub const fn axis(self) -> Axis {
        match self {
            Attribute::Leading | Attribute::Trailing | Attribute::CenterX | Attribute::Width => {
                Axis::Horizontal
            }
            Attribute::Top | Attribute::Bottom | Attribute::CenterY | Attribute::Height => {
                Axis::Vertical
            }
        }
    }

    /// Width and height are sizes, everything else is a position.
    pub const fn is_dimension(self) -> bool {
        matches!(self, Attribute::Width | Attribute::Height)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::CenterX => "centerX",
            Attribute::CenterY => "centerY",
            Attribute::Width => "width",
            Attribute::Height => "height",
        }
    }
}

/// Rectangle of an element that an anchor is measured against.
///
/// Every guide other than [`Guide::Bounds`] is the element's frame inset by
/// insets the host stores per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Guide {
    /// The full frame
    #[default]
    Bounds,
    /// The area not covered by system chrome
    SafeArea,
    /// The frame inset by the element's layout margins
    LayoutMargins,
    /// A width-limited column suited for reading text
    ReadableContent,
}

impl Guide {
    fn prefix(self) -> Option<&'static str> {
        match self {
            Guide::Bounds => None,
            Guide::SafeArea => Some("safe"),
            Guide::LayoutMargins => Some("margins"),
            Guide::ReadableContent => Some("readable"),
        }
    }
}

/// Reference area offsets are measured from in container placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    #[default]
    Bounds,
    SafeArea,
}

impl Region {
    /// Resolve to a concrete guide. Hosts without a safe area fall back to
    /// the full bounds.
    pub const fn guide(self, capabilities: Capabilities) -> Guide {
        match self {
            Region::SafeArea if capabilities.safe_area => Guide::SafeArea,
            _ => Guide::Bounds,
        }
    }
}

/// Features of the host layout engine the resolver may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// Whether elements expose a safe-area guide
    pub safe_area: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { safe_area: true }
    }
}

impl Capabilities {
    /// A host predating safe-area guides.
    pub const fn legacy() -> Self {
        Self { safe_area: false }
    }
}

/// One attribute of one guide of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub element: ElementId,
    pub guide: Guide,
    pub attribute: Attribute,
}

impl Anchor {
    /// Anchor on the element's full frame.
    pub const fn new(element: ElementId, attribute: Attribute) -> Self {
        Self {
            element,
            guide: Guide::Bounds,
            attribute,
        }
    }

    /// Same attribute, measured against another guide of the element.
    pub const fn in_guide(mut self, guide: Guide) -> Self {
        self.guide = guide;
        self
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.guide.prefix() {
            Some(prefix) => write!(f, "{}.{}.{}", self.element, prefix, self.attribute.name()),
            None => write!(f, "{}.{}", self.element, self.attribute.name()),
        }
    }
}

/// A width/height pair. A zero component leaves that axis unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Displacement between two centers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Relation between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::LessOrEqual => "<=",
            Relation::Equal => "==",
            Relation::GreaterOrEqual => ">=",
        })
    }
}

/// Constraint priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    Weak = 1,
    Low = 250,
    Medium = 500,
    High = 750,
    #[default]
    Required = 1000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_display() {
        let el = ElementId(3);
        assert_eq!(el.top().to_string(), "#3.top");
        assert_eq!(
            el.leading().in_guide(Guide::SafeArea).to_string(),
            "#3.safe.leading"
        );
        assert_eq!(
            el.center_x().in_guide(Guide::ReadableContent).to_string(),
            "#3.readable.centerX"
        );
    }

    #[test]
    fn test_region_falls_back_without_safe_area() {
        assert_eq!(Region::SafeArea.guide(Capabilities::default()), Guide::SafeArea);
        assert_eq!(Region::SafeArea.guide(Capabilities::legacy()), Guide::Bounds);
        assert_eq!(Region::Bounds.guide(Capabilities::default()), Guide::Bounds);
    }

    #[test]
    fn test_attribute_axis() {
        assert_eq!(Attribute::Width.axis(), Axis::Horizontal);
        assert_eq!(Attribute::CenterY.axis(), Axis::Vertical);
        assert!(Attribute::Height.is_dimension());
        assert!(!Attribute::Trailing.is_dimension());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Required > Priority::High);
        assert!(Priority::Low > Priority::Weak);
        assert_eq!(Priority::default(), Priority::Required);
    }
}
