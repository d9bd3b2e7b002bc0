//! Stack arrangement.
//!
//! A stack lines its children up along one axis inside a container and
//! aligns them on the other. Like the placement helpers it only produces
//! constraints; the sizes fall out of solving them.

use anchor_core::{Attribute, Axis, ConstraintSet, ElementId};
use tracing::trace;

/// Alignment of items on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// Stretch to both cross edges
    Fill,
    /// Align to the start (left for vertical stacks, top for horizontal)
    Leading,
    #[default]
    Center,
    /// Align to the end (right for vertical stacks, bottom for horizontal)
    Trailing,
}

/// Distribution of items on the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    /// Items touch, separated by exactly the spacing
    Fill,
    /// Like `Fill`, with every item as long as the first
    FillEqually,
    /// Spacing is a minimum and the last item may stop short of the end
    #[default]
    EqualSpacing,
}

/// Stack configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    pub axis: Axis,
    pub alignment: Alignment,
    pub distribution: Distribution,
    /// Gap between adjacent items
    pub spacing: f64,
}

impl Stack {
    /// Create a horizontal stack.
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            ..Default::default()
        }
    }

    /// Create a vertical stack.
    pub fn vertical() -> Self {
        Self {
            axis: Axis::Vertical,
            ..Default::default()
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Constraints that arrange `children`, in order, inside `container`.
    ///
    /// Main axis first (chain, then equal lengths), then the cross axis
    /// for each child.
    pub fn arrange(&self, container: ElementId, children: &[ElementId]) -> ConstraintSet {
        let mut set = ConstraintSet::new();
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            return set;
        };

        let (start, end, length) = match self.axis {
            Axis::Vertical => (Attribute::Top, Attribute::Bottom, Attribute::Height),
            Axis::Horizontal => (Attribute::Leading, Attribute::Trailing, Attribute::Width),
        };
        let (cross_start, cross_end, cross_center) = match self.axis {
            Axis::Vertical => (Attribute::Leading, Attribute::Trailing, Attribute::CenterX),
            Axis::Horizontal => (Attribute::Top, Attribute::Bottom, Attribute::CenterY),
        };
        let loose = self.distribution == Distribution::EqualSpacing;

        set.push(first.anchor(start).equal_to(container.anchor(start), 0.0));
        for pair in children.windows(2) {
            let (previous, next) = (pair[0].anchor(end), pair[1].anchor(start));
            set.push(if loose {
                next.greater_or_equal_to(previous, self.spacing)
            } else {
                next.equal_to(previous, self.spacing)
            });
        }
        set.push(if loose {
            last.anchor(end).less_or_equal_to(container.anchor(end), 0.0)
        } else {
            last.anchor(end).equal_to(container.anchor(end), 0.0)
        });

        if self.distribution == Distribution::FillEqually {
            for &child in &children[1..] {
                set.push(child.anchor(length).equal_to(first.anchor(length), 0.0));
            }
        }

        for &child in children {
            match self.alignment {
                Alignment::Fill => {
                    set.push(child.anchor(cross_start).equal_to(container.anchor(cross_start), 0.0));
                    set.push(child.anchor(cross_end).equal_to(container.anchor(cross_end), 0.0));
                }
                Alignment::Leading => {
                    set.push(child.anchor(cross_start).equal_to(container.anchor(cross_start), 0.0));
                    set.push(
                        child
                            .anchor(cross_end)
                            .less_or_equal_to(container.anchor(cross_end), 0.0),
                    );
                }
                Alignment::Trailing => {
                    set.push(child.anchor(cross_end).equal_to(container.anchor(cross_end), 0.0));
                    set.push(
                        child
                            .anchor(cross_start)
                            .greater_or_equal_to(container.anchor(cross_start), 0.0),
                    );
                }
                Alignment::Center => {
                    set.push(
                        child
                            .anchor(cross_center)
                            .equal_to(container.anchor(cross_center), 0.0),
                    );
                }
            }
        }

        trace!(%container, children = children.len(), count = set.len(), "arranged stack");
        set
    }
}
