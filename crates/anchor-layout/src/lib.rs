//! Alignment resolution and layout for anchor-kit.
//!
//! This crate turns declarative placements into constraints and hosts them
//! in a solvable element tree.
//!
//! # Architecture
//!
//! 1. **Placement**: pure resolvers from placement requests to ordered
//!    constraint sets (container, sibling, fill, mirror, size)
//! 2. **Stacks**: chains of children along one axis
//! 3. **Layout**: an element tree plus a live constraint system that
//!    activates resolved sets and writes solved frames back
//!
//! # Example
//!
//! ```
//! use anchor_core::{Padding, Size};
//! use anchor_layout::{
//!     HorizontalAlignment, Layout, LayoutOptions, PlacementRequest, VerticalPosition,
//! };
//!
//! let mut layout = Layout::new(LayoutOptions::default());
//! let root = layout.add_root()?;
//! let badge = layout.add_child(root)?;
//!
//! let request = PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Right)
//!     .with_padding(Padding::all(16.0))
//!     .with_size(Size::new(40.0, 40.0));
//! layout.pin(badge, &request)?;
//! layout.solve();
//!
//! let frame = layout.frame(badge).unwrap();
//! assert_eq!((frame.x, frame.y), (744.0, 16.0));
//! # Ok::<(), anchor_core::LayoutError>(())
//! ```

mod compute;
mod placement;
mod stack;
mod tree;

pub use compute::{Layout, LayoutOptions};
pub use placement::{
    copy_center, fill_container, match_dimension, mirror_horizontal, mirror_vertical,
    resolve_container_placement, resolve_fixed_size, resolve_mutual_placement, specify_size,
    try_fill_container, try_resolve_container_placement, Dimension, Hierarchy, HorizontalAlignment,
    HorizontalMirror, MutualPlacement, MutualPosition, PlacementRequest, VerticalMirror,
    VerticalPosition,
};
pub use stack::{Alignment, Distribution, Stack};
pub use tree::{Bounds, LayoutNode, LayoutTree};
