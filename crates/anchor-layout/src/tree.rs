//! Layout tree data structures.
//!
//! The layout tree owns the element hierarchy the resolver places elements
//! in, the guide insets of each element and, after solving, the computed
//! frame of every element.

use anchor_core::{EdgeInsets, ElementId, Guide, LayoutError};
use glam::DVec2;
use indexmap::IndexMap;

use crate::placement::Hierarchy;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Get position as a vector.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Get size as a vector.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> DVec2 {
        self.position() + self.size() / 2.0
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if another bounds lies entirely inside this one.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.x, other.y) && self.contains(other.right(), other.bottom())
    }

    /// Shrink by per-side insets.
    pub fn inset_by(&self, insets: &EdgeInsets) -> Bounds {
        Bounds::new(
            self.x + insets.left,
            self.y + insets.top,
            self.width - insets.horizontal(),
            self.height - insets.vertical(),
        )
    }

    /// These bounds expressed relative to `origin`.
    pub fn relative_to(&self, origin: DVec2) -> Bounds {
        Bounds::from_vecs(self.position() - origin, self.size())
    }

    /// Whether both bounds agree within `tolerance` on every component.
    pub fn approx_eq(&self, other: &Bounds, tolerance: f64) -> bool {
        self.position().abs_diff_eq(other.position(), tolerance)
            && self.size().abs_diff_eq(other.size(), tolerance)
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: ElementId,
    /// Optional name for debugging
    pub name: Option<String>,
    /// Computed bounds (position relative to parent)
    pub bounds: Bounds,
    /// Absolute bounds (position in viewport coordinates)
    pub absolute_bounds: Bounds,
    /// Parent element (None for roots and detached elements)
    pub parent: Option<ElementId>,
    /// Child elements in attachment order
    pub children: Vec<ElementId>,
    pub safe_area_insets: EdgeInsets,
    pub layout_margins: EdgeInsets,
    pub readable_content_insets: EdgeInsets,
}

impl LayoutNode {
    /// Create a new layout node.
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            name: None,
            bounds: Bounds::default(),
            absolute_bounds: Bounds::default(),
            parent: None,
            children: Vec::new(),
            safe_area_insets: EdgeInsets::ZERO,
            layout_margins: EdgeInsets::ZERO,
            readable_content_insets: EdgeInsets::ZERO,
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Insets of one of this node's guides.
    pub fn guide_insets(&self, guide: Guide) -> EdgeInsets {
        match guide {
            Guide::Bounds => EdgeInsets::ZERO,
            Guide::SafeArea => self.safe_area_insets,
            Guide::LayoutMargins => self.layout_margins,
            Guide::ReadableContent => self.readable_content_insets,
        }
    }

    /// Absolute frame of one of this node's guides.
    pub fn guide_bounds(&self, guide: Guide) -> Bounds {
        self.absolute_bounds.inset_by(&self.guide_insets(guide))
    }
}

/// The element hierarchy.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    /// All nodes in the tree, in insertion order
    nodes: IndexMap<ElementId, LayoutNode>,
    /// Root elements
    roots: Vec<ElementId>,
}

impl LayoutTree {
    /// Create an empty layout tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node.
    pub fn insert(&mut self, node: LayoutNode) -> ElementId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Add a root node.
    pub fn add_root(&mut self, node: LayoutNode) -> ElementId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Add a child node to a parent.
    pub fn add_child(&mut self, parent: ElementId, node: LayoutNode) -> Result<ElementId, LayoutError> {
        if !self.contains(parent) {
            return Err(LayoutError::UnknownElement { element: parent });
        }
        let id = self.insert(node);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Attach a detached element to a parent.
    pub fn attach(&mut self, parent: ElementId, child: ElementId) -> Result<(), LayoutError> {
        let current = self
            .nodes
            .get(&child)
            .ok_or(LayoutError::UnknownElement { element: child })?
            .parent;
        if !self.contains(parent) {
            return Err(LayoutError::UnknownElement { element: parent });
        }
        if let Some(parent) = current {
            return Err(LayoutError::AlreadyAttached { element: child, parent });
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(LayoutError::CycleDetected { element: child });
        }

        self.roots.retain(|&root| root != child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach an element from its parent. Returns the former parent.
    pub fn detach(&mut self, child: ElementId) -> Result<Option<ElementId>, LayoutError> {
        let node = self
            .nodes
            .get_mut(&child)
            .ok_or(LayoutError::UnknownElement { element: child })?;
        let parent = node.parent.take();

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != child);
            }
        }
        Ok(parent)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a node by ID.
    pub fn get(&self, id: ElementId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(&id)
    }

    /// Get the root nodes.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Get children of a node.
    pub fn children(&self, id: ElementId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child_id| self.nodes.get(child_id))
    }

    /// Walk up from `id`'s parent to its root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Store the insets of a guide.
    pub fn set_guide_insets(
        &mut self,
        id: ElementId,
        guide: Guide,
        insets: EdgeInsets,
    ) -> Result<(), LayoutError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(LayoutError::UnknownElement { element: id })?;
        match guide {
            Guide::Bounds => {}
            Guide::SafeArea => node.safe_area_insets = insets,
            Guide::LayoutMargins => node.layout_margins = insets,
            Guide::ReadableContent => node.readable_content_insets = insets,
        }
        Ok(())
    }

    /// Derive parent-relative bounds from the absolute ones.
    pub fn compute_relative_bounds(&mut self) {
        for root_id in self.roots.clone() {
            self.compute_relative_bounds_recursive(root_id, DVec2::ZERO);
        }
    }

    fn compute_relative_bounds_recursive(&mut self, id: ElementId, parent_origin: DVec2) {
        let (origin, children) = {
            let node = match self.nodes.get_mut(&id) {
                Some(n) => n,
                None => return,
            };
            node.bounds = node.absolute_bounds.relative_to(parent_origin);
            (node.absolute_bounds.position(), node.children.clone())
        };

        for child_id in children {
            self.compute_relative_bounds_recursive(child_id, origin);
        }
    }
}

impl Hierarchy for LayoutTree {
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(&element).and_then(|n| n.parent)
    }
}
