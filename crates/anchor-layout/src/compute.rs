//! Layout host: element tree plus live constraint system.

use anchor_core::{
    Capabilities, Constraint, ConstraintId, ConstraintSet, EdgeInsets, ElementId, Guide,
    LayoutError, Padding, Relation, Size,
};
use anchor_constraint::ConstraintSystem;
use tracing::debug;

use crate::placement::{
    fill_container, resolve_container_placement, resolve_fixed_size, resolve_mutual_placement,
    MutualPlacement, PlacementRequest,
};
use crate::stack::Stack;
use crate::tree::{Bounds, LayoutNode, LayoutTree};

/// Options for layout computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Width every root is fixed to
    pub viewport_width: f64,
    /// Height every root is fixed to
    pub viewport_height: f64,
    /// Features of the host placements may rely on
    pub capabilities: Capabilities,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            capabilities: Capabilities::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// An element tree whose frames are driven by constraints.
///
/// Placement calls resolve a request against the current hierarchy and
/// activate the result immediately. Frames are only updated by
/// [`Layout::solve`].
#[derive(Debug, Clone, Default)]
pub struct Layout {
    options: LayoutOptions,
    tree: LayoutTree,
    system: ConstraintSystem,
    next_id: u64,
}

impl Layout {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn system(&self) -> &ConstraintSystem {
        &self.system
    }

    /// Add a root element whose frame is the viewport.
    pub fn add_root(&mut self) -> Result<ElementId, LayoutError> {
        let id = self.new_node();
        self.tree.add_root(LayoutNode::new(id));

        let frame: ConstraintSet = [
            Constraint::fixed(id.leading(), Relation::Equal, 0.0),
            Constraint::fixed(id.top(), Relation::Equal, 0.0),
            id.width().equal_to_constant(self.options.viewport_width),
            id.height().equal_to_constant(self.options.viewport_height),
        ]
        .into_iter()
        .collect();
        self.system.activate(&frame)?;

        debug!(
            %id,
            width = self.options.viewport_width,
            height = self.options.viewport_height,
            "added root"
        );
        Ok(id)
    }

    /// Add an element attached to `parent`.
    pub fn add_child(&mut self, parent: ElementId) -> Result<ElementId, LayoutError> {
        self.require(parent)?;
        let id = self.new_node();
        self.tree.add_child(parent, LayoutNode::new(id))?;
        Ok(id)
    }

    /// Add an element that is not attached anywhere yet.
    pub fn add_element(&mut self) -> ElementId {
        let id = self.new_node();
        self.tree.insert(LayoutNode::new(id));
        id
    }

    pub fn attach(&mut self, parent: ElementId, child: ElementId) -> Result<(), LayoutError> {
        self.tree.attach(parent, child)
    }

    /// Set the insets of a guide. Only constraints activated afterwards see
    /// the new insets.
    pub fn set_guide_insets(
        &mut self,
        element: ElementId,
        guide: Guide,
        insets: EdgeInsets,
    ) -> Result<(), LayoutError> {
        self.tree.set_guide_insets(element, guide, insets)?;
        self.system.set_guide_insets(element, guide, insets)?;
        Ok(())
    }

    /// Place `child` inside its container. A detached child is logged and
    /// nothing is activated.
    pub fn pin(
        &mut self,
        child: ElementId,
        request: &PlacementRequest,
    ) -> Result<Vec<ConstraintId>, LayoutError> {
        self.require(child)?;
        let set = resolve_container_placement(&self.tree, child, request, self.options.capabilities);
        self.activate(&set)
    }

    /// Place `child` against a sibling.
    pub fn place(
        &mut self,
        child: ElementId,
        target: ElementId,
        placement: &MutualPlacement,
    ) -> Result<Vec<ConstraintId>, LayoutError> {
        self.require(child)?;
        self.require(target)?;
        let set = resolve_mutual_placement(child, target, placement);
        self.activate(&set)
    }

    /// Pin all edges of `child` to a guide of its container.
    pub fn fill(
        &mut self,
        child: ElementId,
        padding: &Padding,
        guide: Guide,
    ) -> Result<Vec<ConstraintId>, LayoutError> {
        self.require(child)?;
        let set = fill_container(&self.tree, child, padding, guide, self.options.capabilities);
        self.activate(&set)
    }

    /// Fix the non-zero dimensions of `child`.
    pub fn size(&mut self, child: ElementId, size: Size) -> Result<Vec<ConstraintId>, LayoutError> {
        self.require(child)?;
        self.activate(&resolve_fixed_size(child, size))
    }

    /// Arrange `children` in `container` with a stack. Detached children are
    /// attached to `container` once the constraints are active.
    pub fn arrange(
        &mut self,
        container: ElementId,
        stack: &Stack,
        children: &[ElementId],
    ) -> Result<Vec<ConstraintId>, LayoutError> {
        self.require(container)?;
        let mut detached = Vec::new();
        for (i, &child) in children.iter().enumerate() {
            self.require(child)?;
            if children[..i].contains(&child) {
                return Err(LayoutError::DuplicateChild { element: child });
            }
            match self.tree.get(child).and_then(|n| n.parent) {
                Some(parent) if parent == container => {}
                Some(parent) => {
                    return Err(LayoutError::AlreadyAttached { element: child, parent });
                }
                None => {
                    if child == container || self.tree.ancestors(container).any(|a| a == child) {
                        return Err(LayoutError::CycleDetected { element: child });
                    }
                    detached.push(child);
                }
            }
        }

        let ids = self.activate(&stack.arrange(container, children))?;
        for child in detached {
            self.tree.attach(container, child)?;
        }
        Ok(ids)
    }

    /// Activate a constraint set as one batch.
    pub fn activate(&mut self, set: &ConstraintSet) -> Result<Vec<ConstraintId>, LayoutError> {
        Ok(self.system.activate(set)?)
    }

    pub fn deactivate(&mut self, ids: &[ConstraintId]) -> Result<(), LayoutError> {
        Ok(self.system.deactivate(ids)?)
    }

    /// Deactivate every constraint mentioning `element` and detach it from
    /// its parent.
    pub fn detach(&mut self, element: ElementId) -> Result<(), LayoutError> {
        self.require(element)?;
        let removed = self.system.deactivate_involving(element)?;
        let parent = self.tree.detach(element)?;
        debug!(%element, ?parent, removed, "detached element");
        Ok(())
    }

    /// Remove children previously arranged in a stack.
    pub fn remove_arranged(&mut self, children: &[ElementId]) -> Result<(), LayoutError> {
        for &child in children {
            self.require(child)?;
        }
        for &child in children {
            self.detach(child)?;
        }
        Ok(())
    }

    /// Solve the active constraints and write the frames into the tree.
    pub fn solve(&mut self) {
        let solution = self.system.solve();
        for (&id, frame) in &solution.frames {
            if let Some(node) = self.tree.get_mut(id) {
                node.absolute_bounds = Bounds::new(frame.x, frame.y, frame.width, frame.height);
            }
        }
        self.tree.compute_relative_bounds();
        debug!(elements = solution.frames.len(), "solved layout");
    }

    /// Absolute frame of an element as of the last [`Layout::solve`].
    pub fn frame(&self, element: ElementId) -> Option<Bounds> {
        self.tree.get(element).map(|n| n.absolute_bounds)
    }

    /// Absolute frame of one of an element's guides.
    pub fn guide_frame(&self, element: ElementId, guide: Guide) -> Option<Bounds> {
        self.tree.get(element).map(|n| n.guide_bounds(guide))
    }

    fn new_node(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.system.add_element(id);
        id
    }

    fn require(&self, element: ElementId) -> Result<(), LayoutError> {
        if self.tree.contains(element) {
            Ok(())
        } else {
            Err(LayoutError::UnknownElement { element })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Hierarchy, HorizontalAlignment, MutualPosition, VerticalPosition};
    use crate::stack::{Alignment, Distribution};
    use anchor_core::{ConstraintError, Offset};

    fn assert_frame(layout: &Layout, element: ElementId, expected: Bounds) {
        let frame = layout.frame(element).unwrap();
        assert!(
            frame.approx_eq(&expected, 0.001),
            "{} solved to {:?}, expected {:?}",
            element,
            frame,
            expected
        );
    }

    #[test]
    fn test_root_matches_viewport() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        layout.solve();
        assert_frame(&layout, root, Bounds::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_fill_with_padding() {
        let mut layout = Layout::new(LayoutOptions::default().with_viewport(400.0, 300.0));
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();

        layout
            .fill(child, &Padding::new(10.0, 20.0, 30.0, 40.0), Guide::Bounds)
            .unwrap();
        layout.solve();

        assert_frame(&layout, child, Bounds::new(20.0, 10.0, 340.0, 260.0));
        assert!(layout.frame(root).unwrap().contains_bounds(&layout.frame(child).unwrap()));
    }

    #[test]
    fn test_pin_corners_and_center() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let a = layout.add_child(root).unwrap();
        let b = layout.add_child(root).unwrap();
        let c = layout.add_child(root).unwrap();

        layout
            .pin(
                a,
                &PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Left)
                    .with_padding(Padding::new(10.0, 10.0, 0.0, 0.0))
                    .with_size(Size::new(100.0, 50.0)),
            )
            .unwrap();
        layout
            .pin(
                b,
                &PlacementRequest::new(VerticalPosition::Bottom, HorizontalAlignment::Right)
                    .with_padding(Padding::new(0.0, 0.0, 20.0, 30.0))
                    .with_size(Size::new(100.0, 50.0)),
            )
            .unwrap();
        layout
            .pin(
                c,
                &PlacementRequest::new(VerticalPosition::Center, HorizontalAlignment::Center)
                    .with_size(Size::new(100.0, 50.0)),
            )
            .unwrap();
        layout.solve();

        assert_frame(&layout, a, Bounds::new(10.0, 10.0, 100.0, 50.0));
        assert_frame(&layout, b, Bounds::new(670.0, 530.0, 100.0, 50.0));
        assert_frame(&layout, c, Bounds::new(350.0, 275.0, 100.0, 50.0));
    }

    #[test]
    fn test_center_alignment_stretches_to_padding() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();

        layout
            .pin(
                child,
                &PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Center)
                    .with_padding(Padding::all(10.0))
                    .with_size(Size::new(0.0, 40.0)),
            )
            .unwrap();
        layout.solve();

        assert_frame(&layout, child, Bounds::new(10.0, 10.0, 780.0, 40.0));
    }

    #[test]
    fn test_pin_in_safe_area() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();
        layout
            .set_guide_insets(root, Guide::SafeArea, EdgeInsets::new(44.0, 0.0, 34.0, 0.0))
            .unwrap();

        let request = PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Left)
            .with_padding(Padding::new(8.0, 16.0, 0.0, 0.0))
            .with_size(Size::new(100.0, 50.0))
            .in_safe_area();
        layout.pin(child, &request).unwrap();
        layout.solve();

        assert_frame(&layout, child, Bounds::new(16.0, 52.0, 100.0, 50.0));
        assert_eq!(
            layout.guide_frame(root, Guide::SafeArea),
            Some(Bounds::new(0.0, 44.0, 800.0, 522.0))
        );
    }

    #[test]
    fn test_safe_area_ignored_by_legacy_host() {
        let options = LayoutOptions::default().with_capabilities(Capabilities::legacy());
        let mut layout = Layout::new(options);
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();
        layout
            .set_guide_insets(root, Guide::SafeArea, EdgeInsets::new(44.0, 0.0, 34.0, 0.0))
            .unwrap();

        let request = PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Left)
            .with_size(Size::new(100.0, 50.0))
            .in_safe_area();
        layout.pin(child, &request).unwrap();
        layout.solve();

        assert_frame(&layout, child, Bounds::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_place_next_to_sibling() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let a = layout.add_child(root).unwrap();
        let b = layout.add_child(root).unwrap();

        layout
            .pin(
                a,
                &PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Left)
                    .with_padding(Padding::all(10.0))
                    .with_size(Size::new(100.0, 50.0)),
            )
            .unwrap();
        layout.size(b, Size::new(40.0, 20.0)).unwrap();
        layout
            .place(
                b,
                a,
                &MutualPlacement::new(MutualPosition::Right).with_padding(Padding::new(0.0, 0.0, 0.0, 12.0)),
            )
            .unwrap();
        layout.solve();

        assert_frame(&layout, b, Bounds::new(122.0, 25.0, 40.0, 20.0));
    }

    #[test]
    fn test_center_offset_conflicts_with_plain_center() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let a = layout.add_child(root).unwrap();
        let b = layout.add_child(root).unwrap();

        layout
            .pin(
                a,
                &PlacementRequest::new(VerticalPosition::Center, HorizontalAlignment::Center)
                    .with_size(Size::new(100.0, 100.0)),
            )
            .unwrap();
        let before = layout.system().active_count();

        let placement = MutualPlacement::new(MutualPosition::Center)
            .with_alignment(HorizontalAlignment::Center)
            .with_offset(Offset::new(10.0, 0.0));
        let err = layout.place(b, a, &placement).unwrap_err();

        assert_eq!(
            err,
            LayoutError::ConstraintError(ConstraintError::Conflicting {
                constraint: "#2.centerX == #1.centerX".to_string()
            })
        );
        assert_eq!(layout.system().active_count(), before);

        layout.solve();
        assert_frame(&layout, a, Bounds::new(350.0, 250.0, 100.0, 100.0));
    }

    #[test]
    fn test_vertical_fill_stack() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let container = layout.add_child(root).unwrap();
        layout
            .pin(
                container,
                &PlacementRequest::new(VerticalPosition::Top, HorizontalAlignment::Left)
                    .with_size(Size::new(200.0, 0.0)),
            )
            .unwrap();

        let children: Vec<ElementId> = [30.0, 40.0, 50.0]
            .into_iter()
            .map(|height| {
                let child = layout.add_element();
                layout.size(child, Size::new(0.0, height)).unwrap();
                child
            })
            .collect();

        let stack = Stack::vertical()
            .with_alignment(Alignment::Fill)
            .with_distribution(Distribution::Fill)
            .with_spacing(10.0);
        layout.arrange(container, &stack, &children).unwrap();
        layout.solve();

        assert_frame(&layout, children[0], Bounds::new(0.0, 0.0, 200.0, 30.0));
        assert_frame(&layout, children[1], Bounds::new(0.0, 40.0, 200.0, 40.0));
        assert_frame(&layout, children[2], Bounds::new(0.0, 90.0, 200.0, 50.0));
        assert_frame(&layout, container, Bounds::new(0.0, 0.0, 200.0, 140.0));
        assert_eq!(
            layout.tree().children(container).map(|n| n.id).collect::<Vec<_>>(),
            children
        );
    }

    #[test]
    fn test_arrange_rejects_foreign_children() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let container = layout.add_child(root).unwrap();
        let other = layout.add_child(root).unwrap();

        assert_eq!(
            layout.arrange(container, &Stack::vertical(), &[other]),
            Err(LayoutError::AlreadyAttached { element: other, parent: root })
        );

        assert_eq!(
            layout.arrange(container, &Stack::vertical(), &[root]),
            Err(LayoutError::CycleDetected { element: root })
        );
    }

    #[test]
    fn test_remove_arranged() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let children = [layout.add_element(), layout.add_element()];

        layout
            .arrange(root, &Stack::horizontal().with_spacing(8.0), &children)
            .unwrap();
        assert!(!layout.system().constraints_involving(children[0]).is_empty());

        layout.remove_arranged(&children[..1]).unwrap();
        assert!(layout.system().constraints_involving(children[0]).is_empty());
        assert_eq!(layout.tree().parent(children[0]), None);
        assert_eq!(layout.tree().parent(children[1]), Some(root));
    }

    #[test]
    fn test_arrange_rejects_repeated_child() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let child = layout.add_element();
        let before = layout.system().active_count();

        assert_eq!(
            layout.arrange(root, &Stack::vertical(), &[child, child]),
            Err(LayoutError::DuplicateChild { element: child })
        );
        assert_eq!(layout.system().active_count(), before);
        assert_eq!(layout.tree().parent(child), None);
    }

    #[test]
    fn test_remove_arranged_checks_every_child() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let children = [layout.add_element(), layout.add_element()];
        layout.arrange(root, &Stack::vertical(), &children).unwrap();
        let before = layout.system().active_count();

        let missing = ElementId(99);
        assert_eq!(
            layout.remove_arranged(&[children[0], missing]),
            Err(LayoutError::UnknownElement { element: missing })
        );
        assert_eq!(layout.system().active_count(), before);
        assert_eq!(layout.tree().parent(children[0]), Some(root));
    }

    #[test]
    fn test_deactivate_unknown_keeps_batch() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();
        let ids = layout.size(child, Size::new(40.0, 20.0)).unwrap();
        let before = layout.system().active_count();

        let missing = ConstraintId(999);
        assert_eq!(
            layout.deactivate(&[ids[0], missing]),
            Err(LayoutError::ConstraintError(ConstraintError::UnknownConstraint { id: missing }))
        );
        assert_eq!(layout.system().active_count(), before);
    }

    #[test]
    fn test_detached_pin_is_a_no_op() {
        let mut layout = Layout::new(LayoutOptions::default());
        let root = layout.add_root().unwrap();
        let child = layout.add_child(root).unwrap();
        layout
            .pin(child, &PlacementRequest::default().with_size(Size::new(10.0, 10.0)))
            .unwrap();

        layout.detach(child).unwrap();
        assert!(layout.system().constraints_involving(child).is_empty());

        let before = layout.system().active_count();
        let ids = layout.pin(child, &PlacementRequest::default()).unwrap();
        assert!(ids.is_empty());
        assert_eq!(layout.system().active_count(), before);
    }

    #[test]
    fn test_unknown_element() {
        let mut layout = Layout::new(LayoutOptions::default());
        assert_eq!(
            layout.add_child(ElementId(5)),
            Err(LayoutError::UnknownElement { element: ElementId(5) })
        );
        assert_eq!(
            layout.pin(ElementId(5), &PlacementRequest::default()),
            Err(LayoutError::UnknownElement { element: ElementId(5) })
        );
    }
}
