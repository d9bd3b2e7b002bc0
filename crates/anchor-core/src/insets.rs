//! Edge insets and the edge selectors used to build them.

/// One side of a rectangle, or a group of sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    /// Top and bottom
    Vertical,
    /// Left and right
    Horizontal,
    /// All four sides
    All,
}

impl Edge {
    pub const CASES: [Edge; 7] = [
        Edge::Top,
        Edge::Bottom,
        Edge::Left,
        Edge::Right,
        Edge::Vertical,
        Edge::Horizontal,
        Edge::All,
    ];

    /// The concrete sides this selector covers.
    pub const fn expand(self) -> &'static [Edge] {
        match self {
            Edge::Top => &[Edge::Top],
            Edge::Bottom => &[Edge::Bottom],
            Edge::Left => &[Edge::Left],
            Edge::Right => &[Edge::Right],
            Edge::Vertical => &[Edge::Top, Edge::Bottom],
            Edge::Horizontal => &[Edge::Left, Edge::Right],
            Edge::All => &[Edge::Top, Edge::Left, Edge::Bottom, Edge::Right],
        }
    }
}

/// Insets along a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsetAxis {
    Horizontal { left: f64, right: f64 },
    Vertical { top: f64, bottom: f64 },
}

/// Four independent offsets from the sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Padding applied between an element and its reference.
pub type Padding = EdgeInsets;

impl EdgeInsets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every side.
    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Insets on one axis only; the other axis stays zero.
    pub const fn from_axis(axis: InsetAxis) -> Self {
        match axis {
            InsetAxis::Horizontal { left, right } => Self::new(0.0, left, 0.0, right),
            InsetAxis::Vertical { top, bottom } => Self::new(top, 0.0, bottom, 0.0),
        }
    }

    /// `value` on every side covered by `edges`, zero elsewhere.
    pub fn from_edges(edges: &[Edge], value: f64) -> Self {
        let mut insets = Self::ZERO;
        for &edge in edges {
            insets.set(edge, value);
        }
        insets
    }

    /// Per-edge values. An [`Edge::All`] entry takes precedence over every
    /// other entry; otherwise later entries overwrite earlier ones.
    pub fn from_edge_map(entries: impl IntoIterator<Item = (Edge, f64)>) -> Self {
        let entries: Vec<(Edge, f64)> = entries.into_iter().collect();
        if let Some(&(_, value)) = entries.iter().find(|(edge, _)| *edge == Edge::All) {
            return Self::all(value);
        }

        let mut insets = Self::ZERO;
        for (edge, value) in entries {
            insets.set(edge, value);
        }
        insets
    }

    /// Set every side covered by `edge`.
    pub fn set(&mut self, edge: Edge, value: f64) {
        for side in edge.expand() {
            match side {
                Edge::Top => self.top = value,
                Edge::Bottom => self.bottom = value,
                Edge::Left => self.left = value,
                Edge::Right => self.right = value,
                Edge::Vertical | Edge::Horizontal | Edge::All => {}
            }
        }
    }

    /// Builder form of [`EdgeInsets::set`].
    pub fn with(mut self, edge: Edge, value: f64) -> Self {
        self.set(edge, value);
        self
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_edges_expands_groups() {
        let insets = EdgeInsets::from_edges(&[Edge::Vertical, Edge::Left], 8.0);
        assert_eq!(insets, EdgeInsets::new(8.0, 8.0, 8.0, 0.0));

        let insets = EdgeInsets::from_edges(&[Edge::Horizontal], 4.0);
        assert_eq!(insets, EdgeInsets::new(0.0, 4.0, 0.0, 4.0));
    }

    #[test]
    fn test_edge_map_all_wins() {
        let insets = EdgeInsets::from_edge_map([(Edge::Top, 30.0), (Edge::All, 5.0)]);
        assert_eq!(insets, EdgeInsets::all(5.0));
    }

    #[test]
    fn test_edge_map_later_entries_overwrite() {
        let insets = EdgeInsets::from_edge_map([(Edge::Vertical, 10.0), (Edge::Bottom, 2.0)]);
        assert_eq!(insets, EdgeInsets::new(10.0, 0.0, 2.0, 0.0));
    }

    #[test]
    fn test_from_axis() {
        let insets = EdgeInsets::from_axis(InsetAxis::Vertical { top: 1.0, bottom: 2.0 });
        assert_eq!(insets, EdgeInsets::new(1.0, 0.0, 2.0, 0.0));

        let insets = EdgeInsets::from_axis(InsetAxis::Horizontal { left: 3.0, right: 4.0 });
        assert_eq!(insets.horizontal(), 7.0);
        assert_eq!(insets.vertical(), 0.0);
    }

    fn edge() -> impl Strategy<Value = Edge> {
        proptest::sample::select(Edge::CASES.to_vec())
    }

    proptest! {
        #[test]
        fn prop_from_edges_sets_only_covered_sides(
            edges in proptest::collection::vec(edge(), 0..4),
            value in 1.0..100.0f64,
        ) {
            let insets = EdgeInsets::from_edges(&edges, value);
            let covered = |side: Edge| edges.iter().any(|e| e.expand().contains(&side));

            for (side, actual) in [
                (Edge::Top, insets.top),
                (Edge::Left, insets.left),
                (Edge::Bottom, insets.bottom),
                (Edge::Right, insets.right),
            ] {
                let expected = if covered(side) { value } else { 0.0 };
                prop_assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn test_every_case_expands_to_concrete_sides() {
        for edge in Edge::CASES {
            let sides = edge.expand();
            assert!(!sides.is_empty());
            assert!(sides
                .iter()
                .all(|s| matches!(s, Edge::Top | Edge::Bottom | Edge::Left | Edge::Right)));
        }
    }
}
