//! Constraint descriptions produced by placement resolution.
//!
//! A [`Constraint`] is inert data: it names two anchors, a relation, a
//! multiplier and a constant. Nothing here talks to a solver; activating a
//! description is the host's job.

use std::fmt;

use smallvec::SmallVec;

use crate::types::{Anchor, ElementId, Priority, Relation};

/// `first  relation  multiplier * second + constant`, or
/// `first  relation  constant` when there is no second anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub first: Anchor,
    pub relation: Relation,
    pub second: Option<Anchor>,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Priority,
}

impl Constraint {
    /// Relate two anchors.
    pub fn new(first: Anchor, relation: Relation, second: Anchor, constant: f64) -> Self {
        Self {
            first,
            relation,
            second: Some(second),
            multiplier: 1.0,
            constant,
            priority: Priority::Required,
        }
    }

    /// Relate an anchor to a fixed value.
    pub fn fixed(first: Anchor, relation: Relation, constant: f64) -> Self {
        Self {
            first,
            relation,
            second: None,
            multiplier: 1.0,
            constant,
            priority: Priority::Required,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Whether either side refers to `element`.
    pub fn involves(&self, element: ElementId) -> bool {
        self.first.element == element || self.second.is_some_and(|s| s.element == element)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.first, self.relation)?;
        match self.second {
            None => write!(f, "{}", self.constant)?,
            Some(second) => {
                if self.multiplier != 1.0 {
                    write!(f, "{} * ", self.multiplier)?;
                }
                write!(f, "{}", second)?;
                if self.constant > 0.0 {
                    write!(f, " + {}", self.constant)?;
                } else if self.constant < 0.0 {
                    write!(f, " - {}", -self.constant)?;
                }
            }
        }
        if self.priority != Priority::Required {
            write!(f, " @{}", self.priority as u16)?;
        }
        Ok(())
    }
}

impl Anchor {
    /// `self == other + constant`
    pub fn equal_to(self, other: Anchor, constant: f64) -> Constraint {
        Constraint::new(self, Relation::Equal, other, constant)
    }

    /// `self <= other + constant`
    pub fn less_or_equal_to(self, other: Anchor, constant: f64) -> Constraint {
        Constraint::new(self, Relation::LessOrEqual, other, constant)
    }

    /// `self >= other + constant`
    pub fn greater_or_equal_to(self, other: Anchor, constant: f64) -> Constraint {
        Constraint::new(self, Relation::GreaterOrEqual, other, constant)
    }

    /// `self == value`, for dimensions.
    pub fn equal_to_constant(self, value: f64) -> Constraint {
        Constraint::fixed(self, Relation::Equal, value)
    }

    /// `self == multiplier * other`, for dimensions.
    pub fn equal_to_scaled(self, other: Anchor, multiplier: f64) -> Constraint {
        Constraint::new(self, Relation::Equal, other, 0.0).with_multiplier(multiplier)
    }
}

/// Ordered list of constraint descriptions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintSet {
    constraints: SmallVec<[Constraint; 4]>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn as_slice(&self) -> &[Constraint] {
        &self.constraints
    }

    /// One human-readable line per constraint, in order.
    pub fn descriptions(&self) -> Vec<String> {
        self.constraints.iter().map(ToString::to_string).collect()
    }
}

impl Extend<Constraint> for ConstraintSet {
    fn extend<I: IntoIterator<Item = Constraint>>(&mut self, iter: I) {
        self.constraints.extend(iter);
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConstraintSet {
    type Item = Constraint;
    type IntoIter = smallvec::IntoIter<[Constraint; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", constraint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Guide;

    #[test]
    fn test_constraint_display() {
        let child = ElementId(1);
        let parent = ElementId(0);

        assert_eq!(
            child.top().equal_to(parent.top().in_guide(Guide::SafeArea), 16.0).to_string(),
            "#1.top == #0.safe.top + 16"
        );
        assert_eq!(
            child.trailing().less_or_equal_to(parent.trailing(), -8.5).to_string(),
            "#1.trailing <= #0.trailing - 8.5"
        );
        assert_eq!(child.width().equal_to_constant(100.0).to_string(), "#1.width == 100");
        assert_eq!(
            child.height().equal_to_scaled(parent.height(), 0.5).to_string(),
            "#1.height == 0.5 * #0.height"
        );
        assert_eq!(
            child
                .center_x()
                .equal_to(parent.center_x(), 0.0)
                .with_priority(Priority::High)
                .to_string(),
            "#1.centerX == #0.centerX @750"
        );
    }

    #[test]
    fn test_negative_zero_constant_is_omitted() {
        let c = ElementId(1).trailing().equal_to(ElementId(0).trailing(), -0.0);
        assert_eq!(c.to_string(), "#1.trailing == #0.trailing");
    }

    #[test]
    fn test_involves() {
        let c = ElementId(1).bottom().equal_to(ElementId(2).top(), -4.0);
        assert!(c.involves(ElementId(1)));
        assert!(c.involves(ElementId(2)));
        assert!(!c.involves(ElementId(3)));
        assert!(!ElementId(5).width().equal_to_constant(3.0).involves(ElementId(2)));
    }

    #[test]
    fn test_set_collects_in_order() {
        let a = ElementId(1);
        let set: ConstraintSet = [a.width().equal_to_constant(10.0), a.height().equal_to_constant(20.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.descriptions(), vec!["#1.width == 10", "#1.height == 20"]);
        assert_eq!(set.to_string(), "#1.width == 10\n#1.height == 20");
    }
}
