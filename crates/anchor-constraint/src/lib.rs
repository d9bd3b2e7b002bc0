//! Constraint solving for anchor-kit.
//!
//! This crate implements:
//! - Cassowary simplex algorithm with constraint strengths
//! - A constraint system that activates anchor constraint sets atomically
//! - Guide insets applied when anchors are turned into linear expressions

mod cassowary;
mod solver;

pub use cassowary::{
    Constraint as LinearConstraint, Expression, Relation, Solver, SolverError, Strength, Variable,
};
pub use solver::{ConstraintSystem, ElementFrame, ElementVars, Solution};

use anchor_core::{ConstraintError, ConstraintSet};

/// Solve a standalone constraint set.
///
/// Every element the set mentions is registered first; elements whose
/// variables the set leaves free resolve to zero.
pub fn solve_constraints(set: &ConstraintSet) -> Result<Solution, ConstraintError> {
    let mut system = ConstraintSystem::new();
    for constraint in set {
        system.add_element(constraint.first.element);
        if let Some(second) = constraint.second {
            system.add_element(second.element);
        }
    }
    system.activate(set)?;
    Ok(system.solve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_core::{Attribute, ElementId};

    #[test]
    fn test_solve_constraints_registers_elements() {
        let (a, b) = (ElementId(1), ElementId(2));
        let set: ConstraintSet = [
            a.leading().equal_to_constant(10.0),
            a.width().equal_to_constant(50.0),
            b.leading().equal_to(a.trailing(), 8.0),
        ]
        .into_iter()
        .collect();

        let solution = solve_constraints(&set).unwrap();
        assert_eq!(solution.frames.len(), 2);
        assert!((solution.get(b, Attribute::Leading).unwrap() - 68.0).abs() < 0.001);
    }

    #[test]
    fn test_solve_constraints_reports_conflict() {
        let a = ElementId(1);
        let set: ConstraintSet = [a.width().equal_to_constant(10.0), a.width().equal_to_constant(20.0)]
            .into_iter()
            .collect();
        assert!(matches!(
            solve_constraints(&set),
            Err(ConstraintError::Conflicting { .. })
        ));
    }
}
