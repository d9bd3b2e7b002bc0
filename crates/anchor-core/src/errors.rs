//! Error types for anchor-kit.

use thiserror::Error;

use crate::types::{ConstraintId, ElementId};

/// Top-level error type.
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors while resolving a placement into constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Element {element} has no container to be placed in")]
    MissingContainer { element: ElementId },
}

/// Errors raised by the solver when constraints are committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Conflicting required constraint: {constraint}")]
    Conflicting { constraint: String },

    #[error("Constraint references unknown element {element}")]
    UnknownElement { element: ElementId },

    #[error("Constraint {id} is not active")]
    UnknownConstraint { id: ConstraintId },

    #[error("Internal solver error: {reason}")]
    Internal { reason: String },
}

/// Errors from the layout tree and host facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Unknown element {element}")]
    UnknownElement { element: ElementId },

    #[error("Element {element} is already attached to {parent}")]
    AlreadyAttached { element: ElementId, parent: ElementId },

    #[error("Attaching {element} would create a cycle")]
    CycleDetected { element: ElementId },

    #[error("Element {element} is listed more than once")]
    DuplicateChild { element: ElementId },

    #[error("Constraint error: {0}")]
    ConstraintError(#[from] ConstraintError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_error_wraps_each_stage() {
        let element = ElementId(3);

        let err: AnchorError = PlacementError::MissingContainer { element }.into();
        assert!(matches!(err, AnchorError::Placement(_)));
        assert_eq!(err.to_string(), "Element #3 has no container to be placed in");

        let err: AnchorError = ConstraintError::UnknownConstraint { id: ConstraintId(7) }.into();
        assert!(matches!(err, AnchorError::Constraint(_)));

        let err: AnchorError = LayoutError::from(ConstraintError::UnknownElement { element }).into();
        assert!(matches!(
            err,
            AnchorError::Layout(LayoutError::ConstraintError(ConstraintError::UnknownElement { .. }))
        ));
    }
}
