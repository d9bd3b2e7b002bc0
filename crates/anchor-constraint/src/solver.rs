//! High-level constraint solver interface.
//!
//! This module bridges anchor constraint descriptions to the Cassowary
//! simplex solver. Each element gets four variables (`x`, `y`, `width`,
//! `height`); every anchor is a linear expression over them, shifted by the
//! insets of the guide it is measured against. Leading is left and trailing
//! is right.

use std::collections::HashMap;

use anchor_core::{
    Anchor, Attribute, ConstraintError, ConstraintId, ConstraintSet, EdgeInsets, ElementId,
    Guide, Priority, Relation as AnchorRelation,
};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::cassowary::{Constraint, Expression, Relation, Solver, SolverError, Strength, Variable};

/// Layout properties for an element.
#[derive(Debug, Clone, Copy)]
pub struct ElementVars {
    pub x: Variable,
    pub y: Variable,
    pub width: Variable,
    pub height: Variable,
}

/// Solved frame of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementFrame {
    /// Value of an attribute on the full frame.
    pub fn attribute(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Leading => self.x,
            Attribute::Trailing => self.x + self.width,
            Attribute::Top => self.y,
            Attribute::Bottom => self.y + self.height,
            Attribute::CenterX => self.x + self.width / 2.0,
            Attribute::CenterY => self.y + self.height / 2.0,
            Attribute::Width => self.width,
            Attribute::Height => self.height,
        }
    }
}

/// The solution to a constraint system.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub frames: IndexMap<ElementId, ElementFrame>,
}

impl Solution {
    /// Get an attribute value for an element.
    pub fn get(&self, element: ElementId, attribute: Attribute) -> Option<f64> {
        self.frames.get(&element).map(|f| f.attribute(attribute))
    }

    /// Get the bounding box for an element.
    pub fn get_bounds(&self, element: ElementId) -> Option<(f64, f64, f64, f64)> {
        self.frames
            .get(&element)
            .map(|f| (f.x, f.y, f.width, f.height))
    }
}

#[derive(Debug, Clone)]
struct ActiveConstraint {
    constraint: anchor_core::Constraint,
    handle: usize,
}

/// The constraint system - bridges anchor constraints to Cassowary.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSystem {
    solver: Solver,
    /// Variables per registered element
    element_vars: IndexMap<ElementId, ElementVars>,
    /// Insets of non-bounds guides
    guide_insets: HashMap<(ElementId, Guide), EdgeInsets>,
    /// Active constraints in activation order
    active: IndexMap<ConstraintId, ActiveConstraint>,
    /// Counter for generating constraint IDs
    id_counter: u64,
}

impl ConstraintSystem {
    /// Create a new constraint system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element. Registering twice returns the existing variables.
    pub fn add_element(&mut self, element: ElementId) -> ElementVars {
        if let Some(vars) = self.element_vars.get(&element) {
            return *vars;
        }

        let vars = ElementVars {
            x: self.solver.new_variable(),
            y: self.solver.new_variable(),
            width: self.solver.new_variable(),
            height: self.solver.new_variable(),
        };
        self.element_vars.insert(element, vars);
        vars
    }

    pub fn contains_element(&self, element: ElementId) -> bool {
        self.element_vars.contains_key(&element)
    }

    /// Set the insets of one of an element's guides.
    ///
    /// Insets are read when a constraint is activated; constraints already
    /// active keep the insets they were built with. The bounds guide is
    /// always the bare frame and cannot be inset.
    pub fn set_guide_insets(
        &mut self,
        element: ElementId,
        guide: Guide,
        insets: EdgeInsets,
    ) -> Result<(), ConstraintError> {
        if !self.contains_element(element) {
            return Err(ConstraintError::UnknownElement { element });
        }
        if guide != Guide::Bounds {
            self.guide_insets.insert((element, guide), insets);
        }
        Ok(())
    }

    /// Current insets of an element's guide.
    pub fn guide_insets(&self, element: ElementId, guide: Guide) -> EdgeInsets {
        match guide {
            Guide::Bounds => EdgeInsets::ZERO,
            _ => self
                .guide_insets
                .get(&(element, guide))
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Activate every constraint of a set.
    ///
    /// Activation is all-or-nothing: if any constraint conflicts with the
    /// required constraints already active, none of the set stays active
    /// and the system is left exactly as before the call.
    pub fn activate(&mut self, set: &ConstraintSet) -> Result<Vec<ConstraintId>, ConstraintError> {
        let snapshot = self.solver.clone();
        let mut handles = Vec::with_capacity(set.len());

        for constraint in set {
            match self.add_to_solver(constraint) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.solver = snapshot;
                    debug!(%constraint, error = %err, "rejected constraint set");
                    return Err(err);
                }
            }
        }

        let ids: Vec<ConstraintId> = set
            .iter()
            .zip(handles)
            .map(|(constraint, handle)| {
                let id = ConstraintId(self.id_counter);
                self.id_counter += 1;
                self.active.insert(
                    id,
                    ActiveConstraint {
                        constraint: *constraint,
                        handle,
                    },
                );
                id
            })
            .collect();

        debug!(count = ids.len(), "activated constraints");
        Ok(ids)
    }

    /// Deactivate constraints by ID.
    ///
    /// Like [`ConstraintSystem::activate`] this is all-or-nothing: an
    /// unknown or repeated ID leaves every constraint active.
    pub fn deactivate(&mut self, ids: &[ConstraintId]) -> Result<(), ConstraintError> {
        let snapshot = (self.solver.clone(), self.active.clone());
        if let Err(err) = self.remove_all(ids) {
            (self.solver, self.active) = snapshot;
            debug!(error = %err, "rejected deactivation");
            return Err(err);
        }
        Ok(())
    }

    fn remove_all(&mut self, ids: &[ConstraintId]) -> Result<(), ConstraintError> {
        for &id in ids {
            let active = self
                .active
                .shift_remove(&id)
                .ok_or(ConstraintError::UnknownConstraint { id })?;
            self.solver
                .remove_constraint(active.handle)
                .map_err(|err| ConstraintError::Internal {
                    reason: err.to_string(),
                })?;
            trace!(%id, constraint = %active.constraint, "deactivated constraint");
        }
        Ok(())
    }

    /// Deactivate every constraint that refers to `element`. Returns how
    /// many were removed.
    pub fn deactivate_involving(&mut self, element: ElementId) -> Result<usize, ConstraintError> {
        let ids = self.constraints_involving(element);
        self.deactivate(&ids)?;
        if !ids.is_empty() {
            debug!(%element, count = ids.len(), "deactivated constraints of element");
        }
        Ok(ids.len())
    }

    /// IDs of the active constraints that refer to `element`.
    pub fn constraints_involving(&self, element: ElementId) -> Vec<ConstraintId> {
        self.active
            .iter()
            .filter(|(_, active)| active.constraint.involves(element))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Look up an active constraint.
    pub fn constraint(&self, id: ConstraintId) -> Option<&anchor_core::Constraint> {
        self.active.get(&id).map(|active| &active.constraint)
    }

    /// Iterate over active constraints in activation order.
    pub fn active_constraints(
        &self,
    ) -> impl Iterator<Item = (ConstraintId, &anchor_core::Constraint)> {
        self.active.iter().map(|(id, active)| (*id, &active.constraint))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Read the current frame of every registered element.
    pub fn solve(&self) -> Solution {
        let frames = self
            .element_vars
            .iter()
            .map(|(&id, vars)| {
                let frame = ElementFrame {
                    x: self.solver.get_value(vars.x),
                    y: self.solver.get_value(vars.y),
                    width: self.solver.get_value(vars.width),
                    height: self.solver.get_value(vars.height),
                };
                (id, frame)
            })
            .collect();

        Solution { frames }
    }

    fn add_to_solver(&mut self, constraint: &anchor_core::Constraint) -> Result<usize, ConstraintError> {
        let expr = self.build_expression(constraint)?;
        let relation = match constraint.relation {
            AnchorRelation::LessOrEqual => Relation::LessOrEqual,
            AnchorRelation::Equal => Relation::Equal,
            AnchorRelation::GreaterOrEqual => Relation::GreaterOrEqual,
        };
        let strength = convert_priority(constraint.priority);

        self.solver
            .add_constraint(&Constraint::new(expr, relation, strength))
            .map_err(|err| match err {
                SolverError::UnsatisfiableConstraint => ConstraintError::Conflicting {
                    constraint: constraint.to_string(),
                },
                other => ConstraintError::Internal {
                    reason: other.to_string(),
                },
            })
    }

    /// Build `first - (multiplier * second + constant)`, related to zero.
    fn build_expression(
        &self,
        constraint: &anchor_core::Constraint,
    ) -> Result<Expression, ConstraintError> {
        let mut expr = Expression::default();
        self.add_anchor_terms(&mut expr, constraint.first, 1.0)?;
        if let Some(second) = constraint.second {
            self.add_anchor_terms(&mut expr, second, -constraint.multiplier)?;
        }
        expr.constant -= constraint.constant;
        Ok(expr)
    }

    /// Add `scale * anchor` to an expression.
    fn add_anchor_terms(
        &self,
        expr: &mut Expression,
        anchor: Anchor,
        scale: f64,
    ) -> Result<(), ConstraintError> {
        let vars = self
            .element_vars
            .get(&anchor.element)
            .ok_or(ConstraintError::UnknownElement {
                element: anchor.element,
            })?;
        let insets = self.guide_insets(anchor.element, anchor.guide);

        let offset = match anchor.attribute {
            Attribute::Leading => {
                expr.add_term(vars.x, scale);
                insets.left
            }
            Attribute::Trailing => {
                expr.add_term(vars.x, scale);
                expr.add_term(vars.width, scale);
                -insets.right
            }
            Attribute::Top => {
                expr.add_term(vars.y, scale);
                insets.top
            }
            Attribute::Bottom => {
                expr.add_term(vars.y, scale);
                expr.add_term(vars.height, scale);
                -insets.bottom
            }
            Attribute::CenterX => {
                expr.add_term(vars.x, scale);
                expr.add_term(vars.width, 0.5 * scale);
                (insets.left - insets.right) / 2.0
            }
            Attribute::CenterY => {
                expr.add_term(vars.y, scale);
                expr.add_term(vars.height, 0.5 * scale);
                (insets.top - insets.bottom) / 2.0
            }
            Attribute::Width => {
                expr.add_term(vars.width, scale);
                -insets.horizontal()
            }
            Attribute::Height => {
                expr.add_term(vars.height, scale);
                -insets.vertical()
            }
        };
        expr.constant += offset * scale;
        Ok(())
    }
}

/// Convert an anchor priority to Cassowary strength.
fn convert_priority(priority: Priority) -> Strength {
    match priority {
        Priority::Required => Strength::REQUIRED,
        Priority::High => Strength::STRONG,
        Priority::Medium => Strength::MEDIUM,
        Priority::Low | Priority::Weak => Strength::WEAK,
    }
}
