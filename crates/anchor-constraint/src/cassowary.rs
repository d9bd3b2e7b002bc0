//! Cassowary constraint solver implementation.
//!
//! This is an implementation of the Cassowary linear constraint solving algorithm,
//! as described in "The Cassowary Linear Arithmetic Constraint Solving Algorithm"
//! by Greg J. Badros and Alan Borning.
//!
//! The algorithm uses a variation of the simplex method optimized for incremental
//! constraint solving with priorities (strengths). Tableau maps are insertion
//! ordered so pivoting is deterministic for a given sequence of operations.

use indexmap::IndexMap;
use thiserror::Error;

/// Unique identifier for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Create a new variable with the given ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }
}

/// Symbol types used internally in the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Symbol {
    /// An external variable (the actual unknowns we're solving for)
    External(usize),
    /// A slack variable (for inequality constraints)
    Slack(usize),
    /// An error variable (for non-required constraints)
    Error(usize),
    /// A dummy variable (for required equality constraints)
    Dummy(usize),
}

impl Symbol {
    fn is_external(&self) -> bool {
        matches!(self, Symbol::External(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, Symbol::Error(_))
    }

    fn is_dummy(&self) -> bool {
        matches!(self, Symbol::Dummy(_))
    }

    fn is_pivotable(&self) -> bool {
        matches!(self, Symbol::Slack(_) | Symbol::Error(_))
    }
}

/// A linear expression in the form: constant + Σ(coefficient * variable)
#[derive(Debug, Clone, Default)]
pub struct Expression {
    pub constant: f64,
    terms: IndexMap<Variable, f64>,
}

impl Expression {
    /// Create a constant expression.
    pub fn from_constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: IndexMap::new(),
        }
    }

    /// Create an expression from a single variable.
    pub fn from_variable(var: Variable) -> Self {
        let mut expr = Self::default();
        expr.add_term(var, 1.0);
        expr
    }

    /// Add a term to the expression, merging with an existing term.
    pub fn add_term(&mut self, var: Variable, coefficient: f64) {
        let remove = {
            let entry = self.terms.entry(var).or_insert(0.0);
            *entry += coefficient;
            near_zero(*entry)
        };
        if remove {
            self.terms.swap_remove(&var);
        }
    }

    /// Get the coefficient for a variable.
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Get an iterator over the terms.
    pub fn terms(&self) -> impl Iterator<Item = (&Variable, &f64)> {
        self.terms.iter()
    }
}

/// Tolerance for floating-point comparisons.
const EPSILON: f64 = 1e-8;

/// Near-zero check for floating point values.
fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Constraint strength levels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(pub f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);
    pub const STRONG: Strength = Strength(1_000_000.0);
    pub const MEDIUM: Strength = Strength(1_000.0);
    pub const WEAK: Strength = Strength(1.0);

    /// Create a custom strength.
    pub fn new(value: f64) -> Self {
        Self(value.min(Self::REQUIRED.0))
    }

    /// Check if this is a required constraint.
    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

/// The relation of a constraint expression to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// A constraint to be added to the solver: `expression <relation> 0`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub expression: Expression,
    pub relation: Relation,
    pub strength: Strength,
}

impl Constraint {
    /// Create a new constraint.
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self {
            expression,
            relation,
            strength,
        }
    }
}

/// Marker symbols identifying a constraint's row in the tableau.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
}

#[derive(Debug, Clone, Copy)]
struct ConstraintInfo {
    tag: Tag,
    strength: Strength,
}

/// A row in the simplex tableau.
#[derive(Debug, Clone)]
struct Row {
    constant: f64,
    cells: IndexMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: IndexMap::new(),
        }
    }

    /// Add a coefficient for a symbol, dropping the cell if it cancels out.
    fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let remove = {
            let entry = self.cells.entry(symbol).or_insert(0.0);
            *entry += coefficient;
            near_zero(*entry)
        };
        if remove {
            self.cells.swap_remove(&symbol);
        }
    }

    /// Add `coefficient * other` to this row.
    fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &c) in &other.cells {
            self.insert_symbol(symbol, c * coefficient);
        }
    }

    fn remove(&mut self, symbol: Symbol) {
        self.cells.swap_remove(&symbol);
    }

    fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for c in self.cells.values_mut() {
            *c = -*c;
        }
    }

    fn coefficient(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Substitute a symbol in this row with another row.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coeff) = self.cells.swap_remove(&symbol) {
            self.insert_row(row, coeff);
        }
    }

    /// Solve for a symbol in this row.
    fn solve_for(&mut self, symbol: Symbol) {
        let coeff = self.cells.swap_remove(&symbol).unwrap_or(1.0);
        let multiplier = -1.0 / coeff;
        self.constant *= multiplier;
        for c in self.cells.values_mut() {
            *c *= multiplier;
        }
    }

    /// Solve for `rhs` in a row currently basic in `lhs`.
    fn solve_for_symbols(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    fn all_dummies(&self) -> bool {
        self.cells.keys().all(Symbol::is_dummy)
    }
}

#[derive(Debug, Clone, Copy)]
enum Objective {
    Main,
    Artificial,
}

/// The Cassowary constraint solver.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Counter for generating unique variable IDs
    var_counter: usize,
    /// Counter for generating unique symbol IDs
    symbol_counter: usize,
    /// The objective function row
    objective: Row,
    /// Artificial objective for phase 1
    artificial: Option<Row>,
    /// The tableau rows, keyed by their basic symbol
    rows: IndexMap<Symbol, Row>,
    /// Active constraints and their marker symbols
    constraints: IndexMap<usize, ConstraintInfo>,
    /// Counter for constraint IDs
    constraint_counter: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self {
            var_counter: 0,
            symbol_counter: 0,
            objective: Row::new(0.0),
            artificial: None,
            rows: IndexMap::new(),
            constraints: IndexMap::new(),
            constraint_counter: 0,
        }
    }

    /// Create a new variable.
    pub fn new_variable(&mut self) -> Variable {
        let var = Variable(self.var_counter);
        self.var_counter += 1;
        var
    }

    /// Get the current value of a variable. Parametric variables read as 0.
    pub fn get_value(&self, var: Variable) -> f64 {
        self.rows
            .get(&Symbol::External(var.0))
            .map_or(0.0, |row| row.constant)
    }

    /// Whether a constraint ID is currently in the solver.
    pub fn has_constraint(&self, id: usize) -> bool {
        self.constraints.contains_key(&id)
    }

    /// Number of constraints currently in the solver.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Add a constraint to the solver.
    ///
    /// On [`SolverError::UnsatisfiableConstraint`] the tableau may have been
    /// partially pivoted; callers that need to continue should restore a
    /// clone taken before the call.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<usize, SolverError> {
        let (mut row, tag) = self.create_row(constraint);
        let mut subject = Self::choose_subject(&row, &tag);

        // A row of dummies only is either redundant or contradicts a
        // required equality already in the tableau.
        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant) {
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                if !self.add_with_artificial_variable(&row)? {
                    return Err(SolverError::UnsatisfiableConstraint);
                }
            }
        }

        let id = self.constraint_counter;
        self.constraint_counter += 1;
        self.constraints.insert(
            id,
            ConstraintInfo {
                tag,
                strength: constraint.strength,
            },
        );

        self.optimize(Objective::Main)?;
        Ok(id)
    }

    /// Remove a constraint from the solver.
    pub fn remove_constraint(&mut self, id: usize) -> Result<(), SolverError> {
        let info = self
            .constraints
            .swap_remove(&id)
            .ok_or(SolverError::UnknownConstraint)?;

        self.remove_constraint_effects(&info);

        // If the marker is basic its row simply goes away; otherwise pivot
        // it into the basis first.
        if self.rows.swap_remove(&info.tag.marker).is_none() {
            let (leaving, mut row) = self
                .take_marker_leaving_row(info.tag.marker)
                .ok_or(SolverError::InternalError("No leaving row found"))?;
            row.solve_for_symbols(leaving, info.tag.marker);
            self.substitute(info.tag.marker, &row);
        }

        self.optimize(Objective::Main)
    }

    /// Create a row for a constraint.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let mut row = Row::new(constraint.expression.constant);

        // Add the terms to the row, substituting basic variables
        for (&var, &coeff) in constraint.expression.terms() {
            if near_zero(coeff) {
                continue;
            }
            let symbol = Symbol::External(var.0);
            match self.rows.get(&symbol) {
                Some(basic_row) => row.insert_row(basic_row, coeff),
                None => row.insert_symbol(symbol, coeff),
            }
        }

        let tag = match constraint.relation {
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let coeff = if constraint.relation == Relation::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };

                let slack = self.new_symbol(Symbol::Slack(0));
                row.insert_symbol(slack, coeff);

                let other = if constraint.strength.is_required() {
                    None
                } else {
                    let error = self.new_symbol(Symbol::Error(0));
                    row.insert_symbol(error, -coeff);
                    self.objective.insert_symbol(error, constraint.strength.0);
                    Some(error)
                };

                Tag { marker: slack, other }
            }
            Relation::Equal => {
                if constraint.strength.is_required() {
                    let dummy = self.new_symbol(Symbol::Dummy(0));
                    row.insert_symbol(dummy, 1.0);
                    Tag {
                        marker: dummy,
                        other: None,
                    }
                } else {
                    let errplus = self.new_symbol(Symbol::Error(0));
                    let errminus = self.new_symbol(Symbol::Error(0));
                    row.insert_symbol(errplus, -1.0);
                    row.insert_symbol(errminus, 1.0);
                    self.objective.insert_symbol(errplus, constraint.strength.0);
                    self.objective.insert_symbol(errminus, constraint.strength.0);
                    Tag {
                        marker: errplus,
                        other: Some(errminus),
                    }
                }
            }
        };

        // Ensure the constant is non-negative
        if row.constant < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    /// Generate a new symbol.
    fn new_symbol(&mut self, kind: Symbol) -> Symbol {
        let id = self.symbol_counter;
        self.symbol_counter += 1;
        match kind {
            Symbol::External(_) => Symbol::External(id),
            Symbol::Slack(_) => Symbol::Slack(id),
            Symbol::Error(_) => Symbol::Error(id),
            Symbol::Dummy(_) => Symbol::Dummy(id),
        }
    }

    /// Choose a subject for the row: any external symbol, else a marker
    /// with a negative coefficient.
    fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
        if let Some(&symbol) = row.cells.keys().find(|s| s.is_external()) {
            return Some(symbol);
        }

        if tag.marker.is_pivotable() && row.coefficient(tag.marker) < 0.0 {
            return Some(tag.marker);
        }
        if let Some(other) = tag.other {
            if other.is_pivotable() && row.coefficient(other) < 0.0 {
                return Some(other);
            }
        }

        None
    }

    /// Add the row using an artificial variable. Returns whether the
    /// artificial objective could be driven to zero.
    fn add_with_artificial_variable(&mut self, row: &Row) -> Result<bool, SolverError> {
        let art = self.new_symbol(Symbol::Slack(0));
        self.rows.insert(art, row.clone());
        self.artificial = Some(row.clone());

        self.optimize(Objective::Artificial)?;
        let success = self
            .artificial
            .as_ref()
            .is_some_and(|objective| near_zero(objective.constant));
        self.artificial = None;

        // Pivot the artificial variable out of the basis if needed
        if let Some(mut art_row) = self.rows.swap_remove(&art) {
            if art_row.cells.is_empty() {
                return Ok(success);
            }
            let Some(entering) = art_row.cells.keys().copied().find(Symbol::is_pivotable) else {
                return Ok(false);
            };
            art_row.solve_for_symbols(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for r in self.rows.values_mut() {
            r.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    /// Substitute a symbol throughout the tableau.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for r in self.rows.values_mut() {
            r.substitute(symbol, row);
        }
        self.objective.substitute(symbol, row);
        if let Some(ref mut art) = self.artificial {
            art.substitute(symbol, row);
        }
    }

    /// Optimize an objective function using the simplex algorithm.
    fn optimize(&mut self, objective: Objective) -> Result<(), SolverError> {
        loop {
            let row = match objective {
                Objective::Main => &self.objective,
                Objective::Artificial => match &self.artificial {
                    Some(row) => row,
                    None => return Ok(()),
                },
            };

            // Find the entering variable (a negative coefficient in the objective)
            let entering = row
                .cells
                .iter()
                .find(|(s, c)| !s.is_dummy() && **c < 0.0)
                .map(|(&s, _)| s);

            let Some(entering) = entering else {
                return Ok(());
            };

            let Some((leaving, mut row)) = self.take_leaving_row(entering) else {
                return Err(SolverError::InternalError("Unbounded objective"));
            };

            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// Remove and return the row that leaves the basis (minimum ratio test).
    fn take_leaving_row(&mut self, entering: Symbol) -> Option<(Symbol, Row)> {
        let mut min_ratio = f64::MAX;
        let mut leaving = None;

        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }

            let coeff = row.coefficient(entering);
            if coeff < 0.0 {
                let ratio = -row.constant / coeff;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(symbol);
                }
            }
        }

        let symbol = leaving?;
        let row = self.rows.swap_remove(&symbol)?;
        Some((symbol, row))
    }

    /// Remove and return the row to pivot a non-basic marker into.
    fn take_marker_leaving_row(&mut self, marker: Symbol) -> Option<(Symbol, Row)> {
        let mut r1 = f64::MAX;
        let mut r2 = f64::MAX;
        let mut first = None;
        let mut second = None;
        let mut third = None;

        for (&symbol, row) in &self.rows {
            let coeff = row.coefficient(marker);
            if coeff == 0.0 {
                continue;
            }
            if symbol.is_external() {
                third = Some(symbol);
            } else if coeff < 0.0 {
                let ratio = -row.constant / coeff;
                if ratio < r1 {
                    r1 = ratio;
                    first = Some(symbol);
                }
            } else {
                let ratio = row.constant / coeff;
                if ratio < r2 {
                    r2 = ratio;
                    second = Some(symbol);
                }
            }
        }

        let symbol = first.or(second).or(third)?;
        let row = self.rows.swap_remove(&symbol)?;
        Some((symbol, row))
    }

    /// Remove constraint effects from the objective.
    fn remove_constraint_effects(&mut self, info: &ConstraintInfo) {
        if info.tag.marker.is_error() {
            self.remove_marker_effects(info.tag.marker, info.strength);
        }
        if let Some(other) = info.tag.other {
            if other.is_error() {
                self.remove_marker_effects(other, info.strength);
            }
        }
    }

    fn remove_marker_effects(&mut self, marker: Symbol, strength: Strength) {
        match self.rows.get(&marker) {
            Some(row) => self.objective.insert_row(row, -strength.0),
            None => self.objective.insert_symbol(marker, -strength.0),
        }
    }
}

/// Errors that can occur during constraint solving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A required constraint could not be satisfied.
    #[error("The constraint cannot be satisfied")]
    UnsatisfiableConstraint,
    /// The specified constraint was not found.
    #[error("The constraint is not in the solver")]
    UnknownConstraint,
    /// An internal error occurred.
    #[error("Internal solver error: {0}")]
    InternalError(&'static str),
}
