//! Solver-neutral mixed-integer model: variables, linear rows, and a
//! minimised linear objective.

/// Handle to a variable inside one [`MipModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Integer,
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

/// `Σ coefficient · variable + constant`. Repeated variables are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Σ vars` with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_term(var, 1.0);
        }
        expr
    }

    /// Builder form of [`LinearExpr::add_term`].
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        match self.terms.iter_mut().find(|(v, _)| *v == var) {
            Some((_, c)) => *c += coefficient,
            None => self.terms.push((var, coefficient)),
        }
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Value of the expression under a dense assignment indexed by [`VarId::index`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values[v.index()])
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessEq,
    GreaterEq,
    Equal,
}

/// `expr (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tolerance,
            Sense::GreaterEq => lhs >= self.rhs - tolerance,
            Sense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimisation problem handed to an [`IMipSolver`](super::IMipSolver).
#[derive(Debug, Clone, PartialEq)]
pub struct MipModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    initial_solution: Option<Vec<f64>>,
}

impl MipModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            initial_solution: None,
        }
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        kind: VarKind,
        lower: f64,
        upper: f64,
    ) -> VarId {
        self.variables.push(Variable {
            name: name.into(),
            kind,
            lower,
            upper,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn add_integer(&mut self, name: impl Into<String>, lower: i64, upper: i64) -> VarId {
        self.add_variable(name, VarKind::Integer, lower as f64, upper as f64)
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_integer(name, 0, 1)
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_variable(name, VarKind::Continuous, lower, upper)
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    pub fn less_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Sense::LessEq, rhs);
    }

    pub fn greater_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Sense::GreaterEq, rhs);
    }

    pub fn equal(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Sense::Equal, rhs);
    }

    pub fn minimize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Offer a feasible assignment to seed the search. Backends may ignore it.
    pub fn set_initial_solution(&mut self, values: Vec<f64>) {
        self.initial_solution = Some(values);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.index()]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn initial_solution(&self) -> Option<&[f64]> {
        self.initial_solution.as_deref()
    }

    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Whether `values` respects bounds, integrality, and every row.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }
        let bounds_ok = self.variables.iter().zip(values).all(|(var, &v)| {
            v.is_finite()
                && v >= var.lower - tolerance
                && v <= var.upper + tolerance
                && (var.kind == VarKind::Continuous || (v - v.round()).abs() <= tolerance)
        });
        bounds_ok
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }
}

/// Optimal assignment returned by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MipSolution {
    pub values: Vec<f64>,
    pub objective: f64,
    /// Search nodes the backend explored.
    pub nodes: u64,
}

impl MipSolution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }
}
