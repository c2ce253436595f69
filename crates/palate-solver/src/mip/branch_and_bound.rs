//! Exact depth-first branch-and-bound for small finite-domain models.
//!
//! Supported class: every integer variable has finite bounds and every row
//! contains at most one continuous variable. Once the integers are fixed, each
//! continuous variable is then confined to an interval and takes the endpoint
//! its objective coefficient prefers, so leaves are solved in closed form.
//!
//! Per node:
//! 1. Activity-based bound propagation on rows without continuous variables.
//! 2. Interval lower bound: integer terms at their cheapest bound, continuous
//!    terms at the cheapest end of their implied interval.
//! 3. When the model decomposes into small integer blocks (see
//!    [`relaxation`](super::relaxation)), a Lagrangian bound on top, and
//!    branching on the block with the largest reduced-cost gap, cheapest
//!    assignment first.
//! 4. Otherwise branch on the first unfixed integer (declaration order),
//!    enumerating values nearest zero first.

use palate_core::constants::DEFAULT_SOLVER_TOLERANCE;
use palate_core::errors::SolverError;
use tracing::{debug, trace};

use super::model::{MipModel, MipSolution, Sense, VarKind};
use super::relaxation::Relaxation;
use super::IMipSolver;

const BACKEND_NAME: &str = "branch-and-bound";

/// Propagation sweeps per node before giving up on a fixpoint.
const MAX_PROPAGATION_PASSES: usize = 32;

/// Subgradient steps for the root bound and for each later node.
const ROOT_ITERATIONS: usize = 150;
const NODE_ITERATIONS: usize = 6;

/// Bundled exact backend.
#[derive(Debug, Clone)]
pub struct BranchAndBound {
    tolerance: f64,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_SOLVER_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self::new()
    }
}

impl IMipSolver for BranchAndBound {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn solve(&self, model: &MipModel) -> Result<MipSolution, SolverError> {
        let prepared = Prepared::build(model)?;
        let infeasible = || SolverError::Infeasible {
            model: model.name().to_string(),
        };

        let (mut lo, mut hi) = prepared.initial_bounds(model, self.tolerance);
        let relaxation: Option<Relaxation>;
        let mut search = Search {
            model,
            prepared: &prepared,
            relaxation: None,
            tolerance: self.tolerance,
            incumbent: None,
            root_bound: f64::NEG_INFINITY,
            nodes: 0,
        };

        if prepared.integers.iter().any(|&j| lo[j] > hi[j]) || !search.propagate(&mut lo, &mut hi)
        {
            return Err(infeasible());
        }
        let mut root_bound = search.lower_bound(&lo, &hi).ok_or_else(infeasible)?;

        if let Some(initial) = model.initial_solution() {
            if model.is_feasible(initial, search.feasibility_tolerance()) {
                let objective = model.evaluate_objective(initial);
                debug!(model = model.name(), objective, "seeded incumbent from initial solution");
                search.incumbent = Some((initial.to_vec(), objective));
            } else {
                debug!(model = model.name(), "ignoring infeasible initial solution");
            }
        }

        relaxation = Relaxation::build(model, &prepared, &lo, &hi);
        search.relaxation = relaxation.as_ref();
        let mut multipliers = Vec::new();
        if let Some(relaxation) = search.relaxation {
            let view = relaxation.view(&lo, &hi).ok_or_else(infeasible)?;
            multipliers = relaxation.multipliers();
            let dual = relaxation.ascend(&view, &mut multipliers, ROOT_ITERATIONS, search.best());
            root_bound = root_bound.max(dual);
        }
        search.root_bound = root_bound;

        search.explore(lo, hi, multipliers)?;

        let nodes = search.nodes;
        let (values, objective) = search.incumbent.ok_or_else(infeasible)?;
        debug!(
            model = model.name(),
            nodes,
            objective,
            root_bound = search.root_bound,
            lagrangian = search.relaxation.is_some(),
            "branch-and-bound finished"
        );
        Ok(MipSolution {
            values,
            objective,
            nodes,
        })
    }
}

/// A row with its expression constant folded into `rhs`.
pub(super) struct Row {
    pub(super) integer_terms: Vec<(usize, f64)>,
    continuous: Option<(usize, f64)>,
    pub(super) sense: Sense,
    pub(super) rhs: f64,
}

/// Model flattened into dense, index-addressed form.
pub(super) struct Prepared {
    pub(super) rows: Vec<Row>,
    /// Integer variables in declaration order.
    pub(super) integers: Vec<usize>,
    pub(super) continuous: Vec<usize>,
    /// `(row, coefficient)` pairs per continuous variable, indexed by variable.
    pub(super) continuous_rows: Vec<Vec<(usize, f64)>>,
    /// Rows with no continuous variable; the only ones propagation touches.
    pub(super) integer_rows: Vec<usize>,
    pub(super) objective: Vec<f64>,
    pub(super) objective_constant: f64,
}

impl Prepared {
    pub(super) fn build(model: &MipModel) -> Result<Self, SolverError> {
        let n = model.variables().len();
        let invalid = |reason: String| SolverError::InvalidModel {
            model: model.name().to_string(),
            reason,
        };
        let unsupported = |reason: String| SolverError::UnsupportedModel {
            model: model.name().to_string(),
            backend: BACKEND_NAME.to_string(),
            reason,
        };

        let mut integers = Vec::new();
        let mut continuous = Vec::new();
        for (index, var) in model.variables().iter().enumerate() {
            if var.lower.is_nan()
                || var.upper.is_nan()
                || var.lower > var.upper
                || var.lower == f64::INFINITY
                || var.upper == f64::NEG_INFINITY
            {
                return Err(invalid(format!(
                    "variable {} has bounds [{}, {}]",
                    var.name, var.lower, var.upper
                )));
            }
            match var.kind {
                VarKind::Integer => {
                    if !var.lower.is_finite() || !var.upper.is_finite() {
                        return Err(unsupported(format!(
                            "integer variable {} needs finite bounds",
                            var.name
                        )));
                    }
                    integers.push(index);
                }
                VarKind::Continuous => continuous.push(index),
            }
        }

        let mut objective = vec![0.0; n];
        for &(var, coefficient) in model.objective().terms() {
            if var.index() >= n || !coefficient.is_finite() {
                return Err(invalid(format!(
                    "objective term on variable #{} with coefficient {coefficient}",
                    var.index()
                )));
            }
            objective[var.index()] += coefficient;
        }
        let objective_constant = model.objective().constant();
        if !objective_constant.is_finite() {
            return Err(invalid("objective constant is not finite".to_string()));
        }

        let mut rows = Vec::with_capacity(model.constraints().len());
        let mut continuous_rows = vec![Vec::new(); n];
        let mut integer_rows = Vec::new();
        for (r, constraint) in model.constraints().iter().enumerate() {
            let rhs = constraint.rhs - constraint.expr.constant();
            if !rhs.is_finite() {
                return Err(invalid(format!("row {} has a non-finite bound", constraint.name)));
            }
            let mut row = Row {
                integer_terms: Vec::new(),
                continuous: None,
                sense: constraint.sense,
                rhs,
            };
            for &(var, coefficient) in constraint.expr.terms() {
                if var.index() >= n || !coefficient.is_finite() {
                    return Err(invalid(format!(
                        "row {} has term on variable #{} with coefficient {coefficient}",
                        constraint.name,
                        var.index()
                    )));
                }
                if coefficient == 0.0 {
                    continue;
                }
                match model.variable(var).kind {
                    VarKind::Integer => row.integer_terms.push((var.index(), coefficient)),
                    VarKind::Continuous => {
                        if row.continuous.is_some() {
                            return Err(unsupported(format!(
                                "row {} couples more than one continuous variable",
                                constraint.name
                            )));
                        }
                        row.continuous = Some((var.index(), coefficient));
                    }
                }
            }
            match row.continuous {
                Some((var, coefficient)) => continuous_rows[var].push((r, coefficient)),
                None => integer_rows.push(r),
            }
            rows.push(row);
        }

        if let Some(initial) = model.initial_solution() {
            if initial.len() != n {
                return Err(invalid(format!(
                    "initial solution has {} values for {n} variables",
                    initial.len()
                )));
            }
        }

        Ok(Self {
            rows,
            integers,
            continuous,
            continuous_rows,
            integer_rows,
            objective,
            objective_constant,
        })
    }

    /// Integer bounds rounded inward; continuous entries are unused.
    pub(super) fn initial_bounds(&self, model: &MipModel, tolerance: f64) -> (Vec<f64>, Vec<f64>) {
        let n = model.variables().len();
        let mut lo = vec![0.0; n];
        let mut hi = vec![0.0; n];
        for &j in &self.integers {
            let var = &model.variables()[j];
            lo[j] = (var.lower - tolerance).ceil();
            hi[j] = (var.upper + tolerance).floor();
        }
        (lo, hi)
    }
}

struct Search<'a> {
    model: &'a MipModel,
    prepared: &'a Prepared,
    relaxation: Option<&'a Relaxation>,
    tolerance: f64,
    incumbent: Option<(Vec<f64>, f64)>,
    root_bound: f64,
    nodes: u64,
}

impl Search<'_> {
    fn feasibility_tolerance(&self) -> f64 {
        (self.tolerance * 100.0).max(1e-7)
    }

    /// The incumbent already meets the root bound; nothing can beat it.
    fn finished(&self) -> bool {
        self.best()
            .is_some_and(|best| best <= self.root_bound + self.tolerance)
    }

    fn best(&self) -> Option<f64> {
        self.incumbent.as_ref().map(|(_, objective)| *objective)
    }

    /// Nothing under a node with this bound can improve the incumbent.
    fn prunes(&self, bound: f64) -> bool {
        self.best().is_some_and(|best| bound >= best - self.tolerance)
    }

    fn explore(
        &mut self,
        mut lo: Vec<f64>,
        mut hi: Vec<f64>,
        mut multipliers: Vec<f64>,
    ) -> Result<(), SolverError> {
        if self.finished() {
            return Ok(());
        }
        self.nodes += 1;

        if !self.propagate(&mut lo, &mut hi) {
            return Ok(());
        }
        let Some(bound) = self.lower_bound(&lo, &hi) else {
            return Ok(());
        };
        if self.prunes(bound) {
            return Ok(());
        }

        let Some(relaxation) = self.relaxation else {
            return self.branch_on_variable(lo, hi);
        };
        let Some(view) = relaxation.view(&lo, &hi) else {
            return Ok(());
        };
        let dual = relaxation.ascend(&view, &mut multipliers, NODE_ITERATIONS, self.best());
        if self.prunes(dual) {
            return Ok(());
        }

        let Some((block, children)) = relaxation.branching(&view, &multipliers) else {
            relaxation.pin(&view, &mut lo, &mut hi);
            return self.settle_leaf(&lo, &hi);
        };
        // Children come cheapest first, so the first pruned one ends the loop.
        for (increase, assignment) in children {
            if self.prunes(dual + increase) {
                break;
            }
            let mut child_lo = lo.clone();
            let mut child_hi = hi.clone();
            relaxation.assign(block, assignment, &mut child_lo, &mut child_hi);
            self.explore(child_lo, child_hi, multipliers.clone())?;
            if self.finished() {
                break;
            }
        }
        Ok(())
    }

    fn branch_on_variable(&mut self, lo: Vec<f64>, hi: Vec<f64>) -> Result<(), SolverError> {
        let Some(j) = self
            .prepared
            .integers
            .iter()
            .copied()
            .find(|&j| lo[j] < hi[j])
        else {
            return self.settle_leaf(&lo, &hi);
        };

        for value in branch_values(lo[j], hi[j]) {
            let mut child_lo = lo.clone();
            let mut child_hi = hi.clone();
            child_lo[j] = value;
            child_hi[j] = value;
            self.explore(child_lo, child_hi, Vec::new())?;
            if self.finished() {
                break;
            }
        }
        Ok(())
    }

    /// Complete a fixed leaf and keep it if it beats the incumbent.
    fn settle_leaf(&mut self, lo: &[f64], hi: &[f64]) -> Result<(), SolverError> {
        if let Some((values, objective)) = self.evaluate_leaf(lo, hi)? {
            let improves = self.best().map_or(true, |best| objective < best - self.tolerance);
            if improves {
                trace!(objective, nodes = self.nodes, "new incumbent");
                self.incumbent = Some((values, objective));
            }
        }
        Ok(())
    }

    /// Tighten integer bounds to a fixpoint. Returns false on infeasibility.
    fn propagate(&self, lo: &mut [f64], hi: &mut [f64]) -> bool {
        for _ in 0..MAX_PROPAGATION_PASSES {
            let mut changed = false;
            for &r in &self.prepared.integer_rows {
                let row = &self.prepared.rows[r];
                let feasible = match row.sense {
                    Sense::LessEq => {
                        self.tighten(&row.integer_terms, 1.0, row.rhs, lo, hi, &mut changed)
                    }
                    Sense::GreaterEq => {
                        self.tighten(&row.integer_terms, -1.0, row.rhs, lo, hi, &mut changed)
                    }
                    Sense::Equal => {
                        self.tighten(&row.integer_terms, 1.0, row.rhs, lo, hi, &mut changed)
                            && self.tighten(&row.integer_terms, -1.0, row.rhs, lo, hi, &mut changed)
                    }
                };
                if !feasible {
                    return false;
                }
            }
            if !changed {
                break;
            }
        }
        true
    }

    /// Apply `Σ sign·a·x ≤ sign·rhs` to each variable's bounds.
    fn tighten(
        &self,
        terms: &[(usize, f64)],
        sign: f64,
        rhs: f64,
        lo: &mut [f64],
        hi: &mut [f64],
        changed: &mut bool,
    ) -> bool {
        let bound = sign * rhs;
        let min_activity: f64 = terms
            .iter()
            .map(|&(j, a)| cheapest(sign * a, lo[j], hi[j]))
            .sum();
        if min_activity > bound + self.tolerance {
            return false;
        }
        for &(j, a) in terms {
            let a = sign * a;
            let slack = bound - (min_activity - cheapest(a, lo[j], hi[j]));
            if a > 0.0 {
                let new_hi = (slack / a + self.tolerance).floor();
                if new_hi < hi[j] {
                    hi[j] = new_hi;
                    *changed = true;
                }
            } else {
                let new_lo = (slack / a - self.tolerance).ceil();
                if new_lo > lo[j] {
                    lo[j] = new_lo;
                    *changed = true;
                }
            }
            if lo[j] > hi[j] {
                return false;
            }
        }
        true
    }

    /// Interval a continuous variable is confined to under the current
    /// integer bounds. Exact once every integer is fixed.
    fn implied_interval(&self, v: usize, lo: &[f64], hi: &[f64]) -> (f64, f64) {
        let var = &self.model.variables()[v];
        let (mut v_lo, mut v_hi) = (var.lower, var.upper);
        for &(r, c) in &self.prepared.continuous_rows[v] {
            let row = &self.prepared.rows[r];
            let (min_i, max_i) = activity_range(&row.integer_terms, lo, hi);
            let (upper_side, lower_side) = match row.sense {
                Sense::LessEq => (true, false),
                Sense::GreaterEq => (false, true),
                Sense::Equal => (true, true),
            };
            if upper_side {
                // c·v ≤ rhs − min_i
                let limit = (row.rhs - min_i) / c;
                if c > 0.0 {
                    v_hi = v_hi.min(limit);
                } else {
                    v_lo = v_lo.max(limit);
                }
            }
            if lower_side {
                // c·v ≥ rhs − max_i
                let limit = (row.rhs - max_i) / c;
                if c > 0.0 {
                    v_lo = v_lo.max(limit);
                } else {
                    v_hi = v_hi.min(limit);
                }
            }
        }
        (v_lo, v_hi)
    }

    /// Objective lower bound over the node, or `None` if some continuous
    /// interval is empty.
    fn lower_bound(&self, lo: &[f64], hi: &[f64]) -> Option<f64> {
        let p = self.prepared;
        let mut bound = p.objective_constant;
        for &j in &p.integers {
            bound += cheapest(p.objective[j], lo[j], hi[j]);
        }
        for &v in &p.continuous {
            let (v_lo, v_hi) = self.implied_interval(v, lo, hi);
            if v_lo > v_hi + self.tolerance {
                return None;
            }
            let c = p.objective[v];
            if c > 0.0 {
                bound += c * v_lo;
            } else if c < 0.0 {
                bound += c * v_hi;
            }
        }
        Some(bound)
    }

    /// Complete a fully fixed integer assignment with optimal continuous values.
    fn evaluate_leaf(
        &self,
        lo: &[f64],
        hi: &[f64],
    ) -> Result<Option<(Vec<f64>, f64)>, SolverError> {
        let p = self.prepared;
        let mut values = vec![0.0; self.model.variables().len()];
        for &j in &p.integers {
            values[j] = lo[j];
        }
        for &v in &p.continuous {
            let (v_lo, v_hi) = self.implied_interval(v, lo, hi);
            if v_lo > v_hi + self.tolerance {
                return Ok(None);
            }
            let c = p.objective[v];
            let unbounded = || SolverError::Unbounded {
                model: self.model.name().to_string(),
            };
            values[v] = if c > 0.0 {
                if v_lo == f64::NEG_INFINITY {
                    return Err(unbounded());
                }
                v_lo
            } else if c < 0.0 {
                if v_hi == f64::INFINITY {
                    return Err(unbounded());
                }
                v_hi
            } else if v_lo.is_finite() {
                v_lo
            } else if v_hi.is_finite() {
                v_hi
            } else {
                0.0
            };
        }
        if !self.model.is_feasible(&values, self.feasibility_tolerance()) {
            trace!("leaf rejected by final feasibility check");
            return Ok(None);
        }
        let objective = self.model.evaluate_objective(&values);
        Ok(Some((values, objective)))
    }
}

/// Smallest value of `a·x` for `x ∈ [lo, hi]`.
fn cheapest(a: f64, lo: f64, hi: f64) -> f64 {
    if a > 0.0 {
        a * lo
    } else if a < 0.0 {
        a * hi
    } else {
        0.0
    }
}

fn activity_range(terms: &[(usize, f64)], lo: &[f64], hi: &[f64]) -> (f64, f64) {
    terms.iter().fold((0.0, 0.0), |(min, max), &(j, a)| {
        (min + cheapest(a, lo[j], hi[j]), max - cheapest(-a, lo[j], hi[j]))
    })
}

/// Domain values ordered nearest zero first, negatives before positives.
fn branch_values(lo: f64, hi: f64) -> Vec<f64> {
    let mut values: Vec<i64> = (lo as i64..=hi as i64).collect();
    values.sort_by_key(|v| (v.abs(), *v));
    values.into_iter().map(|v| v as f64).collect()
}
