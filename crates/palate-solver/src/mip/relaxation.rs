//! Lagrangian bound for models that split into small integer blocks joined
//! only through priced continuous variables.
//!
//! Integer variables linked by pure-integer rows form a block, and each
//! block's feasible assignments are enumerated once. A continuous variable is
//! priced when it has a positive cost, no upper bound, and rows that only
//! bound it from below through one shared integer expression `E`; its
//! cheapest value is then a convex function `cost(E)`. Dualising every `E`
//! with a multiplier `w` separates the blocks:
//!
//! ```text
//! L(w) = Σ_b min_a [obj_b(a) + Σ_v w_v·e_vb(a)] − Σ_v max_E [w_v·E − cost_v(E)]
//! ```
//!
//! `L(w)` bounds the node from below for every `w`, so the multipliers are
//! improved by subgradient ascent and inherited by child nodes. When `E` only
//! takes integer values the inner maximum runs over integers, which charges
//! fractional targets their unavoidable rounding.

use tracing::debug;

use super::branch_and_bound::Prepared;
use super::model::{MipModel, Sense};

/// Largest domain product enumerated for one block.
const MAX_BLOCK_ASSIGNMENTS: usize = 4096;

const COEFFICIENT_TOLERANCE: f64 = 1e-9;

struct Block {
    vars: Vec<usize>,
    /// Feasible assignments, one value per entry of `vars`.
    assignments: Vec<Vec<f64>>,
    /// Objective contribution of each assignment.
    costs: Vec<f64>,
    /// Priced variables whose expression reads this block.
    priced: Vec<usize>,
    /// `e_vb(a)` per assignment, aligned with `priced`.
    terms: Vec<Vec<f64>>,
}

/// `value ≥ constant + slope·E`.
#[derive(Debug, Clone, Copy)]
struct Piece {
    constant: f64,
    slope: f64,
}

impl Piece {
    fn at(self, e: f64) -> f64 {
        self.constant + self.slope * e
    }
}

struct PricedVar {
    cost: f64,
    pieces: Vec<Piece>,
    integral: bool,
}

impl PricedVar {
    /// Cheapest objective contribution once the expression equals `e`.
    fn price(&self, e: f64) -> f64 {
        let value = self
            .pieces
            .iter()
            .map(|p| p.at(e))
            .fold(f64::NEG_INFINITY, f64::max);
        self.cost * value
    }

    /// `max_{E ∈ [lo, hi]} w·E − price(E)` with its maximiser.
    fn conjugate(&self, w: f64, lo: f64, hi: f64) -> (f64, f64) {
        let mut candidates = vec![lo, hi];
        for (i, a) in self.pieces.iter().enumerate() {
            for b in &self.pieces[i + 1..] {
                if (a.slope - b.slope).abs() > COEFFICIENT_TOLERANCE {
                    let e = (b.constant - a.constant) / (a.slope - b.slope);
                    if e > lo && e < hi {
                        if self.integral {
                            candidates.push(e.floor());
                            candidates.push(e.ceil());
                        } else {
                            candidates.push(e);
                        }
                    }
                }
            }
        }
        candidates
            .into_iter()
            .map(|e| (w * e - self.price(e), e))
            .fold((f64::NEG_INFINITY, lo), |best, c| if c.0 > best.0 { c } else { best })
    }
}

/// Per-node restriction: which assignments each block still allows, and the
/// range each priced expression can reach.
pub(super) struct NodeView {
    allowed: Vec<Vec<usize>>,
    ranges: Vec<(f64, f64)>,
}

pub(super) struct Relaxation {
    blocks: Vec<Block>,
    priced: Vec<PricedVar>,
    constant: f64,
}

impl Relaxation {
    /// `None` when the model falls outside the supported structure.
    pub(super) fn build(
        model: &MipModel,
        prepared: &Prepared,
        lo: &[f64],
        hi: &[f64],
    ) -> Option<Self> {
        let n = model.variables().len();

        let mut priced = Vec::new();
        let mut expressions: Vec<Vec<(usize, f64)>> = Vec::new();
        for &v in &prepared.continuous {
            match price_variable(model, prepared, v) {
                Pricing::Ignored => {}
                Pricing::Priced(var, expression) => {
                    priced.push(var);
                    expressions.push(expression);
                }
                Pricing::Unsupported(reason) => {
                    debug!(model = model.name(), reason, "lagrangian bound unavailable");
                    return None;
                }
            }
        }

        // Union integer variables that share a pure-integer row.
        let mut parent: Vec<usize> = (0..n).collect();
        for &r in &prepared.integer_rows {
            let terms = &prepared.rows[r].integer_terms;
            for pair in terms.windows(2) {
                union(&mut parent, pair[0].0, pair[1].0);
            }
        }
        let mut block_of = vec![usize::MAX; n];
        let mut members: Vec<Vec<usize>> = Vec::new();
        for &j in &prepared.integers {
            let root = find(&mut parent, j);
            if block_of[root] == usize::MAX {
                block_of[root] = members.len();
                members.push(Vec::new());
            }
            block_of[j] = block_of[root];
            members[block_of[j]].push(j);
        }
        let mut block_rows: Vec<Vec<usize>> = vec![Vec::new(); members.len()];
        for &r in &prepared.integer_rows {
            if let Some(&(j, _)) = prepared.rows[r].integer_terms.first() {
                block_rows[block_of[j]].push(r);
            }
        }

        let mut blocks = Vec::with_capacity(members.len());
        for (b, vars) in members.into_iter().enumerate() {
            let Some(assignments) = enumerate_block(prepared, &vars, &block_rows[b], lo, hi)
            else {
                debug!(
                    model = model.name(),
                    size = vars.len(),
                    "lagrangian bound unavailable: block domain too large"
                );
                return None;
            };
            let local = |j: usize| vars.iter().position(|&x| x == j);
            let costs: Vec<f64> = assignments
                .iter()
                .map(|a| {
                    vars.iter()
                        .zip(a)
                        .map(|(&j, &x)| prepared.objective[j] * x)
                        .sum::<f64>()
                })
                .collect();
            let touching: Vec<usize> = expressions
                .iter()
                .enumerate()
                .filter(|(_, expr)| expr.iter().any(|&(j, _)| block_of[j] == b))
                .map(|(k, _)| k)
                .collect();
            let terms: Vec<Vec<f64>> = assignments
                .iter()
                .map(|a| {
                    touching
                        .iter()
                        .map(|&k| {
                            expressions[k]
                                .iter()
                                .filter_map(|&(j, c)| local(j).map(|i| c * a[i]))
                                .sum::<f64>()
                        })
                        .collect()
                })
                .collect();
            blocks.push(Block {
                vars,
                assignments,
                costs,
                priced: touching,
                terms,
            });
        }

        debug!(
            model = model.name(),
            blocks = blocks.len(),
            priced = priced.len(),
            "lagrangian bound enabled"
        );
        Some(Self {
            blocks,
            priced,
            constant: prepared.objective_constant,
        })
    }

    pub(super) fn multipliers(&self) -> Vec<f64> {
        vec![0.0; self.priced.len()]
    }

    /// Restrict every block to the bounds. `None` when some block has no
    /// assignment left.
    pub(super) fn view(&self, lo: &[f64], hi: &[f64]) -> Option<NodeView> {
        let mut allowed = Vec::with_capacity(self.blocks.len());
        let mut ranges = vec![(0.0, 0.0); self.priced.len()];
        for block in &self.blocks {
            let fits: Vec<usize> = block
                .assignments
                .iter()
                .enumerate()
                .filter(|(_, a)| {
                    block
                        .vars
                        .iter()
                        .zip(a.iter())
                        .all(|(&j, &x)| x >= lo[j] && x <= hi[j])
                })
                .map(|(i, _)| i)
                .collect();
            if fits.is_empty() {
                return None;
            }
            for (slot, &k) in block.priced.iter().enumerate() {
                let (min, max) = fits
                    .iter()
                    .map(|&a| block.terms[a][slot])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                        (lo.min(e), hi.max(e))
                    });
                ranges[k].0 += min;
                ranges[k].1 += max;
            }
            allowed.push(fits);
        }
        for (range, var) in ranges.iter_mut().zip(&self.priced) {
            if var.integral {
                *range = (range.0.round(), range.1.round());
            }
        }
        Some(NodeView { allowed, ranges })
    }

    /// Lagrangian cost of assignment `a` of `block` under `w`.
    fn reduced_cost(&self, block: &Block, a: usize, w: &[f64]) -> f64 {
        block.costs[a]
            + block
                .priced
                .iter()
                .zip(&block.terms[a])
                .map(|(&k, e)| w[k] * e)
                .sum::<f64>()
    }

    /// `L(w)` and a subgradient.
    fn evaluate(&self, view: &NodeView, w: &[f64]) -> (f64, Vec<f64>) {
        let mut value = self.constant;
        let mut gradient = vec![0.0; self.priced.len()];
        for (block, allowed) in self.blocks.iter().zip(&view.allowed) {
            let (cost, best) = allowed
                .iter()
                .map(|&a| (self.reduced_cost(block, a, w), a))
                .fold((f64::INFINITY, 0), |acc, c| if c.0 < acc.0 { c } else { acc });
            value += cost;
            for (&k, e) in block.priced.iter().zip(&block.terms[best]) {
                gradient[k] += e;
            }
        }
        for (k, var) in self.priced.iter().enumerate() {
            let (lo, hi) = view.ranges[k];
            let (conjugate, e) = var.conjugate(w[k], lo, hi);
            value -= conjugate;
            gradient[k] -= e;
        }
        (value, gradient)
    }

    /// Subgradient ascent from `w` with Polyak steps toward `target`.
    /// Leaves the best multipliers found in `w` and returns their bound.
    pub(super) fn ascend(
        &self,
        view: &NodeView,
        w: &mut [f64],
        iterations: usize,
        target: Option<f64>,
    ) -> f64 {
        let (mut value, mut gradient) = self.evaluate(view, w);
        let mut best = value;
        let mut best_w = w.to_vec();
        let mut scale = 1.0;
        let mut stalled = 0;
        for _ in 0..iterations {
            let goal = match target {
                Some(t) if best >= t => break,
                Some(t) => t,
                None => best + 1.0 + best.abs() * 0.05,
            };
            let norm: f64 = gradient.iter().map(|g| g * g).sum();
            if norm <= f64::EPSILON {
                break;
            }
            let step = scale * (goal - value) / norm;
            for (wk, g) in w.iter_mut().zip(&gradient) {
                *wk += step * g;
            }
            (value, gradient) = self.evaluate(view, w);
            if value > best {
                best = value;
                best_w.copy_from_slice(w);
                stalled = 0;
            } else {
                stalled += 1;
                if stalled >= 3 {
                    scale *= 0.5;
                    stalled = 0;
                }
            }
        }
        w.copy_from_slice(&best_w);
        best
    }

    /// Block to branch on and its allowed assignments, cheapest first, each
    /// with its reduced-cost increase over the cheapest. The block with the
    /// widest gap between its two cheapest assignments goes first. `None`
    /// once every block is down to one assignment.
    pub(super) fn branching(
        &self,
        view: &NodeView,
        w: &[f64],
    ) -> Option<(usize, Vec<(f64, usize)>)> {
        let mut choice: Option<(f64, usize, Vec<(f64, usize)>)> = None;
        for (b, (block, allowed)) in self.blocks.iter().zip(&view.allowed).enumerate() {
            if allowed.len() < 2 {
                continue;
            }
            let mut ranked: Vec<(f64, usize)> = allowed
                .iter()
                .map(|&a| (self.reduced_cost(block, a, w), a))
                .collect();
            ranked.sort_by(|x, y| x.0.total_cmp(&y.0));
            let cheapest = ranked[0].0;
            let regret = ranked[1].0 - cheapest;
            if choice.as_ref().map_or(true, |(r, _, _)| regret > *r) {
                for entry in &mut ranked {
                    entry.0 -= cheapest;
                }
                choice = Some((regret, b, ranked));
            }
        }
        choice.map(|(_, b, ranked)| (b, ranked))
    }

    /// Fix the variables of `block` to assignment `a`.
    pub(super) fn assign(&self, block: usize, a: usize, lo: &mut [f64], hi: &mut [f64]) {
        let block = &self.blocks[block];
        for (&j, &x) in block.vars.iter().zip(&block.assignments[a]) {
            lo[j] = x;
            hi[j] = x;
        }
    }

    /// Fix every block to its only remaining assignment.
    pub(super) fn pin(&self, view: &NodeView, lo: &mut [f64], hi: &mut [f64]) {
        for (b, allowed) in view.allowed.iter().enumerate() {
            if let Some(&a) = allowed.first() {
                self.assign(b, a, lo, hi);
            }
        }
    }
}

enum Pricing {
    /// Free to rise without cost; never binds.
    Ignored,
    Priced(PricedVar, Vec<(usize, f64)>),
    Unsupported(&'static str),
}

fn price_variable(model: &MipModel, prepared: &Prepared, v: usize) -> Pricing {
    let var = &model.variables()[v];
    let cost = prepared.objective[v];
    if var.upper.is_finite() {
        return Pricing::Unsupported("continuous variable with an upper bound");
    }
    if cost < 0.0 {
        return Pricing::Unsupported("continuous variable with a negative cost");
    }

    let mut expression: Option<Vec<(usize, f64)>> = None;
    let mut pieces = Vec::new();
    if var.lower.is_finite() {
        pieces.push(Piece {
            constant: var.lower,
            slope: 0.0,
        });
    }
    for &(r, c) in &prepared.continuous_rows[v] {
        let row = &prepared.rows[r];
        let lower_limit = matches!(
            (row.sense, c > 0.0),
            (Sense::GreaterEq, true) | (Sense::LessEq, false)
        );
        if !lower_limit {
            return Pricing::Unsupported("row bounds a continuous variable from above");
        }
        let mut terms = row.integer_terms.clone();
        terms.sort_by_key(|&(j, _)| j);
        let ratio = if terms.is_empty() {
            0.0
        } else if let Some(base) = &expression {
            match proportion(base, &terms) {
                Some(ratio) => ratio,
                None => return Pricing::Unsupported("rows read different integer expressions"),
            }
        } else {
            expression = Some(terms);
            1.0
        };
        // ratio·E + c·v ≥ rhs (or ≤ with c < 0) gives v ≥ (rhs − ratio·E) / c.
        pieces.push(Piece {
            constant: row.rhs / c,
            slope: -ratio / c,
        });
    }

    if cost == 0.0 {
        return Pricing::Ignored;
    }
    if pieces.is_empty() {
        return Pricing::Unsupported("priced variable without a lower limit");
    }
    let expression = expression.unwrap_or_default();
    let integral = expression
        .iter()
        .all(|&(_, c)| (c - c.round()).abs() <= COEFFICIENT_TOLERANCE);
    Pricing::Priced(
        PricedVar {
            cost,
            pieces,
            integral,
        },
        expression,
    )
}

/// `ρ` with `terms = ρ·base`, if the supports match.
fn proportion(base: &[(usize, f64)], terms: &[(usize, f64)]) -> Option<f64> {
    if base.len() != terms.len() {
        return None;
    }
    let ratio = terms[0].1 / base[0].1;
    base.iter().zip(terms).all(|(&(bj, bc), &(tj, tc))| {
        bj == tj && (tc - ratio * bc).abs() <= COEFFICIENT_TOLERANCE * tc.abs().max(1.0)
    })
    .then_some(ratio)
}

/// Every assignment of `vars` within bounds that satisfies `rows`, or `None`
/// if the domain product is too large.
fn enumerate_block(
    prepared: &Prepared,
    vars: &[usize],
    rows: &[usize],
    lo: &[f64],
    hi: &[f64],
) -> Option<Vec<Vec<f64>>> {
    let mut size: usize = 1;
    for &j in vars {
        let width = (hi[j] - lo[j]) as usize + 1;
        size = size.checked_mul(width)?;
        if size > MAX_BLOCK_ASSIGNMENTS {
            return None;
        }
    }

    let mut values: Vec<f64> = vars.iter().map(|&j| lo[j]).collect();
    let mut out = Vec::new();
    let mut scratch = vec![0.0; lo.len()];
    loop {
        for (&j, &x) in vars.iter().zip(&values) {
            scratch[j] = x;
        }
        let feasible = rows.iter().all(|&r| {
            let row = &prepared.rows[r];
            let activity: f64 = row.integer_terms.iter().map(|&(j, a)| a * scratch[j]).sum();
            match row.sense {
                Sense::LessEq => activity <= row.rhs + COEFFICIENT_TOLERANCE,
                Sense::GreaterEq => activity >= row.rhs - COEFFICIENT_TOLERANCE,
                Sense::Equal => (activity - row.rhs).abs() <= COEFFICIENT_TOLERANCE,
            }
        });
        if feasible {
            out.push(values.clone());
        }

        // Odometer step.
        let mut i = 0;
        loop {
            if i == vars.len() {
                return Some(out);
            }
            let j = vars[i];
            if values[i] < hi[j] {
                values[i] += 1.0;
                break;
            }
            values[i] = lo[j];
            i += 1;
        }
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}
