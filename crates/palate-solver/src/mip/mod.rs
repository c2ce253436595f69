//! The `solveMIP` seam: a small model vocabulary plus the trait a backend
//! implements. Profile fitting only speaks this vocabulary, so an embedded
//! solver, a native binding, or the bundled branch-and-bound are
//! interchangeable.

pub mod branch_and_bound;
pub mod model;
mod relaxation;

pub use branch_and_bound::BranchAndBound;
pub use model::{Constraint, LinearExpr, MipModel, MipSolution, Sense, VarId, VarKind, Variable};

use palate_core::errors::SolverError;

/// Exact mixed-integer backend. `solve` returns a minimising assignment or
/// reports why none exists.
pub trait IMipSolver: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    fn solve(&self, model: &MipModel) -> Result<MipSolution, SolverError>;
}
