/*!
This crate for Rust provides a first-order ADMM solver for **convex
optimization problems in graph form**:

```text
minimize    f(y) + g(x)
subject to  y = A x
```

where `f` and `g` are separable sums of simple scalar convex functions,
one term per row of `A` for `f` and one per column for `g`, and `A` is a
dense matrix. Choosing the per-row/per-column [`FuncKind`]s expresses whole
problem classes without a specialized algorithm per class: non-negative
least squares, linear programs in inequality or equality form, Lasso
regression, support-vector-machine training and so on.

# General usage

1. Express your problem by classifying each row and column into a
   [`FuncKind`] with its affine parameters, building the `f` and `g`
   sequences of [`Func`] objects.
1. Choose a [`LinAlgEx`] implementation to use:
   * [`FloatGeneric`] -
     `num::Float`-generic, pure Rust, sequential.
   * [`FloatRayon`] (`par` feature) -
     distributes the matrix-vector products and proximal sweeps over a
     rayon thread pool.
1. Wrap your matrix data in a [`MatOp`] (row-major or column-major), or
   implement [`Operator`] for your own storage.
1. Construct a [`Problem`] borrowing the operator, the function sequences
   and your output buffers; every dimension contract is checked there.
1. Create a [`Solver`] instance, optionally set its parameters, and invoke
   [`Solver::solve`] to run the iteration and obtain a [`Report`].

# Example

A single-variable least squares `minimize (y - 3)^2 / 2 s.t. y = x`:

```
use float_eq::assert_float_eq;
use graphprox::prelude::*;

//env_logger::init(); // Use any logger crate as `graphprox` uses `log` crate.

type La = FloatGeneric<f64>;
type ASolver = Solver<La, f64>;

let array = &[1.];
let op_a = MatOp::<La, _>::new(MatLayout::RowMajor(1, 1), array);

let f = &[Func::shift(FuncKind::Square, 3.)];
let g = &[Func::new(FuncKind::Zero)];

let x = &mut[0.];
let y = &mut[0.];

let s = ASolver::new().par(|p| {
    p.abs_tol = 1e-8;
    p.rel_tol = 1e-6;
    p.max_iter = 10_000;
});
let prob = Problem::new(&op_a, f, g, x, y).unwrap();
let rslt = s.solve(prob);

assert_eq!(rslt.status, Status::Converged);
assert_float_eq!(x[0], 3., abs <= 1e-3);
```

Solving runs to convergence or iteration exhaustion; exhaustion is a
defined terminal state, not an error, and the best available iterates are
still written back. Progress is reported through the `log` crate.
*/

mod linalg;

pub use linalg::*;

//

mod floatgeneric;

pub use floatgeneric::*;

//

#[cfg(feature = "par")]
mod floatrayon;

#[cfg(feature = "par")]
pub use floatrayon::*;

//

mod operator;

pub use operator::*;

//

mod matop;

pub use matop::*;

//

mod func;

pub use func::*;

//

mod problem;

pub use problem::*;

//

mod solver;

pub use solver::*;

//

mod stop;

//

/// Prelude
pub mod prelude
{
    pub use crate::linalg::{LinAlg, LinAlgEx};
    pub use crate::floatgeneric::FloatGeneric;
    pub use crate::operator::Operator;
    pub use crate::matop::{MatLayout, MatOp};
    pub use crate::func::{Func, FuncKind};
    pub use crate::problem::Problem;
    pub use crate::solver::{Report, Solver, SolverError, SolverParam, Status};

    #[cfg(feature = "par")]
    pub use crate::floatrayon::FloatRayon;
}
