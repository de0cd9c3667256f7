//! Problem descriptor

use num_traits::Float;
use crate::func::Func;
use crate::operator::Operator;
use crate::solver::SolverError;

/// Graph-form problem descriptor.
///
/// Holds one instance of
/// ```text
/// minimize    f(y) + g(x)
/// subject to  y = A x
/// ```
/// where `f` and `g` are separable sums of [`Func`] terms, one per row of
/// `A` for `f` and one per column (decision variable) for `g`.
///
/// The descriptor borrows everything: `A` is referenced and never mutated,
/// and the caller's output buffers `x` (length `n`) and `y` (length `m`)
/// are held by exclusive borrow until the solve writes them, so no other
/// writer can touch them in between. All dimension invariants are checked
/// here, once, at construction.
#[derive(Debug)]
pub struct Problem<'a, O, F>
where O: Operator<F>, F: Float
{
    pub(crate) op_a: &'a O,
    pub(crate) f: &'a [Func<F>],
    pub(crate) g: &'a [Func<F>],
    pub(crate) x: &'a mut [F],
    pub(crate) y: &'a mut [F],
}

impl<'a, O, F> Problem<'a, O, F>
where O: Operator<F>, F: Float + core::fmt::Debug
{
    /// Creates an instance.
    ///
    /// Returns [`Problem`], or an error on any contract violation:
    /// * `op_a` is `A` as an [`Operator`], with `m > 0` rows and `n > 0` columns.
    /// * `f` shall have length `m`, `g` length `n`.
    /// * `x` and `y` are the output buffers, of length `n` and `m`.
    /// * every function parameter shall be finite, every weight nonnegative.
    pub fn new(op_a: &'a O, f: &'a [Func<F>], g: &'a [Func<F>], x: &'a mut [F], y: &'a mut [F])
    -> Result<Self, SolverError>
    {
        let (m, n) = op_a.size();

        if m == 0 || n == 0 {
            log::error!("Empty operator: op_a{:?}", (m, n));
            return Err(SolverError::InvalidSize);
        }
        if f.len() != m || g.len() != n || x.len() != n || y.len() != m {
            log::error!("Size mismatch: op_a{:?}, f[{}], g[{}], x[{}], y[{}]",
                        (m, n), f.len(), g.len(), x.len(), y.len());
            return Err(SolverError::InvalidSize);
        }

        for func in f.iter().chain(g.iter()) {
            let finite = func.scale.is_finite() && func.shift.is_finite() && func.weight.is_finite();
            if !finite || func.weight < F::zero() {
                log::error!("Invalid function object: {:?}", func);
                return Err(SolverError::InvalidFunc);
            }
        }

        Ok(Problem {op_a, f, g, x, y})
    }

    /// Size of the problem.
    ///
    /// Returns a tuple of `m` and `n`.
    pub fn size(&self) -> (usize, usize)
    {
        self.op_a.size()
    }
}
