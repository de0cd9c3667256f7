//! Graph-form ADMM solver

use num_traits::Float;
use core::fmt::{Debug, Display, LowerExp};
use core::marker::PhantomData;
use crate::func::{eval_sum, prox_slice};
use crate::linalg::{LinAlg, LinAlgEx};
use crate::operator::Operator;
use crate::problem::Problem;
use crate::stop::{RhoBalance, Tolerance};

//

/// Solver errors.
///
/// All variants are caller contract violations, detected when a
/// [`Problem`] is constructed; the iteration itself has no error states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Mismatched or empty dimensions of the operator, function sequences or buffers.
    InvalidSize,
    /// Non-finite function parameter or negative weight.
    InvalidFunc,
}

impl Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidSize => "InvalidSize: mismatched or empty problem dimensions",
            SolverError::InvalidFunc => "InvalidFunc: invalid function object parameters",
        })
    }
}

//

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status
{
    /// Primal and dual residuals both fell below their thresholds.
    Converged,
    /// Iteration budget exhausted; the best available iterates are still
    /// written and the reported residuals qualify them.
    MaxIterReached,
}

impl Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            Status::Converged => "Converged",
            Status::MaxIterReached => "MaxIterReached",
        })
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy)]
pub struct Report<F: Float>
{
    /// Terminal state.
    pub status: Status,
    /// Number of the last iteration.
    pub iter: usize,
    /// Final primal residual norm `||A x - z||`.
    pub r_pri: F,
    /// Final dual residual norm `rho * ||A^T (z - z_prev)||`.
    pub r_dual: F,
    /// Final objective estimate `f(z) + g(x)`.
    pub obj: F,
    /// Final penalty parameter.
    pub rho: F,
}

//

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Initial penalty parameter of the augmented term.
    pub rho: F,
    /// Max iteration number of the first-order algorithm.
    pub max_iter: usize,
    /// Absolute tolerance of the primal and dual residuals.
    pub abs_tol: F,
    /// Relative tolerance of the primal and dual residuals.
    pub rel_tol: F,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: F,
    /// Balance the penalty between the residuals while iterating.
    pub adapt_rho: bool,
    /// Suppress periodic progress output.
    pub quiet: bool,
    /// Period of iterations to output progress log (for debug level).
    pub log_period: usize,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            rho: F::one(),
            max_iter: 1000,
            abs_tol: ten.powi(-4),
            rel_tol: ten.powi(-3),
            eps_zero: ten.powi(-12),
            adapt_rho: true,
            quiet: false,
            log_period: 10,
        }
    }
}

//

/// Scalar type bound of [`Solver::solve`].
///
/// With the `par` feature the scalar additionally crosses the rayon
/// thread pool and needs `Send + Sync`.
#[cfg(not(feature = "par"))]
pub trait SolverF: Float + Debug + LowerExp {}
#[cfg(not(feature = "par"))]
impl<F: Float + Debug + LowerExp> SolverF for F {}

/// Scalar type bound of [`Solver::solve`].
///
/// With the `par` feature the scalar additionally crosses the rayon
/// thread pool and needs `Send + Sync`.
#[cfg(feature = "par")]
pub trait SolverF: Float + Debug + LowerExp + Send + Sync {}
#[cfg(feature = "par")]
impl<F: Float + Debug + LowerExp + Send + Sync> SolverF for F {}

//

// fixed over-relaxation factor of the projection input
const ALPHA_RELAX: f64 = 1.5;

/// Graph-form ADMM solver struct.
///
/// This struct abstracts a solver of the graph-form problem:
/// ```text
/// minimize    f(z) + g(x)
/// subject to  z = A x
/// ```
/// where
/// * variables `x` in `R^n`, `z` in `R^m`
/// * `A` in `R^{m x n}` as a linear [`Operator`]
/// * `f` and `g` are separable sums of scalar [`crate::func::Func`] terms,
///   one per row of `A` and one per column respectively.
///
/// The iteration alternates the closed-form proximal operators of `f` and
/// `g` with a projection onto the graph `{(x, z) : z = A x}`; the
/// projection reuses a single Cholesky factorization of `I + A^T A`
/// (or `I + A A^T`, whichever is smaller) computed before the first
/// iteration. The solution gives optimal `x` as well as the dual variable
/// of the coupling constraint, written back through the [`Problem`]'s
/// borrowed output buffers.
pub struct Solver<L: LinAlgEx<F>, F: Float>
{
    /// solver parameters.
    pub par: SolverParam<F>,
    ph_l: PhantomData<L>,
}

impl<L: LinAlgEx<F>, F: Float> Solver<L, F>
{
    /// Creates an instance.
    ///
    /// Returns [`Solver`] instance.
    pub fn new() -> Self
    {
        Solver {
            par: SolverParam::default(),
            ph_l: PhantomData,
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`Solver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<L: LinAlgEx<F>, F: SolverF> Solver<L, F>
{
    /// Starts to solve a graph-form problem.
    ///
    /// Runs to convergence or iteration exhaustion and returns a
    /// [`Report`]; both terminal states write the final primal iterate
    /// into the problem's `x` buffer and the dual variable (scaled by
    /// `rho`) into its `y` buffer. Exceeding `max_iter` is a defined
    /// outcome, not an error: inspect [`Report::status`] and the reported
    /// residuals to judge the quality of the result.
    pub fn solve<O: Operator<F>>(self, prob: Problem<'_, O, F>) -> Report<F>
    {
        let (m, n) = prob.size();
        let Problem {op_a, f, g, x: out_x, y: out_y} = prob;

        let f0 = F::zero();
        let f1 = F::one();
        let alpha = F::from(ALPHA_RELAX).unwrap();

        log::info!("----- Initializing");
        log::debug!("{:?}", self.par);

        let mut projector = GraphProjector::<L, O, F>::new(op_a, self.par.eps_zero);

        // iterate state, all zero
        let mut x = vec![f0; n];
        let mut y = vec![f0; m];
        let mut x12 = vec![f0; n];
        let mut y12 = vec![f0; m];
        let mut xt = vec![f0; n];
        let mut yt = vec![f0; m];
        let mut y12_prev = vec![f0; m];
        let mut tmp_n = vec![f0; n];
        let mut tmp_m = vec![f0; m];

        let tol = Tolerance::new(m, n, self.par.abs_tol, self.par.rel_tol);
        let balance = RhoBalance::new(self.par.rho);
        let mut rho = self.par.rho;

        log::info!("----- Started");

        let status;
        let mut i = 0;
        let r_pri;
        let r_dual;

        loop {
            let excess_iter = i + 1 >= self.par.max_iter;

            // proximal half-step: x12 = prox_g(x - xt), y12 = prox_f(y - yt)
            L::copy(&x, &mut tmp_n);
            L::add(-f1, &xt, &mut tmp_n);
            prox_slice(g, rho, &tmp_n, &mut x12);

            L::copy(&y, &mut tmp_m);
            L::add(-f1, &yt, &mut tmp_m);
            prox_slice(f, rho, &tmp_m, &mut y12);

            // over-relaxed projection input plus dual offset
            L::copy(&x12, &mut tmp_n);
            L::scale(alpha, &mut tmp_n);
            L::add(f1 - alpha, &x, &mut tmp_n);
            L::add(f1, &xt, &mut tmp_n);

            L::copy(&y12, &mut tmp_m);
            L::scale(alpha, &mut tmp_m);
            L::add(f1 - alpha, &y, &mut tmp_m);
            L::add(f1, &yt, &mut tmp_m);

            // (x, y) = projection of (tmp_n, tmp_m) onto the graph of A
            L::copy(&tmp_n, &mut x);
            L::copy(&tmp_m, &mut y);
            projector.proj(&mut x, &mut y);

            // dual ascent: new dual = projection input - projection
            L::copy(&tmp_n, &mut xt);
            L::add(-f1, &x, &mut xt);
            L::copy(&tmp_m, &mut yt);
            L::add(-f1, &y, &mut yt);

            // primal residual ||A x - z|| with z = y12
            L::copy(&y, &mut tmp_m);
            L::add(-f1, &y12, &mut tmp_m);
            let nrm_r = L::norm(&tmp_m);

            // dual residual rho ||A^T (z - z_prev)||
            L::copy(&y12, &mut tmp_m);
            L::add(-f1, &y12_prev, &mut tmp_m);
            op_a.trans_op(f1, &tmp_m, f0, &mut tmp_n);
            let nrm_s = rho * L::norm(&tmp_n);

            let eps_pri = tol.eps_pri(L::norm(&y).max(L::norm(&y12)));
            op_a.trans_op(f1, &yt, f0, &mut tmp_n);
            let eps_dual = tol.eps_dual(rho * L::norm(&tmp_n));

            let term_conv = (nrm_r <= eps_pri) && (nrm_s <= eps_dual);

            let log_trig = self.par.log_period > 0 && i % self.par.log_period == 0;
            if !self.par.quiet && (log_trig || excess_iter || term_conv) {
                let obj = eval_sum(f, &y12) + eval_sum(g, &x12);
                log::debug!("{}: obj {:.2e} pri {:.2e}/{:.2e} dual {:.2e}/{:.2e} rho {:.2e}",
                            i, obj, nrm_r, eps_pri, nrm_s, eps_dual, rho);
            }
            else {
                log::trace!("{}: pri {:.2e}/{:.2e} dual {:.2e}/{:.2e}",
                            i, nrm_r, eps_pri, nrm_s, eps_dual);
            }

            if term_conv || excess_iter {
                status = if term_conv {Status::Converged} else {Status::MaxIterReached};
                r_pri = nrm_r;
                r_dual = nrm_s;
                break;
            }

            L::copy(&y12, &mut y12_prev);

            // keep primal and dual residuals balanced; the factorization is
            // rho-free, so only the scaled duals need rescaling
            if self.par.adapt_rho {
                if let Some(rho_new) = balance.update(rho, nrm_r, nrm_s) {
                    let s = rho / rho_new;
                    L::scale(s, &mut xt);
                    L::scale(s, &mut yt);
                    log::trace!("{}: rho {:.2e} -> {:.2e}", i, rho, rho_new);
                    rho = rho_new;
                }
            }

            i += 1;
        } // end of loop

        let obj = eval_sum(f, &y12) + eval_sum(g, &x12);

        // write back: primal solution and the dual of z = A x
        L::copy(&x12, out_x);
        L::copy(&yt, &mut *out_y);
        L::scale(rho, out_y);

        match status {
            Status::Converged => log::info!("----- Converged"),
            Status::MaxIterReached => log::warn!("----- MaxIterReached"),
        }

        Report {
            status,
            iter: i,
            r_pri,
            r_dual,
            obj,
            rho,
        }
    }
}

//

// One-time factorization for the projection onto {(x, y) : y = A x}.
//
// Factors I + A^T A when A is skinny, I + A A^T otherwise; the unit
// diagonal keeps the factor well-defined for rank-deficient A, so an
// ill-conditioned problem degrades into slow residual decrease instead of
// a failure.
struct GraphProjector<'a, L, O, F>
where L: LinAlgEx<F>, O: Operator<F>, F: Float
{
    ph_l: PhantomData<L>,
    op_a: &'a O,
    skinny: bool,
    k: usize,
    fac: Vec<F>,
    tw: Vec<F>,
}

impl<'a, L, O, F> GraphProjector<'a, L, O, F>
where L: LinAlgEx<F>, O: Operator<F>, F: Float
{
    fn new(op_a: &'a O, eps_zero: F) -> Self
    {
        let (m, n) = op_a.size();
        let skinny = m >= n;
        let k = m.min(n);

        let f1 = F::one();

        let mut fac = vec![F::zero(); k * k];
        op_a.gram(&mut fac);
        for i in 0.. k {
            fac[i * k + i] = fac[i * k + i] + f1;
        }
        L::chol_factor(k, &mut fac, eps_zero);

        GraphProjector {
            ph_l: PhantomData,
            op_a,
            skinny,
            k,
            fac,
            tw: vec![F::zero(); if skinny {0} else {m}],
        }
    }

    // On entry x = c, y = d; on exit the euclidean projection:
    // x = argmin ||x - c||^2 + ||A x - d||^2, y = A x.
    fn proj(&mut self, x: &mut[F], y: &mut[F])
    {
        let f0 = F::zero();
        let f1 = F::one();

        if self.skinny {
            // x = (I + A^T A)^-1 (c + A^T d)
            self.op_a.trans_op(f1, y, f1, x);
            L::chol_solve(self.k, &self.fac, x);
        }
        else {
            // x = c + A^T (I + A A^T)^-1 (d - A c)
            L::copy(y, &mut self.tw);
            self.op_a.op(-f1, x, f1, &mut self.tw);
            L::chol_solve(self.k, &self.fac, &mut self.tw);
            self.op_a.trans_op(f1, &self.tw, f1, x);
        }
        self.op_a.op(f1, x, f0, y);
    }
}
