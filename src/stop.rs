//! Residual evaluation, stopping rule and penalty adaptation

use num_traits::Float;

/// Combined absolute/relative stopping thresholds.
///
/// Convergence requires both
/// `r_pri  <= sqrt(m) * abs_tol + rel_tol * max(||A x||, ||z||)` and
/// `r_dual <= sqrt(n) * abs_tol + rel_tol * rho * ||A^T u||`,
/// balancing a floor for near-zero optimal residuals against the scale of
/// large-magnitude problems.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tolerance<F: Float>
{
    sqrt_m_abs: F,
    sqrt_n_abs: F,
    rel: F,
}

impl<F: Float> Tolerance<F>
{
    pub fn new(m: usize, n: usize, abs_tol: F, rel_tol: F) -> Self
    {
        Tolerance {
            sqrt_m_abs: F::from(m).unwrap().sqrt() * abs_tol,
            sqrt_n_abs: F::from(n).unwrap().sqrt() * abs_tol,
            rel: rel_tol,
        }
    }

    /// Primal threshold for iterates of magnitude `scale`.
    pub fn eps_pri(&self, scale: F) -> F
    {
        self.sqrt_m_abs + self.rel * scale
    }

    /// Dual threshold for a dual gradient of magnitude `scale`.
    pub fn eps_dual(&self, scale: F) -> F
    {
        self.sqrt_n_abs + self.rel * scale
    }
}

/// Residual-balancing penalty adaptation.
///
/// Keeps the primal and dual residuals within a factor `mu` of each other
/// by scaling `rho` up or down by `tau`, clamped to a fixed range around
/// the initial value. The schedule is an internal default, chosen for
/// convergence rather than matched to any particular reference.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RhoBalance<F: Float>
{
    mu: F,
    tau: F,
    rho_min: F,
    rho_max: F,
}

impl<F: Float> RhoBalance<F>
{
    pub fn new(rho0: F) -> Self
    {
        let range = F::from(1e6).unwrap();

        RhoBalance {
            mu: F::from(10).unwrap(),
            tau: F::from(2).unwrap(),
            rho_min: rho0 / range,
            rho_max: rho0 * range,
        }
    }

    /// Propose a new penalty for the observed residual pair.
    ///
    /// Returns `Some(new_rho)` when `rho` should change; the caller must
    /// then rescale its scaled dual variables by `rho / new_rho` to keep
    /// the underlying multipliers continuous.
    pub fn update(&self, rho: F, r_pri: F, r_dual: F) -> Option<F>
    {
        if r_pri > self.mu * r_dual && rho * self.tau <= self.rho_max {
            Some(rho * self.tau)
        }
        else if r_dual > self.mu * r_pri && rho / self.tau >= self.rho_min {
            Some(rho / self.tau)
        }
        else {
            None
        }
    }
}

//

#[cfg(test)]
mod tests
{
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn test_tolerance1()
    {
        let tol = Tolerance::new(4, 9, 1e-4, 1e-3);
        assert_float_eq!(tol.eps_pri(0.), 2e-4, abs <= 1e-12);
        assert_float_eq!(tol.eps_pri(10.), 2e-4 + 1e-2, abs <= 1e-12);
        assert_float_eq!(tol.eps_dual(0.), 3e-4, abs <= 1e-12);
    }

    #[test]
    fn test_rho_balance1()
    {
        let bal = RhoBalance::new(1.);

        // balanced: unchanged
        assert_eq!(bal.update(1., 1e-3, 1e-3), None);
        // primal dominates: increase
        assert_float_eq!(bal.update(1., 1., 1e-3).unwrap(), 2., abs <= 1e-12);
        // dual dominates: decrease
        assert_float_eq!(bal.update(1., 1e-3, 1.).unwrap(), 0.5, abs <= 1e-12);
        // clamped at the range edge
        assert_eq!(bal.update(1e6, 1., 1e-3), None);
        assert_eq!(bal.update(1e-6, 1e-3, 1.), None);
    }
}
