//! Linear operator

use num_traits::Float;

/// Linear operator trait
///
/// Expresses a matrix `A` in `R^{m x n}` as a linear operator: the solver
/// only touches `A` through matrix-vector products and the one-time Gram
/// computation that feeds its projection factorization, so any storage
/// scheme that can provide these three operations can be plugged in.
pub trait Operator<F: Float>
{
    /// Size of `A`.
    ///
    /// Returns a tuple of `m` and `n`.
    fn size(&self) -> (usize, usize);

    /// Calculate `alpha * A * x + beta * y`.
    ///
    /// * `alpha` is a scalar.
    /// * `x` is a vector of length `n`.
    /// * `beta` is a scalar.
    /// * `y` is a vector of length `m` before entry,
    ///   `alpha * A * x + beta * y` on exit.
    fn op(&self, alpha: F, x: &[F], beta: F, y: &mut[F]);

    /// Calculate `alpha * A^T * x + beta * y`.
    ///
    /// * `alpha` is a scalar.
    /// * `x` is a vector of length `m`.
    /// * `beta` is a scalar.
    /// * `y` is a vector of length `n` before entry,
    ///   `alpha * A^T * x + beta * y` on exit.
    fn trans_op(&self, alpha: F, x: &[F], beta: F, y: &mut[F]);

    /// Calculate the Gram matrix of the shorter dimension:
    /// `A^T A` (`n x n`) if `m >= n`, `A A^T` (`m x m`) otherwise.
    ///
    /// * `sym` receives the full square result, row-major, of length
    ///   `min(m, n)^2`. Both triangles shall be written.
    ///
    /// The provided implementation builds one Gram column at a time from
    /// [`Operator::op`] and [`Operator::trans_op`] applied to unit vectors;
    /// implementors backed by concrete storage should override it.
    fn gram(&self, sym: &mut[F])
    {
        let (m, n) = self.size();
        let k = m.min(n);
        assert_eq!(sym.len(), k * k);

        let f0 = F::zero();
        let f1 = F::one();

        let mut unit = vec![f0; k];
        let mut long = vec![f0; m.max(n)];
        let mut col = vec![f0; k];

        for j in 0.. k {
            unit[j] = f1;
            if m >= n {
                // column j of A^T A
                self.op(f1, &unit, f0, &mut long);
                self.trans_op(f1, &long, f0, &mut col);
            }
            else {
                // column j of A A^T
                self.trans_op(f1, &unit, f0, &mut long);
                self.op(f1, &long, f0, &mut col);
            }
            unit[j] = f0;

            for i in 0.. k {
                sym[i * k + j] = col[i];
            }
        }
    }
}
