//! Linear algebra

use num_traits::Float;

/// Linear algebra trait.
///
/// Vector kernels over plain slices, parameterized by the scalar type `F`.
/// The solver is generic over an implementor of this trait so that the same
/// iteration can run on different backends (e.g. sequential or data-parallel).
pub trait LinAlg<F: Float>
{
    /// Calculate 2-norm (or euclidean norm) `||x||_2 = sqrt(sum_i x_i^2)`.
    ///
    /// Returns the calculated norm.
    /// * `x` is a vector `x`.
    fn norm(x: &[F]) -> F;

    /// Copy from a vector to another vector.
    ///
    /// * `x` is a slice to copy.
    /// * `y` is a slice being copied to.
    ///   `x` and `y` shall have the same length.
    fn copy(x: &[F], y: &mut[F]);

    /// Calculate `alpha * x`.
    ///
    /// * `alpha` is a scalar.
    /// * `x` is a vector `x` before entry, `alpha * x` on exit.
    fn scale(alpha: F, x: &mut[F]);

    /// Calculate `alpha * x + y`.
    ///
    /// * `alpha` is a scalar.
    /// * `x` is a vector `x`.
    /// * `y` is a vector `y` before entry, `alpha * x + y` on exit.
    ///   `x` and `y` shall have the same length.
    fn add(alpha: F, x: &[F], y: &mut[F]);
}

/// Extended linear algebra trait.
///
/// Dense-matrix kernels required by the graph projection step of the solver:
/// general matrix-vector transform, Gram matrix accumulation and a Cholesky
/// factorization that is computed once and back-solved every iteration.
pub trait LinAlgEx<F: Float>: LinAlg<F>
{
    /// Calculate `alpha * A * x + beta * y` (or `alpha * A^T * x + beta * y` if `transpose`).
    ///
    /// * `transpose` selects `A^T` instead of `A`.
    /// * `n_row`, `n_col` are the number of rows and columns of `A`.
    /// * `mat` is `A`, stored row-major, of length `n_row * n_col`.
    /// * `x` is a vector of length `n_col` (`n_row` if `transpose`).
    /// * `y` is a vector of length `n_row` (`n_col` if `transpose`) before entry,
    ///   and holds the result on exit.
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F]);

    /// Calculate the Gram matrix of `A`: `A^T A` if `gram_cols`, `A A^T` otherwise.
    ///
    /// * `n_row`, `n_col` are the number of rows and columns of `A`.
    /// * `mat` is `A`, stored row-major.
    /// * `sym` receives the full square result, row-major,
    ///   of length `n_col * n_col` (`n_row * n_row` if not `gram_cols`).
    ///   Both triangles are written.
    fn gram_ge(gram_cols: bool, n_row: usize, n_col: usize, mat: &[F], sym: &mut[F]);

    /// Factorize a symmetric positive-definite matrix in place: `A = L L^T`.
    ///
    /// * `n` is the dimension of `A`.
    /// * `mat` is `A`, row-major, of length `n * n` before entry;
    ///   on exit the lower triangle holds `L` (the strict upper triangle is untouched).
    /// * `eps_zero` floors the pivots so that a numerically semi-definite input
    ///   cannot produce a non-finite factor.
    fn chol_factor(n: usize, mat: &mut[F], eps_zero: F);

    /// Solve `L L^T x = b` in place with a factor produced by [`LinAlgEx::chol_factor`].
    ///
    /// * `l` is the factored matrix.
    /// * `b` is the right-hand side before entry, the solution on exit.
    fn chol_solve(n: usize, l: &[F], b: &mut[F]);
}
