use num_traits::Float;
use core::marker::PhantomData;
use rayon::prelude::*;
use crate::linalg::{LinAlg, LinAlgEx};
use crate::floatgeneric::FloatGeneric;

/// `rayon`-parallel [`LinAlgEx`] implementation
///
/// The matrix-vector transforms and the Gram accumulation distribute their
/// output rows over the rayon thread pool; the remaining vector kernels and
/// the (inherently sequential) Cholesky factorization delegate to
/// [`FloatGeneric`]. Worthwhile for large problems only.
#[derive(Debug, Clone)]
pub struct FloatRayon<F>
{
    ph_f: PhantomData<F>,
}

// below this length a parallel dispatch costs more than it saves
const PAR_MIN_LEN: usize = 256;

impl<F: Float + Send + Sync> LinAlg<F> for FloatRayon<F>
{
    fn norm(x: &[F]) -> F
    {
        FloatGeneric::norm(x)
    }

    fn copy(x: &[F], y: &mut[F])
    {
        FloatGeneric::copy(x, y)
    }

    fn scale(alpha: F, x: &mut[F])
    {
        FloatGeneric::scale(alpha, x)
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        FloatGeneric::add(alpha, x, y)
    }
}

impl<F: Float + Send + Sync> LinAlgEx<F> for FloatRayon<F>
{
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        if y.len() < PAR_MIN_LEN {
            return FloatGeneric::transform_ge(transpose, n_row, n_col, alpha, mat, x, beta, y);
        }

        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        y.par_iter_mut().enumerate().for_each(|(r, v)| {
            let mut mat_x = F::zero();
            for (c, u) in x.iter().enumerate() {
                let e = if transpose {mat[c * n_col + r]} else {mat[r * n_col + c]};
                mat_x = mat_x + e * *u;
            }
            *v = alpha * mat_x + beta * *v;
        });
    }

    fn gram_ge(gram_cols: bool, n_row: usize, n_col: usize, mat: &[F], sym: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        let k = if gram_cols {n_col} else {n_row};
        assert_eq!(sym.len(), k * k);

        if k < 2 || k * k < PAR_MIN_LEN {
            return FloatGeneric::gram_ge(gram_cols, n_row, n_col, mat, sym);
        }

        sym.par_chunks_mut(k).enumerate().for_each(|(i, row)| {
            for (j, e) in row.iter_mut().enumerate() {
                let mut sum = F::zero();
                if gram_cols {
                    for r in 0.. n_row {
                        sum = sum + mat[r * n_col + i] * mat[r * n_col + j];
                    }
                }
                else {
                    for c in 0.. n_col {
                        sum = sum + mat[i * n_col + c] * mat[j * n_col + c];
                    }
                }
                *e = sum;
            }
        });
    }

    fn chol_factor(n: usize, mat: &mut[F], eps_zero: F)
    {
        FloatGeneric::chol_factor(n, mat, eps_zero)
    }

    fn chol_solve(n: usize, l: &[F], b: &mut[F])
    {
        FloatGeneric::chol_solve(n, l, b)
    }
}

//

#[test]
fn test_rayon_transform1()
{
    use float_eq::assert_float_eq;

    type LSeq = FloatGeneric<f64>;
    type LPar = FloatRayon<f64>;

    let n_row = 300;
    let n_col = 7;
    let mut mat = vec![0.; n_row * n_col];
    for (i, e) in mat.iter_mut().enumerate() {
        *e = ((i % 13) as f64) - 6.;
    }
    let x = &vec![0.5; n_col];

    let y_seq = &mut vec![1.; n_row];
    let y_par = &mut vec![1.; n_row];
    LSeq::transform_ge(false, n_row, n_col, 2., &mat, x, -1., y_seq);
    LPar::transform_ge(false, n_row, n_col, 2., &mat, x, -1., y_par);

    assert_float_eq!(y_seq.as_slice(), y_par.as_slice(), abs_all <= 1e-12);
}
