use num_traits::Float;
use core::marker::PhantomData;
use crate::linalg::{LinAlg, LinAlgEx};

/// `num::Float`-generic [`LinAlgEx`] implementation
///
/// All numeric operations are written in pure Rust and run sequentially.
#[derive(Debug, Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float> LinAlg<F> for FloatGeneric<F>
{
    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }
}

impl<F: Float> LinAlgEx<F> for FloatGeneric<F>
{
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        for (r, v) in y.iter_mut().enumerate() {
            let mut mat_x = F::zero();
            for (c, u) in x.iter().enumerate() {
                let e = if transpose {mat[c * n_col + r]} else {mat[r * n_col + c]};
                mat_x = mat_x + e * *u;
            }
            *v = alpha * mat_x + beta * *v;
        }
    }

    fn gram_ge(gram_cols: bool, n_row: usize, n_col: usize, mat: &[F], sym: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        let k = if gram_cols {n_col} else {n_row};
        assert_eq!(sym.len(), k * k);

        for i in 0.. k {
            for j in 0..= i {
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
                sym[i * k + j] = sum;
                sym[j * k + i] = sum;
            }
        }
    }

    fn chol_factor(n: usize, mat: &mut[F], eps_zero: F)
    {
        assert_eq!(mat.len(), n * n);

        for j in 0.. n {
            let mut d = mat[j * n + j];
            for k in 0.. j {
                d = d - mat[j * n + k] * mat[j * n + k];
            }
            // pivot floor keeps a semi-definite input finite
            let l_jj = d.max(eps_zero).sqrt();
            mat[j * n + j] = l_jj;

            for i in j + 1.. n {
                let mut s = mat[i * n + j];
                for k in 0.. j {
                    s = s - mat[i * n + k] * mat[j * n + k];
                }
                mat[i * n + j] = s / l_jj;
            }
        }
    }

    fn chol_solve(n: usize, l: &[F], b: &mut[F])
    {
        assert_eq!(l.len(), n * n);
        assert_eq!(b.len(), n);

        // forward substitution: L v = b
        for i in 0.. n {
            let mut s = b[i];
            for k in 0.. i {
                s = s - l[i * n + k] * b[k];
            }
            b[i] = s / l[i * n + i];
        }
        // backward substitution: L^T x = v
        for i in (0.. n).rev() {
            let mut s = b[i];
            for k in i + 1.. n {
                s = s - l[k * n + i] * b[k];
            }
            b[i] = s / l[i * n + i];
        }
    }
}

//

#[test]
fn test_transform_ge1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let mat = &[ // row-major, 2x3
        1., 2., 3.,
        4., 5., 6.,
    ];

    let x = &[1., -1., 2.];
    let y = &mut[10., 20.];
    L::transform_ge(false, 2, 3, 1., mat, x, 0.5, y);
    assert_float_eq!(y.as_ref(), [10., 21.].as_ref(), abs_all <= 1e-12);

    let xt = &[1., -1.];
    let yt = &mut[0.; 3];
    L::transform_ge(true, 2, 3, 2., mat, xt, 0., yt);
    assert_float_eq!(yt.as_ref(), [-6., -6., -6.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_chol1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let n = 3;
    let a = &[ // I + G^T G for some G, symmetric positive-definite
        5., 2., 1.,
        2., 4., 1.,
        1., 1., 3.,
    ];
    let x_ref = &[1., -2., 3.];

    // b = A x_ref
    let b = &mut[0.; 3];
    L::transform_ge(false, n, n, 1., a, x_ref, 0., b);

    let mut fac = *a;
    L::chol_factor(n, &mut fac, 1e-12);
    L::chol_solve(n, &fac, b);

    assert_float_eq!(b.as_ref(), x_ref.as_ref(), abs_all <= 1e-9);
}
