use num_traits::Float;
use core::marker::PhantomData;
use crate::linalg::LinAlgEx;
use crate::operator::Operator;

//

/// Dense matrix layout and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatLayout
{
    /// Row-major storage with a number of rows and a number of columns.
    RowMajor(usize, usize),
    /// Column-major storage with a number of rows and a number of columns.
    ColMajor(usize, usize),
}

impl MatLayout
{
    /// Length of array to store a [`MatLayout`] matrix.
    ///
    /// Returns the length.
    pub fn len(&self) -> usize
    {
        let (m, n) = self.size();
        m * n
    }

    /// Size of a [`MatLayout`] matrix.
    ///
    /// Returns a tuple of a number of rows and a number of columns.
    pub fn size(&self) -> (usize, usize)
    {
        match self {
            MatLayout::RowMajor(n_row, n_col) => (*n_row, *n_col),
            MatLayout::ColMajor(n_row, n_col) => (*n_row, *n_col),
        }
    }
}

//

/// Dense matrix operator
///
/// Borrows a slice of matrix data and implements [`Operator`].
/// A column-major array of `A` is treated as the row-major array of `A^T`,
/// so both layouts run through the same [`LinAlgEx`] kernels.
#[derive(Debug)]
pub struct MatOp<'a, L, F>
where L: LinAlgEx<F>, F: Float
{
    ph_l: PhantomData<L>,
    lay: MatLayout,
    array: &'a[F],
}

impl<'a, L, F> MatOp<'a, L, F>
where L: LinAlgEx<F>, F: Float
{
    /// Creates an instance.
    ///
    /// Returns [`MatOp`] instance.
    /// * `lay`: matrix layout and size.
    /// * `array`: data array slice, of length `lay.len()`.
    pub fn new(lay: MatLayout, array: &'a[F]) -> Self
    {
        assert_eq!(lay.len(), array.len());

        MatOp {
            ph_l: PhantomData,
            lay,
            array,
        }
    }

    fn op_impl(&self, transpose: bool, alpha: F, x: &[F], beta: F, y: &mut[F])
    {
        match self.lay {
            MatLayout::RowMajor(nr, nc) => {
                L::transform_ge(transpose, nr, nc, alpha, self.array, x, beta, y)
            },
            MatLayout::ColMajor(nr, nc) => {
                // stored as row-major (nc x nr) of A^T
                L::transform_ge(!transpose, nc, nr, alpha, self.array, x, beta, y)
            },
        }
    }
}

impl<'a, L, F> Operator<F> for MatOp<'a, L, F>
where L: LinAlgEx<F>, F: Float
{
    fn size(&self) -> (usize, usize)
    {
        self.lay.size()
    }

    fn op(&self, alpha: F, x: &[F], beta: F, y: &mut[F])
    {
        self.op_impl(false, alpha, x, beta, y);
    }

    fn trans_op(&self, alpha: F, x: &[F], beta: F, y: &mut[F])
    {
        self.op_impl(true, alpha, x, beta, y);
    }

    fn gram(&self, sym: &mut[F])
    {
        let (m, n) = self.lay.size();

        match self.lay {
            MatLayout::RowMajor(nr, nc) => {
                L::gram_ge(m >= n, nr, nc, self.array, sym)
            },
            MatLayout::ColMajor(nr, nc) => {
                // Gram of A^T with the opposite side selected
                L::gram_ge(m < n, nc, nr, self.array, sym)
            },
        }
    }
}

impl<'a, L, F> AsRef<[F]> for MatOp<'a, L, F>
where L: LinAlgEx<F>, F: Float
{
    fn as_ref(&self) -> &[F]
    {
        self.array
    }
}

//

#[test]
fn test_matop1()
{
    use float_eq::assert_float_eq;
    use crate::floatgeneric::FloatGeneric;

    type L = FloatGeneric<f64>;

    let array_rm = &[ // row-major, 2x3
        1., 2., 3.,
        4., 5., 6.,
    ];
    let array_cm = &[ // column-major, 2x3
        1., 4.,
        2., 5.,
        3., 6.,
    ];

    let op_rm = MatOp::<L, _>::new(MatLayout::RowMajor(2, 3), array_rm);
    let op_cm = MatOp::<L, _>::new(MatLayout::ColMajor(2, 3), array_cm);

    let x = &[1., 0., -1.];
    let y_rm = &mut[0.; 2];
    let y_cm = &mut[0.; 2];
    op_rm.op(1., x, 0., y_rm);
    op_cm.op(1., x, 0., y_cm);
    assert_float_eq!(y_rm.as_ref(), [-2., -2.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(y_rm.as_ref(), y_cm.as_ref(), abs_all <= 1e-12);

    let xt = &[1., -1.];
    let yt_rm = &mut[0.; 3];
    let yt_cm = &mut[0.; 3];
    op_rm.trans_op(1., xt, 0., yt_rm);
    op_cm.trans_op(1., xt, 0., yt_cm);
    assert_float_eq!(yt_rm.as_ref(), [-3., -3., -3.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(yt_rm.as_ref(), yt_cm.as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_matop_gram1()
{
    use float_eq::assert_float_eq;
    use crate::floatgeneric::FloatGeneric;

    type L = FloatGeneric<f64>;

    let array = &[ // row-major, 3x2 (skinny: gram is A^T A, 2x2)
        1., 2.,
        0., 1.,
        2., 0.,
    ];
    let op = MatOp::<L, _>::new(MatLayout::RowMajor(3, 2), array);

    let sym = &mut[0.; 4];
    op.gram(sym);
    assert_float_eq!(sym.as_ref(), [5., 2., 2., 5.].as_ref(), abs_all <= 1e-12);

    // default Operator::gram built from op/trans_op must agree
    struct ByOp<'a>(MatOp<'a, L, f64>);
    impl<'a> Operator<f64> for ByOp<'a> {
        fn size(&self) -> (usize, usize) {self.0.size()}
        fn op(&self, alpha: f64, x: &[f64], beta: f64, y: &mut[f64]) {self.0.op(alpha, x, beta, y)}
        fn trans_op(&self, alpha: f64, x: &[f64], beta: f64, y: &mut[f64]) {self.0.trans_op(alpha, x, beta, y)}
    }
    let sym_ref = &mut[0.; 4];
    ByOp(MatOp::new(MatLayout::RowMajor(3, 2), array)).gram(sym_ref);
    assert_float_eq!(sym.as_ref(), sym_ref.as_ref(), abs_all <= 1e-12);
}
