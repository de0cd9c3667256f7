//! Function objects and the scalar proximal operator library
//!
//! A separable objective term is the scalar convex function
//! `c * h(a * z - b)`, where `h` is drawn from the closed catalog
//! [`FuncKind`], `a`/`b` form an affine pre-transform and `c >= 0` is a
//! weight. One [`Func`] instance describes one row of `f` or one column
//! of `g` in the graph-form problem `minimize f(y) + g(x) s.t. y = A x`.

use num_traits::Float;

/// Scalar convex function kind.
///
/// The catalog is closed: each variant has a closed-form proximal operator
/// and extending it is a source change, not a runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind
{
    /// `|z|`
    Abs,
    /// `z^2 / 2` for `|z| <= 1`, `|z| - 1/2` beyond
    Huber,
    /// `z`
    Identity,
    /// `0` if `z = 0`, `+inf` otherwise
    IndEq0,
    /// `0` if `z >= 0`, `+inf` otherwise
    IndGe0,
    /// `0` if `z <= 0`, `+inf` otherwise
    IndLe0,
    /// `max(-z, 0)`
    MaxNeg0,
    /// `max(z, 0)`, the hinge
    MaxPos0,
    /// `z^2 / 2`
    Square,
    /// `0`
    Zero,
}

impl FuncKind
{
    /// Whether this kind is the indicator of a set.
    ///
    /// Indicator kinds ignore the weight: the function is `0` on the
    /// feasible set and `+inf` elsewhere, whatever the weight.
    pub fn is_indicator(&self) -> bool
    {
        matches!(self, FuncKind::IndEq0 | FuncKind::IndGe0 | FuncKind::IndLe0)
    }
}

/// Function object: `c * h(a * z - b)`.
///
/// `h` is selected by `kind`; `a` (`scale`), `b` (`shift`) and `c`
/// (`weight`) default to `1`, `0` and `1`. Constructed once per problem
/// row/column and immutable while solving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Func<F: Float>
{
    /// Base function `h`.
    pub kind: FuncKind,
    /// Scale `a` of the affine pre-transform.
    pub scale: F,
    /// Shift `b` of the affine pre-transform.
    pub shift: F,
    /// Weight `c`, shall be nonnegative. Ignored by indicator kinds.
    pub weight: F,
}

impl<F: Float> Func<F>
{
    /// Creates `h(z)`.
    pub fn new(kind: FuncKind) -> Self
    {
        Func {
            kind,
            scale: F::one(),
            shift: F::zero(),
            weight: F::one(),
        }
    }

    /// Creates `h(z - b)`.
    pub fn shift(kind: FuncKind, b: F) -> Self
    {
        Func {
            shift: b,
            ..Func::new(kind)
        }
    }

    /// Creates `c * h(z)`.
    pub fn weight(kind: FuncKind, c: F) -> Self
    {
        Func {
            weight: c,
            ..Func::new(kind)
        }
    }

    /// Creates `c * h(a * z - b)`.
    pub fn with(kind: FuncKind, a: F, b: F, c: F) -> Self
    {
        Func {
            kind,
            scale: a,
            shift: b,
            weight: c,
        }
    }

    /// Evaluate the proximal operator at `v` with step size `rho > 0`.
    ///
    /// Returns the unique minimizer over `z` of
    /// `(c / rho) * h(a * z - b) + (z - v)^2 / 2`.
    ///
    /// The base formula is applied in the transformed coordinate
    /// `w = a * v - b` with the combined parameter `t = c * a^2 / rho`,
    /// then mapped back through `(w' + b) / a`. With `a = 0` the function
    /// is constant (no feasible-set constraint on `z` either) and the
    /// operator degenerates to the identity on `v`.
    pub fn prox(&self, rho: F, v: F) -> F
    {
        let f0 = F::zero();
        let f1 = F::one();

        let a = self.scale;
        if a == f0 {
            return v;
        }

        let w = a * v - self.shift;

        let wp = if self.kind.is_indicator() {
            match self.kind {
                FuncKind::IndEq0 => f0,
                FuncKind::IndGe0 => w.max(f0),
                FuncKind::IndLe0 => w.min(f0),
                _ => unreachable!(),
            }
        }
        else if self.weight == f0 {
            w
        }
        else {
            let t = self.weight * a * a / rho;
            match self.kind {
                FuncKind::Abs => w.signum() * (w.abs() - t).max(f0),
                FuncKind::Huber => {
                    if w.abs() <= f1 + t {
                        w / (f1 + t)
                    }
                    else {
                        w - t * w.signum()
                    }
                },
                FuncKind::Identity => w - t,
                FuncKind::MaxNeg0 => {
                    if w < -t {
                        w + t
                    }
                    else {
                        w.max(f0)
                    }
                },
                FuncKind::MaxPos0 => {
                    if w > t {
                        w - t
                    }
                    else {
                        w.min(f0)
                    }
                },
                FuncKind::Square => w / (f1 + t),
                FuncKind::Zero => w,
                _ => unreachable!(),
            }
        };

        (wp + self.shift) / a
    }

    /// Evaluate `c * h(a * z - b)`.
    ///
    /// Indicator kinds contribute `0`: the value is used for objective
    /// reporting, feasibility shows up in the solver residuals instead.
    pub fn eval(&self, z: F) -> F
    {
        let f0 = F::zero();
        let f1 = F::one();
        let f2 = f1 + f1;

        let w = self.scale * z - self.shift;

        let h = match self.kind {
            FuncKind::Abs => w.abs(),
            FuncKind::Huber => {
                if w.abs() <= f1 {
                    w * w / f2
                }
                else {
                    w.abs() - f1 / f2
                }
            },
            FuncKind::Identity => w,
            FuncKind::IndEq0 | FuncKind::IndGe0 | FuncKind::IndLe0 => f0,
            FuncKind::MaxNeg0 => (-w).max(f0),
            FuncKind::MaxPos0 => w.max(f0),
            FuncKind::Square => w * w / f2,
            FuncKind::Zero => f0,
        };

        self.weight * h
    }
}

//

fn prox_slice_seq<F: Float>(fs: &[Func<F>], rho: F, v: &[F], z: &mut[F])
{
    assert_eq!(fs.len(), v.len());
    assert_eq!(fs.len(), z.len());

    for ((func, u), e) in fs.iter().zip(v).zip(z) {
        *e = func.prox(rho, *u);
    }
}

/// Evaluate the proximal operators of a function sequence element-wise.
///
/// * `fs`, `v` and `z` shall have the same length.
/// * `z` receives `prox(rho, v_i)` of each `fs_i`.
#[cfg(not(feature = "par"))]
pub fn prox_slice<F: Float>(fs: &[Func<F>], rho: F, v: &[F], z: &mut[F])
{
    prox_slice_seq(fs, rho, v, z)
}

/// Evaluate the proximal operators of a function sequence element-wise.
///
/// * `fs`, `v` and `z` shall have the same length.
/// * `z` receives `prox(rho, v_i)` of each `fs_i`.
///
/// Each element is independent, so long sequences distribute over the
/// rayon thread pool.
#[cfg(feature = "par")]
pub fn prox_slice<F: Float + Send + Sync>(fs: &[Func<F>], rho: F, v: &[F], z: &mut[F])
{
    use rayon::prelude::*;

    assert_eq!(fs.len(), v.len());
    assert_eq!(fs.len(), z.len());

    if fs.len() < 1024 {
        return prox_slice_seq(fs, rho, v, z);
    }

    z.par_iter_mut()
        .zip(fs.par_iter().zip(v.par_iter()))
        .for_each(|(e, (func, u))| {
            *e = func.prox(rho, *u);
        });
}

/// Sum `c_i * h_i(a_i * z_i - b_i)` over a function sequence.
///
/// Returns the accumulated value.
/// * `fs` and `z` shall have the same length.
pub fn eval_sum<F: Float>(fs: &[Func<F>], z: &[F]) -> F
{
    assert_eq!(fs.len(), z.len());

    let mut sum = F::zero();
    for (func, e) in fs.iter().zip(z) {
        sum = sum + func.eval(*e);
    }
    sum
}

//

#[cfg(test)]
mod tests
{
    use super::*;
    use float_eq::assert_float_eq;

    const KINDS: &[FuncKind] = &[
        FuncKind::Abs,
        FuncKind::Huber,
        FuncKind::Identity,
        FuncKind::IndEq0,
        FuncKind::IndGe0,
        FuncKind::IndLe0,
        FuncKind::MaxNeg0,
        FuncKind::MaxPos0,
        FuncKind::Square,
        FuncKind::Zero,
    ];

    // feasibility of z w.r.t. an indicator's constraint set
    fn feasible(func: &Func<f64>, z: f64) -> bool
    {
        let w = func.scale * z - func.shift;
        match func.kind {
            FuncKind::IndEq0 => w.abs() <= 1e-9,
            FuncKind::IndGe0 => w >= -1e-9,
            FuncKind::IndLe0 => w <= 1e-9,
            _ => true,
        }
    }

    // (c/rho) h(a z - b) + (z - v)^2 / 2, +inf outside an indicator's set
    fn prox_obj(func: &Func<f64>, rho: f64, v: f64, z: f64) -> f64
    {
        if !feasible(func, z) {
            return f64::INFINITY;
        }
        func.eval(z) / rho + 0.5 * (z - v) * (z - v)
    }

    #[test]
    fn test_prox_minimality()
    {
        for &kind in KINDS {
            for &a in &[-2., -1., 0.5, 1.] {
                for &b in &[-1., 0., 2.] {
                    for &c in &[0., 0.5, 3.] {
                        let func = Func::with(kind, a, b, c);
                        for &rho in &[0.5, 1., 10.] {
                            for &v in &[-3., -1., -0.1, 0., 0.7, 2., 5.] {
                                let z = func.prox(rho, v);
                                assert!(z.is_finite(), "{:?} rho {} v {}", func, rho, v);
                                assert!(feasible(&func, z), "{:?} rho {} v {} z {}", func, rho, v, z);

                                let obj = prox_obj(&func, rho, v, z);
                                for &d in &[1e-4, 1e-2, 0.1, 1.] {
                                    for &s in &[-1., 1.] {
                                        let obj_p = prox_obj(&func, rho, v, z + s * d);
                                        assert!(obj <= obj_p + 1e-9,
                                                "{:?} rho {} v {} z {}: {} > {}",
                                                func, rho, v, z, obj, obj_p);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_prox_indicator_idempotent()
    {
        for &kind in KINDS {
            if !kind.is_indicator() {
                continue;
            }
            for &a in &[-2., 0.5, 1.] {
                for &b in &[-1., 0., 2.] {
                    let func = Func::shift(kind, b);
                    let func = Func {scale: a, ..func};
                    for &v in &[-3., -0.1, 0., 0.7, 5.] {
                        let z1 = func.prox(1., v);
                        let z2 = func.prox(1., z1);
                        assert_float_eq!(z1, z2, abs <= 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_prox_degenerate_scale()
    {
        for &kind in KINDS {
            let func = Func::with(kind, 0., 3., 2.);
            for &v in &[-1., 0., 4.] {
                assert_eq!(func.prox(1., v), v);
            }
        }
    }

    #[test]
    fn test_prox_closed_forms()
    {
        // soft threshold
        let abs = Func::weight(FuncKind::Abs, 2.);
        assert_float_eq!(abs.prox(1., 5.), 3., abs <= 1e-12);
        assert_float_eq!(abs.prox(1., -5.), -3., abs <= 1e-12);
        assert_float_eq!(abs.prox(1., 1.5), 0., abs <= 1e-12);
        assert_float_eq!(abs.prox(2., 1.5), 0.5, abs <= 1e-12);

        // ridge shrinkage towards the target b
        let sq = Func::shift(FuncKind::Square, 2.);
        assert_float_eq!(sq.prox(1., 6.), 4., abs <= 1e-12);

        // linear tilt
        let id = Func::weight(FuncKind::Identity, 3.);
        assert_float_eq!(id.prox(1., 1.), -2., abs <= 1e-12);
        assert_float_eq!(id.prox(3., 1.), 0., abs <= 1e-12);

        // hinge: inactive below zero, flat on [0, t], tilted above
        let hinge = Func::new(FuncKind::MaxPos0);
        assert_float_eq!(hinge.prox(1., -1.), -1., abs <= 1e-12);
        assert_float_eq!(hinge.prox(1., 0.5), 0., abs <= 1e-12);
        assert_float_eq!(hinge.prox(1., 4.), 3., abs <= 1e-12);
    }

    #[test]
    fn test_prox_slice1()
    {
        let fs = &[
            Func::shift(FuncKind::Square, 1.),
            Func::new(FuncKind::IndGe0),
            Func::new(FuncKind::Zero),
        ];
        let v = &[3., -2., 7.];
        let z = &mut[0.; 3];
        prox_slice(fs, 1., v, z);
        assert_float_eq!(z.as_ref(), [2., 0., 7.].as_ref(), abs_all <= 1e-12);
    }

    #[test]
    fn test_eval_sum1()
    {
        let fs = &[
            Func::shift(FuncKind::Square, 1.), // (z - 1)^2 / 2
            Func::weight(FuncKind::Abs, 2.),   // 2 |z|
            Func::new(FuncKind::IndLe0),       // reported as 0
        ];
        let z = &[3., -1., 5.];
        assert_float_eq!(eval_sum(fs, z), 4., abs <= 1e-12);
    }
}
