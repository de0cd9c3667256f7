use float_eq::assert_float_eq;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use graphprox::prelude::*;

type La = FloatGeneric<f64>;
type ASolver = Solver<La, f64>;

//

fn least_squares_instance(rng: &mut Xoshiro256StarStar, m: usize, n: usize)
-> (Vec<f64>, Vec<f64>)
{
    let mut a = vec![0.; m * n];
    for e in a.iter_mut() {
        *e = 2. * (rng.gen::<f64>() - 0.5);
    }
    let mut b = vec![0.; m];
    for e in b.iter_mut() {
        *e = 2. * (rng.gen::<f64>() - 0.5);
    }
    (a, b)
}

fn solve_ls(a: &[f64], b: &[f64], lay: MatLayout) -> (Vec<f64>, Vec<f64>, Report<f64>)
{
    let (m, n) = lay.size();

    let op_a = MatOp::<La, _>::new(lay, a);
    let f: Vec<_> = b.iter().map(|&b_i| Func::shift(FuncKind::Square, b_i)).collect();
    let g = vec![Func::new(FuncKind::IndGe0); n];

    let mut x = vec![0.; n];
    let mut y = vec![0.; m];

    let s = ASolver::new().par(|p| {
        p.abs_tol = 1e-8;
        p.rel_tol = 1e-6;
        p.max_iter = 100_000;
    });
    let prob = Problem::new(&op_a, &f, &g, &mut x, &mut y).unwrap();
    let rslt = s.solve(prob);

    (x, y, rslt)
}

//

#[test]
fn test_solve_deterministic1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(0);
    let (m, n) = (8, 3);
    let (a, b) = least_squares_instance(&mut rng, m, n);

    let (x1, y1, r1) = solve_ls(&a, &b, MatLayout::RowMajor(m, n));
    let (x2, y2, r2) = solve_ls(&a, &b, MatLayout::RowMajor(m, n));

    // identical inputs, freshly zeroed state: bit-identical outcome
    assert_eq!(x1, x2);
    assert_eq!(y1, y2);
    assert_eq!(r1.status, r2.status);
    assert_eq!(r1.iter, r2.iter);
    assert_eq!(r1.obj, r2.obj);
}

#[test]
fn test_solve_layouts_agree1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let (m, n) = (8, 3);
    let (a, b) = least_squares_instance(&mut rng, m, n);

    // same matrix stored both ways
    let mut a_cm = vec![0.; m * n];
    for i in 0.. m {
        for j in 0.. n {
            a_cm[j * m + i] = a[i * n + j];
        }
    }

    let (x_rm, _, r_rm) = solve_ls(&a, &b, MatLayout::RowMajor(m, n));
    let (x_cm, _, r_cm) = solve_ls(&a_cm, &b, MatLayout::ColMajor(m, n));

    assert_eq!(r_rm.status, Status::Converged);
    assert_eq!(r_cm.status, Status::Converged);
    assert_float_eq!(x_rm.as_slice(), x_cm.as_slice(), abs_all <= 1e-4);
}

#[test]
fn test_solve_max_iter1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(2);
    let (m, n) = (8, 3);
    let (a, b) = least_squares_instance(&mut rng, m, n);

    let op_a = MatOp::<La, _>::new(MatLayout::RowMajor(m, n), &a);
    let f: Vec<_> = b.iter().map(|&b_i| Func::shift(FuncKind::Square, b_i)).collect();
    let g = vec![Func::new(FuncKind::IndGe0); n];

    let mut x = vec![0.; n];
    let mut y = vec![0.; m];

    // starve the budget: exhaustion is a terminal state, not an error,
    // and the best iterates are still written
    let s = ASolver::new().par(|p| {
        p.max_iter = 3;
        p.abs_tol = 1e-12;
        p.rel_tol = 1e-12;
    });
    let prob = Problem::new(&op_a, &f, &g, &mut x, &mut y).unwrap();
    let rslt = s.solve(prob);
    println!("{:?}", rslt);

    assert_eq!(rslt.status, Status::MaxIterReached);
    assert!(rslt.r_pri.is_finite());
    assert!(rslt.r_dual.is_finite());
    for e in x.iter().chain(y.iter()) {
        assert!(e.is_finite());
    }
}

#[test]
fn test_problem_contract1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let array = &[1., 2., 3., 4.];
    let op_a = MatOp::<La, _>::new(MatLayout::RowMajor(2, 2), array);

    let f2 = &[Func::new(FuncKind::Square); 2];
    let g2 = &[Func::new(FuncKind::Zero); 2];

    // mismatched f length
    let f1 = &[Func::new(FuncKind::Square); 1];
    let (x, y) = (&mut[0.; 2], &mut[0.; 2]);
    assert_eq!(Problem::new(&op_a, f1, g2, x, y).unwrap_err(), SolverError::InvalidSize);

    // mismatched output buffer
    let (x, y) = (&mut[0.; 3], &mut[0.; 2]);
    assert_eq!(Problem::new(&op_a, f2, g2, x, y).unwrap_err(), SolverError::InvalidSize);

    // empty problems are rejected, not silently solved
    let empty = MatOp::<La, f64>::new(MatLayout::RowMajor(0, 2), &[]);
    let (x, y) = (&mut[0.; 2], &mut[0.; 0]);
    assert_eq!(Problem::new(&empty, &[], g2, x, y).unwrap_err(), SolverError::InvalidSize);

    // negative weight
    let g_neg = &[Func::weight(FuncKind::Abs, -1.), Func::new(FuncKind::Zero)];
    let (x, y) = (&mut[0.; 2], &mut[0.; 2]);
    assert_eq!(Problem::new(&op_a, f2, g_neg, x, y).unwrap_err(), SolverError::InvalidFunc);

    // non-finite shift
    let f_nan = &[Func::shift(FuncKind::Square, f64::NAN), Func::new(FuncKind::Square)];
    let (x, y) = (&mut[0.; 2], &mut[0.; 2]);
    assert_eq!(Problem::new(&op_a, f_nan, g2, x, y).unwrap_err(), SolverError::InvalidFunc);
}
