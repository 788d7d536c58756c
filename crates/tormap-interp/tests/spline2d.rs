use approx::assert_relative_eq;

use tormap_interp::{Accelerator, CellCache, InterpError, make_spline2d};

fn grid() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let xa: Vec<f64> = (0..14).map(|i| 0.1 * i as f64).collect();
    let ya: Vec<f64> = (0..20).map(|j| 0.35 * j as f64).collect();
    let mut za = Vec::with_capacity(xa.len() * ya.len());
    for x in &xa {
        for y in &ya {
            za.push((x + 0.3 * y).sin() + x * x);
        }
    }
    (xa, ya, za)
}

#[test]
fn test_both_types_reproduce_nodes() {
    let (xa, ya, za) = grid();
    for typ in ["bilinear", "bicubic"] {
        let spline = make_spline2d(typ, &xa, &ya, &za).unwrap();
        let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
        let mut cache = CellCache::new();

        for (i, x) in xa.iter().enumerate() {
            for (j, y) in ya.iter().enumerate() {
                let z = spline.eval(*x, *y, &mut xacc, &mut yacc, &mut cache).unwrap();
                assert_relative_eq!(z, za[i * ya.len() + j], epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_bilinear_plane_is_exact() {
    let xa = [0.0, 1.0, 2.0];
    let ya = [0.0, 2.0, 4.0];
    let plane = |x: f64, y: f64| 1.0 + 2.0 * x - 0.5 * y;
    let mut za = Vec::new();
    for x in &xa {
        for y in &ya {
            za.push(plane(*x, *y));
        }
    }
    let spline = make_spline2d("bilinear", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    for (x, y) in [(0.5, 0.5), (1.3, 3.1), (1.9, 0.1)] {
        let z = spline.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap();
        assert_relative_eq!(z, plane(x, y), epsilon = 1e-13);
        assert_relative_eq!(
            spline
                .eval_deriv_x(x, y, &mut xacc, &mut yacc, &mut cache)
                .unwrap(),
            2.0
        );
        assert_relative_eq!(
            spline
                .eval_deriv_y(x, y, &mut xacc, &mut yacc, &mut cache)
                .unwrap(),
            -0.5
        );
    }
}

#[test]
fn test_bicubic_derivatives_against_central_differences() {
    let (xa, ya, za) = grid();
    let spline = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    let step = 1e-5;
    let mut eval = |x: f64, y: f64| {
        spline
            .eval(x, y, &mut xacc, &mut yacc, &mut cache)
            .unwrap()
    };
    for (x, y) in [(0.24, 1.1), (0.61, 3.33), (1.05, 5.2), (1.29, 0.41)] {
        let fd_x = (eval(x + step, y) - eval(x - step, y)) / (2.0 * step);
        let fd_y = (eval(x, y + step) - eval(x, y - step)) / (2.0 * step);
        let fd_xy = (eval(x + step, y + step) - eval(x + step, y - step)
            - eval(x - step, y + step)
            + eval(x - step, y - step))
            / (4.0 * step * step);

        let (mut xacc2, mut yacc2) = (Accelerator::new(), Accelerator::new());
        let mut cache2 = CellCache::new();
        assert_relative_eq!(
            spline
                .eval_deriv_x(x, y, &mut xacc2, &mut yacc2, &mut cache2)
                .unwrap(),
            fd_x,
            max_relative = 1e-6,
            epsilon = 1e-8
        );
        assert_relative_eq!(
            spline
                .eval_deriv_y(x, y, &mut xacc2, &mut yacc2, &mut cache2)
                .unwrap(),
            fd_y,
            max_relative = 1e-6,
            epsilon = 1e-8
        );
        assert_relative_eq!(
            spline
                .eval_deriv_xy(x, y, &mut xacc2, &mut yacc2, &mut cache2)
                .unwrap(),
            fd_xy,
            max_relative = 1e-4,
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_bicubic_second_derivatives_within_cell() {
    let (xa, ya, za) = grid();
    let spline = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    let step = 1e-4;
    let (x, y) = (0.555, 2.025);
    let fd_xx = (spline.eval(x + step, y, &mut xacc, &mut yacc, &mut cache).unwrap()
        - 2.0 * spline.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap()
        + spline.eval(x - step, y, &mut xacc, &mut yacc, &mut cache).unwrap())
        / (step * step);
    assert_relative_eq!(
        spline
            .eval_deriv_xx(x, y, &mut xacc, &mut yacc, &mut cache)
            .unwrap(),
        fd_xx,
        max_relative = 1e-3,
        epsilon = 1e-4
    );

    let fd_yy = (spline.eval(x, y + step, &mut xacc, &mut yacc, &mut cache).unwrap()
        - 2.0 * spline.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap()
        + spline.eval(x, y - step, &mut xacc, &mut yacc, &mut cache).unwrap())
        / (step * step);
    assert_relative_eq!(
        spline
            .eval_deriv_yy(x, y, &mut xacc, &mut yacc, &mut cache)
            .unwrap(),
        fd_yy,
        max_relative = 1e-3,
        epsilon = 1e-4
    );
}

#[test]
fn test_constant_grid_is_flat() {
    let xa = [0.0, 0.5, 1.0, 1.5];
    let ya = [0.0, 1.0, 2.0, 3.0, 4.0];
    let za = vec![7.5; xa.len() * ya.len()];
    let spline = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    for (x, y) in [(0.1, 0.2), (0.77, 3.9), (1.45, 2.0)] {
        assert_relative_eq!(
            spline.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap(),
            7.5
        );
        assert_relative_eq!(
            spline
                .eval_deriv_x(x, y, &mut xacc, &mut yacc, &mut cache)
                .unwrap(),
            0.0
        );
        assert_relative_eq!(
            spline
                .eval_deriv_y(x, y, &mut xacc, &mut yacc, &mut cache)
                .unwrap(),
            0.0
        );
    }
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let xa = [0.0, 1.0, 2.0];
    let ya = [0.0, 1.0, 2.0];
    assert!(matches!(
        make_spline2d("bicubic", &xa, &ya, &[0.0; 8]),
        Err(InterpError::LengthMismatch { expected: 9, got: 8 })
    ));
}

#[test]
fn test_cell_cache_shared_between_splines() {
    let (xa, ya, za) = grid();
    let first = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let second = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    // Alternating splines through one cache must stay correct; the cache is
    // keyed by the owning spline, not only by the cell indices.
    let (x, y) = (0.44, 1.9);
    let a = first.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap();
    let b = second.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap();
    let a_again = first.eval(x, y, &mut xacc, &mut yacc, &mut cache).unwrap();
    assert_eq!(a, a_again);
    assert_relative_eq!(a, b, epsilon = 1e-14);
}
