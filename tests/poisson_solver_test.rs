//! End-to-end tests of the Fourier-tridiagonal Poisson solver.
//!
//! Right-hand sides are built with the discrete Laplacian, so every solve
//! must recover the generating field up to its mean.

mod common;

use std::f64::consts::PI;
use std::sync::Arc;

use approx::assert_relative_eq;
use common::{discrete_laplacian, recover};
use poisson_rs::{
    Architecture, CenterField, ConfigError, FaceFn, FourierTridiagonalPoissonSolver, Grid,
    GridBuilder, Halo3D, Interval, PlannerFlag, SongHaidvogelFaces, Topology, Topology3D, c64,
};

const TOL: f64 = 1e-10;

/// 4×4×4 unit cells with faces at `z = k - 1`.
fn unit_box(topology: Topology3D) -> GridBuilder {
    GridBuilder::new(4, 4, 4)
        .with_x(Interval::new(0.0, 4.0))
        .with_y(Interval::new(0.0, 4.0))
        .with_z_faces(FaceFn(|k: usize| k as f64 - 1.0))
        .with_halo(Halo3D::uniform(1))
        .with_topology(topology)
}

fn cosine_mode(x: f64, _y: f64, z: f64) -> f64 {
    (2.0 * PI * x / 4.0).cos() * (PI * z / 4.0).cos()
}

/// `rhs` minus its thickness-weighted mean, so that `∇²φ = rhs` is solvable
/// under Neumann walls.
fn compatible(grid: &Grid, rhs: &CenterField) -> CenterField {
    let (weighted, volume) = rhs
        .interior_indices()
        .map(|(i, j, k)| (grid.delta_zf(k) * rhs.get(i, j, k), grid.delta_zf(k)))
        .fold((0.0, 0.0), |(s, v), (ws, wv)| (s + ws, v + wv));
    let mean = weighted / volume;
    let values: Vec<f64> = rhs.interior_to_vec().iter().map(|v| v - mean).collect();
    CenterField::from_interior(grid, &values).unwrap()
}

#[test]
fn test_periodic_horizontal_analytic() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
    let grid = Arc::new(unit_box(topology).build().unwrap());
    let expected = CenterField::from_fn(&grid, cosine_mode);

    let err = recover(grid, &expected, Architecture::Cpu, PlannerFlag::Estimate);
    assert!(err < TOL, "max error {:e}", err);
}

#[test]
fn test_bounded_horizontal_analytic() {
    let topology = Topology3D::uniform(Topology::Bounded);
    let grid = Arc::new(unit_box(topology).build().unwrap());
    let expected = CenterField::from_fn(&grid, cosine_mode);

    let err = recover(grid, &expected, Architecture::Cpu, PlannerFlag::Estimate);
    assert!(err < TOL, "max error {:e}", err);
}

#[test]
fn test_mixed_topology_non_square() {
    let topology = Topology3D::new(Topology::Bounded, Topology::Periodic, Topology::Bounded);
    let grid = Arc::new(
        GridBuilder::new(6, 5, 7)
            .with_x(Interval::new(-1.0, 2.0))
            .with_y(Interval::new(0.0, 10.0))
            .with_z(Interval::new(-3.0, 0.0))
            .with_topology(topology)
            .build()
            .unwrap(),
    );
    let expected = CenterField::from_fn(&grid, |x, y, z| x * x + (2.0 * PI * y / 10.0).sin() * z);

    let err = recover(grid, &expected, Architecture::Cpu, PlannerFlag::Estimate);
    assert!(err < TOL, "max error {:e}", err);
}

#[test]
fn test_multicore_matches_cpu() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Bounded, Topology::Bounded);
    let grid = Arc::new(
        GridBuilder::new(8, 6, 5)
            .with_topology(topology)
            .with_z_faces(SongHaidvogelFaces::new(50.0, 5.0, 0.5))
            .build()
            .unwrap(),
    );
    let rhs = compatible(&grid, &CenterField::from_fn(&grid, |x, y, z| (3.0 * x).sin() + y * z));

    let mut results = Vec::new();
    for arch in [Architecture::Cpu, Architecture::Multicore] {
        let mut solver =
            FourierTridiagonalPoissonSolver::new(arch, grid.clone(), PlannerFlag::Estimate).unwrap();
        let mut phi = CenterField::zeros(&grid);
        solver.solve_into(&mut phi, &rhs).unwrap();

        // Solvable right-hand side: the solution reproduces it
        let residual = discrete_laplacian(&grid, &phi).max_abs_diff(&rhs);
        let scale = rhs.interior_to_vec().iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(residual < 1e-9 * scale, "{} residual {:e}", arch, residual);

        results.push(phi.interior_to_vec());
    }
    for (a, b) in results[0].iter().zip(&results[1]) {
        assert_relative_eq!(a, b, epsilon = 1e-12, max_relative = 1e-10);
    }
}

#[test]
fn test_flat_horizontal_axis() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Flat, Topology::Bounded);
    let grid = Arc::new(
        GridBuilder::new(5, 1, 2)
            .with_x(Interval::new(0.0, 5.0))
            .with_z_faces(FaceFn(|k: usize| (k as f64 - 1.0) * 0.5))
            .with_topology(topology)
            .build()
            .unwrap(),
    );
    assert_eq!(grid.halo().hy, 0);
    let expected = CenterField::from_fn(&grid, |x, _, z| (2.0 * PI * x / 5.0).cos() + z * z);

    let err = recover(grid.clone(), &expected, Architecture::Cpu, PlannerFlag::Estimate);
    assert!(err < TOL, "max error {:e}", err);

    // Same problem with a one-cell periodic y axis
    let periodic = Arc::new(
        GridBuilder::new(5, 1, 2)
            .with_x(Interval::new(0.0, 5.0))
            .with_z_faces(FaceFn(|k: usize| (k as f64 - 1.0) * 0.5))
            .with_topology(Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded))
            .build()
            .unwrap(),
    );
    let rhs = discrete_laplacian(&grid, &expected);
    let mut flat = CenterField::zeros(&grid);
    let mut wrapped = CenterField::zeros(&periodic);
    FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid.clone(), PlannerFlag::Estimate)
        .unwrap()
        .solve_into(&mut flat, &rhs)
        .unwrap();
    FourierTridiagonalPoissonSolver::new(Architecture::Cpu, periodic.clone(), PlannerFlag::Estimate)
        .unwrap()
        .solve_into(
            &mut wrapped,
            &CenterField::from_interior(&periodic, &rhs.interior_to_vec()).unwrap(),
        )
        .unwrap();
    for (a, b) in flat.interior_to_vec().iter().zip(wrapped.interior_to_vec()) {
        assert_relative_eq!(*a, b, epsilon = TOL);
    }
}

#[test]
fn test_measure_planner_recovers_solution() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
    let grid = Arc::new(
        GridBuilder::new(20, 4, 3)
            .with_x(Interval::new(0.0, 2.0))
            .with_topology(topology)
            .build()
            .unwrap(),
    );
    let expected = CenterField::from_fn(&grid, |x, y, z| (PI * x).cos() * (2.0 * PI * y).sin() + z);

    let err = recover(grid, &expected, Architecture::Multicore, PlannerFlag::Measure);
    assert!(err < TOL, "max error {:e}", err);
}

#[test]
fn test_storage_interface() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
    let grid = Arc::new(unit_box(topology).build().unwrap());
    let expected = CenterField::from_fn(&grid, cosine_mode);
    let rhs = discrete_laplacian(&grid, &expected);

    let mut solver =
        FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid.clone(), PlannerFlag::Estimate)
            .unwrap();

    // Write the thickness-scaled right-hand side by hand
    let scaled: Vec<c64> = rhs
        .interior_indices()
        .map(|(i, j, k)| c64::new(grid.delta_zf(k) * rhs.get(i, j, k), 0.0))
        .collect();
    solver.storage_mut().values_mut().copy_from_slice(&scaled);
    solver.solve();

    let mean = expected.interior_mean();
    for (v, e) in solver.solution().iter().zip(expected.interior_to_vec()) {
        assert_relative_eq!(*v, e - mean, epsilon = TOL);
    }
    assert_eq!(solver.storage().max_imag(), 0.0);
    for (v, s) in solver.storage().real_parts().zip(solver.solution()) {
        assert_eq!(v, *s);
    }
}

#[test]
fn test_repeated_solves_are_independent() {
    let topology = Topology3D::new(Topology::Periodic, Topology::Periodic, Topology::Bounded);
    let grid = Arc::new(unit_box(topology).build().unwrap());
    let mut solver =
        FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid.clone(), PlannerFlag::Estimate)
            .unwrap();

    let a = CenterField::from_fn(&grid, |x, _, _| x);
    let b = CenterField::from_fn(&grid, cosine_mode);
    let mut first = CenterField::zeros(&grid);
    let mut second = CenterField::zeros(&grid);
    let mut again = CenterField::zeros(&grid);

    solver.solve_into(&mut first, &a).unwrap();
    solver.solve_into(&mut second, &b).unwrap();
    solver.solve_into(&mut again, &a).unwrap();
    assert!(first.max_abs_diff(&again) < 1e-12);
    assert!(first.max_abs_diff(&second) > 1e-3);
}

#[test]
fn test_vertical_topology_must_be_bounded() {
    let grid = Arc::new(
        GridBuilder::new(4, 4, 4)
            .with_topology(Topology3D::uniform(Topology::Periodic))
            .build()
            .unwrap(),
    );
    let err = FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid, PlannerFlag::Estimate)
        .unwrap_err();
    assert_eq!(err, ConfigError::UnsupportedVerticalTopology(Topology::Periodic));
}
