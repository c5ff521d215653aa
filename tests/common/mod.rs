//! Shared helpers for integration tests.

use std::sync::Arc;

use poisson_rs::{
    Architecture, CenterField, FillHalo, FourierTridiagonalPoissonSolver, Grid, PlannerFlag,
    Topology, TopologyHalo,
};

/// Discrete Laplacian matching the solver's stencil.
///
/// Halos are filled from the grid topology first, so Bounded walls act as
/// zero-gradient boundaries and Periodic axes wrap. Flat axes carry no
/// halo and contribute no second difference.
pub fn discrete_laplacian(grid: &Grid, phi: &CenterField) -> CenterField {
    let mut p = phi.clone();
    TopologyHalo::new(grid.topology()).fill_halo_regions(&mut p);

    let topology = grid.topology();
    let (dx2, dy2) = (grid.dx() * grid.dx(), grid.dy() * grid.dy());
    let mut out = CenterField::zeros(grid);
    for (i, j, k) in p.interior_indices() {
        let c = p.get(i, j, k);
        let d2x = match topology.x {
            Topology::Flat => 0.0,
            _ => (p.get(i + 1, j, k) - 2.0 * c + p.get(i - 1, j, k)) / dx2,
        };
        let d2y = match topology.y {
            Topology::Flat => 0.0,
            _ => (p.get(i, j + 1, k) - 2.0 * c + p.get(i, j - 1, k)) / dy2,
        };
        let upper = (p.get(i, j, k + 1) - c) / grid.delta_zc(k + 1);
        let lower = (c - p.get(i, j, k - 1)) / grid.delta_zc(k);
        let d2z = (upper - lower) / grid.delta_zf(k);
        out.set(i, j, k, d2x + d2y + d2z);
    }
    out
}

/// `phi` with its interior mean removed.
pub fn demeaned(grid: &Grid, phi: &CenterField) -> CenterField {
    let mean = phi.interior_mean();
    let values: Vec<f64> = phi.interior_to_vec().iter().map(|v| v - mean).collect();
    CenterField::from_interior(grid, &values).unwrap()
}

/// Solve `∇²φ = ∇²_h(expected)` and return the largest error against the
/// zero-mean `expected`.
pub fn recover(
    grid: Arc<Grid>,
    expected: &CenterField,
    architecture: Architecture,
    flag: PlannerFlag,
) -> f64 {
    let rhs = discrete_laplacian(&grid, expected);
    let mut solver = FourierTridiagonalPoissonSolver::new(architecture, grid.clone(), flag).unwrap();
    let mut phi = CenterField::zeros(&grid);
    solver.solve_into(&mut phi, &rhs).unwrap();
    phi.max_abs_diff(&demeaned(&grid, expected))
}
