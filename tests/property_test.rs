//! Property tests for the spectral transforms and the solver.

use std::sync::Arc;

use poisson_rs::{
    Architecture, CenterField, FourierTridiagonalPoissonSolver, GeometricStretching, GridBuilder,
    PlannerFlag, Resolution3D, Topology, Topology3D, TransformKernel, c64,
    spectral::TransformPipeline,
};
use proptest::prelude::*;

fn arb_horizontal() -> impl Strategy<Value = Topology> {
    prop_oneof![Just(Topology::Periodic), Just(Topology::Bounded)]
}

fn arb_kernel() -> impl Strategy<Value = TransformKernel> {
    prop_oneof![Just(TransformKernel::Gemm), Just(TransformKernel::Scalar)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn transform_round_trip(
        nx in 1usize..9,
        ny in 1usize..9,
        nz in 1usize..4,
        tx in arb_horizontal(),
        ty in arb_horizontal(),
        kernel in arb_kernel(),
        seed in prop::collection::vec(-10.0f64..10.0, 256),
    ) {
        let size = Resolution3D::new(nx, ny, nz).unwrap();
        let total = size.total_cells();
        let field: Vec<f64> = (0..total).map(|n| seed[n % seed.len()] + n as f64 * 0.01).collect();

        let pipeline = TransformPipeline::plan(tx, ty, size, PlannerFlag::Estimate, Architecture::Cpu);
        let mut values: Vec<c64> = field.iter().map(|&v| c64::new(v, 0.0)).collect();
        let mut out = vec![c64::new(0.0, 0.0); total];

        for t in pipeline.forward().iter().chain(pipeline.backward()) {
            t.clone()
                .with_kernel(kernel)
                .apply(Architecture::Cpu, size, &values, &mut out);
            std::mem::swap(&mut values, &mut out);
        }

        for n in 0..total {
            let v = values[n];
            prop_assert!((v.re - field[n]).abs() < 1e-9, "re[{}] = {} vs {}", n, v.re, field[n]);
            prop_assert!(v.im.abs() < 1e-9);
        }
    }

    #[test]
    fn solution_has_zero_mean(
        nx in 1usize..7,
        ny in 1usize..7,
        nz in 1usize..6,
        tx in arb_horizontal(),
        ty in arb_horizontal(),
        ratio in 1.0f64..1.3,
        values in prop::collection::vec(-100.0f64..100.0, 1..64),
    ) {
        let grid = Arc::new(
            GridBuilder::new(nx, ny, nz)
                .with_z_faces(GeometricStretching::new(0.0, 0.1, ratio))
                .with_topology(Topology3D::new(tx, ty, Topology::Bounded))
                .build()
                .unwrap(),
        );
        let total = grid.size().total_cells();
        let rhs_values: Vec<f64> = (0..total).map(|n| values[n % values.len()]).collect();
        let rhs = CenterField::from_interior(&grid, &rhs_values).unwrap();

        let mut solver =
            FourierTridiagonalPoissonSolver::new(Architecture::Cpu, grid.clone(), PlannerFlag::Estimate)
                .unwrap();
        let mut phi = CenterField::zeros(&grid);
        solver.solve_into(&mut phi, &rhs).unwrap();

        let scale = phi.interior_to_vec().iter().fold(1.0f64, |m, v| m.max(v.abs()));
        prop_assert!(phi.interior_mean().abs() < 1e-12 * scale);
        prop_assert!(phi.interior_to_vec().iter().all(|v| v.is_finite()));
    }
}
