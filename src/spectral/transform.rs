//! Planned per-axis spectral transforms.
//!
//! Each horizontal axis is transformed by a dense operator acting on complex
//! fields stored x-fastest. A field of shape `Nx × Ny × Nz` is processed as
//! `Nz` column-major level slabs `G_k` of shape `Nx × Ny`:
//!
//! - x-transforms compute `A · G_k`
//! - y-transforms compute `G_k · Aᵀ`
//!
//! Slabs are independent and dispatched through the [`Architecture`].
//! Fourier operators are complex; cosine and identity operators stay real
//! and act on the real and imaginary parts of `G_k` separately.
//!
//! # Kernels
//!
//! | Kernel                     | Method                        | Best for          |
//! |----------------------------|-------------------------------|-------------------|
//! | [`TransformKernel::Gemm`]  | faer `matmul` per slab        | `N ≥ GEMM_THRESHOLD` |
//! | [`TransformKernel::Scalar`]| direct summation              | small axes        |

use std::f64::consts::PI;
use std::fmt;
use std::ops::Mul;
use std::time::Instant;

use faer::linalg::matmul::matmul;
use faer::{Accum, Mat, MatMut, MatRef, Par, c64};

use crate::architecture::Architecture;
use crate::types::{Axis, Resolution3D, Topology};

/// Axis length from which the faer kernel is preferred under
/// [`PlannerFlag::Estimate`].
///
/// Below this, faer's per-call setup outweighs the summation cost.
pub const GEMM_THRESHOLD: usize = 16;

/// Repetitions per kernel under [`PlannerFlag::Measure`].
const MEASURE_REPEATS: usize = 3;

/// Transform direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Physical space to spectral coefficients.
    Forward,
    /// Spectral coefficients to physical space (normalised).
    Backward,
}

/// How a planned transform is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKernel {
    /// faer matrix-matrix product per level slab.
    Gemm,
    /// Direct summation loops.
    Scalar,
}

/// Effort spent choosing a [`TransformKernel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlannerFlag {
    /// Choose by axis length against [`GEMM_THRESHOLD`].
    #[default]
    Estimate,
    /// Time both kernels on the actual field shape and keep the faster.
    Measure,
}

#[derive(Clone)]
enum Operator {
    Real(Mat<f64>),
    Complex(Mat<c64>),
}

/// A planned transform along one horizontal axis.
///
/// Rows of the operator index output modes, columns index input points.
#[derive(Clone)]
pub struct AxisTransform {
    axis: Axis,
    topology: Topology,
    direction: Direction,
    n: usize,
    operator: Operator,
    kernel: TransformKernel,
}

impl AxisTransform {
    /// Plan the transform of `n` points along `axis` (x or y).
    ///
    /// | Topology | Forward                         | Backward                             |
    /// |----------|---------------------------------|--------------------------------------|
    /// | Periodic | DFT, `e^{-2πi mn/N}`            | conjugate, scaled by `1/N`           |
    /// | Bounded  | DCT-II, `2 cos(π m (2n+1)/2N)`  | DCT-III, `c_m cos(π m (2n+1)/2N)/2N` |
    /// | Flat     | identity                        | identity                             |
    ///
    /// with `c_0 = 1` and `c_m = 2` otherwise. The kernel is chosen as under
    /// [`PlannerFlag::Estimate`]; see [`AxisTransform::tune`].
    pub fn plan(axis: Axis, topology: Topology, n: usize, direction: Direction) -> Self {
        debug_assert!(axis != Axis::Z, "vertical axis is not transformed");

        let nf = n as f64;
        let angle = |m: usize, j: usize| 2.0 * PI * (m * j) as f64 / nf;
        let cosine = |m: usize, j: usize| (PI * m as f64 * (2 * j + 1) as f64 / (2.0 * nf)).cos();

        let operator = match (topology, direction) {
            (Topology::Periodic, Direction::Forward) => Operator::Complex(Mat::from_fn(n, n, |m, j| {
                c64::new(angle(m, j).cos(), -angle(m, j).sin())
            })),
            (Topology::Periodic, Direction::Backward) => Operator::Complex(Mat::from_fn(n, n, |j, m| {
                c64::new(angle(j, m).cos() / nf, angle(j, m).sin() / nf)
            })),
            (Topology::Bounded, Direction::Forward) => {
                Operator::Real(Mat::from_fn(n, n, |m, j| 2.0 * cosine(m, j)))
            }
            (Topology::Bounded, Direction::Backward) => Operator::Real(Mat::from_fn(n, n, |j, m| {
                let c = if m == 0 { 1.0 } else { 2.0 };
                c * cosine(m, j) / (2.0 * nf)
            })),
            (Topology::Flat, _) => Operator::Real(Mat::identity(n, n)),
        };

        Self {
            axis,
            topology,
            direction,
            n,
            operator,
            kernel: estimate_kernel(n),
        }
    }

    /// Axis this transform acts along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Topology the operator was built for.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Direction of the transform.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of points along the axis.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True for a zero-length axis (never produced by a valid grid).
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// True if the operator has no imaginary part.
    pub fn is_real(&self) -> bool {
        matches!(self.operator, Operator::Real(_))
    }

    /// Kernel used by [`apply`](Self::apply).
    pub fn kernel(&self) -> TransformKernel {
        self.kernel
    }

    /// Override the kernel.
    pub fn with_kernel(mut self, kernel: TransformKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Choose the kernel according to `flag` for fields of shape `size`.
    pub fn tune(&mut self, flag: PlannerFlag, architecture: Architecture, size: Resolution3D) {
        self.kernel = match flag {
            PlannerFlag::Estimate => estimate_kernel(self.n),
            PlannerFlag::Measure => self.measure_kernel(architecture, size),
        };
    }

    fn measure_kernel(&self, architecture: Architecture, size: Resolution3D) -> TransformKernel {
        let total = size.total_cells();
        let src = vec![c64::new(0.0, 0.0); total];
        let mut dst = vec![c64::new(0.0, 0.0); total];

        let mut time = |kernel: TransformKernel| {
            let trial = self.clone().with_kernel(kernel);
            let start = Instant::now();
            for _ in 0..MEASURE_REPEATS {
                trial.apply(architecture, size, &src, &mut dst);
            }
            start.elapsed()
        };

        let gemm = time(TransformKernel::Gemm);
        let scalar = time(TransformKernel::Scalar);
        let kernel = if gemm <= scalar {
            TransformKernel::Gemm
        } else {
            TransformKernel::Scalar
        };
        log::debug!(
            "Measured {} transform along {} (N={}): gemm {:?}, scalar {:?} -> {:?}",
            self.topology,
            self.axis,
            self.n,
            gemm,
            scalar,
            kernel
        );
        kernel
    }

    /// Transform `src` into `dst`, both x-fastest fields of shape `size`.
    pub fn apply(&self, architecture: Architecture, size: Resolution3D, src: &[c64], dst: &mut [c64]) {
        let (nx, ny, _) = size.as_tuple();
        let slab = nx * ny;
        debug_assert_eq!(src.len(), size.total_cells());
        debug_assert_eq!(self.n, size.along(self.axis));

        // Real operators on the gemm path stage both parts of a slab
        let scratch_len = match (&self.operator, self.kernel) {
            (Operator::Real(_), TransformKernel::Gemm) => 4 * slab,
            _ => 0,
        };

        architecture.for_each_chunk_mut(slab, dst, scratch_len, |k, out, scratch| {
            let u = &src[k * slab..(k + 1) * slab];
            match (&self.operator, self.kernel) {
                (Operator::Complex(a), TransformKernel::Gemm) => {
                    self.gemm_complex(a.as_ref(), nx, ny, u, out)
                }
                (Operator::Real(a), TransformKernel::Gemm) => {
                    self.gemm_real(a.as_ref(), nx, ny, u, out, scratch)
                }
                (Operator::Complex(a), TransformKernel::Scalar) => {
                    self.sum_lines(|m, p| a[(m, p)], nx, ny, u, out)
                }
                (Operator::Real(a), TransformKernel::Scalar) => {
                    self.sum_lines(|m, p| a[(m, p)], nx, ny, u, out)
                }
            }
        });
    }

    fn gemm_complex(&self, a: MatRef<'_, c64>, nx: usize, ny: usize, u: &[c64], out: &mut [c64]) {
        let u = MatRef::from_column_major_slice(u, nx, ny);
        let mut x = MatMut::from_column_major_slice_mut(out, nx, ny);
        let one = c64::new(1.0, 0.0);

        match self.axis {
            Axis::X => matmul(&mut x, Accum::Replace, &a, &u, one, Par::Seq),
            Axis::Y | Axis::Z => matmul(&mut x, Accum::Replace, &u, &a.transpose(), one, Par::Seq),
        }
    }

    /// One real product per slab, with real and imaginary parts stacked
    /// along the untransformed dimension.
    fn gemm_real(
        &self,
        a: MatRef<'_, f64>,
        nx: usize,
        ny: usize,
        u: &[c64],
        out: &mut [c64],
        scratch: &mut [f64],
    ) {
        let slab = nx * ny;
        let (stacked, product) = scratch.split_at_mut(2 * slab);

        match self.axis {
            Axis::X => {
                // [Re | Im] as Nx × 2Ny
                for (n, v) in u.iter().enumerate() {
                    stacked[n] = v.re;
                    stacked[slab + n] = v.im;
                }
                let g = MatRef::from_column_major_slice(stacked, nx, 2 * ny);
                let mut x = MatMut::from_column_major_slice_mut(product, nx, 2 * ny);
                matmul(&mut x, Accum::Replace, &a, &g, 1.0, Par::Seq);

                for (n, v) in out.iter_mut().enumerate() {
                    *v = c64::new(product[n], product[slab + n]);
                }
            }
            Axis::Y | Axis::Z => {
                // [Re; Im] as 2Nx × Ny
                for (n, v) in u.iter().enumerate() {
                    let (i, j) = (n % nx, n / nx);
                    stacked[i + 2 * nx * j] = v.re;
                    stacked[nx + i + 2 * nx * j] = v.im;
                }
                let g = MatRef::from_column_major_slice(stacked, 2 * nx, ny);
                let mut x = MatMut::from_column_major_slice_mut(product, 2 * nx, ny);
                matmul(&mut x, Accum::Replace, &g, &a.transpose(), 1.0, Par::Seq);

                for (n, v) in out.iter_mut().enumerate() {
                    let (i, j) = (n % nx, n / nx);
                    *v = c64::new(product[i + 2 * nx * j], product[nx + i + 2 * nx * j]);
                }
            }
        }
    }

    /// Same product as the gemm kernels by direct summation along each line.
    fn sum_lines<T, F>(&self, coef: F, nx: usize, ny: usize, u: &[c64], out: &mut [c64])
    where
        T: Copy,
        c64: Mul<T, Output = c64>,
        F: Fn(usize, usize) -> T,
    {
        let n = self.n;
        // Strides of the transformed index and of the line index within a slab
        let (stride, line_stride, lines) = match self.axis {
            Axis::X => (1, nx, ny),
            Axis::Y | Axis::Z => (nx, 1, nx),
        };

        for line in 0..lines {
            for m in 0..n {
                let mut sum = c64::new(0.0, 0.0);
                for p in 0..n {
                    sum += u[line * line_stride + p * stride] * coef(m, p);
                }
                out[line * line_stride + m * stride] = sum;
            }
        }
    }
}

impl fmt::Debug for AxisTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisTransform")
            .field("axis", &self.axis)
            .field("topology", &self.topology)
            .field("direction", &self.direction)
            .field("n", &self.n)
            .field("real", &self.is_real())
            .field("kernel", &self.kernel)
            .finish()
    }
}

fn estimate_kernel(n: usize) -> TransformKernel {
    if n >= GEMM_THRESHOLD {
        TransformKernel::Gemm
    } else {
        TransformKernel::Scalar
    }
}

/// Forward `[x, y]` and backward `[y, x]` transforms for a horizontal plane.
#[derive(Clone, Debug)]
pub struct TransformPipeline {
    forward: Vec<AxisTransform>,
    backward: Vec<AxisTransform>,
}

impl TransformPipeline {
    /// Plan both directions for the horizontal axes of a field of shape `size`.
    pub fn plan(
        topology_x: Topology,
        topology_y: Topology,
        size: Resolution3D,
        flag: PlannerFlag,
        architecture: Architecture,
    ) -> Self {
        let plan = |axis, topology, direction| {
            let mut t = AxisTransform::plan(axis, topology, size.along(axis), direction);
            t.tune(flag, architecture, size);
            t
        };

        Self {
            forward: vec![
                plan(Axis::X, topology_x, Direction::Forward),
                plan(Axis::Y, topology_y, Direction::Forward),
            ],
            backward: vec![
                plan(Axis::Y, topology_y, Direction::Backward),
                plan(Axis::X, topology_x, Direction::Backward),
            ],
        }
    }

    /// Transforms in forward application order.
    pub fn forward(&self) -> &[AxisTransform] {
        &self.forward
    }

    /// Transforms in backward application order.
    pub fn backward(&self) -> &[AxisTransform] {
        &self.backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn size(nx: usize, ny: usize, nz: usize) -> Resolution3D {
        Resolution3D::new(nx, ny, nz).unwrap()
    }

    fn complex(re: &[f64]) -> Vec<c64> {
        re.iter().map(|&v| c64::new(v, 0.0)).collect()
    }

    fn run(t: &AxisTransform, size: Resolution3D, src: &[c64]) -> Vec<c64> {
        let mut out = vec![c64::new(0.0, 0.0); src.len()];
        t.apply(Architecture::Cpu, size, src, &mut out);
        out
    }

    #[test]
    fn test_dft_of_constant() {
        let s = size(4, 1, 1);
        let t = AxisTransform::plan(Axis::X, Topology::Periodic, 4, Direction::Forward);
        let hat = run(&t, s, &complex(&[1.0; 4]));
        assert_relative_eq!(hat[0].re, 4.0, epsilon = 1e-12);
        for m in 1..4 {
            assert!(hat[m].norm() < 1e-12);
        }
    }

    #[test]
    fn test_dft_single_mode() {
        // cos(2π n / 4) lands in modes 1 and 3 with weight N/2
        let s = size(4, 1, 1);
        let f: Vec<f64> = (0..4).map(|n| (PI * n as f64 / 2.0).cos()).collect();
        let t = AxisTransform::plan(Axis::X, Topology::Periodic, 4, Direction::Forward);
        let hat = run(&t, s, &complex(&f));
        assert_relative_eq!(hat[1].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(hat[3].re, 2.0, epsilon = 1e-12);
        assert!(hat[0].norm() < 1e-12 && hat[2].norm() < 1e-12);
    }

    #[test]
    fn test_operator_kind_by_topology() {
        let plan = |topology, n| AxisTransform::plan(Axis::X, topology, n, Direction::Forward);
        assert!(!plan(Topology::Periodic, 4).is_real());
        assert!(plan(Topology::Bounded, 4).is_real());
        assert!(plan(Topology::Flat, 1).is_real());
    }

    #[test]
    fn test_dct_round_trip_along_y() {
        let s = size(3, 5, 2);
        let field: Vec<c64> = (0..30)
            .map(|n| c64::new((n as f64 * 0.37).sin(), (n as f64 * 0.11).cos()))
            .collect();
        let fwd = AxisTransform::plan(Axis::Y, Topology::Bounded, 5, Direction::Forward);
        let bwd = AxisTransform::plan(Axis::Y, Topology::Bounded, 5, Direction::Backward);
        for kernel in [TransformKernel::Gemm, TransformKernel::Scalar] {
            let hat = run(&fwd.clone().with_kernel(kernel), s, &field);
            let back = run(&bwd.clone().with_kernel(kernel), s, &hat);
            for n in 0..30 {
                assert!((back[n] - field[n]).norm() < 1e-12, "{:?} at {}", kernel, n);
            }
        }
    }

    #[test]
    fn test_kernels_agree() {
        let s = size(6, 5, 3);
        let total = s.total_cells();
        let field: Vec<c64> = (0..total)
            .map(|n| c64::new(((n * 7) % 11) as f64 - 5.0, ((n * 3) % 5) as f64))
            .collect();
        for (axis, topology) in [
            (Axis::X, Topology::Periodic),
            (Axis::Y, Topology::Periodic),
            (Axis::X, Topology::Bounded),
            (Axis::Y, Topology::Bounded),
        ] {
            for direction in [Direction::Forward, Direction::Backward] {
                let t = AxisTransform::plan(axis, topology, s.along(axis), direction);
                let gemm = run(&t.clone().with_kernel(TransformKernel::Gemm), s, &field);
                let scalar = run(&t.with_kernel(TransformKernel::Scalar), s, &field);
                for n in 0..total {
                    assert_relative_eq!(gemm[n].re, scalar[n].re, epsilon = 1e-10);
                    assert_relative_eq!(gemm[n].im, scalar[n].im, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_real_operator_acts_on_both_parts() {
        // A real operator applied to i·f gives i times its image of f
        let s = size(4, 3, 2);
        let f: Vec<f64> = (0..24).map(|n| (n as f64).sqrt()).collect();
        let imaginary: Vec<c64> = f.iter().map(|&v| c64::new(0.0, v)).collect();
        for kernel in [TransformKernel::Gemm, TransformKernel::Scalar] {
            let t = AxisTransform::plan(Axis::X, Topology::Bounded, 4, Direction::Forward)
                .with_kernel(kernel);
            let of_real = run(&t, s, &complex(&f));
            let of_imag = run(&t, s, &imaginary);
            for n in 0..24 {
                assert_eq!(of_real[n].im, 0.0);
                assert_relative_eq!(of_imag[n].im, of_real[n].re, epsilon = 1e-12);
                assert_eq!(of_imag[n].re, 0.0);
            }
        }
    }

    #[test]
    fn test_flat_identity() {
        let s = size(3, 1, 2);
        let field = complex(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        for kernel in [TransformKernel::Gemm, TransformKernel::Scalar] {
            let t = AxisTransform::plan(Axis::Y, Topology::Flat, 1, Direction::Forward)
                .with_kernel(kernel);
            assert_eq!(run(&t, s, &field), field);
        }
    }

    #[test]
    fn test_estimate_threshold() {
        let small = AxisTransform::plan(Axis::X, Topology::Periodic, 4, Direction::Forward);
        let large = AxisTransform::plan(Axis::X, Topology::Periodic, GEMM_THRESHOLD, Direction::Forward);
        assert_eq!(small.kernel(), TransformKernel::Scalar);
        assert_eq!(large.kernel(), TransformKernel::Gemm);
    }

    #[test]
    fn test_measure_picks_a_kernel() {
        let s = size(8, 8, 2);
        let mut t = AxisTransform::plan(Axis::Y, Topology::Bounded, 8, Direction::Forward);
        t.tune(PlannerFlag::Measure, Architecture::Cpu, s);
        assert!(matches!(t.kernel(), TransformKernel::Gemm | TransformKernel::Scalar));
    }

    #[test]
    fn test_pipeline_order() {
        let p = TransformPipeline::plan(
            Topology::Periodic,
            Topology::Bounded,
            size(4, 6, 2),
            PlannerFlag::Estimate,
            Architecture::Cpu,
        );
        let axes: Vec<Axis> = p.forward().iter().map(|t| t.axis()).collect();
        assert_eq!(axes, vec![Axis::X, Axis::Y]);
        let axes: Vec<Axis> = p.backward().iter().map(|t| t.axis()).collect();
        assert_eq!(axes, vec![Axis::Y, Axis::X]);
        assert_eq!(p.backward()[0].topology(), Topology::Bounded);
        assert_eq!(p.backward()[0].len(), 6);
    }
}
