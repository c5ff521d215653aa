//! Eigenvalues of the one-dimensional discrete Laplacian.

use std::f64::consts::PI;

use crate::types::Topology;

/// Eigenvalues of `-δ²/Δ²` on `n` uniformly spaced cells of total length `l`.
///
/// With `Δ = l / n`:
///
/// | Topology | `λ[m]`                        | basis             |
/// |----------|-------------------------------|-------------------|
/// | Periodic | `(2 sin(m π / n) / Δ)²`       | complex exponential |
/// | Bounded  | `(2 sin(m π / 2n) / Δ)²`      | cosine (Neumann)  |
/// | Flat     | `0`                           | none              |
///
/// Mode `m = 0` is always zero, so the constant is in the null space of
/// every topology.
///
/// # Example
///
/// ```
/// use poisson_rs::spectral::poisson_eigenvalues;
/// use poisson_rs::types::Topology;
///
/// let lambda = poisson_eigenvalues(4, 4.0, Topology::Periodic);
/// assert_eq!(lambda.len(), 4);
/// assert!((lambda[1] - 2.0).abs() < 1e-12);
/// assert!((lambda[2] - 4.0).abs() < 1e-12);
/// ```
pub fn poisson_eigenvalues(n: usize, l: f64, topology: Topology) -> Vec<f64> {
    let delta = l / n as f64;
    let nf = n as f64;
    let mode = |m: usize, period: f64| {
        let s = 2.0 * (m as f64 * PI / period).sin() / delta;
        s * s
    };

    match topology {
        Topology::Periodic => (0..n).map(|m| mode(m, nf)).collect(),
        Topology::Bounded => (0..n).map(|m| mode(m, 2.0 * nf)).collect(),
        Topology::Flat => vec![0.0],
    }
}
