//! Closed-form model of the recurrence as a discrete rotation.
//!
//! ## Linear form
//!
//! Substitute `u = 1 − d`. One recurrence step becomes
//!
//!   s' = s + k·u
//!   u' = u − s' = (1 − k)·u − s
//!
//! i.e. `(s, u) ↦ M·(s, u)` with
//!
//!   M = ⎡  1     k  ⎤      tr M = 2 − k,   det M = 1
//!       ⎣ −1   1 − k⎦
//!
//! ## Eigenstructure
//!
//! For 0 < k < 4 the characteristic polynomial λ² − (2 − k)λ + 1 has a
//! complex-conjugate pair on the unit circle:
//!
//!   λ = e^{±iθ},   cos θ = 1 − k/2
//!
//! so the state never grows or decays, it rotates. With `u₀ = 2`, `s₀ = 0`:
//!
//!   u_n = Re[(2 + i·k/sin θ) · e^{inθ}] = 2·cos nθ − (k / sin θ)·sin nθ
//!
//! The stopping rule `d ≥ 0` is `u_n ≤ 1`: the first step at which the
//! rotating state has swept past the level line. For small `k`, θ ≈ √k and
//! the crossing sits near nθ ≈ π/3, which gives n ≈ (π/3)/√k ≈ 1.047/√k.
//! That is the `n ≈ 1/√k` trend seen in the sweep.

use std::f64::consts::PI;

use num_complex::Complex;

use crate::error::{ExplorerError, Result};
use crate::recurrence::validate_k;

type Cx = Complex<f64>;

// ─── Parameter domain ─────────────────────────────────────────────────────────

/// Upper bound on `k` for which the eigenvalues stay complex.
pub const ROTATION_LIMIT: f64 = 4.0;

fn validate_rotation(k: f64) -> Result<()> {
    validate_k(k)?;
    if k < ROTATION_LIMIT {
        Ok(())
    } else {
        Err(ExplorerError::InvalidParameter { k })
    }
}

// ─── Step map ─────────────────────────────────────────────────────────────────

/// Row-major step matrix acting on `(s, u)`.
pub fn step_matrix(k: f64) -> [[f64; 2]; 2] {
    [[1.0, k], [-1.0, 1.0 - k]]
}

pub fn determinant(m: &[[f64; 2]; 2]) -> f64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

/// Eigenvalue pair `(e^{+iθ}, e^{−iθ})` of the step matrix.
pub fn eigenvalues(k: f64) -> Result<(Cx, Cx)> {
    validate_rotation(k)?;
    let re = 1.0 - k / 2.0;
    let im = (1.0 - re * re).sqrt();
    let lambda = Cx::new(re, im);
    Ok((lambda, lambda.conj()))
}

/// Rotation angle θ per step.
pub fn angular_step(k: f64) -> Result<f64> {
    Ok(eigenvalues(k)?.0.arg())
}

/// Oscillation frequency in cycles per step, θ / 2π.
pub fn frequency(k: f64) -> Result<f64> {
    Ok(angular_step(k)? / (2.0 * PI))
}

// ─── Closed-form trajectory ───────────────────────────────────────────────────

/// Complex amplitude `2 + i·k/sin θ` fixed by `u₀ = 2`, `u₁ = 2 − 2k`.
fn amplitude(k: f64, theta: f64) -> Cx {
    Cx::new(2.0, k / theta.sin())
}

/// `u_n = 1 − d_n` evaluated in closed form.
pub fn u_closed(k: f64, n: u64) -> Result<f64> {
    let theta = angular_step(k)?;
    Ok(u_at(k, theta, n))
}

fn u_at(k: f64, theta: f64, n: u64) -> f64 {
    (amplitude(k, theta) * Cx::from_polar(1.0, n as f64 * theta)).re
}

/// `d_n` in closed form.
pub fn d_closed(k: f64, n: u64) -> Result<f64> {
    Ok(1.0 - u_closed(k, n)?)
}

/// `s_n = u_{n−1} − u_n` in closed form (`s₀ = 0`).
pub fn s_closed(k: f64, n: u64) -> Result<f64> {
    if n == 0 {
        return Ok(0.0);
    }
    let theta = angular_step(k)?;
    Ok(u_at(k, theta, n - 1) - u_at(k, theta, n))
}

/// Continuous crossing time: the real `t > 0` at which `u(t) = 1`.
///
/// Writing `u(t) = R·cos(tθ + φ)` with `R = √(4 + b²)`, `φ = atan2(b, 2)`,
/// `b = k / sin θ`, the first crossing is `t* = (acos(1/R) − φ) / θ`.
pub fn crossing_time(k: f64) -> Result<f64> {
    let theta = angular_step(k)?;
    let b = k / theta.sin();
    let r = (4.0 + b * b).sqrt();
    let phi = b.atan2(2.0);
    Ok(((1.0 / r).acos() - phi) / theta)
}

/// First integer `n ≥ 1` with `u_n ≤ 1`, from the closed form alone.
pub fn predicted_steps(k: f64, max_iterations: u64) -> Result<u64> {
    let theta = angular_step(k)?;
    for n in 1..=max_iterations {
        if u_at(k, theta, n) <= 1.0 {
            return Ok(n);
        }
    }
    Err(ExplorerError::NonConvergence { k, iterations: max_iterations })
}

// ─── Verification tests ───────────────────────────────────────────────────────
