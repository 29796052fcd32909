//! Numeric helper utilities shared across the sampler, curve builder and emitters.

/// Round `v` to `decimals` places, mapping `-0.0` to `0.0`.
#[inline]
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    positive_zero((v * scale).round() / scale)
}

/// Map `-0.0` to `0.0`, leaving every other value untouched.
#[inline]
pub fn positive_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Round every component of `values`.
pub fn round_all(values: &[f64], decimals: u32) -> Vec<f64> {
    values.iter().map(|v| round_to(*v, decimals)).collect()
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Component-wise linear interpolation over equal-length slices.
pub fn lerp_slice(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| lerp(*x, *y, t)).collect()
}

/// Euclidean distance between two points of equal dimension.
#[inline]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (y - x) * (y - x))
        .sum::<f64>()
        .sqrt()
}
