//! Arc length of spatial cubic segments.
//!
//! The cubic is given by two anchors and the tangent offsets leaving the first
//! and arriving at the second. Length is approximated by walking the curve in
//! equal parametric steps and summing chord lengths.

use crate::numeric::{distance, lerp_slice};

/// Point on the cubic at parameter `t`, by three rounds of linear blends.
pub fn point_at(p0: &[f64], p1: &[f64], p2: &[f64], p3: &[f64], t: f64) -> Vec<f64> {
    let a = lerp_slice(p0, p1, t);
    let b = lerp_slice(p1, p2, t);
    let c = lerp_slice(p2, p3, t);
    let ab = lerp_slice(&a, &b, t);
    let bc = lerp_slice(&b, &c, t);
    lerp_slice(&ab, &bc, t)
}

/// Control polygon for a spatial segment: `[from, from + out, to + in, to]`.
pub fn control_points(
    from: &[f64],
    tangent_out: &[f64],
    to: &[f64],
    tangent_in: &[f64],
) -> [Vec<f64>; 4] {
    let offset = |anchor: &[f64], tangent: &[f64]| -> Vec<f64> {
        anchor
            .iter()
            .enumerate()
            .map(|(i, a)| a + tangent.get(i).copied().unwrap_or(0.0))
            .collect()
    };
    [
        from.to_vec(),
        offset(from, tangent_out),
        offset(to, tangent_in),
        to.to_vec(),
    ]
}

/// Approximate arc length using `steps` parametric subdivisions.
pub fn arc_length(
    from: &[f64],
    tangent_out: &[f64],
    to: &[f64],
    tangent_in: &[f64],
    steps: usize,
) -> f64 {
    let steps = steps.max(1);
    let [p0, p1, p2, p3] = control_points(from, tangent_out, to, tangent_in);
    let mut prev = p0.clone();
    let mut total = 0.0;
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let next = point_at(&p0, &p1, &p2, &p3, t);
        total += distance(&prev, &next);
        prev = next;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_matches_euclidean_distance() {
        let len = arc_length(&[0.0, 0.0], &[0.0, 0.0], &[300.0, 400.0], &[0.0, 0.0], 200);
        assert!((len - 500.0).abs() / 500.0 < 1e-3, "len {len}");
    }

    #[test]
    fn curved_path_is_longer_than_chord() {
        let len = arc_length(&[0.0, 0.0], &[0.0, 100.0], &[100.0, 0.0], &[0.0, 100.0], 200);
        assert!(len > 100.0);
    }

    #[test]
    fn endpoints_are_anchors() {
        let [p0, p1, p2, p3] = control_points(&[1.0, 2.0], &[1.0, 1.0], &[5.0, 5.0], &[-1.0, 0.0]);
        assert_eq!(point_at(&p0, &p1, &p2, &p3, 0.0), vec![1.0, 2.0]);
        assert_eq!(point_at(&p0, &p1, &p2, &p3, 1.0), vec![5.0, 5.0]);
    }
}
