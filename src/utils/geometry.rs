//! Small geometric primitives used by photogrammetry helpers.

/// Cross-form (skew-symmetric) matrix of a 3-vector, i.e. the matrix A
/// such that `A * b == a × b`.
pub fn crossform(a: [f64; 3]) -> [[f64; 3]; 3] {
    [
        [0.0, -a[2], a[1]],
        [a[2], 0.0, -a[0]],
        [-a[1], a[0], 0.0],
    ]
}

/// Normalize a standard-form line `Ax + By + C = 0` so that
/// `A² + B² == 1`. Returns None for the degenerate A = B = 0 case.
pub fn normalize_line(line: [f64; 3]) -> Option<[f64; 3]> {
    let n = (line[0] * line[0] + line[1] * line[1]).sqrt();
    if n == 0.0 {
        return None;
    }
    Some([line[0] / n, line[1] / n, line[2] / n])
}

/// Append a homogeneous coordinate of 1 to every point.
pub fn make_homogeneous(points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    points
        .iter()
        .map(|p| {
            let mut h = p.clone();
            h.push(1.0);
            h
        })
        .collect()
}
