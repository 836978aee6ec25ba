// src/signal.rs

//! Sampling grids, finite differences and peak detection shared by the scan
//! simulator and the calibrator.

/// `count` evenly spaced samples from `start` to `end`, both inclusive.
/// A single sample sits at `start`; zero samples give an empty grid.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut grid: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            grid[count - 1] = end;
            grid
        }
    }
}

/// Discrete derivative with unit spacing: central differences inside,
/// one-sided first-order differences at both ends. Traces shorter than two
/// samples have zero slope.
pub fn gradient(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let mut slope = Vec::with_capacity(n);
    slope.push(samples[1] - samples[0]);
    for i in 1..n - 1 {
        slope.push((samples[i + 1] - samples[i - 1]) / 2.0);
    }
    slope.push(samples[n - 1] - samples[n - 2]);
    slope
}

/// Gradients of a row-major `rows x cols` map along both axes.
///
/// Returns `(along_rows, along_cols)`: the first differentiates down each
/// column (axis 0), the second across each row (axis 1).
pub fn gradient_2d(map: &[f64], rows: usize, cols: usize) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(map.len(), rows * cols);
    let mut along_rows = vec![0.0; rows * cols];
    let mut along_cols = vec![0.0; rows * cols];

    for r in 0..rows {
        let row = &map[r * cols..(r + 1) * cols];
        along_cols[r * cols..(r + 1) * cols].copy_from_slice(&gradient(row));
    }
    for c in 0..cols {
        let column: Vec<f64> = (0..rows).map(|r| map[r * cols + c]).collect();
        for (r, d) in gradient(&column).into_iter().enumerate() {
            along_rows[r * cols + c] = d;
        }
    }
    (along_rows, along_cols)
}

/// Indices of local maxima whose value is at least `min_height`, in
/// ascending order.
///
/// A maximum is a strict rise followed by a (possibly flat) plateau and a
/// strict fall; a plateau reports its midpoint, rounded down. The first and
/// last samples are never peaks.
pub fn find_peaks(signal: &[f64], min_height: f64) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                let midpoint = (i + ahead - 1) / 2;
                if signal[midpoint] >= min_height {
                    peaks.push(midpoint);
                }
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}
