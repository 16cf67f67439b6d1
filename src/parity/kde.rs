//! # 二维高斯核密度估计
//!
//! Scott 规则带宽 (n^(-1/6)) 乘样本协方差的高斯 KDE，
//! 在样本点自身处求值，用于散点图的密度着色。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 调用
//! - 无外部模块依赖

use crate::error::{FpkitError, Result};

/// 样本协方差矩阵 (除以 n-1)
fn sample_covariance(xs: &[f64], ys: &[f64]) -> [[f64; 2]; 2] {
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;

    let mut cxx = 0.0;
    let mut cxy = 0.0;
    let mut cyy = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        cxx += (x - mx) * (x - mx);
        cxy += (x - mx) * (y - my);
        cyy += (y - my) * (y - my);
    }

    let denom = n - 1.0;
    [[cxx / denom, cxy / denom], [cxy / denom, cyy / denom]]
}

/// 在每个样本点处求 KDE 密度值
///
/// 带宽矩阵为 Scott 因子平方乘样本协方差；样本退化
/// （协方差奇异，如所有点共线）时无法估计密度。
pub fn evaluate_at_samples(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return Err(FpkitError::Other(
            "KDE requires at least 2 paired samples".to_string(),
        ));
    }

    // Scott 规则: n^(-1/(d+4)), d = 2
    let factor = (n as f64).powf(-1.0 / 6.0);
    let f2 = factor * factor;

    let cov = sample_covariance(xs, ys);
    let h = [
        [cov[0][0] * f2, cov[0][1] * f2],
        [cov[1][0] * f2, cov[1][1] * f2],
    ];

    let det = h[0][0] * h[1][1] - h[0][1] * h[1][0];
    if det <= 0.0 || !det.is_finite() {
        return Err(FpkitError::Other(
            "Degenerate data covariance, cannot estimate density".to_string(),
        ));
    }

    let inv = [
        [h[1][1] / det, -h[0][1] / det],
        [-h[1][0] / det, h[0][0] / det],
    ];

    let norm = 1.0 / (2.0 * std::f64::consts::PI * det.sqrt() * n as f64);

    let mut density = Vec::with_capacity(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..n {
            let dx = xs[i] - xs[j];
            let dy = ys[i] - ys[j];
            let q = dx * (inv[0][0] * dx + inv[0][1] * dy) + dy * (inv[1][0] * dx + inv[1][1] * dy);
            sum += (-0.5 * q).exp();
        }
        density.push(sum * norm);
    }

    Ok(density)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_samples_get_equal_density() {
        // 关于中心对称的四个点密度应相同
        let xs = [1.0, -1.0, 1.0, -1.0];
        let ys = [1.0, -1.0, -1.0, 1.0];

        let d = evaluate_at_samples(&xs, &ys).unwrap();
        for i in 1..d.len() {
            assert!((d[i] - d[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cluster_denser_than_outlier() {
        // 紧密簇内的点密度高于远处孤立点
        let xs = [0.0, 0.1, -0.1, 0.05, 10.0];
        let ys = [0.0, -0.05, 0.1, 0.02, -10.0];

        let d = evaluate_at_samples(&xs, &ys).unwrap();
        let outlier = d[4];
        for &v in &d[..4] {
            assert!(v > outlier);
        }
    }

    #[test]
    fn test_density_positive_and_finite() {
        let xs = [1.0, 2.0, 3.0, 4.5, 6.0, 2.2];
        let ys = [1.1, 1.9, 3.2, 4.4, 5.8, 2.4];

        let d = evaluate_at_samples(&xs, &ys).unwrap();
        assert_eq!(d.len(), xs.len());
        for &v in &d {
            assert!(v > 0.0 && v.is_finite());
        }
    }

    #[test]
    fn test_degenerate_covariance_is_error() {
        // 所有点重合，协方差奇异
        let xs = [2.0, 2.0, 2.0];
        let ys = [3.0, 3.0, 3.0];

        assert!(evaluate_at_samples(&xs, &ys).is_err());
    }

    #[test]
    fn test_too_few_samples_is_error() {
        assert!(evaluate_at_samples(&[1.0], &[1.0]).is_err());
    }
}
