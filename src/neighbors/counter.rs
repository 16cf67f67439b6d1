//! # 截断半径内近邻对计数
//!
//! 暴力枚举周期镜像：对每个有序原子对 (i, j)，在 ±m 的镜像范围内
//! 找到任意一个落入截断球内的 j 镜像即计 1 并停止，返回对所有 i 的总和。
//! 镜像范围由度规矩阵最大特征值给出的保守上界决定。
//!
//! ## 依赖关系
//! - 被 `neighbors/mod.rs` 与 `commands/screen.rs` 使用
//! - 使用 `models/structure.rs` 的 Lattice

use crate::models::Lattice;

/// 对称 3x3 矩阵的特征值（三角闭式解），降序返回
fn symmetric_eigenvalues(m: [[f64; 3]; 3]) -> [f64; 3] {
    let p1 = m[0][1] * m[0][1] + m[0][2] * m[0][2] + m[1][2] * m[1][2];

    if p1 < 1e-30 {
        // 已是对角矩阵
        let mut eigs = [m[0][0], m[1][1], m[2][2]];
        eigs.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        return eigs;
    }

    let q = (m[0][0] + m[1][1] + m[2][2]) / 3.0;
    let p2 = (m[0][0] - q).powi(2)
        + (m[1][1] - q).powi(2)
        + (m[2][2] - q).powi(2)
        + 2.0 * p1;
    let p = (p2 / 6.0).sqrt();

    // B = (M - qI) / p
    let mut b = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            b[i][j] = m[i][j] / p;
        }
        b[i][i] -= q / p;
    }

    let det_b = b[0][0] * (b[1][1] * b[2][2] - b[1][2] * b[2][1])
        - b[0][1] * (b[1][0] * b[2][2] - b[1][2] * b[2][0])
        + b[0][2] * (b[1][0] * b[2][1] - b[1][1] * b[2][0]);

    let r = (det_b / 2.0).clamp(-1.0, 1.0);
    let phi = r.acos() / 3.0;

    let two_pi_thirds = 2.0 * std::f64::consts::PI / 3.0;
    let eig1 = q + 2.0 * p * phi.cos();
    let eig3 = q + 2.0 * p * (phi + two_pi_thirds).cos();
    let eig2 = 3.0 * q - eig1 - eig3;

    [eig1, eig2, eig3]
}

/// 周期镜像枚举上界：floor(cutoff / sqrt(λ_max(L·Lᵀ))) + 1
pub fn image_bound(lattice: &Lattice, cutoff: f64) -> i32 {
    let eigs = symmetric_eigenvalues(lattice.metric());
    let lambda_max = eigs[0];

    ((1.0 / lambda_max).sqrt() * cutoff) as i32 + 1
}

/// 统计截断球内的近邻对总数
///
/// `positions` 为笛卡尔坐标；每个有序对 (i, j) 至多计一个周期镜像，
/// 距离判据为严格的 d² < cutoff²。
pub fn count_within_cutoff(lattice: &Lattice, positions: &[[f64; 3]], cutoff: f64) -> usize {
    let lat = lattice.matrix;
    let natoms = positions.len();
    let cutoff2 = cutoff * cutoff;

    let m = image_bound(lattice, cutoff) + 1;

    let mut count = 0;

    for iat in 0..natoms {
        let [xi, yi, zi] = positions[iat];

        for jat in 0..natoms {
            if jat == iat {
                continue; // Skip the same atom
            }

            'images: for ix in -m..=m {
                for iy in -m..=m {
                    for iz in -m..=m {
                        let fx = ix as f64;
                        let fy = iy as f64;
                        let fz = iz as f64;

                        let xj = positions[jat][0]
                            + fx * lat[0][0]
                            + fy * lat[1][0]
                            + fz * lat[2][0];
                        let yj = positions[jat][1]
                            + fx * lat[0][1]
                            + fy * lat[1][1]
                            + fz * lat[2][1];
                        let zj = positions[jat][2]
                            + fx * lat[0][2]
                            + fy * lat[1][2]
                            + fz * lat[2][2];

                        let d2 = (xj - xi).powi(2) + (yj - yi).powi(2) + (zj - zi).powi(2);

                        if d2 < cutoff2 {
                            count += 1;
                            break 'images; // Only count one image per pair
                        }
                    }
                }
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    #[test]
    fn test_symmetric_eigenvalues_diagonal() {
        let eigs = symmetric_eigenvalues([[4.0, 0.0, 0.0], [0.0, 9.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!((eigs[0] - 9.0).abs() < 1e-9);
        assert!((eigs[1] - 4.0).abs() < 1e-9);
        assert!((eigs[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_eigenvalues_full_matrix() {
        // [[2,1,0],[1,2,0],[0,0,3]] 的特征值: 3, 3, 1
        let eigs = symmetric_eigenvalues([[2.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
        assert!((eigs[0] - 3.0).abs() < 1e-9);
        assert!((eigs[1] - 3.0).abs() < 1e-9);
        assert!((eigs[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_eigenvalues_trace_invariant() {
        let m = [[5.0, 1.2, 0.3], [1.2, 4.0, 0.7], [0.3, 0.7, 6.0]];
        let eigs = symmetric_eigenvalues(m);
        let trace = m[0][0] + m[1][1] + m[2][2];
        assert!((eigs.iter().sum::<f64>() - trace).abs() < 1e-9);
        assert!(eigs[0] >= eigs[1] && eigs[1] >= eigs[2]);
    }

    #[test]
    fn test_image_bound_cubic() {
        // a=5: λ_max=25, sqrt(1/25)*4 = 0.8 → floor 0 + 1 = 1
        assert_eq!(image_bound(&cubic(5.0), 4.0), 1);
        // a=2: λ_max=4, sqrt(1/4)*5 = 2.5 → floor 2 + 1 = 3
        assert_eq!(image_bound(&cubic(2.0), 5.0), 3);
    }

    #[test]
    fn test_count_pair_inside_and_outside_cutoff() {
        let lattice = cubic(10.0);
        let positions = vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]];

        // 距离 2.0：截断 3.0 内各向计一次
        assert_eq!(count_within_cutoff(&lattice, &positions, 3.0), 2);
        // 截断 1.0 内无近邻
        assert_eq!(count_within_cutoff(&lattice, &positions, 1.0), 0);
    }

    #[test]
    fn test_count_strict_inequality_at_cutoff() {
        let lattice = cubic(10.0);
        let positions = vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]];

        // d² < cutoff² 为严格判据，d == cutoff 不计入
        assert_eq!(count_within_cutoff(&lattice, &positions, 3.0), 0);
        assert_eq!(count_within_cutoff(&lattice, &positions, 3.0 + 1e-9), 2);
    }

    #[test]
    fn test_count_single_atom_has_no_pairs() {
        // 自身镜像不计入，单原子结构计数为 0
        let lattice = cubic(3.0);
        let positions = vec![[0.0, 0.0, 0.0]];

        assert_eq!(count_within_cutoff(&lattice, &positions, 8.0), 0);
    }

    #[test]
    fn test_count_through_periodic_boundary() {
        // 两原子各自贴近相对的晶胞面，最近镜像距离 1.0
        let lattice = cubic(10.0);
        let positions = vec![[0.5, 0.0, 0.0], [9.5, 0.0, 0.0]];

        assert_eq!(count_within_cutoff(&lattice, &positions, 1.5), 2);
    }

    #[test]
    fn test_count_monotonic_in_cutoff() {
        let lattice = cubic(6.0);
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.5, 1.5, 0.0],
            [3.0, 3.0, 3.0],
            [4.5, 0.0, 1.5],
        ];

        let mut prev = 0;
        let mut cutoff = 1.0;
        while cutoff <= 8.0 {
            let count = count_within_cutoff(&lattice, &positions, cutoff);
            assert!(count >= prev, "count decreased at cutoff {}", cutoff);
            prev = count;
            cutoff += 0.5;
        }
    }

    #[test]
    fn test_count_invariant_under_lattice_translation() {
        let lattice = Lattice::from_vectors([[6.0, 0.0, 0.0], [1.0, 6.0, 0.0], [0.0, 0.5, 7.0]]);
        let positions = vec![[0.2, 0.3, 0.1], [2.5, 3.0, 2.0], [4.0, 1.0, 5.0]];

        let base = count_within_cutoff(&lattice, &positions, 4.0);

        // 将一个原子平移整数倍晶格向量，计数不变
        let mut shifted = positions.clone();
        for k in 0..3 {
            shifted[1][k] += lattice.matrix[0][k] - 2.0 * lattice.matrix[2][k];
        }
        assert_eq!(count_within_cutoff(&lattice, &shifted, 4.0), base);
    }
}
