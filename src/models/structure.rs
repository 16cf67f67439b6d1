//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示。除了解析出的原子列表，还保留 POSCAR
//! 头部声明的元素与计数行，供 `screen` 检查头部与坐标块是否一致。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.matrix[0];
        let b_vec = self.matrix[1];
        let c_vec = self.matrix[2];

        let a = (a_vec[0].powi(2) + a_vec[1].powi(2) + a_vec[2].powi(2)).sqrt();
        let b = (b_vec[0].powi(2) + b_vec[1].powi(2) + b_vec[2].powi(2)).sqrt();
        let c = (c_vec[0].powi(2) + c_vec[1].powi(2) + c_vec[2].powi(2)).sqrt();

        let dot_bc: f64 = b_vec.iter().zip(c_vec.iter()).map(|(x, y)| x * y).sum();
        let dot_ac: f64 = a_vec.iter().zip(c_vec.iter()).map(|(x, y)| x * y).sum();
        let dot_ab: f64 = a_vec.iter().zip(b_vec.iter()).map(|(x, y)| x * y).sum();

        let alpha = (dot_bc / (b * c)).acos().to_degrees();
        let beta = (dot_ac / (a * c)).acos().to_degrees();
        let gamma = (dot_ab / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 度规矩阵 L·Lᵀ，近邻计数的周期镜像上界由其特征值决定
    pub fn metric(&self) -> [[f64; 3]; 3] {
        let m = self.matrix;
        let mut g = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                g[i][j] = m[i][0] * m[j][0] + m[i][1] * m[j][1] + m[i][2] * m[j][2];
            }
        }
        g
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标（伴随矩阵求逆，奇异晶格原样返回）
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        [
            inv[0][0] * cart[0] + inv[0][1] * cart[1] + inv[0][2] * cart[2],
            inv[1][0] * cart[0] + inv[1][1] * cart[1] + inv[1][2] * cart[2],
            inv[2][0] * cart[0] + inv[2][1] * cart[1] + inv[2][2] * cart[2],
        ]
    }
}

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表（坐标块中实际解析到的原子）
    pub atoms: Vec<Atom>,

    /// POSCAR 头部声明的元素符号行
    pub declared_species: Vec<String>,

    /// POSCAR 头部声明的各元素原子数行
    pub declared_counts: Vec<usize>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
            declared_species: Vec::new(),
            declared_counts: Vec::new(),
        }
    }

    /// 实际解析到的原子数
    pub fn natoms(&self) -> usize {
        self.atoms.len()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 所有原子的笛卡尔坐标
    pub fn cart_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| self.lattice.frac_to_cart(a.position))
            .collect()
    }

    /// 按头部计数行展开的 1 起始元素种类序号，
    /// 声明 "C B" / "2 1" 展开为 [1, 1, 2]
    pub fn species_indices(&self) -> Vec<usize> {
        let mut types = Vec::new();
        for (i, &count) in self.declared_counts.iter().enumerate() {
            types.extend(std::iter::repeat(i + 1).take(count));
        }
        types
    }

    /// 坐标块中实际出现的不同元素符号（按首次出现顺序去重）
    pub fn distinct_elements(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for atom in &self.atoms {
            if !seen.contains(&atom.element) {
                seen.push(atom.element.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_parameters_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let vol = lattice.volume().abs();

        // 5^3 = 125
        assert!((vol - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_metric_cubic() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let g = lattice.metric();

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 16.0 } else { 0.0 };
                assert!((g[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_frac_cart_round_trip() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [1.0, 4.0, 0.0], [0.5, 0.5, 6.0]]);
        let frac = [0.25, 0.5, 0.75];

        let cart = lattice.frac_to_cart(frac);
        let back = lattice.cart_to_frac(cart);

        for i in 0..3 {
            assert!((back[i] - frac[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_crystal_formula() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let atoms = vec![
            Atom::new("Na", [0.0, 0.0, 0.0]),
            Atom::new("Cl", [0.5, 0.5, 0.5]),
            Atom::new("Na", [0.5, 0.5, 0.0]),
        ];
        let crystal = Crystal::new("NaCl", lattice, atoms);

        let formula = crystal.formula();
        assert!(formula.contains("Na2"));
        assert!(formula.contains("Cl"));
    }

    #[test]
    fn test_species_indices_expansion() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let mut crystal = Crystal::new("SnBC", lattice, Vec::new());
        crystal.declared_species = vec!["C".to_string(), "B".to_string(), "Sn".to_string()];
        crystal.declared_counts = vec![2, 1, 3];

        assert_eq!(crystal.species_indices(), vec![1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn test_distinct_elements_order() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let atoms = vec![
            Atom::new("C", [0.0, 0.0, 0.0]),
            Atom::new("B", [0.5, 0.0, 0.0]),
            Atom::new("C", [0.0, 0.5, 0.0]),
            Atom::new("Sn", [0.0, 0.0, 0.5]),
        ];
        let crystal = Crystal::new("SnBC", lattice, atoms);

        assert_eq!(crystal.distinct_elements(), vec!["C", "B", "Sn"]);
    }
}
