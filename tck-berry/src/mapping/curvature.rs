//! 仅由流线几何估计逐顶点曲率.
//!
//! 步骤:
//!
//! 1. 以中心差分 (端点处单侧差分) 估计每个顶点的单位切向量, 退化者标为无效;
//! 2. 记录每条线段的长度;
//! 3. 用最近的有效切向量修补无效切向量 (内部顶点取左右两侧的平均);
//! 4. 计算任意两顶点之间沿折线的弧长距离矩阵;
//! 5. 以弧长距离为自变量, 对全部切向量做高斯加权平滑;
//! 6. 由相邻顶点平滑切向量的夹角除以其弧长距离得到曲率.
//!
//! # 复杂度
//!
//! 第 4, 5 步对每条流线都是 O(N²) 的全点对计算 (N 为顶点数), 而不是局部窗口.
//! 对于常见的几十到几百个顶点的流线可以接受. 改成局部窗口会改变数值结果.

use super::{MappingError, MappingResult};
use crate::consts::{gaussian_theta, DEFAULT_CURVATURE_FWHM};
use crate::streamline::Streamline;
use crate::{Point3d, Vec3d};
use ndarray::{Array2, ArrayView2};

/// 曲率估计器. 持有每次调用都会被覆盖的临时缓冲区, 因此不能跨线程共享同一实例.
#[derive(Debug, Clone)]
pub struct CurvatureEstimator {
    /// 高斯平滑核的半高全宽 (单位: 毫米).
    fwhm: f64,

    /// `2 * θ²`.
    denominator: f64,

    tangents: Vec<Vec3d>,
    valid: Vec<bool>,
    steps: Vec<f64>,
    distances: Array2<f64>,
    smoothed: Vec<Vec3d>,
}

impl Default for CurvatureEstimator {
    fn default() -> Self {
        Self::with_valid_fwhm(DEFAULT_CURVATURE_FWHM)
    }
}

impl CurvatureEstimator {
    /// 以平滑核半高全宽 `fwhm` (单位: 毫米) 构建.
    ///
    /// `fwhm` 必须是有限正数, 否则返回 `Err`.
    pub fn new(fwhm: f64) -> MappingResult<Self> {
        if fwhm.is_finite() && fwhm > 0.0 {
            Ok(Self::with_valid_fwhm(fwhm))
        } else {
            Err(MappingError::InvalidFwhm(fwhm))
        }
    }

    fn with_valid_fwhm(fwhm: f64) -> Self {
        let theta = gaussian_theta(fwhm);
        Self {
            fwhm,
            denominator: 2.0 * theta * theta,
            tangents: vec![],
            valid: vec![],
            steps: vec![],
            distances: Array2::zeros((0, 0)),
            smoothed: vec![],
        }
    }

    /// 平滑核半高全宽.
    #[inline]
    pub fn fwhm(&self) -> f64 {
        self.fwhm
    }

    /// 估计 `tck` 每个顶点的曲率 (单位约为弧度每毫米), 按顶点顺序追加到 `out`.
    ///
    /// 数值退化 (重合顶点, 零长度线段等) 在内部修复, 输出总是有限值.
    pub fn estimate(&mut self, tck: &Streamline, out: &mut Vec<f64>) {
        let points = tck.points();
        debug_assert!(points.len() >= 2);

        self.raw_tangents(points);
        self.repair_tangents();
        self.fill_distances();
        self.smooth_tangents();
        self.curvature_into(out);
    }

    /// 最近一次估计中修补后的 (未平滑) 单位切向量.
    #[inline]
    pub fn tangents(&self) -> &[Vec3d] {
        self.tangents.as_slice()
    }

    /// 最近一次估计中的平滑切向量.
    #[inline]
    pub fn smoothed_tangents(&self) -> &[Vec3d] {
        self.smoothed.as_slice()
    }

    /// 最近一次估计中的弧长距离矩阵.
    #[inline]
    pub fn distances(&self) -> ArrayView2<'_, f64> {
        self.distances.view()
    }

    fn raw_tangents(&mut self, points: &[Point3d]) {
        let n = points.len();
        self.tangents.clear();
        self.valid.clear();
        self.steps.clear();

        for i in 0..n {
            let diff = if i == 0 {
                points[1] - points[0]
            } else if i == n - 1 {
                points[i] - points[i - 1]
            } else {
                points[i + 1] - points[i - 1]
            };
            let t = unit(diff);
            self.valid.push(t.is_some());
            self.tangents.push(t.unwrap_or_else(Vec3d::zeros));
            if i > 0 {
                self.steps.push((points[i] - points[i - 1]).norm());
            }
        }
    }

    /// 无效切向量取向外搜索到的最近有效切向量; 内部顶点取两侧的平均并归一化.
    ///
    /// 搜索只参考原始有效性, 修补出的切向量不会再作为其它顶点的来源.
    fn repair_tangents(&mut self) {
        let n = self.tangents.len();
        let mut repaired = 0usize;
        for i in (0..n).filter(|&i| !self.valid[i]) {
            let left = (0..i).rev().find(|&k| self.valid[k]);
            let right = (i + 1..n).find(|&j| self.valid[j]);
            self.tangents[i] = match (left, right) {
                (Some(k), Some(j)) => {
                    let (tk, tj) = (self.tangents[k], self.tangents[j]);
                    // 两侧方向正好相反时平均退化, 退回左侧.
                    unit(tk + tj).unwrap_or(tk)
                }
                (Some(k), None) => self.tangents[k],
                (None, Some(j)) => self.tangents[j],
                // 所有线段都退化, 没有可用的来源.
                (None, None) => Vec3d::zeros(),
            };
            repaired += 1;
        }
        if repaired > 0 {
            log::trace!("CurvatureEstimator: repaired {repaired} of {n} tangents");
        }
    }

    /// 按行累加线段长度: `d(j, k) = d(j, k - 1) + step[k - 1]`.
    fn fill_distances(&mut self) {
        let n = self.tangents.len();
        if self.distances.dim() == (n, n) {
            self.distances.fill(0.0);
        } else {
            self.distances = Array2::zeros((n, n));
        }

        for j in 0..n {
            for k in (j + 1)..n {
                let d = self.distances[(j, k - 1)] + self.steps[k - 1];
                self.distances[(j, k)] = d;
                self.distances[(k, j)] = d;
            }
        }
    }

    fn smooth_tangents(&mut self) {
        let n = self.tangents.len();
        self.smoothed.clear();
        for i in 0..n {
            let row = self.distances.row(i);
            let sum = self
                .tangents
                .iter()
                .zip(row.iter())
                .fold(Vec3d::zeros(), |acc, (t, &d)| {
                    acc + t * (-d * d / self.denominator).exp()
                });
            self.smoothed.push(unit(sum).unwrap_or_else(Vec3d::zeros));
        }
    }

    fn curvature_into(&self, out: &mut Vec<f64>) {
        let n = self.smoothed.len();
        out.reserve(n);
        for i in 0..n {
            let (a, b) = if i == 0 {
                (1, 0)
            } else if i == n - 1 {
                (i, i - 1)
            } else {
                (i + 1, i - 1)
            };
            let dot = self.smoothed[a].dot(&self.smoothed[b]);
            let length = self.distances[(a, b)];

            // dot >= 1 时没有可测的角度变化, 也避免 acos 定义域溢出.
            let curvature = if dot >= 1.0 || length <= 0.0 {
                0.0
            } else {
                dot.max(-1.0).acos() / length
            };
            out.push(if curvature.is_finite() { curvature } else { 0.0 });
        }
    }
}

/// 归一化 `v`. 长度为 0 或结果非有限时返回 `None`.
#[inline]
fn unit(v: Vec3d) -> Option<Vec3d> {
    let norm = v.norm();
    if norm > 0.0 {
        let u = v / norm;
        u.iter().all(|c| c.is_finite()).then_some(u)
    } else {
        None
    }
}
