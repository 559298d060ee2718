//! 合成流线. 曲率已知, 用于评估曲率估计的误差.

use itertools::iproduct;
use tck_berry::Streamline;

/// 带已知 (理论) 曲率的合成流线.
#[derive(Debug, Clone)]
pub struct Synthetic {
    /// 流线.
    pub tck: Streamline,

    /// 理论曲率 (单位: 弧度每毫米). 对所有顶点相同.
    pub curvature: f64,
}

/// 沿 x 轴的直线, 顶点间距 `step` (毫米), 共 `n` 个顶点. 曲率为 0.
pub fn straight(index: usize, n: usize, step: f64) -> Synthetic {
    let xyz: Vec<_> = (0..n).map(|i| [i as f64 * step, 0.0, 0.0]).collect();
    Synthetic {
        tck: streamline(index, &xyz),
        curvature: 0.0,
    }
}

/// 半径 `r`, 螺距参数 `c` (每弧度上升 `c` 毫米) 的圆柱螺旋线.
///
/// 顶点沿弧长等距, 间距为 `step`, 共 `n` 个顶点. 理论曲率为 `r / (r² + c²)`.
pub fn helix(index: usize, r: f64, c: f64, n: usize, step: f64) -> Synthetic {
    let dt = step / (r * r + c * c).sqrt();
    let xyz: Vec<_> = (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            [r * t.cos(), r * t.sin(), c * t]
        })
        .collect();
    Synthetic {
        tck: streamline(index, &xyz),
        curvature: r / (r * r + c * c),
    }
}

/// 由给定半径和螺距参数两两组合得到的一束螺旋线. 序号依次编排.
pub fn helix_bundle(radii: &[f64], pitches: &[f64], n: usize, step: f64) -> Vec<Synthetic> {
    iproduct!(radii.iter(), pitches.iter())
        .enumerate()
        .map(|(index, (&r, &c))| helix(index, r, c, n, step))
        .collect()
}

#[inline]
fn streamline(index: usize, xyz: &[[f64; 3]]) -> Streamline {
    // 合成数据总是至少有 2 个顶点.
    Streamline::from_xyz(index, xyz).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helix_step() {
        let h = helix(0, 5.0, 1.0, 50, 0.5);
        assert_eq!(h.tck.len(), 50);
        // 弦长略小于弧长.
        assert!(h.tck.length() < 49.0 * 0.5);
        assert!(h.tck.length() > 49.0 * 0.5 * 0.99);
        assert!((h.curvature - 5.0 / 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_bundle() {
        let b = helix_bundle(&[2.0, 4.0], &[0.0, 1.0, 3.0], 10, 1.0);
        assert_eq!(b.len(), 6);
        assert!(b.iter().enumerate().all(|(i, s)| s.tck.index() == i));
        assert_eq!(straight(0, 3, 1.0).tck.length(), 2.0);
    }
}
