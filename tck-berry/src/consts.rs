//! 通用常量.

/// 曲率估计中, 高斯切向量平滑核的默认半高全宽 (FWHM), 单位: 毫米.
pub const DEFAULT_CURVATURE_FWHM: f64 = 10.0;

/// 一条合法流线所需的最少顶点数.
pub const MIN_STREAMLINE_VERTICES: usize = 2;

/// 端点统计量所需的值个数 (两个端点).
pub const ENDPOINT_VALUES: usize = 2;

/// 高斯核 FWHM 与标准差之比, 即 `2 * sqrt(2 * ln 2)`.
#[inline]
pub fn fwhm_to_sigma_ratio() -> f64 {
    2.0 * (2.0 * std::f64::consts::LN_2).sqrt()
}

/// 由半高全宽 `fwhm` 求高斯核标准差 `θ`.
#[inline]
pub fn gaussian_theta(fwhm: f64) -> f64 {
    fwhm / fwhm_to_sigma_ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_theta() {
        // FWHM ≈ 2.3548 σ
        assert!((fwhm_to_sigma_ratio() - 2.354_820_045).abs() < 1e-8);
        assert!((gaussian_theta(DEFAULT_CURVATURE_FWHM) - 4.246_609_001).abs() < 1e-8);
    }
}
