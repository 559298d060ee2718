//! 逐流线因子计算的静态配置.

use super::{Contrast, MappingError, MappingResult, Statistic};
use crate::consts::DEFAULT_CURVATURE_FWHM;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 对比度 + 统计量 + 曲率平滑宽度. 在启动时构建一次, 之后只读.
///
/// 该配置是只读的. 若要修改参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwiConfig {
    contrast: Contrast,
    statistic: Statistic,

    /// 曲率估计的高斯平滑半高全宽 (单位: 毫米). 仅对 `Contrast::Curvature` 有意义.
    #[cfg_attr(feature = "serde", serde(default = "default_fwhm"))]
    curvature_fwhm: f64,
}

#[cfg(feature = "serde")]
fn default_fwhm() -> f64 {
    DEFAULT_CURVATURE_FWHM
}

impl TwiConfig {
    /// 构建配置.
    ///
    /// 逐顶点对比度不接受 `Statistic::GaussianSmoothed`, 此时返回 `Err`.
    pub fn new(contrast: Contrast, statistic: Statistic) -> MappingResult<Self> {
        let config = Self {
            contrast,
            statistic,
            curvature_fwhm: DEFAULT_CURVATURE_FWHM,
        };
        config.validate()?;
        Ok(config)
    }

    /// 由选项名构建配置, 如 `("scalar_map", "mean")`.
    pub fn from_names(contrast: &str, statistic: &str) -> MappingResult<Self> {
        Self::new(contrast.parse()?, statistic.parse()?)
    }

    /// 替换曲率平滑宽度. `fwhm` 必须是有限正数.
    pub fn with_curvature_fwhm(mut self, fwhm: f64) -> MappingResult<Self> {
        self.curvature_fwhm = fwhm;
        self.validate()?;
        Ok(self)
    }

    /// 检查配置的一致性. 反序列化得到的配置应当先调用本方法.
    pub fn validate(&self) -> MappingResult<()> {
        if self.contrast.is_per_vertex() && self.statistic == Statistic::GaussianSmoothed {
            return Err(MappingError::StatisticNotApplicable {
                contrast: self.contrast,
                statistic: self.statistic,
            });
        }
        if !(self.curvature_fwhm.is_finite() && self.curvature_fwhm > 0.0) {
            return Err(MappingError::InvalidFwhm(self.curvature_fwhm));
        }
        Ok(())
    }

    /// 对比度.
    #[inline]
    pub fn contrast(&self) -> Contrast {
        self.contrast
    }

    /// 统计量.
    #[inline]
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// 曲率平滑半高全宽.
    #[inline]
    pub fn curvature_fwhm(&self) -> f64 {
        self.curvature_fwhm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_rejected_for_per_vertex() {
        for c in Contrast::ALL {
            let r = TwiConfig::new(c, Statistic::GaussianSmoothed);
            if c.is_per_vertex() {
                assert_eq!(
                    r.unwrap_err(),
                    MappingError::StatisticNotApplicable {
                        contrast: c,
                        statistic: Statistic::GaussianSmoothed
                    }
                );
            } else {
                assert!(r.is_ok());
            }
        }
    }

    #[test]
    fn test_fwhm() {
        let c = TwiConfig::new(Contrast::Curvature, Statistic::Mean).unwrap();
        assert_eq!(c.curvature_fwhm(), DEFAULT_CURVATURE_FWHM);
        assert_eq!(c.with_curvature_fwhm(2.5).unwrap().curvature_fwhm(), 2.5);
        assert_eq!(
            c.with_curvature_fwhm(-2.5).unwrap_err(),
            MappingError::InvalidFwhm(-2.5)
        );
        assert!(c.with_curvature_fwhm(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_names() {
        let c = TwiConfig::from_names("scalar_map_count", "median").unwrap();
        assert_eq!(c.contrast(), Contrast::ScalarMapBinary);
        assert_eq!(c.statistic(), Statistic::Median);
        assert_eq!(
            TwiConfig::from_names("tdi", "avg").unwrap_err(),
            MappingError::UnknownStatistic("avg".to_string())
        );
    }
}
