//! 对比度 (contrast) 与逐流线统计量 (track statistic).

use super::{MappingError, PluginKind};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 对比度机制. 决定每条流线的标量 "因子" 的含义.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Contrast {
    /// 流线密度. 每条流线计数一次.
    TrackDensity,

    /// 流线弧长.
    Length,

    /// 流线弧长的倒数.
    InverseLength,

    /// 标量图在各顶点处的采样值.
    ScalarMap,

    /// 标量图采样值的二值化 (非零即 1).
    ScalarMapBinary,

    /// FOD 在各顶点切向处的幅值.
    FodAmplitude,

    /// 由流线几何本身估计的曲率.
    Curvature,
}

/// 逐顶点值的来源.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VertexSource {
    /// 由挂载的采样插件提供.
    Plugin(PluginKind),

    /// 由曲率估计器提供.
    Curvature,
}

/// 因子的计算方式. 每种对比度对应一种.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FactorSource {
    /// 常数 1.
    Unit,

    /// 弧长.
    Length,

    /// 弧长倒数.
    InverseLength,

    /// 先得到逐顶点值, 再经统计量归约.
    PerVertex(VertexSource),
}

impl Contrast {
    /// 全部对比度.
    pub const ALL: [Contrast; 7] = [
        Contrast::TrackDensity,
        Contrast::Length,
        Contrast::InverseLength,
        Contrast::ScalarMap,
        Contrast::ScalarMapBinary,
        Contrast::FodAmplitude,
        Contrast::Curvature,
    ];

    /// 该对比度的因子来源.
    #[inline]
    pub fn source(&self) -> FactorSource {
        match self {
            Contrast::TrackDensity => FactorSource::Unit,
            Contrast::Length => FactorSource::Length,
            Contrast::InverseLength => FactorSource::InverseLength,
            Contrast::ScalarMap | Contrast::ScalarMapBinary => {
                FactorSource::PerVertex(VertexSource::Plugin(PluginKind::ScalarImage))
            }
            Contrast::FodAmplitude => {
                FactorSource::PerVertex(VertexSource::Plugin(PluginKind::FodImage))
            }
            Contrast::Curvature => FactorSource::PerVertex(VertexSource::Curvature),
        }
    }

    /// 该对比度所需的插件类型. 不需要插件时返回 `None`.
    #[inline]
    pub fn plugin_kind(&self) -> Option<PluginKind> {
        match self.source() {
            FactorSource::PerVertex(VertexSource::Plugin(kind)) => Some(kind),
            _ => None,
        }
    }

    /// 因子是否由逐顶点值归约而来.
    #[inline]
    pub fn is_per_vertex(&self) -> bool {
        matches!(self.source(), FactorSource::PerVertex(_))
    }

    /// 约定的选项名.
    pub fn name(&self) -> &'static str {
        match self {
            Contrast::TrackDensity => "tdi",
            Contrast::Length => "length",
            Contrast::InverseLength => "invlength",
            Contrast::ScalarMap => "scalar_map",
            Contrast::ScalarMapBinary => "scalar_map_count",
            Contrast::FodAmplitude => "fod_amp",
            Contrast::Curvature => "curvature",
        }
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Contrast {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Contrast::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| MappingError::UnknownContrast(s.to_string()))
    }
}

/// 逐流线统计量. 决定如何将逐顶点值合并为一个数.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Statistic {
    /// 有限值之和.
    Sum,

    /// 有限值的最小值.
    Min,

    /// 有限值的最大值.
    Max,

    /// 有限值的平均值.
    Mean,

    /// 下标为 `N / 2` 的顺序统计量 (偶数个值时取上中位).
    Median,

    /// 有限非零值的平均值.
    MeanNonzero,

    /// 高斯平滑. 逐顶点归约不支持该统计量.
    GaussianSmoothed,

    /// 两端点中绝对值较小者.
    EndpointsMin,

    /// 两端点的平均值.
    EndpointsMean,

    /// 两端点中绝对值较大者.
    EndpointsMax,

    /// 两端点同号时的乘积, 否则为 0.
    EndpointsProduct,
}

impl Statistic {
    /// 全部统计量.
    pub const ALL: [Statistic; 11] = [
        Statistic::Sum,
        Statistic::Min,
        Statistic::Max,
        Statistic::Mean,
        Statistic::Median,
        Statistic::MeanNonzero,
        Statistic::GaussianSmoothed,
        Statistic::EndpointsMin,
        Statistic::EndpointsMean,
        Statistic::EndpointsMax,
        Statistic::EndpointsProduct,
    ];

    /// 是否为端点统计量.
    #[inline]
    pub fn is_endpoints(&self) -> bool {
        matches!(
            self,
            Statistic::EndpointsMin
                | Statistic::EndpointsMean
                | Statistic::EndpointsMax
                | Statistic::EndpointsProduct
        )
    }

    /// 约定的选项名.
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::MeanNonzero => "mean_nonzero",
            Statistic::GaussianSmoothed => "gaussian",
            Statistic::EndpointsMin => "ends_min",
            Statistic::EndpointsMean => "ends_mean",
            Statistic::EndpointsMax => "ends_max",
            Statistic::EndpointsProduct => "ends_prod",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| MappingError::UnknownStatistic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_names() {
        for c in Contrast::ALL {
            assert_eq!(c.to_string().parse::<Contrast>(), Ok(c));
        }
        assert_eq!(
            "fa".parse::<Contrast>(),
            Err(MappingError::UnknownContrast("fa".to_string()))
        );
    }

    #[test]
    fn test_statistic_names() {
        for s in Statistic::ALL {
            assert_eq!(s.to_string().parse::<Statistic>(), Ok(s));
        }
        assert!("mode".parse::<Statistic>().is_err());
    }

    /// 每种对比度的因子来源.
    #[test]
    fn test_contrast_source() {
        assert_eq!(Contrast::TrackDensity.source(), FactorSource::Unit);
        assert_eq!(Contrast::Length.plugin_kind(), None);
        assert_eq!(Contrast::Curvature.plugin_kind(), None);
        assert!(Contrast::Curvature.is_per_vertex());
        assert_eq!(
            Contrast::ScalarMapBinary.plugin_kind(),
            Some(PluginKind::ScalarImage)
        );
        assert_eq!(
            Contrast::FodAmplitude.plugin_kind(),
            Some(PluginKind::FodImage)
        );
        assert!(!Contrast::InverseLength.is_per_vertex());
    }

    #[test]
    fn test_endpoints() {
        let ends = Statistic::ALL
            .into_iter()
            .filter(Statistic::is_endpoints)
            .count();
        assert_eq!(ends, 4);
    }
}
