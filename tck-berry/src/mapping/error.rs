//! 运行时错误.

use super::{Contrast, PluginKind, Statistic};
use thiserror::Error;

/// 流线映射的配置错误与输入错误.
///
/// 数值退化 (零长度线段, 退化切向量, NaN 等) 不属于错误, 它们在计算中就地修复.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// 流线顶点数不足.
    ///
    /// 参数为实际顶点数.
    #[error("streamline has {0} vertices, at least 2 are required")]
    TooFewVertices(usize),

    /// 重复挂载采样插件.
    #[error("cannot attach a {attempted} plugin: a {existing} plugin is already attached")]
    PluginAlreadyAttached {
        /// 已挂载插件的类型.
        existing: PluginKind,
        /// 尝试挂载插件的类型.
        attempted: PluginKind,
    },

    /// 插件类型与对比度不匹配.
    #[error("cannot attach a {plugin} plugin unless the contrast depends on it (contrast: {contrast})")]
    PluginContrastMismatch {
        /// 当前对比度.
        contrast: Contrast,
        /// 尝试挂载插件的类型.
        plugin: PluginKind,
    },

    /// 插件针对的统计量与配置中的统计量不一致.
    #[error("plugin was built for track statistic {plugin}, but the configuration uses {config}")]
    PluginStatisticMismatch {
        /// 配置中的统计量.
        config: Statistic,
        /// 插件针对的统计量.
        plugin: Statistic,
    },

    /// 对比度需要采样插件, 但尚未挂载.
    #[error("contrast {0} requires an attached sampling plugin")]
    MissingPlugin(Contrast),

    /// 统计量不适用于该对比度.
    #[error("track statistic {statistic} cannot be used with contrast {contrast}")]
    StatisticNotApplicable {
        /// 当前对比度.
        contrast: Contrast,
        /// 当前统计量.
        statistic: Statistic,
    },

    /// 统计量不能用于逐顶点归约.
    #[error("track statistic {0} is not supported by the per-vertex reduction")]
    UnsupportedStatistic(Statistic),

    /// 端点统计量的输入值个数不是 2.
    #[error("endpoint statistic {statistic} requires exactly 2 values, got {actual}")]
    EndpointsCount {
        /// 当前统计量.
        statistic: Statistic,
        /// 实际收集到的值个数.
        actual: usize,
    },

    /// 平滑核宽度非法.
    #[error("smoothing FWHM must be finite and positive, got {0}")]
    InvalidFwhm(f64),

    /// 体素坐标到扫描仪坐标的仿射变换不可逆.
    #[error("voxel-to-scanner transform is singular")]
    SingularTransform,

    /// 无法识别的对比度名称.
    #[error("unknown contrast `{0}`")]
    UnknownContrast(String),

    /// 无法识别的统计量名称.
    #[error("unknown track statistic `{0}`")]
    UnknownStatistic(String),
}
