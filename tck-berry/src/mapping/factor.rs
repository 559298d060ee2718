//! 逐流线因子的计算.

use super::curvature::CurvatureEstimator;
use super::statistic;
use super::{
    Contrast, FactorSource, MappingError, MappingResult, ScalarImagePlugin, ScalarPlugin,
    TwiConfig, VertexSource,
};
use crate::image::ScalarImage;
use crate::streamline::Streamline;
use std::sync::Arc;

/// 因子计算引擎.
///
/// 引擎持有逐顶点值和曲率估计的临时缓冲区, 每次调用都会覆盖它们.
/// 多线程并行时, 每个工作线程应持有自己的实例 (例如通过 `clone` 得到);
/// 克隆出的实例共享同一个只读插件.
#[derive(Debug, Clone)]
pub struct FactorEngine {
    config: TwiConfig,
    plugin: Option<Arc<dyn ScalarPlugin>>,

    /// 逐顶点值. 每次调用开始时清空.
    factors: Vec<f64>,
    curvature: CurvatureEstimator,
}

impl FactorEngine {
    /// 以配置 `config` 构建引擎. 此时尚未挂载插件.
    pub fn new(config: TwiConfig) -> MappingResult<Self> {
        config.validate()?;
        log::debug!(
            "FactorEngine::new contrast {}, statistic {}",
            config.contrast(),
            config.statistic()
        );
        Ok(Self {
            config,
            plugin: None,
            factors: Vec::with_capacity(64),
            curvature: CurvatureEstimator::new(config.curvature_fwhm())?,
        })
    }

    /// 挂载采样插件.
    ///
    /// 以下情况返回 `Err`:
    ///
    /// 1. 已经挂载过插件;
    /// 2. 插件类型与对比度不匹配;
    /// 3. 插件针对的统计量与配置中的统计量不一致.
    pub fn attach_plugin(&mut self, plugin: Arc<dyn ScalarPlugin>) -> MappingResult<()> {
        let attempted = plugin.kind();
        if let Some(existing) = &self.plugin {
            return Err(MappingError::PluginAlreadyAttached {
                existing: existing.kind(),
                attempted,
            });
        }
        if self.config.contrast().plugin_kind() != Some(attempted) {
            return Err(MappingError::PluginContrastMismatch {
                contrast: self.config.contrast(),
                plugin: attempted,
            });
        }
        if let Some(statistic) = plugin.statistic() {
            if statistic != self.config.statistic() {
                return Err(MappingError::PluginStatisticMismatch {
                    config: self.config.statistic(),
                    plugin: statistic,
                });
            }
        }
        log::debug!("FactorEngine: attached {attempted} plugin");
        self.plugin = Some(plugin);
        Ok(())
    }

    /// 以配置中的统计量构建 [`ScalarImagePlugin`] 并挂载.
    pub fn attach_scalar_image(&mut self, image: Arc<ScalarImage>) -> MappingResult<()> {
        let plugin = ScalarImagePlugin::new(image, self.config.statistic());
        self.attach_plugin(Arc::new(plugin))
    }

    /// 配置.
    #[inline]
    pub fn config(&self) -> &TwiConfig {
        &self.config
    }

    /// 是否已挂载插件.
    #[inline]
    pub fn has_plugin(&self) -> bool {
        self.plugin.is_some()
    }

    /// 检查引擎是否已可用: 需要插件的对比度必须已挂载插件.
    pub fn check_ready(&self) -> MappingResult<()> {
        match self.config.contrast().plugin_kind() {
            Some(_) if self.plugin.is_none() => {
                Err(MappingError::MissingPlugin(self.config.contrast()))
            }
            _ => Ok(()),
        }
    }

    /// 计算 `tck` 的因子. 返回值总是有限的.
    ///
    /// # 错误
    ///
    /// 1. 对比度需要插件但未挂载;
    /// 2. 端点统计量收集到的值个数不是 2.
    pub fn compute_factor(&mut self, tck: &Streamline) -> MappingResult<f64> {
        let contrast = self.config.contrast();
        let factor = match contrast.source() {
            FactorSource::Unit => 1.0,
            FactorSource::Length => tck.length(),
            FactorSource::InverseLength => 1.0 / tck.length(),
            FactorSource::PerVertex(source) => {
                self.load_factors(source, tck)?;
                statistic::reduce(self.config.statistic(), &mut self.factors)?
            }
        };

        // NaN 也视为非零.
        let factor = match contrast {
            Contrast::ScalarMapBinary if factor != 0.0 => 1.0,
            Contrast::ScalarMapBinary => 0.0,
            _ => factor,
        };

        Ok(if factor.is_finite() { factor } else { 0.0 })
    }

    /// 最近一次计算中收集到的逐顶点值. 对 `Median` 而言顺序已被部分打乱.
    #[inline]
    pub fn factors(&self) -> &[f64] {
        self.factors.as_slice()
    }

    fn load_factors(&mut self, source: VertexSource, tck: &Streamline) -> MappingResult<()> {
        self.factors.clear();
        self.factors.reserve(tck.len());
        match source {
            VertexSource::Plugin(_) => {
                let plugin = self
                    .plugin
                    .as_ref()
                    .ok_or(MappingError::MissingPlugin(self.config.contrast()))?;
                plugin.load_factors(tck, &mut self.factors);
            }
            VertexSource::Curvature => self.curvature.estimate(tck, &mut self.factors),
        }
        Ok(())
    }
}
