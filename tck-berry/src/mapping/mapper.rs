//! 流线 -> (体素集合, 因子) 映射.

use super::voxel::{voxelise, voxelise_into, VoxelSet};
use super::{FactorEngine, MappingResult, ScalarPlugin, TwiConfig};
use crate::geometry::{ImageGeometry, VoxelGeometry};
use crate::image::ScalarImage;
use crate::streamline::Streamline;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 单条流线的映射结果.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MappedTrack {
    /// 流线在输入中的序号.
    pub index: usize,

    /// 流线经过的图像内体素.
    pub voxels: VoxelSet,

    /// 流线因子. 总是有限的.
    pub factor: f64,
}

/// 把流线映射到体素集合和因子.
///
/// 映射器自身持有一个 [`FactorEngine`], 用于串行映射; 并行映射时,
/// 每个工作线程会从它克隆出独立的实例.
#[derive(Debug, Clone)]
pub struct TrackMapper<G: VoxelGeometry + Clone = ImageGeometry> {
    geometry: G,
    engine: FactorEngine,
}

impl<G: VoxelGeometry + Clone> TrackMapper<G> {
    /// 以目标图像几何 `geometry` 和配置 `config` 构建.
    pub fn new(geometry: G, config: TwiConfig) -> MappingResult<Self> {
        Ok(Self {
            geometry,
            engine: FactorEngine::new(config)?,
        })
    }

    /// 挂载采样插件. 见 [`FactorEngine::attach_plugin`].
    pub fn attach_plugin(&mut self, plugin: Arc<dyn ScalarPlugin>) -> MappingResult<()> {
        self.engine.attach_plugin(plugin)
    }

    /// 挂载按配置统计量采样 `image` 的插件. 见 [`FactorEngine::attach_scalar_image`].
    pub fn attach_scalar_image(&mut self, image: Arc<ScalarImage>) -> MappingResult<()> {
        self.engine.attach_scalar_image(image)
    }

    /// 链式挂载采样插件.
    pub fn with_plugin(mut self, plugin: Arc<dyn ScalarPlugin>) -> MappingResult<Self> {
        self.attach_plugin(plugin)?;
        Ok(self)
    }

    /// 目标图像几何.
    #[inline]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// 配置.
    #[inline]
    pub fn config(&self) -> &TwiConfig {
        self.engine.config()
    }

    /// `tck` 经过的图像内体素.
    #[inline]
    pub fn voxelise(&self, tck: &Streamline) -> VoxelSet {
        voxelise(tck, &self.geometry)
    }

    /// `tck` 的因子. 见 [`FactorEngine::compute_factor`].
    #[inline]
    pub fn compute_factor(&mut self, tck: &Streamline) -> MappingResult<f64> {
        self.engine.compute_factor(tck)
    }

    /// 映射单条流线.
    pub fn map(&mut self, tck: &Streamline) -> MappingResult<MappedTrack> {
        map_with(&self.geometry, &mut self.engine, tck)
    }

    /// 串行映射全部流线, 结果与输入同序. 遇到第一个错误即返回.
    pub fn map_all(&mut self, tcks: &[Streamline]) -> MappingResult<Vec<MappedTrack>> {
        self.engine.check_ready()?;
        let mapped = tcks
            .iter()
            .map(|tck| self.map(tck))
            .collect::<MappingResult<Vec<_>>>()?;
        log::debug!("TrackMapper: mapped {} streamlines", mapped.len());
        Ok(mapped)
    }
}

#[inline]
fn map_with<G: VoxelGeometry + ?Sized>(
    geometry: &G,
    engine: &mut FactorEngine,
    tck: &Streamline,
) -> MappingResult<MappedTrack> {
    let factor = engine.compute_factor(tck)?;
    let mut voxels = VoxelSet::new();
    voxelise_into(tck, geometry, &mut voxels);
    Ok(MappedTrack {
        index: tck.index(),
        voxels,
        factor,
    })
}

/// 并发操作部分
#[cfg(feature = "rayon")]
impl<G: VoxelGeometry + Clone> TrackMapper<G> {
    /// 借助 `rayon`, 并行地映射全部流线, 结果与输入同序.
    ///
    /// 每个工作线程持有自己的 [`FactorEngine`] 克隆, 插件和几何信息只读共享.
    pub fn par_map(&self, tcks: &[Streamline]) -> MappingResult<Vec<MappedTrack>> {
        self.engine.check_ready()?;
        let mapped = tcks
            .par_iter()
            .map_init(
                || self.engine.clone(),
                |engine, tck| map_with(&self.geometry, engine, tck),
            )
            .collect::<MappingResult<Vec<_>>>()?;
        log::debug!("TrackMapper: mapped {} streamlines in parallel", mapped.len());
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Contrast, MappingError, ScalarImagePlugin, Statistic, Voxel};
    use ndarray::Array3;

    fn geometry() -> ImageGeometry {
        ImageGeometry::isotropic((10, 10, 10), 1.0).unwrap()
    }

    fn config(contrast: Contrast, statistic: Statistic) -> TwiConfig {
        TwiConfig::new(contrast, statistic).unwrap()
    }

    /// 沿 x 轴的直线, 起点 `(0, y, 0)`, 每 0.5 毫米一个顶点.
    fn line(index: usize, y: f64, n: usize) -> Streamline {
        let xyz: Vec<_> = (0..n).map(|i| [i as f64 * 0.5, y, 0.0]).collect();
        Streamline::from_xyz(index, &xyz).unwrap()
    }

    fn bundle() -> Vec<Streamline> {
        (0..32).map(|i| line(i, (i % 10) as f64, 5 + i % 7)).collect()
    }

    #[test]
    fn test_map_length() {
        let mut m = TrackMapper::new(geometry(), config(Contrast::Length, Statistic::Sum)).unwrap();
        let r = m.map(&line(3, 2.0, 5)).unwrap();
        assert_eq!(r.index, 3);
        assert_eq!(r.factor, 2.0);

        // x = 0, 0.5, 1.0, 1.5, 2.0 舍入到 0, 1, 1, 2, 2.
        let expected: VoxelSet = [0, 1, 2].into_iter().map(|i| Voxel::new(i, 2, 0)).collect();
        assert_eq!(r.voxels, expected);
        assert_eq!(m.voxelise(&line(3, 2.0, 5)), expected);
    }

    /// 完全在图像外的流线得到空体素集合, 但因子照常计算.
    #[test]
    fn test_map_outside() {
        let mut m = TrackMapper::new(geometry(), config(Contrast::TrackDensity, Statistic::Sum))
            .unwrap();
        let r = m.map(&line(0, -20.0, 4)).unwrap();
        assert!(r.voxels.is_empty());
        assert_eq!(r.factor, 1.0);
    }

    #[test]
    fn test_map_all_requires_plugin() {
        let mut m =
            TrackMapper::new(geometry(), config(Contrast::ScalarMap, Statistic::Mean)).unwrap();
        assert_eq!(
            m.map_all(&bundle()),
            Err(MappingError::MissingPlugin(Contrast::ScalarMap))
        );
        assert_eq!(m.map_all(&[]), Err(MappingError::MissingPlugin(Contrast::ScalarMap)));
    }

    #[test]
    fn test_map_all_scalar_image() {
        let data = Array3::from_shape_fn((10, 10, 10), |(_, j, _)| j as f32);
        let image = Arc::new(ScalarImage::from_array(data, geometry()).unwrap());
        let mut m =
            TrackMapper::new(geometry(), config(Contrast::ScalarMap, Statistic::Max)).unwrap();
        m.attach_scalar_image(image.clone()).unwrap();

        let tcks = bundle();
        let mapped = m.map_all(&tcks).unwrap();
        assert_eq!(mapped.len(), tcks.len());
        for (tck, r) in tcks.iter().zip(mapped.iter()) {
            assert_eq!(r.index, tck.index());
            assert_eq!(r.factor, (tck.index() % 10) as f64);
        }

        let plugin = Arc::new(ScalarImagePlugin::new(image, Statistic::Median));
        let other = TrackMapper::new(geometry(), config(Contrast::ScalarMap, Statistic::Max))
            .unwrap()
            .with_plugin(plugin);
        assert!(matches!(
            other,
            Err(MappingError::PluginStatisticMismatch { .. })
        ));
    }

    /// 并行结果与串行结果完全一致.
    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_map_matches_serial() {
        let _ = simple_logger::init_with_level(log::Level::Debug);

        let config = config(Contrast::Curvature, Statistic::Mean)
            .with_curvature_fwhm(1.0)
            .unwrap();
        let mut m = TrackMapper::new(geometry(), config).unwrap();
        let tcks: Vec<_> = (0..64)
            .map(|i| {
                let r = 1.0 + (i % 4) as f64;
                let xyz: Vec<_> = (0..20)
                    .map(|s| {
                        let t = s as f64 * 0.2;
                        [5.0 + r * t.cos(), 5.0 + r * t.sin(), 0.1 * i as f64]
                    })
                    .collect();
                Streamline::from_xyz(i, &xyz).unwrap()
            })
            .collect();

        let serial = m.map_all(&tcks).unwrap();
        let parallel = m.par_map(&tcks).unwrap();
        assert_eq!(serial, parallel);
        assert!(parallel.iter().all(|r| r.factor.is_finite() && r.factor > 0.0));
    }
}
