//! 逐顶点标量采样插件.

use super::Statistic;
use crate::geometry::VoxelGeometry;
use crate::image::ScalarImage;
use crate::streamline::Streamline;
use crate::Point3d;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 采样插件的类型.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PluginKind {
    /// 标量图采样.
    ScalarImage,

    /// FOD 幅值采样.
    FodImage,
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PluginKind::ScalarImage => "scalar image",
            PluginKind::FodImage => "FOD image",
        })
    }
}

/// 给定流线, 为其顶点提供标量值的插件.
///
/// 同一插件实例会被多个工作线程同时只读使用.
pub trait ScalarPlugin: Send + Sync {
    /// 插件类型.
    fn kind(&self) -> PluginKind;

    /// 插件构建时所针对的逐流线统计量. 采样方式与统计量无关时返回 `None`.
    ///
    /// 返回 `Some` 时, 它必须与引擎配置中的统计量一致, 否则挂载失败.
    fn statistic(&self) -> Option<Statistic> {
        None
    }

    /// 将 `tck` 的逐顶点值追加到 `factors`.
    ///
    /// 值可以是非有限的 (例如顶点在图像外), 归约时会被容忍.
    fn load_factors(&self, tck: &Streamline, factors: &mut Vec<f64>);
}

impl fmt::Debug for dyn ScalarPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarPlugin({})", self.kind())
    }
}

/// 以最近体素查表的方式对标量图采样的插件.
///
/// 若统计量为端点统计量, 则只采样两个端点. 图像外的顶点值为 NaN.
#[derive(Debug, Clone)]
pub struct ScalarImagePlugin {
    image: Arc<ScalarImage>,
    statistic: Statistic,
}

impl ScalarImagePlugin {
    /// 以图像 `image` 和逐流线统计量 `statistic` 构建.
    pub fn new(image: Arc<ScalarImage>, statistic: Statistic) -> Self {
        Self { image, statistic }
    }

    /// 被采样的图像.
    #[inline]
    pub fn image(&self) -> &ScalarImage {
        &self.image
    }

    /// 顶点 `p` 处的值. 非有限坐标或图像外的顶点得到 NaN.
    #[inline]
    fn sample(&self, p: &Point3d) -> f64 {
        self.image
            .geometry()
            .nearest_voxel(p)
            .and_then(|v| self.image.value_at(&v))
            .map_or(f64::NAN, f64::from)
    }
}

impl ScalarPlugin for ScalarImagePlugin {
    #[inline]
    fn kind(&self) -> PluginKind {
        PluginKind::ScalarImage
    }

    #[inline]
    fn statistic(&self) -> Option<Statistic> {
        Some(self.statistic)
    }

    fn load_factors(&self, tck: &Streamline, factors: &mut Vec<f64>) {
        if self.statistic.is_endpoints() {
            factors.push(self.sample(tck.front()));
            factors.push(self.sample(tck.back()));
        } else {
            factors.extend(tck.points().iter().map(|p| self.sample(p)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageGeometry;
    use ndarray::Array3;

    fn ramp_image() -> Arc<ScalarImage> {
        // value = i + 10 * j + 100 * k
        let data = Array3::from_shape_fn((4, 4, 4), |(i, j, k)| (i + 10 * j + 100 * k) as f32);
        let g = ImageGeometry::isotropic((4, 4, 4), 1.0).unwrap();
        Arc::new(ScalarImage::from_array(data, g).unwrap())
    }

    fn tck() -> Streamline {
        Streamline::from_xyz(
            0,
            &[[0.0, 0.0, 0.0], [1.1, 0.0, 0.0], [1.0, 2.0, 0.0], [9.0, 0.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_every_vertex() {
        let plugin = ScalarImagePlugin::new(ramp_image(), Statistic::Mean);
        assert_eq!(plugin.kind(), PluginKind::ScalarImage);

        let mut f = vec![];
        plugin.load_factors(&tck(), &mut f);
        assert_eq!(f.len(), 4);
        assert_eq!(&f[..3], &[0.0, 1.0, 21.0]);
        assert!(f[3].is_nan());
    }

    #[test]
    fn test_sample_endpoints_only() {
        let plugin = ScalarImagePlugin::new(ramp_image(), Statistic::EndpointsMax);
        let mut f = vec![];
        plugin.load_factors(&tck(), &mut f);
        assert_eq!(f.len(), 2);
        assert_eq!(f[0], 0.0);
        assert!(f[1].is_nan());
        assert_eq!(plugin.statistic(), Some(Statistic::EndpointsMax));
    }

    /// 非有限坐标的顶点不会被当作体素 (0, 0, 0) 采样.
    #[test]
    fn test_sample_non_finite_vertex() {
        let plugin = ScalarImagePlugin::new(ramp_image(), Statistic::Mean);
        let tck = Streamline::from_xyz(0, &[[f64::NAN; 3], [1.0, 1.0, 1.0]]).unwrap();
        let mut f = vec![];
        plugin.load_factors(&tck, &mut f);
        assert!(f[0].is_nan());
        assert_eq!(f[1], 111.0);
    }
}
