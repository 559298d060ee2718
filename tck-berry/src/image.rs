//! nii 格式 3D 标量图.

use crate::geometry::ImageGeometry;
use crate::mapping::{MappingError, Voxel};
use crate::Idx3d;
use ndarray::{Array3, ArrayView3, Ix3};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::path::Path;
use thiserror::Error;

/// 加载标量图的错误.
#[derive(Debug, Error)]
pub enum ImageError {
    /// nifti 文件读取或解码失败.
    #[error(transparent)]
    Nifti(#[from] nifti::NiftiError),

    /// 数据不是三维的. 参数为实际维数.
    #[error("expected a 3D volume, got {0} dimensions")]
    NotVolume3d(usize),

    /// 数据形状与几何信息不一致.
    #[error("data shape {data:?} does not match geometry dims {geometry:?}")]
    ShapeMismatch {
        /// 数据形状.
        data: Idx3d,
        /// 几何信息中的体素个数.
        geometry: Idx3d,
    },

    /// header 中的几何信息非法.
    #[error(transparent)]
    Geometry(#[from] MappingError),
}

/// 3D 标量图, 包括几何信息和体素值. 体素值以 `f32` 保存, 按 `[i, j, k]` 访问.
#[derive(Debug, Clone)]
pub struct ScalarImage {
    geometry: ImageGeometry,
    data: Array3<f32>,
}

impl ScalarImage {
    /// 打开 nii 文件格式的 3D 标量图. `path` 为 nii 文件 (可为 `.nii.gz`) 的本地路径.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let geometry = ImageGeometry::from_header(obj.header())?;

        // nifti 数据本身以 [i, j, k] 组织, 无需转置.
        let data = obj.into_volume().into_ndarray::<f32>()?;
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| ImageError::NotVolume3d(ndim))?;

        Self::from_array(data, geometry)
    }

    /// 根据体素值 `data` 和几何信息 `geometry` 直接创建.
    ///
    /// 如果 `data` 的形状与 `geometry` 不一致, 则返回 `Err`.
    pub fn from_array(data: Array3<f32>, geometry: ImageGeometry) -> Result<Self, ImageError> {
        if data.dim() != geometry.dims() {
            return Err(ImageError::ShapeMismatch {
                data: data.dim(),
                geometry: geometry.dims(),
            });
        }
        Ok(Self { geometry, data })
    }

    /// 几何信息.
    #[inline]
    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// 体素 `v` 的值. 越界时返回 `None`.
    #[inline]
    pub fn value_at(&self, v: &Voxel) -> Option<f32> {
        self.data.get(v.to_index()?).copied()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }
}
