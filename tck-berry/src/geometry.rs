//! 扫描仪坐标与体素坐标之间的变换, 以及图像边界.

use crate::mapping::{MappingError, MappingResult, Voxel};
use crate::{Idx3d, Point3d};
use nalgebra::{Matrix3, Matrix4, Vector3};
use nifti::NiftiHeader;

/// 体素化所需的几何接口.
///
/// 实现者需要能被多个工作线程同时只读访问.
pub trait VoxelGeometry: Send + Sync {
    /// 将扫描仪坐标 `p` 变换为 (连续的) 体素坐标.
    fn scanner_to_voxel(&self, p: &Point3d) -> Point3d;

    /// 体素 `v` 是否在图像范围内.
    fn in_bounds(&self, v: &Voxel) -> bool;

    /// 将扫描仪坐标 `p` 舍入到最近的体素. 不检查边界.
    ///
    /// 变换后坐标非有限时返回 `None`.
    #[inline]
    fn nearest_voxel(&self, p: &Point3d) -> Option<Voxel> {
        Voxel::round(&self.scanner_to_voxel(p))
    }
}

/// 图像网格几何: 三个维度的体素个数 + 体素到扫描仪坐标的仿射变换.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGeometry {
    /// `[i, j, k]` 三个方向的体素个数.
    dims: Idx3d,

    voxel_to_scanner: Matrix4<f64>,

    /// `voxel_to_scanner` 的逆, 构建时计算一次.
    scanner_to_voxel: Matrix4<f64>,
}

impl ImageGeometry {
    /// 由体素个数 `dims` 和体素到扫描仪坐标的仿射矩阵 `affine` 构建.
    ///
    /// 若 `affine` 不可逆, 则返回 `Err`.
    pub fn from_affine(dims: Idx3d, affine: Matrix4<f64>) -> MappingResult<Self> {
        let scanner_to_voxel = affine
            .try_inverse()
            .ok_or(MappingError::SingularTransform)?;
        Ok(Self {
            dims,
            voxel_to_scanner: affine,
            scanner_to_voxel,
        })
    }

    /// 各向同性, 原点为 0 的网格. 体素边长为 `voxel_size` (单位: 毫米).
    pub fn isotropic(dims: Idx3d, voxel_size: f64) -> MappingResult<Self> {
        let mut affine = Matrix4::identity();
        for i in 0..3 {
            affine[(i, i)] = voxel_size;
        }
        Self::from_affine(dims, affine)
    }

    /// 按 NIfTI 约定从 header 中获取几何信息.
    ///
    /// 1. `sform_code > 0` 时使用 `srow_{x, y, z}`;
    /// 2. 否则 `qform_code > 0` 时使用四元数 `quatern_{b, c, d}`, 平移 `quatern_{x, y, z}` 和 `pixdim`;
    /// 3. 否则仅按 `pixdim` 缩放.
    pub fn from_header(header: &NiftiHeader) -> MappingResult<Self> {
        let [_, i, j, k, ..] = header.dim;
        let dims = (i as usize, j as usize, k as usize);

        let affine = if header.sform_code > 0 {
            sform_affine(header)
        } else if header.qform_code > 0 {
            qform_affine(header)
        } else {
            let [_, pi, pj, pk, ..] = header.pixdim;
            let mut affine = Matrix4::identity();
            affine[(0, 0)] = pi as f64;
            affine[(1, 1)] = pj as f64;
            affine[(2, 2)] = pk as f64;
            affine
        };
        log::debug!("ImageGeometry::from_header dims {dims:?}, affine {affine}");
        Self::from_affine(dims, affine)
    }

    /// `[i, j, k]` 三个方向的体素个数.
    #[inline]
    pub fn dims(&self) -> Idx3d {
        self.dims
    }

    /// 体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        let (i, j, k) = self.dims;
        i * j * k
    }

    /// 三个体素轴方向的体素边长 (单位: 毫米).
    pub fn voxel_sizes(&self) -> [f64; 3] {
        let m = self.voxel_to_scanner.fixed_view::<3, 3>(0, 0);
        [m.column(0).norm(), m.column(1).norm(), m.column(2).norm()]
    }

    /// 体素到扫描仪坐标的仿射矩阵.
    #[inline]
    pub fn voxel_to_scanner(&self) -> &Matrix4<f64> {
        &self.voxel_to_scanner
    }

    /// 体素中心的扫描仪坐标.
    #[inline]
    pub fn voxel_center(&self, v: &Voxel) -> Point3d {
        let (i, j, k) = v.as_tuple();
        self.voxel_to_scanner
            .transform_point(&Point3d::new(i as f64, j as f64, k as f64))
    }
}

impl VoxelGeometry for ImageGeometry {
    #[inline]
    fn scanner_to_voxel(&self, p: &Point3d) -> Point3d {
        self.scanner_to_voxel.transform_point(p)
    }

    #[inline]
    fn in_bounds(&self, v: &Voxel) -> bool {
        v.to_index().is_some_and(|(i, j, k)| {
            let (di, dj, dk) = self.dims;
            i < di && j < dj && k < dk
        })
    }
}

fn sform_affine(header: &NiftiHeader) -> Matrix4<f64> {
    let mut affine = Matrix4::identity();
    for (r, row) in [header.srow_x, header.srow_y, header.srow_z].iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            affine[(r, c)] = *v as f64;
        }
    }
    affine
}

fn qform_affine(header: &NiftiHeader) -> Matrix4<f64> {
    let (b, c, d) = (
        header.quatern_b as f64,
        header.quatern_c as f64,
        header.quatern_d as f64,
    );
    let rotation = quaternion_rotation(b, c, d);

    let [qfac, pi, pj, pk, ..] = header.pixdim;
    // pixdim[0] 只应为 -1 或 1, 其它值按 1 处理.
    let qfac = if qfac < 0.0 { -1.0 } else { 1.0 };
    let scale = Vector3::new(pi as f64, pj as f64, qfac * pk as f64);

    let mut affine = Matrix4::identity();
    for col in 0..3 {
        for row in 0..3 {
            affine[(row, col)] = rotation[(row, col)] * scale[col];
        }
    }
    affine[(0, 3)] = header.quatern_x as f64;
    affine[(1, 3)] = header.quatern_y as f64;
    affine[(2, 3)] = header.quatern_z as f64;
    affine
}

/// 由单位四元数的 `(b, c, d)` 分量求旋转矩阵. `a` 由归一化条件推出.
fn quaternion_rotation(b: f64, c: f64, d: f64) -> Matrix3<f64> {
    let mut a = 1.0 - (b * b + c * c + d * d);
    let (mut b, mut c, mut d) = (b, c, d);
    if a < 1e-7 {
        // 数值上 a ≈ 0, 重新归一化 (b, c, d).
        let n = (b * b + c * c + d * d).sqrt();
        (b, c, d) = (b / n, c / n, d / n);
        a = 0.0;
    } else {
        a = a.sqrt();
    }

    Matrix3::new(
        a * a + b * b - c * c - d * d,
        2.0 * (b * c - a * d),
        2.0 * (b * d + a * c),
        2.0 * (b * c + a * d),
        a * a + c * c - b * b - d * d,
        2.0 * (c * d - a * b),
        2.0 * (b * d - a * c),
        2.0 * (c * d + a * b),
        a * a + d * d - c * c - b * b,
    )
}
