//! 流线体素化.

use crate::geometry::VoxelGeometry;
use crate::streamline::Streamline;
use crate::{Idx3d, Idx3dI32, Point3d};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 体素网格上的整数坐标 `(i, j, k)`. 可能为负 (越界).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Voxel(i32, i32, i32);

/// 一条流线经过的体素集合. 无重复.
pub type VoxelSet = BTreeSet<Voxel>;

impl Voxel {
    /// 构建.
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self(i, j, k)
    }

    /// 将连续体素坐标 `p` 舍入到最近的整数体素 (0.5 远离 0 舍入).
    ///
    /// 任一分量非有限时返回 `None`.
    #[inline]
    pub fn round(p: &Point3d) -> Option<Self> {
        p.coords
            .iter()
            .all(|c| c.is_finite())
            .then(|| Self(p.x.round() as i32, p.y.round() as i32, p.z.round() as i32))
    }

    /// `(i, j, k)`.
    #[inline]
    pub const fn as_tuple(&self) -> Idx3dI32 {
        (self.0, self.1, self.2)
    }

    /// 转换为非负索引. 任一分量为负时返回 `None`.
    #[inline]
    pub fn to_index(&self) -> Option<Idx3d> {
        Some((
            usize::try_from(self.0).ok()?,
            usize::try_from(self.1).ok()?,
            usize::try_from(self.2).ok()?,
        ))
    }
}

impl From<Idx3dI32> for Voxel {
    #[inline]
    fn from((i, j, k): Idx3dI32) -> Self {
        Self(i, j, k)
    }
}

/// 将 `tck` 经过的图像内体素插入 `voxels`.
///
/// 只对顶点采样: 每个顶点变换到体素坐标后舍入, 若在图像内则插入.
/// 顶点之间的线段不做插值, 因此稀疏采样的流线可能跳过体素;
/// 需要连续覆盖的调用方应先对流线重采样. 越界或坐标非有限的顶点被静默忽略.
pub fn voxelise_into<G: VoxelGeometry + ?Sized>(
    tck: &Streamline,
    geometry: &G,
    voxels: &mut VoxelSet,
) {
    for p in tck.points() {
        match geometry.nearest_voxel(p) {
            Some(v) if geometry.in_bounds(&v) => {
                voxels.insert(v);
            }
            _ => {}
        }
    }
}

/// 获取 `tck` 经过的图像内体素集合.
#[inline]
pub fn voxelise<G: VoxelGeometry + ?Sized>(tck: &Streamline, geometry: &G) -> VoxelSet {
    let mut voxels = VoxelSet::new();
    voxelise_into(tck, geometry, &mut voxels);
    voxels
}
