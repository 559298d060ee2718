//! 流线: 纤维追踪输出的离散三维折线.

use crate::consts::MIN_STREAMLINE_VERTICES;
use crate::mapping::{MappingError, MappingResult};
use crate::Point3d;

/// 扫描仪 (世界) 坐标系下的一条流线.
///
/// 创建后不可变. `index` 标识其在追踪结果文件中的序号, 便于将输出对应回原流线.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    index: usize,
    points: Vec<Point3d>,
}

impl Streamline {
    /// 以序号 `index` 和顶点 `points` 构建流线.
    ///
    /// 顶点数小于 2 的流线是退化的, 返回 `Err`.
    pub fn new(index: usize, points: Vec<Point3d>) -> MappingResult<Self> {
        if points.len() < MIN_STREAMLINE_VERTICES {
            return Err(MappingError::TooFewVertices(points.len()));
        }
        Ok(Self { index, points })
    }

    /// 由 `[x, y, z]` 数组构建流线.
    pub fn from_xyz(index: usize, xyz: &[[f64; 3]]) -> MappingResult<Self> {
        Self::new(index, xyz.iter().map(|&p| Point3d::from(p)).collect())
    }

    /// 流线序号.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// 顶点个数. 总是不小于 2.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 全部顶点.
    #[inline]
    pub fn points(&self) -> &[Point3d] {
        self.points.as_slice()
    }

    /// 起点.
    #[inline]
    pub fn front(&self) -> &Point3d {
        &self.points[0]
    }

    /// 终点.
    #[inline]
    pub fn back(&self) -> &Point3d {
        &self.points[self.points.len() - 1]
    }

    /// 相邻顶点之间的线段长度, 共 `len() - 1` 个.
    #[inline]
    pub fn segment_lengths(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm())
    }

    /// 流线弧长, 即各线段长度之和.
    #[inline]
    pub fn length(&self) -> f64 {
        self.segment_lengths().sum()
    }

    /// 顶点顺序反转后的流线. 序号不变.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            index: self.index,
            points,
        }
    }
}

impl std::ops::Index<usize> for Streamline {
    type Output = Point3d;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}
