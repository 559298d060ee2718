#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 将纤维追踪得到的流线映射到体素网格, 并为每条流线计算一个标量因子,
//! 供 track-weighted imaging 的图像累积步骤使用.
//!
//! 该 crate 只提供 `safe` 接口. 流线文件 (`.tck`) 的读写和最终图像的累积不在本 crate 范围内.
//!
//! # 注意
//!
//! 1. 所有坐标均为扫描仪 (世界) 坐标, 单位为毫米. 体素坐标由 [`ImageGeometry`] 换算.
//! 2. 数值退化 (重合顶点, NaN 采样值等) 在计算中就地修复, 不会报错;
//!   配置错误 (缺少插件, 统计量不适用等) 则通过 [`MappingError`] 返回.
//!
//! # 开发计划
//!
//! ### 流线体素化 ✅
//!
//! 顶点舍入到最近体素, 去重, 丢弃越界体素.
//!
//! 实现位于 `tck-berry/src/mapping/voxel.rs`.
//!
//! ### 对比度与统计量 ✅
//!
//! 流线密度, 弧长, 弧长倒数, 标量图采样 (含二值化), FOD 幅值, 曲率.
//! 逐顶点值可用 sum / min / max / mean / median / mean_nonzero 及四种端点统计量归约.
//!
//! 实现位于 `tck-berry/src/mapping/{contrast, statistic, factor}.rs`.
//!
//! ### 曲率估计 ✅
//!
//! 中心差分切向量, 退化切向量修补, 沿弧长的高斯平滑.
//!
//! 实现位于 `tck-berry/src/mapping/curvature.rs`.
//!
//! ### nii 标量图采样插件 ✅
//!
//! 最近体素查表. 图像外的顶点得到 NaN, 在归约时被忽略.
//!
//! 实现位于 `tck-berry/src/mapping/plugin.rs`, `tck-berry/src/image.rs`.
//!
//! ### 并行映射 ✅
//!
//! 每个工作线程持有独立的 [`FactorEngine`], 插件只读共享.
//!
//! ### FOD 幅值插件 ⌛️
//!
//! 目前只提供 [`ScalarPlugin`] trait, 球谐系数图像的读取与求值尚未实现.
//!
//! ### 三线性插值采样 ⌛️
//!
//! 当前插件只做最近体素查表.

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 可为负的三维体素索引. 越界体素也能表示.
pub type Idx3dI32 = (i32, i32, i32);

/// 扫描仪坐标系下的点 (单位: 毫米).
pub type Point3d = nalgebra::Point3<f64>;

/// 三维向量.
pub type Vec3d = nalgebra::Vector3<f64>;

pub mod consts;

pub mod geometry;
pub mod image;
pub mod mapping;
pub mod streamline;

pub use geometry::{ImageGeometry, VoxelGeometry};
pub use image::{ImageError, ScalarImage};
pub use mapping::{
    Contrast, FactorEngine, MappingError, MappingResult, ScalarPlugin, Statistic, TrackMapper,
    TwiConfig,
};
pub use streamline::Streamline;

pub mod prelude;
