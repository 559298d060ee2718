//! 流线映射: 体素化与逐流线因子计算.
//!
//! 对每条流线, 给出它经过的体素集合和一个标量因子. 因子由对比度决定,
//! 逐顶点对比度还需要用统计量归约为一个数.

mod config;
mod contrast;
mod curvature;
mod error;
mod factor;
mod mapper;
mod plugin;
pub mod statistic;
mod voxel;

pub use config::TwiConfig;
pub use contrast::{Contrast, FactorSource, Statistic, VertexSource};
pub use curvature::CurvatureEstimator;
pub use error::MappingError;
pub use factor::FactorEngine;
pub use mapper::{MappedTrack, TrackMapper};
pub use plugin::{PluginKind, ScalarImagePlugin, ScalarPlugin};
pub use voxel::{voxelise, voxelise_into, Voxel, VoxelSet};

/// 流线映射运行时错误.
pub type MappingResult<T> = Result<T, MappingError>;
