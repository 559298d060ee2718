//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx3d, Idx3dI32, Point3d, Vec3d};

pub use crate::geometry::{ImageGeometry, VoxelGeometry};
pub use crate::image::{ImageError, ScalarImage};
pub use crate::streamline::Streamline;

pub use crate::consts::DEFAULT_CURVATURE_FWHM;

pub use crate::mapping::{
    Contrast, CurvatureEstimator, FactorEngine, MappedTrack, MappingError, MappingResult,
    PluginKind, ScalarImagePlugin, ScalarPlugin, Statistic, TrackMapper, TwiConfig, Voxel,
    VoxelSet,
};
