//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AblationResult;
use std::thread;
use tck_berry::prelude::*;
use utils::synth::{self, Synthetic};

/// 默认参与比较的 FWHM 取值 (毫米).
const DEFAULT_FWHMS: [f64; 5] = [1.0, 2.5, 5.0, 10.0, 20.0];

/// 合成数据集: 一束螺旋线 + 若干直线.
fn dataset() -> Vec<Synthetic> {
    let n = utils::env_or("TCK_ABLATION_VERTICES", 200usize).max(2);
    let step = utils::env_or("TCK_ABLATION_STEP", 0.5f64);

    let radii = [2.0, 5.0, 10.0, 20.0, 40.0];
    let pitches = [0.0, 1.0, 4.0];
    let mut data = synth::helix_bundle(&radii, &pitches, n, step);
    let offset = data.len();
    data.extend((0..4).map(|i| synth::straight(offset + i, n, step)));
    data
}

/// 用 FWHM 为 `fwhm` 的曲率估计处理全部流线. 流线因子取逐顶点曲率的中位数.
fn estimate(fwhm: f64, data: &[Synthetic]) -> MappingResult<Profile> {
    let config =
        TwiConfig::new(Contrast::Curvature, Statistic::Median)?.with_curvature_fwhm(fwhm)?;
    let mut engine = FactorEngine::new(config)?;
    let mut profile = Profile::new(fwhm);

    for s in data {
        profile.track_start();
        let k = engine.compute_factor(&s.tck)?;
        profile.track_elapsed(s.tck.len(), k, s.curvature);
        log::trace!(
            "fwhm {fwhm}: track {} => {k:.6} (expected {:.6})",
            s.tck.index(),
            s.curvature
        );
    }
    log::info!("fwhm {fwhm}: {} tracks done", profile.get_tracks());
    Ok(profile.finish())
}

/// 实际运行.
pub fn run() -> MappingResult<AblationResult> {
    let fwhms = utils::env_list_or("TCK_ABLATION_FWHMS", &DEFAULT_FWHMS);
    let data = dataset();
    log::info!(
        "Running curvature ablation: {} tracks, {} FWHM values, {} cpus",
        data.len(),
        fwhms.len(),
        utils::cpus()
    );

    // 每个 FWHM 一个线程, 每个线程持有自己的 `FactorEngine`.
    let profiles = thread::scope(|s| {
        let data = data.as_slice();
        let handles: Vec<_> = fwhms
            .iter()
            .map(|&fwhm| s.spawn(move || estimate(fwhm, data)))
            .collect();
        handles
            .into_iter()
            .map(|th| th.join().expect("Thread joining error"))
            .collect::<MappingResult<Vec<_>>>()
    })?;

    Ok(AblationResult::from_iter(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 小平滑核下, 大半径螺旋线的曲率估计接近理论值.
    #[test]
    fn test_small_fwhm_accurate() {
        let data = vec![
            synth::helix(0, 20.0, 0.0, 200, 0.5),
            synth::straight(1, 50, 0.5),
        ];
        let p = estimate(1.0, &data).unwrap();
        assert_eq!(p.get_tracks(), 2);
        assert!(p.get_max_rel_err() < 0.05, "{}", p.get_max_rel_err());
        assert_eq!(p.get_straight_max(), 0.0);
    }

    #[test]
    fn test_invalid_fwhm() {
        assert_eq!(
            estimate(0.0, &[]).unwrap_err(),
            MappingError::InvalidFwhm(0.0)
        );
    }
}
