//! 曲率估计运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时.
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 累计时长 (微秒).
    #[inline]
    fn total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 单个 FWHM 取值下的误差与耗时统计.
#[derive(Clone, Debug)]
pub struct Profile {
    fwhm: f64,

    /// 处理的流线条数.
    tracks: u64,

    /// 处理的顶点总数.
    vertices: u64,

    /// 相对误差之和. 理论曲率为 0 的流线不计入.
    rel_err_sum: f64,
    rel_err_count: u64,
    rel_err_max: f64,

    /// 理论曲率为 0 的流线上, 估计值的最大绝对值.
    straight_max: f64,

    compute_time: AccTimer,
    real_time: AccTimer,

    /// 最耗时的单条流线.
    most: Option<Duration>,
}

impl Profile {
    /// 以平滑核半高全宽 `fwhm` 初始化.
    pub fn new(fwhm: f64) -> Self {
        Self {
            fwhm,
            tracks: 0,
            vertices: 0,
            rel_err_sum: 0.0,
            rel_err_count: 0,
            rel_err_max: 0.0,
            straight_max: 0.0,
            compute_time: AccTimer::new(),
            real_time: AccTimer::new(),
            most: None,
        }
    }

    /// 开始一次单条流线的计时.
    #[inline]
    pub fn track_start(&mut self) {
        self.compute_time.start();
    }

    /// 结束一次单条流线的计时, 并记录其估计值 `estimated` 与理论值 `expected`.
    pub fn track_elapsed(&mut self, vertices: usize, estimated: f64, expected: f64) {
        let d = self.compute_time.elapsed();
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
        self.tracks += 1;
        self.vertices += vertices as u64;

        if expected == 0.0 {
            self.straight_max = self.straight_max.max(estimated.abs());
        } else {
            let e = ((estimated - expected) / expected).abs();
            self.rel_err_sum += e;
            self.rel_err_count += 1;
            self.rel_err_max = self.rel_err_max.max(e);
        }
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 平滑核半高全宽.
    #[inline]
    pub fn get_fwhm(&self) -> f64 {
        self.fwhm
    }

    /// 处理的流线条数.
    #[inline]
    pub fn get_tracks(&self) -> u64 {
        self.tracks
    }

    /// 处理的顶点总数.
    #[inline]
    pub fn get_vertices(&self) -> u64 {
        self.vertices
    }

    /// 平均相对误差. 没有弯曲流线时返回 `None`.
    #[inline]
    pub fn get_avg_rel_err(&self) -> Option<f64> {
        match self.rel_err_count {
            0 => None,
            n => Some(self.rel_err_sum / n as f64),
        }
    }

    /// 最大相对误差.
    #[inline]
    pub fn get_max_rel_err(&self) -> f64 {
        self.rel_err_max
    }

    /// 直线上估计值的最大绝对值 (理论上为 0).
    #[inline]
    pub fn get_straight_max(&self) -> f64 {
        self.straight_max
    }

    /// 以微秒为单位获得曲率计算的总时间.
    #[inline]
    pub fn get_compute_time_us(&self) -> u64 {
        self.compute_time.total_us()
    }

    /// 以微秒为单位获得运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.total_us()
    }

    /// 以微秒为单位获得每个顶点的平均计算时间.
    #[inline]
    pub fn get_avg_vertex_time_us(&self) -> Option<f64> {
        match self.vertices {
            0 => None,
            v => Some(self.get_compute_time_us() as f64 / v as f64),
        }
    }

    /// 最耗时的单条流线. 如果不存在任务, 则返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_err() {
        let mut p = Profile::new(5.0);
        p.track_start();
        p.track_elapsed(10, 1.1, 1.0);
        p.track_start();
        p.track_elapsed(10, 0.7, 1.0);
        p.track_start();
        p.track_elapsed(4, 0.01, 0.0);
        let p = p.finish();

        assert_eq!(p.get_tracks(), 3);
        assert_eq!(p.get_vertices(), 24);
        assert!((p.get_avg_rel_err().unwrap() - 0.2).abs() < 1e-12);
        assert!((p.get_max_rel_err() - 0.3).abs() < 1e-12);
        assert_eq!(p.get_straight_max(), 0.01);
        assert!(p.get_most_time_consuming().is_some());
    }

    #[test]
    fn test_empty() {
        let p = Profile::new(1.0).finish();
        assert_eq!(p.get_avg_rel_err(), None);
        assert_eq!(p.get_avg_vertex_time_us(), None);
        assert_eq!(p.get_most_time_consuming(), None);
    }
}
