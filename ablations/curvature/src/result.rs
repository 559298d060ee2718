//! 实验结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `fwhm = {} mm`:", p.get_fwhm())?;
    writeln!(w, "{S4}Tracks: {}", p.get_tracks())?;
    writeln!(w, "{S4}Vertices: {}", p.get_vertices())?;
    writeln!(
        w,
        "{S4}Average relative error: {}",
        f64_to_display(p.get_avg_rel_err())
    )?;
    writeln!(w, "{S4}Max relative error: {:.6}", p.get_max_rel_err())?;
    writeln!(
        w,
        "{S4}Max curvature on straight tracks: {:.6}",
        p.get_straight_max()
    )?;
    writeln!(w, "{S4}Effective total time: {} us", p.get_compute_time_us())?;
    writeln!(
        w,
        "{S4}Effective average time: {} us per vertex",
        f64_to_display(p.get_avg_vertex_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming track costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果. 按 FWHM 排列.
pub struct AblationResult {
    data: Vec<Profile>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = Profile>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 平均相对误差最小的 FWHM.
    pub fn best_fwhm(&self) -> Option<f64> {
        self.data
            .iter()
            .filter_map(|p| Some((p.get_fwhm(), p.get_avg_rel_err()?)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(fwhm, _)| fwhm)
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut w = stdout.lock();
        utils::sep_to(&mut w)?;
        for profile in self.data.iter() {
            describe_into(profile, &mut w)?;
            writeln!(w)?;
            utils::sep_to(&mut w)?;
        }
        if let Some(fwhm) = self.best_fwhm() {
            writeln!(w, "Lowest average relative error at fwhm = {fwhm} mm")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(fwhm: f64, estimated: f64) -> Profile {
        let mut p = Profile::new(fwhm);
        p.track_start();
        p.track_elapsed(3, estimated, 1.0);
        p.finish()
    }

    #[test]
    fn test_best_fwhm() {
        let r = AblationResult::from_iter([
            profile(1.0, 1.2),
            profile(5.0, 0.95),
            profile(10.0, 0.5),
        ]);
        assert_eq!(r.best_fwhm(), Some(5.0));
        assert_eq!(AblationResult::from_iter([]).best_fwhm(), None);

        let mut buf = vec![];
        describe_into(&r.data[1], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Profile `fwhm = 5 mm`"));
    }
}
