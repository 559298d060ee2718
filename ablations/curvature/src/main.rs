//! 曲率估计平滑核宽度 (FWHM) 的消融实验.
//!
//! 在已知曲率的合成螺旋线和直线上比较不同 FWHM 下的误差与耗时.
//! 参数通过环境变量调整:
//!
//! - `TCK_ABLATION_FWHMS`: 逗号分隔的 FWHM 列表 (毫米);
//! - `TCK_ABLATION_VERTICES`: 每条流线的顶点数;
//! - `TCK_ABLATION_STEP`: 顶点间距 (毫米).

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    match runner::run() {
        Ok(result) => result.analyze().unwrap(),
        Err(e) => {
            log::error!("curvature ablation failed: {e}");
            std::process::exit(1);
        }
    }
}
