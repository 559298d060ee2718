//! 消融实验依赖的通用组件.

use std::env;
use std::str::FromStr;

pub mod synth;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep_to<W: std::io::Write>(mut w: W) -> std::io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

/// 从环境变量 `key` 读取参数. 变量不存在或无法解析时返回 `default`.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 从环境变量 `key` 读取以逗号分隔的参数列表.
/// 变量不存在, 或任一项无法解析时返回 `default`.
pub fn env_list_or<T: FromStr>(key: &str, default: &[T]) -> Vec<T>
where
    T: Clone,
{
    env::var(key)
        .ok()
        .and_then(|v| {
            v.split(',')
                .map(|s| s.trim().parse().ok())
                .collect::<Option<Vec<T>>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_missing() {
        assert_eq!(env_or("TCK_UTILS_SURELY_UNSET_VAR", 7usize), 7);
        assert_eq!(
            env_list_or("TCK_UTILS_SURELY_UNSET_VAR", &[1.0, 2.5]),
            vec![1.0, 2.5]
        );
    }

    #[test]
    fn test_sep_to() {
        let mut buf = vec![];
        sep_to(&mut buf).unwrap();
        assert_eq!(buf.len(), SEP.len() + 1);
    }
}
