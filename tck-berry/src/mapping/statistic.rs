//! 逐顶点值的统计量归约.
//!
//! 每个统计量对应一个独立的归约函数. 除 `Median` 外, 所有归约都只读取输入;
//! `Median` 会对输入做部分重排.

use super::{MappingError, MappingResult, Statistic};
use crate::consts::ENDPOINT_VALUES;
use num::traits::float::FloatCore;
use num::Float;
use ordered_float::OrderedFloat;

/// 用 `statistic` 将 `values` 归约为一个数.
///
/// 返回值可能是非有限的 (例如 `Min` 在没有任何有限值时为 `+∞`),
/// 规范化由调用方完成.
///
/// # 错误
///
/// 1. `GaussianSmoothed` 不能用于逐顶点归约.
/// 2. 端点统计量要求 `values` 恰好有两个值.
pub fn reduce<T>(statistic: Statistic, values: &mut [T]) -> MappingResult<T>
where
    T: Float + FloatCore,
{
    match statistic {
        Statistic::Sum => Ok(sum(values)),
        Statistic::Min => Ok(min(values)),
        Statistic::Max => Ok(max(values)),
        Statistic::Mean => Ok(mean(values)),
        Statistic::Median => Ok(median(values)),
        Statistic::MeanNonzero => Ok(mean_nonzero(values)),
        Statistic::GaussianSmoothed => Err(MappingError::UnsupportedStatistic(statistic)),
        Statistic::EndpointsMin => endpoints(statistic, values).map(|[a, b]| ends_min(a, b)),
        Statistic::EndpointsMean => endpoints(statistic, values).map(|[a, b]| ends_mean(a, b)),
        Statistic::EndpointsMax => endpoints(statistic, values).map(|[a, b]| ends_max(a, b)),
        Statistic::EndpointsProduct => endpoints(statistic, values).map(|[a, b]| ends_prod(a, b)),
    }
}

#[inline]
fn finite<T: Float>(values: &[T]) -> impl Iterator<Item = T> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// 有限值之和.
pub fn sum<T: Float>(values: &[T]) -> T {
    finite(values).fold(T::zero(), |acc, v| acc + v)
}

/// 有限值中的最小值. 不存在有限值时为 `+∞`.
pub fn min<T: Float>(values: &[T]) -> T {
    finite(values).fold(T::infinity(), |acc, v| acc.min(v))
}

/// 有限值中的最大值. 不存在有限值时为 `-∞`.
pub fn max<T: Float>(values: &[T]) -> T {
    finite(values).fold(T::neg_infinity(), |acc, v| acc.max(v))
}

/// 有限值的平均值. 不存在有限值时为 0.
pub fn mean<T: Float>(values: &[T]) -> T {
    mean_of(finite(values))
}

/// 有限非零值的平均值. 不存在这样的值时为 0.
pub fn mean_nonzero<T: Float>(values: &[T]) -> T {
    mean_of(finite(values).filter(|v| !v.is_zero()))
}

#[inline]
fn mean_of<T: Float, I: Iterator<Item = T>>(it: I) -> T {
    let (total, count) = it.fold((T::zero(), 0usize), |(s, n), v| (s + v, n + 1));
    match count {
        0 => T::zero(),
        n => total / T::from(n).unwrap_or_else(T::one),
    }
}

/// 对 `values` 做部分选择, 返回下标为 `len / 2` 的顺序统计量. 空输入返回 0.
///
/// 偶数个值时返回上中位数, 而不是两个中间值的平均.
/// 非有限值参与排序 (NaN 视为最大).
pub fn median<T: FloatCore>(values: &mut [T]) -> T {
    if values.is_empty() {
        return T::zero();
    }
    let mid = values.len() / 2;
    let (_, nth, _) = values.select_nth_unstable_by_key(mid, |v| OrderedFloat(*v));
    *nth
}

#[inline]
fn endpoints<T: Float>(
    statistic: Statistic,
    values: &[T],
) -> MappingResult<[T; ENDPOINT_VALUES]> {
    <[T; ENDPOINT_VALUES]>::try_from(values).map_err(|_| MappingError::EndpointsCount {
        statistic,
        actual: values.len(),
    })
}

/// 绝对值较小的端点值. 绝对值相等时取第二个.
#[inline]
fn ends_min<T: Float>(a: T, b: T) -> T {
    if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

/// 绝对值较大的端点值. 绝对值相等时取第二个.
#[inline]
fn ends_max<T: Float>(a: T, b: T) -> T {
    if a.abs() > b.abs() {
        a
    } else {
        b
    }
}

#[inline]
fn ends_mean<T: Float>(a: T, b: T) -> T {
    (a + b) / (T::one() + T::one())
}

/// 两端点严格同号时返回乘积, 否则返回 0.
#[inline]
fn ends_prod<T: Float>(a: T, b: T) -> T {
    let zero = T::zero();
    if (a < zero && b < zero) || (a > zero && b > zero) {
        a * b
    } else {
        zero
    }
}
