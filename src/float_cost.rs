use std::cmp::Eq;
use std::fmt::Debug;
use std::str::FromStr;

use derive_more::Display;
use num_traits::One;
use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use ordered_float::FloatCore;
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::cost::Cost;

/// A real-valued, non-negative cost.
///
/// Backed by `OrderedFloat` so it can be ranked in heaps. Infinity is the
/// "unreachable" upper bound.
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost<F: FloatCore>(pub OrderedFloat<F>);

impl<F> Cost for FloatCost<F> where F: FloatCore + Debug + std::fmt::Display {}

#[derive(Debug, Error, PartialEq)]
pub enum FloatCostError {
    #[error("Cost is not a number")]
    NotANumber,
    #[error("Cost {0} is negative")]
    Negative(String),
    #[error("Cannot parse cost '{0}'")]
    Unparseable(String),
}

impl<F> FloatCost<F>
where
    F: FloatCore,
{
    /// Wraps a float without checking it.
    ///
    /// Negative or NaN costs break every search guarantee, prefer
    /// [`FloatCost::try_new`] on untrusted input.
    pub fn new(f: F) -> Self {
        debug_assert!(!f.is_nan());
        debug_assert!(f >= F::zero());
        Self(OrderedFloat(f))
    }

    pub fn try_new(f: F) -> Result<Self, FloatCostError>
    where
        F: std::fmt::Display,
    {
        if f.is_nan() {
            return Err(FloatCostError::NotANumber);
        }
        if f < F::zero() {
            return Err(FloatCostError::Negative(f.to_string()));
        }
        Ok(Self(OrderedFloat(f)))
    }

    #[inline(always)]
    pub fn get(&self) -> F {
        self.0.0
    }

    #[inline(always)]
    pub fn infinity() -> Self {
        Self(OrderedFloat(F::infinity()))
    }
}

impl<F> FromStr for FloatCost<F>
where
    F: FloatCore + FromStr + std::fmt::Display,
{
    type Err = FloatCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = s
            .trim()
            .parse::<F>()
            .map_err(|_| FloatCostError::Unparseable(s.to_string()))?;
        Self::try_new(f)
    }
}

impl<F> std::ops::Add for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<F> std::ops::Mul for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<F> SaturatingAdd for FloatCost<F>
where
    F: FloatCore,
{
    /// Floats saturate at infinity on their own.
    fn saturating_add(&self, rhs: &Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<F> Zero for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0.0 == F::zero()
    }
    #[inline(always)]
    fn zero() -> Self {
        Self(OrderedFloat(F::zero()))
    }
}
impl<F> One for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn one() -> Self {
        Self(OrderedFloat(F::one()))
    }
}
impl<F> UpperBounded for FloatCost<F>
where
    F: FloatCore,
{
    fn max_value() -> Self {
        Self::infinity()
    }
}

impl<F> PartialOrd for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<F> Ord for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}
impl<F> PartialEq for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<F> Eq for FloatCost<F> where F: FloatCore {}
