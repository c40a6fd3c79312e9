/// Path and transition costs.
///
/// Costs are non-negative and totally ordered. The upper bound is reserved to
/// mean "unreachable", so it never shows up as the cost of a real path.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }
}

macro_rules! unsigned_cost {
    ($($t:ty),*) => {
        $(impl Cost for $t {})*
    };
}

unsigned_cost!(u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use num_traits::SaturatingAdd;
    use num_traits::bounds::UpperBounded;

    use super::*;

    #[test]
    fn upper_bound_is_invalid() {
        assert!(0u32.valid());
        assert!(1_000u32.valid());
        assert!(!<u32 as UpperBounded>::max_value().valid());
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let near_max = u8::MAX - 1;
        let sum = SaturatingAdd::saturating_add(&near_max, &5u8);
        assert_eq!(sum, u8::MAX);
        assert!(!sum.valid());
    }
}
