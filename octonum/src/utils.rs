use std::ops::RangeBounds;

pub trait WithinExt {
    fn within(&self, range: impl RangeBounds<Self>) -> bool;
}

impl <T: PartialOrd<T>> WithinExt for T {
    fn within(&self, range: impl RangeBounds<Self>) -> bool {
        range.contains(self)
    }
}

/// Checks an optional axis value against a range. A missing value is not checked.
pub fn axis_within(value: Option<f64>, range: impl RangeBounds<f64>) -> bool {
    value.is_none_or(|value| value.within(range))
}

/// Checks that an optional step is no larger than `limit` in either direction.
pub fn step_within(value: Option<f64>, limit: f64) -> bool {
    axis_within(value, -limit..=limit)
}
