//! Type definition of Float, otherwise constants and small helper
//! functions which can be used almost everywhere else in the code.

pub type Float = f32;

/// Stands in for infinity wherever a finite but huge value is needed
/// (empty bounding boxes, unbounded planes, open ray intervals).
pub const BIG: Float = 1.0e30;
/// Default near cut-off of a freshly created ray.
pub const RAY_T_MIN: Float = 1.0e-4;
/// Lower bound for the offset used to slide a degenerate split plane
/// just outside the geometry.
pub const SPLIT_EPSILON: Float = 1.0e-6;
/// Direction components below this magnitude are treated as parallel
/// to a split plane.
pub const DIVISION_EPSILON: Float = 1.0e-12;

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamp_t_limits() {
        assert_eq!(clamp_t(5, 0, 3), 3);
        assert_eq!(clamp_t(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_t(0.25, 0.0, 1.0), 0.25);
    }
}
