//! Numeric capability for `sum` and `average`.

/// Element types that can be summed with overflow detection and averaged as `f64`.
pub trait Numeric: Copy {
    fn zero() -> Self;
    /// `None` on overflow. Floating point types never overflow here.
    fn checked_add(self, other: Self) -> Option<Self>;
    fn to_f64(self) -> f64;
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn zero() -> Self {
                    0
                }
                fn checked_add(self, other: Self) -> Option<Self> {
                    <$t>::checked_add(self, other)
                }
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn zero() -> Self {
                    0.0
                }
                fn checked_add(self, other: Self) -> Option<Self> {
                    Some(self + other)
                }
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_numeric_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_numeric_float!(f32, f64);
