//! Physical quantities used in MPM processing, backed by `uom`.

pub use uom;
pub use uom::si::Quantity;
pub use uom::si::f32::{Length, Ratio};

pub mod todo;

mod units {
  pub use uom::si::{length::{micrometer, millimeter, centimeter},
                    ratio ::{ratio, percent},
  };
}
// Making values from float literals seems to be very long-winded, so provide
// some pithily-named convenience constructors.

/// Generate a function called NAME which returns QUANTITY by interpreting its
/// argument as UNIT
///
/// wrap!(NAME QUANTITY UNIT);
macro_rules! wrap {
  ($name:ident $quantity:ident $unit:ident ) => {
    pub fn $name(x: f32) -> $quantity { $quantity::new::<units::$unit>(x) }
  };
}

wrap!(um      Length  micrometer);
wrap!(mm      Length  millimeter);
wrap!(cm      Length  centimeter);
wrap!(ratio   Ratio        ratio);
wrap!(percent Ratio      percent);

// Reverse direction of the above.
pub fn mm_     (x: Length) -> f32 { x.get::<units::millimeter>() }
pub fn ratio_  (x: Ratio ) -> f32 { x.get::<units::ratio>() }
pub fn percent_(x: Ratio ) -> f32 { x.get::<units::percent>() }

// f32 values headed for text (JSON job files, sidecars). Widening an f32
// straight to f64 exposes its binary representation (0.05 -> 0.05000000074505806).

/// Shortest decimal that reads back as `x`, as an f64: 0.05_f32 -> 0.05
pub fn decimal(x: f32) -> f64 { x.to_string().parse().unwrap_or(x as f64) }

/// Length in mm, rounded to 0.1 µm: undoes the metre <-> mm conversion error
/// (`mm_(mm(3.0))` is 2.9999998)
pub fn mm_decimal(x: Length) -> f64 { (mm_(x) as f64 * 1e4).round() / 1e4 }

#[macro_export]
macro_rules! assert_uom_eq {
  ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
    float_eq::assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
  };
}
