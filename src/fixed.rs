//! 16.16 fixed-point helpers used at the column-drawer boundary.

pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

#[inline]
pub fn float_to_fixed(f: f32) -> Fixed {
    (f * FRACUNIT as f32) as Fixed
}

#[inline]
pub fn fixed_to_float(f: Fixed) -> f32 {
    f as f32 / FRACUNIT as f32
}

/// Integer part of a non-negative fixed value.
#[inline]
pub fn fixed_int(f: Fixed) -> i32 {
    f >> FRACBITS
}
