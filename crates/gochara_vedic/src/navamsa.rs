//! Navamsa (D9) placement.
//!
//! Each sign is split into nine parts of 3°20′. Counting starts from the
//! sign itself for movable signs, the 9th from it for fixed signs, and the
//! 5th for dual signs; in index terms an offset of 0, 8, 4 from the sign,
//! which collapses to `[0, 9, 6, 3][sign % 4]` from Mesha.

use crate::rashi::{Rashi, sign_and_degree};

/// Span of one navamsa: 30/9 = 3.3333... degrees.
pub const NAVAMSA_SPAN: f64 = 30.0 / 9.0;

const START_OFFSET: [i32; 4] = [0, 9, 6, 3];

/// D9 sign of a sidereal longitude.
pub fn navamsa_sign(sidereal_lon_deg: f64) -> Rashi {
    let (rashi, deg) = sign_and_degree(sidereal_lon_deg);
    let part = ((deg / NAVAMSA_SPAN).floor() as i32).min(8);
    Rashi::from_index(part + START_OFFSET[rashi.index() as usize % 4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movable_sign_starts_at_itself() {
        assert_eq!(navamsa_sign(0.1), Rashi::Mesha);
        assert_eq!(navamsa_sign(29.9), Rashi::Dhanu);
    }

    #[test]
    fn fixed_sign_starts_ninth() {
        // Vrishabha 0° → Makara
        assert_eq!(navamsa_sign(30.1), Rashi::Makara);
    }

    #[test]
    fn dual_sign_starts_fifth() {
        // Mithuna 0° → Tula
        assert_eq!(navamsa_sign(60.1), Rashi::Tula);
        // Mithuna 11.409° (part 3) → Makara
        assert_eq!(navamsa_sign(71.4091), Rashi::Makara);
    }

    #[test]
    fn water_sign_offset() {
        // Karka 0° → Karka; Kumbha 9.605° (part 2, offset 9) → Dhanu
        assert_eq!(navamsa_sign(90.1), Rashi::Karka);
        assert_eq!(navamsa_sign(309.6046), Rashi::Dhanu);
    }

    #[test]
    fn end_of_sign_clamps() {
        assert_eq!(navamsa_sign(59.99999999), Rashi::Kanya);
    }
}
