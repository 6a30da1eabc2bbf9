//! Rashi (zodiac sign) lookup and sign lordship.
//!
//! 12 equal signs of 30°, starting from Mesha (Aries) at 0° sidereal.

use std::fmt::{Display, Formatter};

use gochara_ephem::{Body, normalize_deg};
use serde::{Deserialize, Serialize};

/// The 12 rashis starting from Mesha (Aries).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rashi {
    Mesha,
    Vrishabha,
    Mithuna,
    Karka,
    Simha,
    Kanya,
    Tula,
    Vrischika,
    Dhanu,
    Makara,
    Kumbha,
    Meena,
}

/// All 12 rashis in order (0 = Mesha, 11 = Meena).
pub const ALL_RASHIS: [Rashi; 12] = [
    Rashi::Mesha,
    Rashi::Vrishabha,
    Rashi::Mithuna,
    Rashi::Karka,
    Rashi::Simha,
    Rashi::Kanya,
    Rashi::Tula,
    Rashi::Vrischika,
    Rashi::Dhanu,
    Rashi::Makara,
    Rashi::Kumbha,
    Rashi::Meena,
];

impl Rashi {
    /// Sanskrit name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mesha => "Mesha",
            Self::Vrishabha => "Vrishabha",
            Self::Mithuna => "Mithuna",
            Self::Karka => "Karka",
            Self::Simha => "Simha",
            Self::Kanya => "Kanya",
            Self::Tula => "Tula",
            Self::Vrischika => "Vrischika",
            Self::Dhanu => "Dhanu",
            Self::Makara => "Makara",
            Self::Kumbha => "Kumbha",
            Self::Meena => "Meena",
        }
    }

    /// Western (English) name, used in event records.
    pub const fn western_name(self) -> &'static str {
        match self {
            Self::Mesha => "Aries",
            Self::Vrishabha => "Taurus",
            Self::Mithuna => "Gemini",
            Self::Karka => "Cancer",
            Self::Simha => "Leo",
            Self::Kanya => "Virgo",
            Self::Tula => "Libra",
            Self::Vrischika => "Scorpio",
            Self::Dhanu => "Sagittarius",
            Self::Makara => "Capricorn",
            Self::Kumbha => "Aquarius",
            Self::Meena => "Pisces",
        }
    }

    /// 0-based index (Mesha=0 .. Meena=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Rashi for any integer index, wrapping modulo 12.
    pub const fn from_index(i: i32) -> Rashi {
        ALL_RASHIS[i.rem_euclid(12) as usize]
    }

    /// The sign `n - 1` places forward, so `nth(1)` is `self` and
    /// `nth(7)` the opposite sign.
    pub const fn nth(self, n: i32) -> Rashi {
        Self::from_index(self.index() as i32 + n - 1)
    }

    /// Forward distance in signs from `self` to `other` (0..=11).
    pub const fn distance_to(self, other: Rashi) -> u8 {
        (other.index() as i32 - self.index() as i32).rem_euclid(12) as u8
    }
}

impl Display for Rashi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.western_name())
    }
}

/// Rashi and degrees within it for a sidereal longitude.
pub fn sign_and_degree(sidereal_lon_deg: f64) -> (Rashi, f64) {
    let lon = normalize_deg(sidereal_lon_deg);
    let idx = ((lon / 30.0).floor() as usize).min(11);
    (ALL_RASHIS[idx], lon - idx as f64 * 30.0)
}

/// Planetary lord of a sign (traditional rulerships, no outer planets).
pub const fn sign_lord(rashi: Rashi) -> Body {
    match rashi {
        Rashi::Mesha | Rashi::Vrischika => Body::Mars,
        Rashi::Vrishabha | Rashi::Tula => Body::Venus,
        Rashi::Mithuna | Rashi::Kanya => Body::Mercury,
        Rashi::Karka => Body::Moon,
        Rashi::Simha => Body::Sun,
        Rashi::Dhanu | Rashi::Meena => Body::Jupiter,
        Rashi::Makara | Rashi::Kumbha => Body::Saturn,
    }
}
