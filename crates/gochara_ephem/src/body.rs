//! Bodies tracked by the transit engine.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point whose sidereal longitude the engine can report.
///
/// Rahu is the mean lunar ascending node; Ketu is exactly opposite.
/// The Ascendant depends on observer location and is only available
/// through the house query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Rahu,
    Ketu,
    Uranus,
    Neptune,
    Pluto,
    Ascendant,
}

impl Body {
    /// Every member, in declaration order.
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Rahu,
        Body::Ketu,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Ascendant,
    ];

    /// The nine grahas, in the traditional weekday-plus-nodes order.
    pub const GRAHAS: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mars,
        Body::Mercury,
        Body::Jupiter,
        Body::Venus,
        Body::Saturn,
        Body::Rahu,
        Body::Ketu,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::Ascendant => "Ascendant",
        }
    }

    /// 0-based position in [`Body::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the body's position moves with the observer's horizon.
    pub const fn is_location_dependent(self) -> bool {
        matches!(self, Self::Ascendant)
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "asc" | "lagna" => Some(Body::Ascendant),
                "north node" | "mean node" => Some(Body::Rahu),
                "south node" => Some(Body::Ketu),
                _ => None,
            })
            .ok_or_else(|| format!("unknown body '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, b) in Body::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("jupiter".parse::<Body>().unwrap(), Body::Jupiter);
        assert_eq!("Lagna".parse::<Body>().unwrap(), Body::Ascendant);
        assert!("Vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn grahas_exclude_outer_planets() {
        assert!(!Body::GRAHAS.contains(&Body::Uranus));
        assert!(!Body::GRAHAS.contains(&Body::Ascendant));
        assert_eq!(Body::GRAHAS.len(), 9);
    }
}
