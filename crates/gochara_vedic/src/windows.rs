//! Panaphara / Apoklima house classes and their degree windows.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Inclusive range of degrees within a sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeWindow {
    pub start: f64,
    pub end: f64,
}

impl DegreeWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Inclusive at both ends.
    pub fn contains(&self, deg_in_sign: f64) -> bool {
        self.start <= deg_in_sign && deg_in_sign <= self.end
    }
}

impl Display for DegreeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            format_dms_short(self.start),
            format_dms_short(self.end)
        )
    }
}

pub const PANAPHARA_WINDOWS: [DegreeWindow; 4] = [
    DegreeWindow::new(2.5, 5.0),
    DegreeWindow::new(10.0, 12.5),
    DegreeWindow::new(17.5, 20.0),
    DegreeWindow::new(25.0, 27.5),
];

pub const APOKLIMA_WINDOWS: [DegreeWindow; 4] = [
    DegreeWindow::new(5.0, 7.5),
    DegreeWindow::new(12.5, 15.0),
    DegreeWindow::new(20.0, 22.5),
    DegreeWindow::new(27.5, 30.0),
];

/// First Panaphara window containing `deg_in_sign`.
pub fn panaphara_window(deg_in_sign: f64) -> Option<DegreeWindow> {
    PANAPHARA_WINDOWS.iter().copied().find(|w| w.contains(deg_in_sign))
}

/// First Apoklima window containing `deg_in_sign`.
pub fn apoklima_window(deg_in_sign: f64) -> Option<DegreeWindow> {
    APOKLIMA_WINDOWS.iter().copied().find(|w| w.contains(deg_in_sign))
}

/// Succedent and cadent house classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseClass {
    /// Houses 2, 5, 8, 11.
    Panaphara,
    /// Houses 3, 6, 9, 12.
    Apoklima,
}

impl HouseClass {
    pub const fn houses(self) -> [u8; 4] {
        match self {
            Self::Panaphara => [2, 5, 8, 11],
            Self::Apoklima => [3, 6, 9, 12],
        }
    }

    pub const fn windows(self) -> &'static [DegreeWindow; 4] {
        match self {
            Self::Panaphara => &PANAPHARA_WINDOWS,
            Self::Apoklima => &APOKLIMA_WINDOWS,
        }
    }

    pub fn contains_house(self, house: u8) -> bool {
        self.houses().contains(&house)
    }

    /// Window of this class containing `deg_in_sign`, if any.
    pub fn window_of(self, deg_in_sign: f64) -> Option<DegreeWindow> {
        match self {
            Self::Panaphara => panaphara_window(deg_in_sign),
            Self::Apoklima => apoklima_window(deg_in_sign),
        }
    }
}

/// `DD°MM'` with truncated minutes.
pub fn format_dms_short(deg: f64) -> String {
    let d = deg.trunc();
    let m = ((deg - d) * 60.0).trunc();
    format!("{:02}°{:02}'", d as i64, m as i64)
}
