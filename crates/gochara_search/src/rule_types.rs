//! Rule identifiers and the payload a rule reports when it holds.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome class of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Money,
    Loss,
    Expense,
}

impl Category {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Money => "Money",
            Self::Loss => "Loss",
            Self::Expense => "Expense",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The fourteen transit rules: eight money, six loss.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleId {
    Money1,
    Money2,
    Money3,
    Money4,
    Money5,
    Money6,
    Money7,
    Money8,
    Loss1,
    Loss2,
    Loss3,
    Loss4,
    Loss5,
    Loss6,
}

/// Coarse step ceiling for rules driven by the Moon (~13°/day, so about
/// 11′ of arc per 20 minutes).
pub const MOON_MAX_STEP_SECS: i64 = 20 * 60;

impl RuleId {
    pub const ALL: [RuleId; 14] = [
        RuleId::Money1,
        RuleId::Money2,
        RuleId::Money3,
        RuleId::Money4,
        RuleId::Money5,
        RuleId::Money6,
        RuleId::Money7,
        RuleId::Money8,
        RuleId::Loss1,
        RuleId::Loss2,
        RuleId::Loss3,
        RuleId::Loss4,
        RuleId::Loss5,
        RuleId::Loss6,
    ];

    /// Stable machine identifier, e.g. `money1`, `loss6`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Money1 => "money1",
            Self::Money2 => "money2",
            Self::Money3 => "money3",
            Self::Money4 => "money4",
            Self::Money5 => "money5",
            Self::Money6 => "money6",
            Self::Money7 => "money7",
            Self::Money8 => "money8",
            Self::Loss1 => "loss1",
            Self::Loss2 => "loss2",
            Self::Loss3 => "loss3",
            Self::Loss4 => "loss4",
            Self::Loss5 => "loss5",
            Self::Loss6 => "loss6",
        }
    }

    /// Display title, e.g. `Rule #1`, `Loss #6`.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Money1 => "Rule #1",
            Self::Money2 => "Rule #2",
            Self::Money3 => "Rule #3",
            Self::Money4 => "Rule #4",
            Self::Money5 => "Rule #5",
            Self::Money6 => "Rule #6",
            Self::Money7 => "Rule #7",
            Self::Money8 => "Rule #8",
            Self::Loss1 => "Loss #1",
            Self::Loss2 => "Loss #2",
            Self::Loss3 => "Loss #3",
            Self::Loss4 => "Loss #4",
            Self::Loss5 => "Loss #5",
            Self::Loss6 => "Loss #6",
        }
    }

    /// One-line summary of the condition.
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Money1 => "Jupiter, Venus or 2L in a Panaphara house and degree",
            Self::Money2 => "Moon in a nakshatra of a natal Panaphara planet, in a Panaphara degree",
            Self::Money3 => "D9 dispositor of 2L in a Panaphara house and degree",
            Self::Money4 => "Venus and Uranus in Panaphara houses within the same Panaphara window",
            Self::Money5 => "5L and 9L in the same sign or in mutual 7th",
            Self::Money6 => "2L in a Panaphara degree",
            Self::Money7 => "Lucky / extremely lucky planet in an Apoklima house",
            Self::Money8 => "Transiting planet within 1° of a natal Panaphara planet",
            Self::Loss1 => "Saturn, Venus or Ketu in an Apoklima house and degree",
            Self::Loss2 => "Sun in a nakshatra of 6L/8L/12L, in an Apoklima degree",
            Self::Loss3 => "Moon or Sun in the 6th nakshatra from its natal nakshatra",
            Self::Loss4 => "Moon within 1° of natal Neptune",
            Self::Loss5 => "6L and 8L in a 6/8 relationship (expense)",
            Self::Loss6 => "Sun in the 3rd, 6th, 8th or 12th house",
        }
    }

    /// Category an event gets unless the rule reports an exception.
    pub const fn base_category(self) -> Category {
        match self {
            Self::Money1
            | Self::Money2
            | Self::Money3
            | Self::Money4
            | Self::Money5
            | Self::Money6
            | Self::Money7
            | Self::Money8 => Category::Money,
            Self::Loss5 => Category::Expense,
            Self::Loss1 | Self::Loss2 | Self::Loss3 | Self::Loss4 | Self::Loss6 => Category::Loss,
        }
    }

    /// Largest coarse step that still sees every transition of this rule,
    /// if tighter than any sensible global step.
    pub const fn max_step_secs(self) -> Option<i64> {
        match self {
            Self::Money2 | Self::Money8 | Self::Loss3 | Self::Loss4 => Some(MOON_MAX_STEP_SECS),
            _ => None,
        }
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleId {
    type Err = String;

    /// Accepts `money1`..`money8` (or `rule1`..`rule8`) and `loss1`..`loss6`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let canonical = match lower.strip_prefix("rule") {
            Some(n) => format!("money{n}"),
            None => lower,
        };
        RuleId::ALL
            .into_iter()
            .find(|r| r.code() == canonical)
            .ok_or_else(|| format!("unknown rule '{s}'"))
    }
}

/// Descriptive payload captured when a rule holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub category: Category,
    /// Sub-case qualifier appended to the rule title, e.g. `Lucky`.
    pub variant: Option<&'static str>,
    /// Transiting body (or bodies, `Venus/Uranus`).
    pub body: String,
    /// Western sign name(s) involved.
    pub sign: String,
    /// Natal house number(s) involved.
    pub house: String,
    /// Degree window or condition tag.
    pub window: String,
    pub description: String,
}

impl Hit {
    /// `Rule #7 (Extremely Lucky)`-style title.
    pub fn title(&self, rule: RuleId) -> String {
        match self.variant {
            Some(v) => format!("{} ({v})", rule.title()),
            None => rule.title().to_string(),
        }
    }
}
