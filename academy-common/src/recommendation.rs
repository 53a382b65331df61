//! Program recommendation rules for the "find your program" quiz
//!
//! Maps three quiz answers (athlete age bracket, sport, goal) onto one of the
//! three entry programs. Rules are evaluated in order and the first match wins:
//!
//! 1. under-8, or goal is try-it-out / not-sure → Skills Lab
//! 2. goal is tryout-prep → Private Training
//! 3. age 8-10 or 11-14 with goal commit → Performance Lab
//! 4. age 15+ with goal commit → Private Training
//! 5. anything else → Skills Lab
//!
//! The sport answer is collected for the lead record but does not affect the
//! outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Athlete age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "under-8")]
    Under8,
    #[serde(rename = "8-10")]
    Age8To10,
    #[serde(rename = "11-14")]
    Age11To14,
    #[serde(rename = "15+")]
    Age15Plus,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Under8,
        AgeBracket::Age8To10,
        AgeBracket::Age11To14,
        AgeBracket::Age15Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Under8 => "under-8",
            AgeBracket::Age8To10 => "8-10",
            AgeBracket::Age11To14 => "11-14",
            AgeBracket::Age15Plus => "15+",
        }
    }
}

/// Sport the athlete plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sport {
    Basketball,
    Soccer,
    Football,
    Baseball,
    Volleyball,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Basketball,
        Sport::Soccer,
        Sport::Football,
        Sport::Baseball,
        Sport::Volleyball,
        Sport::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Basketball => "basketball",
            Sport::Soccer => "soccer",
            Sport::Football => "football",
            Sport::Baseball => "baseball",
            Sport::Volleyball => "volleyball",
            Sport::Other => "other",
        }
    }
}

/// What the family wants out of training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    TryItOut,
    Commit,
    TryoutPrep,
    NotSure,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::TryItOut, Goal::Commit, Goal::TryoutPrep, Goal::NotSure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::TryItOut => "try-it-out",
            Goal::Commit => "commit",
            Goal::TryoutPrep => "tryout-prep",
            Goal::NotSure => "not-sure",
        }
    }
}

macro_rules! impl_quiz_answer {
    ($ty:ident, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| Error::InvalidInput(format!("unknown {}: {}", $label, s)))
            }
        }
    };
}

impl_quiz_answer!(AgeBracket, "age bracket");
impl_quiz_answer!(Sport, "sport");
impl_quiz_answer!(Goal, "goal");

/// The three entry programs a quiz can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramSlug {
    SkillsLab,
    PerformanceLab,
    PrivateTraining,
}

impl ProgramSlug {
    pub const ALL: [ProgramSlug; 3] = [
        ProgramSlug::SkillsLab,
        ProgramSlug::PerformanceLab,
        ProgramSlug::PrivateTraining,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramSlug::SkillsLab => "skills-lab",
            ProgramSlug::PerformanceLab => "performance-lab",
            ProgramSlug::PrivateTraining => "private-training",
        }
    }

    /// Static descriptor shown on the quiz result card
    pub fn recommendation(&self) -> Recommendation {
        match self {
            ProgramSlug::SkillsLab => Recommendation {
                program: "Skills Lab",
                slug: *self,
                price: "$10",
                price_cents: 1_000,
                description: "Drop-in fundamentals sessions for new and younger athletes.",
                cta_path: "/programs/skills-lab",
            },
            ProgramSlug::PerformanceLab => Recommendation {
                program: "Performance Lab",
                slug: *self,
                price: "$245",
                price_cents: 24_500,
                description: "Monthly small-group training for committed youth athletes.",
                cta_path: "/programs/performance-lab",
            },
            ProgramSlug::PrivateTraining => Recommendation {
                program: "Private Training",
                slug: *self,
                price: "$60",
                price_cents: 6_000,
                description: "One-on-one sessions built around tryouts and the next level.",
                cta_path: "/programs/private-training",
            },
        }
    }
}

impl fmt::Display for ProgramSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quiz result card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub program: &'static str,
    pub slug: ProgramSlug,
    pub price: &'static str,
    pub price_cents: i64,
    pub description: &'static str,
    pub cta_path: &'static str,
}

/// Pick a program for the given quiz answers
///
/// # Examples
///
/// ```
/// use academy_common::recommendation::{recommend, AgeBracket, Goal, ProgramSlug, Sport};
///
/// let rec = recommend(AgeBracket::Age8To10, Sport::Basketball, Goal::Commit);
/// assert_eq!(rec.slug, ProgramSlug::PerformanceLab);
/// assert_eq!(rec.program, "Performance Lab");
/// assert_eq!(rec.price, "$245");
/// ```
pub fn recommend(age: AgeBracket, _sport: Sport, goal: Goal) -> Recommendation {
    select_program(age, goal).recommendation()
}

fn select_program(age: AgeBracket, goal: Goal) -> ProgramSlug {
    use AgeBracket::*;

    if age == Under8 || matches!(goal, Goal::TryItOut | Goal::NotSure) {
        return ProgramSlug::SkillsLab;
    }
    if goal == Goal::TryoutPrep {
        return ProgramSlug::PrivateTraining;
    }
    match (age, goal) {
        (Age8To10 | Age11To14, Goal::Commit) => ProgramSlug::PerformanceLab,
        (Age15Plus, Goal::Commit) => ProgramSlug::PrivateTraining,
        // Unreachable with the rules above; kept so every input has an answer
        _ => ProgramSlug::SkillsLab,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_performance_lab() {
        let rec = recommend(AgeBracket::Age8To10, Sport::Basketball, Goal::Commit);
        assert_eq!(rec.program, "Performance Lab");
        assert_eq!(rec.slug.as_str(), "performance-lab");
        assert_eq!(rec.price, "$245");
    }

    #[test]
    fn test_under_8_always_skills_lab() {
        for sport in Sport::ALL {
            for goal in Goal::ALL {
                let rec = recommend(AgeBracket::Under8, sport, goal);
                assert_eq!(rec.slug, ProgramSlug::SkillsLab, "{sport} / {goal}");
            }
        }
    }

    #[test]
    fn test_tryout_prep_is_private_training_past_under_8() {
        for age in AgeBracket::ALL.into_iter().filter(|a| *a != AgeBracket::Under8) {
            for sport in Sport::ALL {
                let rec = recommend(age, sport, Goal::TryoutPrep);
                assert_eq!(rec.slug, ProgramSlug::PrivateTraining, "{age} / {sport}");
            }
        }
    }

    #[test]
    fn test_older_committed_athlete_gets_private_training() {
        let rec = recommend(AgeBracket::Age15Plus, Sport::Soccer, Goal::Commit);
        assert_eq!(rec.slug, ProgramSlug::PrivateTraining);
        assert_eq!(rec.price, "$60");
    }

    #[test]
    fn test_not_sure_overrides_age() {
        let rec = recommend(AgeBracket::Age15Plus, Sport::Football, Goal::NotSure);
        assert_eq!(rec.slug, ProgramSlug::SkillsLab);
    }

    #[test]
    fn test_parse_answers() {
        assert_eq!("15+".parse::<AgeBracket>().unwrap(), AgeBracket::Age15Plus);
        assert_eq!(" Tryout-Prep ".parse::<Goal>().unwrap(), Goal::TryoutPrep);
        assert_eq!("volleyball".parse::<Sport>().unwrap(), Sport::Volleyball);
        assert!("16+".parse::<AgeBracket>().is_err());
        assert!("win".parse::<Goal>().is_err());
    }

    #[test]
    fn test_sport_list_matches_quiz_choices() {
        let names: Vec<&str> = Sport::ALL.iter().map(Sport::as_str).collect();
        assert_eq!(
            names,
            ["basketball", "soccer", "football", "baseball", "volleyball", "other"]
        );
        assert!("softball".parse::<Sport>().is_err());
        assert!(serde_json::from_str::<Sport>("\"softball\"").is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&AgeBracket::Age11To14).unwrap();
        assert_eq!(json, "\"11-14\"");
        let goal: Goal = serde_json::from_str("\"try-it-out\"").unwrap();
        assert_eq!(goal, Goal::TryItOut);
        let rec = serde_json::to_value(recommend(AgeBracket::Under8, Sport::Other, Goal::Commit)).unwrap();
        assert_eq!(rec["slug"], "skills-lab");
    }
}
