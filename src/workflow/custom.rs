// src/workflow/custom.rs

//! Customization tags: a cost-priority grade paired with a time-priority
//! grade from the opposite tier.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::types::SpecialMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    /// Grades this one may be paired with. A grade never pairs with its
    /// own tier.
    pub fn compatible(self) -> [Grade; 2] {
        match self {
            Grade::A | Grade::B => [Grade::C, Grade::D],
            Grade::C | Grade::D => [Grade::A, Grade::B],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a workflow is customized, and with which grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Customization {
    pub customized: bool,
    pub cost_grade: Option<Grade>,
    pub time_grade: Option<Grade>,
}

impl Customization {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn tagged(cost_grade: Grade, time_grade: Grade) -> Self {
        Self {
            customized: true,
            cost_grade: Some(cost_grade),
            time_grade: Some(time_grade),
        }
    }

    /// Tag with probability `rate`: a cost grade uniformly from all four,
    /// then a time grade uniformly from its compatible pair.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> Self {
        if rng.r#gen::<f64>() >= rate {
            return Self::plain();
        }

        let cost = pick_grade(rng, &Grade::ALL);
        let time = pick_grade(rng, &cost.compatible());
        Self::tagged(cost, time)
    }

    /// Fixed tag for the customized half of a twin pair.
    pub fn special(mode: SpecialMode) -> Option<Self> {
        match mode {
            SpecialMode::No => None,
            SpecialMode::Time => Some(Self::tagged(Grade::C, Grade::A)),
            SpecialMode::Cost => Some(Self::tagged(Grade::A, Grade::C)),
        }
    }

    /// Wire form of the cost grade; empty when untagged.
    pub fn cost_grade_str(&self) -> &'static str {
        self.cost_grade.map(Grade::as_str).unwrap_or("")
    }

    /// Wire form of the time grade; empty when untagged.
    pub fn time_grade_str(&self) -> &'static str {
        self.time_grade.map(Grade::as_str).unwrap_or("")
    }
}

fn pick_grade<R: Rng + ?Sized>(rng: &mut R, grades: &[Grade]) -> Grade {
    grades.choose(rng).copied().unwrap_or(Grade::A)
}
