use serde::Serialize;

/// Lower bounds, inclusive, from the top down.
const LETTER_THRESHOLDS: [(f64, &str); 11] = [
    (97.0, "A+"),
    (93.0, "A"),
    (90.0, "A-"),
    (87.0, "B+"),
    (83.0, "B"),
    (80.0, "B-"),
    (77.0, "C+"),
    (73.0, "C"),
    (70.0, "C-"),
    (67.0, "D+"),
    (60.0, "D"),
];

/// Map a percentage to its letter grade. Total: anything below 60, NaN included, is "F".
pub fn letter_grade(percentage: f64) -> &'static str {
    LETTER_THRESHOLDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

/// Coarse colour tier for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl GradeBand {
    pub fn of(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 80.0 {
            Self::Good
        } else if percentage >= 70.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Plain letter bucket, without +/- modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LetterBucket {
    A,
    B,
    C,
    D,
    F,
}

impl LetterBucket {
    pub const ALL: [LetterBucket; 5] = [Self::A, Self::B, Self::C, Self::D, Self::F];

    pub fn of(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::A
        } else if percentage >= 80.0 {
            Self::B
        } else if percentage >= 70.0 {
            Self::C
        } else if percentage >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

/// Standing for a value on the 4.0 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GpaStanding {
    Excellent,
    Good,
    NeedsImprovement,
}

impl GpaStanding {
    pub fn of(gpa: f64) -> Self {
        if gpa >= 3.5 {
            Self::Excellent
        } else if gpa >= 3.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }
}
