use serde::Serialize;
use time::Date;

use crate::children::repo::Child;
use crate::insights::repo::{SelInsight, COMPETENCY_COUNT, COMPETENCY_MAX};

/// Fixed age bands used for cohort comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    SixToEight,
    NineToTen,
    ElevenToTwelve,
    ThirteenPlus,
}

pub const AGE_BANDS: [AgeBand; 4] = [
    AgeBand::SixToEight,
    AgeBand::NineToTen,
    AgeBand::ElevenToTwelve,
    AgeBand::ThirteenPlus,
];

impl AgeBand {
    pub fn label(self) -> &'static str {
        match self {
            AgeBand::SixToEight => "6-8",
            AgeBand::NineToTen => "9-10",
            AgeBand::ElevenToTwelve => "11-12",
            AgeBand::ThirteenPlus => "13+",
        }
    }

    /// Children younger than six are not banded.
    pub fn from_age(age: i32) -> Option<AgeBand> {
        match age {
            6..=8 => Some(AgeBand::SixToEight),
            9..=10 => Some(AgeBand::NineToTen),
            11..=12 => Some(AgeBand::ElevenToTwelve),
            a if a >= 13 => Some(AgeBand::ThirteenPlus),
            _ => None,
        }
    }
}

/// Whole years completed as of `today`.
pub fn age_on(date_of_birth: Date, today: Date) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month() as u8, today.day()) < (date_of_birth.month() as u8, date_of_birth.day()) {
        age -= 1;
    }
    age
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortStats {
    pub band: &'static str,
    pub children_count: usize,
    pub average_score: i32,
}

/// Per-band children count and mean competency score (0-100) across all
/// insights of the band's children. Bands with zero children are omitted
/// from the output, never reported as zero rows.
pub fn cohort_stats(children: &[Child], insights: &[SelInsight], today: Date) -> Vec<CohortStats> {
    AGE_BANDS
        .iter()
        .filter_map(|&band| {
            let members: Vec<&Child> = children
                .iter()
                .filter(|c| AgeBand::from_age(age_on(c.date_of_birth, today)) == Some(band))
                .collect();
            if members.is_empty() {
                return None;
            }

            let band_insights: Vec<&SelInsight> = insights
                .iter()
                .filter(|i| members.iter().any(|m| m.id == i.child_id))
                .collect();
            let average_score = if band_insights.is_empty() {
                0
            } else {
                let total: i32 = band_insights.iter().map(|i| i.competency_sum()).sum();
                let mean = total as f64 / (band_insights.len() * COMPETENCY_COUNT) as f64;
                (mean / COMPETENCY_MAX as f64 * 100.0).round() as i32
            };

            Some(CohortStats {
                band: band.label(),
                children_count: members.len(),
                average_score,
            })
        })
        .collect()
}
