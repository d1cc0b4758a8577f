//! Quiz scoring
//!
//! Pure functions from a submitted answer set to per-tag totals and
//! the ranked top three tags. Deterministic and side-effect free:
//! scores are recomputed wholesale on every call, never mutated in
//! place afterwards.

use serde::{Deserialize, Serialize};

use crate::quiz::{QuizAnswers, QUIZ_QUESTIONS};
use crate::tags::TasteTag;

/// Per-tag score totals for one answer set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteScores {
    pub paris_archive: u32,
    pub nyc_street: u32,
    pub minimal_core: u32,
    pub designer_vintage: u32,
    pub deal_hunter: u32,
}

impl TasteScores {
    /// Total for one tag
    pub fn get(&self, tag: TasteTag) -> u32 {
        match tag {
            TasteTag::ParisArchive => self.paris_archive,
            TasteTag::NycStreet => self.nyc_street,
            TasteTag::MinimalCore => self.minimal_core,
            TasteTag::DesignerVintage => self.designer_vintage,
            TasteTag::DealHunter => self.deal_hunter,
        }
    }

    /// Add a weight to one tag's total
    pub fn add(&mut self, tag: TasteTag, weight: u32) {
        match tag {
            TasteTag::ParisArchive => self.paris_archive += weight,
            TasteTag::NycStreet => self.nyc_street += weight,
            TasteTag::MinimalCore => self.minimal_core += weight,
            TasteTag::DesignerVintage => self.designer_vintage += weight,
            TasteTag::DealHunter => self.deal_hunter += weight,
        }
    }

    /// Totals in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (TasteTag, u32)> + '_ {
        TasteTag::ALL.into_iter().map(|tag| (tag, self.get(tag)))
    }

    /// Sum across all five tags
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, score)| score).sum()
    }
}

/// One ranked tag with its integer percentage share (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTag {
    pub tag: TasteTag,
    pub percentage: u32,
}

/// The three highest-scoring tags for one answer set
///
/// Percentages are rounded independently and need not sum to 100; the
/// remaining two tags' shares are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTags {
    pub primary: RankedTag,
    pub secondary: RankedTag,
    pub tertiary: RankedTag,
}

/// Fixed ranking returned for an empty or fully-invalid answer set
const DEFAULT_TOP_TAGS: TopTags = TopTags {
    primary: RankedTag {
        tag: TasteTag::MinimalCore,
        percentage: 34,
    },
    secondary: RankedTag {
        tag: TasteTag::ParisArchive,
        percentage: 33,
    },
    tertiary: RankedTag {
        tag: TasteTag::NycStreet,
        percentage: 33,
    },
};

/// Accumulate per-tag totals from an answer set
///
/// Questions without an entry, and entries naming an unknown option id,
/// contribute nothing; they are ignored rather than rejected.
pub fn calculate_scores(answers: &QuizAnswers) -> TasteScores {
    let mut scores = TasteScores::default();

    for question in QUIZ_QUESTIONS.iter() {
        let Some(answer_id) = answers.get(&question.id) else {
            continue;
        };
        let Some(option) = question.options.iter().find(|o| o.id == answer_id) else {
            continue;
        };
        for &(tag, weight) in option.weights {
            scores.add(tag, weight);
        }
    }

    scores
}

/// Rank all five tags and surface the top three with percentages
///
/// A zero total (nothing scored) returns a fixed default ranking so
/// repeated calls on empty input stay idempotent. Ties are broken by
/// catalog order via the stable sort.
pub fn top_tags(scores: &TasteScores) -> TopTags {
    let total = scores.total();
    if total == 0 {
        return DEFAULT_TOP_TAGS;
    }

    let mut ranked: Vec<(TasteTag, u32)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let percentage =
        |score: u32| -> u32 { ((score as f64 / total as f64) * 100.0).round() as u32 };

    TopTags {
        primary: RankedTag {
            tag: ranked[0].0,
            percentage: percentage(ranked[0].1),
        },
        secondary: RankedTag {
            tag: ranked[1].0,
            percentage: percentage(ranked[1].1),
        },
        tertiary: RankedTag {
            tag: ranked[2].0,
            percentage: percentage(ranked[2].1),
        },
    }
}
