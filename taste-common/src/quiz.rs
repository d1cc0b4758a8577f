//! Quiz definition
//!
//! Five fixed questions, each with lettered options that contribute
//! integer weights to one or two taste tags. Question ids are stable
//! and double as the key of a submitted answer map.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::tags::TasteTag;

/// Submitted answers, keyed by question id; the value is the chosen
/// option id. Partial answer sets are allowed.
pub type QuizAnswers = BTreeMap<u32, String>;

/// One selectable option within a question
#[derive(Debug, Clone)]
pub struct QuizOption {
    /// Single-letter id, unique within the question
    pub id: &'static str,
    pub text: &'static str,
    /// Per-tag score contributions; absent tags contribute 0
    pub weights: &'static [(TasteTag, u32)],
}

/// One quiz question with its options
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    /// Stable id (1..=5), used as the answer-map key
    pub id: u32,
    pub prompt: &'static str,
    pub options: &'static [QuizOption],
}

/// The fixed quiz, in presentation order
pub static QUIZ_QUESTIONS: Lazy<Vec<QuizQuestion>> = Lazy::new(|| {
    vec![
        QuizQuestion {
            id: 1,
            prompt: "What silhouette are you drawn to?",
            options: &[
                QuizOption {
                    id: "A",
                    text: "Tailored and structured",
                    weights: &[(TasteTag::ParisArchive, 2)],
                },
                QuizOption {
                    id: "B",
                    text: "Oversized and relaxed",
                    weights: &[(TasteTag::NycStreet, 2)],
                },
                QuizOption {
                    id: "C",
                    text: "Clean and minimal",
                    weights: &[(TasteTag::MinimalCore, 2)],
                },
                QuizOption {
                    id: "D",
                    text: "Bold and statement-making",
                    weights: &[(TasteTag::DesignerVintage, 2)],
                },
            ],
        },
        QuizQuestion {
            id: 2,
            prompt: "What excites you most when shopping?",
            options: &[
                QuizOption {
                    id: "A",
                    text: "Finding a rare archival piece",
                    weights: &[(TasteTag::ParisArchive, 2)],
                },
                QuizOption {
                    id: "B",
                    text: "Scoring a great deal",
                    weights: &[(TasteTag::DealHunter, 2)],
                },
                QuizOption {
                    id: "C",
                    text: "Discovering a designer gem",
                    weights: &[(TasteTag::DesignerVintage, 2)],
                },
                QuizOption {
                    id: "D",
                    text: "Adding a capsule staple",
                    weights: &[(TasteTag::MinimalCore, 2)],
                },
            ],
        },
        QuizQuestion {
            id: 3,
            prompt: "What's your sweet spot for a single piece?",
            options: &[
                QuizOption {
                    id: "A",
                    text: "Under $50 — I love a bargain",
                    weights: &[(TasteTag::DealHunter, 2)],
                },
                QuizOption {
                    id: "B",
                    text: "$50-150 — quality without splurging",
                    weights: &[(TasteTag::MinimalCore, 1), (TasteTag::NycStreet, 1)],
                },
                QuizOption {
                    id: "C",
                    text: "$150-300 — investing in favorites",
                    weights: &[(TasteTag::DesignerVintage, 1), (TasteTag::ParisArchive, 1)],
                },
                QuizOption {
                    id: "D",
                    text: "No limit for the right piece",
                    weights: &[(TasteTag::ParisArchive, 2)],
                },
            ],
        },
        QuizQuestion {
            id: 4,
            prompt: "Which era speaks to you?",
            options: &[
                QuizOption {
                    id: "A",
                    text: "70s/80s — timeless glamour",
                    weights: &[(TasteTag::ParisArchive, 2)],
                },
                QuizOption {
                    id: "B",
                    text: "90s/Y2K — nostalgic cool",
                    weights: &[(TasteTag::NycStreet, 2)],
                },
                QuizOption {
                    id: "C",
                    text: "Era-less — timeless design",
                    weights: &[(TasteTag::MinimalCore, 2)],
                },
                QuizOption {
                    id: "D",
                    text: "Runway archive — fashion history",
                    weights: &[(TasteTag::DesignerVintage, 2)],
                },
            ],
        },
        QuizQuestion {
            id: 5,
            prompt: "Your dream thrift find?",
            options: &[
                QuizOption {
                    id: "A",
                    text: "A perfectly worn-in vintage coat",
                    weights: &[(TasteTag::ParisArchive, 2)],
                },
                QuizOption {
                    id: "B",
                    text: "Designer piece way under retail",
                    weights: &[(TasteTag::DesignerVintage, 2)],
                },
                QuizOption {
                    id: "C",
                    text: "The perfect fitting jeans",
                    weights: &[(TasteTag::NycStreet, 1), (TasteTag::MinimalCore, 1)],
                },
                QuizOption {
                    id: "D",
                    text: "Hidden gem under $100",
                    weights: &[(TasteTag::DealHunter, 2)],
                },
            ],
        },
    ]
});
