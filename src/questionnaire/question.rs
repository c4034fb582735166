//! Static definitions of the questionnaire steps.
//!
//! The step list is fixed at build time; runtime state only references steps
//! by index and answers by id. Rendering and validation both read these
//! descriptors to interpret the answer map.

use once_cell::sync::Lazy;

/// Number of question steps. `current_step == TOTAL_STEPS` is the summary view.
pub const TOTAL_STEPS: usize = 8;

/// Well-known answer keys referenced by validation and pricing.
pub const INDUSTRY: &str = "industry";
pub const SUB_INDUSTRY: &str = "sub_industry";
pub const GOALS: &str = "goals";
pub const FEATURES: &str = "features";
pub const PAGES: &str = "pages";
pub const TIMELINE: &str = "timeline";
pub const DESCRIPTION: &str = "description";
pub const CONTACT: &str = "contact";

/// Input style of a questionnaire step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Checkbox,
    Radio,
    Textarea,
    Input,
}

impl QuestionKind {
    /// True when the step collects free text rather than a choice.
    pub fn is_text(self) -> bool {
        matches!(self, QuestionKind::Textarea | QuestionKind::Input)
    }
}

/// Declarative description of a single questionnaire step.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: QuestionKind,
    pub options: &'static [&'static str],
    pub placeholder: Option<&'static str>,
}

static QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question {
            id: INDUSTRY,
            title: "What industry are you in?",
            description: "Pick the sector closest to your business.",
            kind: QuestionKind::Radio,
            options: &[
                "Healthcare",
                "Technology",
                "Retail & E-commerce",
                "Finance",
                "Education",
                "Hospitality",
                "Real Estate",
                "Other",
            ],
            placeholder: None,
        },
        Question {
            id: SUB_INDUSTRY,
            title: "Tell us more about your niche",
            description: "A few words about what you do within that industry.",
            kind: QuestionKind::Input,
            options: &[],
            placeholder: Some("e.g. Dental clinic"),
        },
        Question {
            id: GOALS,
            title: "What should the site achieve?",
            description: "Select every goal that applies.",
            kind: QuestionKind::Checkbox,
            options: &[
                "Generate leads",
                "Sell products online",
                "Build brand awareness",
                "Share information",
                "Book appointments",
            ],
            placeholder: None,
        },
        Question {
            id: FEATURES,
            title: "Which features do you need?",
            description: "Feature choices drive the estimate the most.",
            kind: QuestionKind::Checkbox,
            options: &[
                "E-commerce",
                "Booking system",
                "Blog / CMS",
                "Member portal",
                "Live chat",
                "Multilingual support",
                "Custom integrations",
            ],
            placeholder: None,
        },
        Question {
            id: PAGES,
            title: "How many pages do you expect?",
            description: "A rough count is fine.",
            kind: QuestionKind::Radio,
            options: &["1-5", "6-10", "11-20", "20+"],
            placeholder: None,
        },
        Question {
            id: TIMELINE,
            title: "When do you need it?",
            description: "Rush work carries a surcharge; flexible timelines earn a discount.",
            kind: QuestionKind::Radio,
            options: &[
                "Rush (2-4 weeks)",
                "Standard (1-2 months)",
                "Flexible (3+ months)",
            ],
            placeholder: None,
        },
        Question {
            id: DESCRIPTION,
            title: "Describe your project",
            description: "Anything else we should know: style, references, must-haves.",
            kind: QuestionKind::Textarea,
            options: &[],
            placeholder: Some("Tell us about your vision"),
        },
        Question {
            id: CONTACT,
            title: "Where can we reach you?",
            description: "An email address or company name for the quote.",
            kind: QuestionKind::Input,
            options: &[],
            placeholder: Some("name@company.com"),
        },
    ]
});

/// All question definitions in step order.
pub fn all() -> &'static [Question] {
    &QUESTIONS
}

/// The question shown at `step`, if the index addresses one.
pub fn at(step: usize) -> Option<&'static Question> {
    QUESTIONS.get(step)
}
