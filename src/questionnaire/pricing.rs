//! Deterministic quote pricing derived from the answer map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::questionnaire::answer::Answer;
use crate::questionnaire::question;
use crate::questionnaire::state::AnswerMap;

/// Starting figure before any multiplier applies, in whole currency units.
pub const BASE_COST: f64 = 2500.0;

const FEATURE_MULTIPLIERS: &[(&str, f64)] = &[
    ("E-commerce", 1.8),
    ("Booking system", 1.4),
    ("Blog / CMS", 1.2),
    ("Member portal", 1.5),
    ("Live chat", 1.15),
    ("Multilingual support", 1.3),
    ("Custom integrations", 1.6),
];

const INDUSTRY_MULTIPLIERS: &[(&str, f64)] = &[
    ("Healthcare", 1.4),
    ("Finance", 1.35),
    ("Retail & E-commerce", 1.3),
    ("Technology", 1.25),
    ("Real Estate", 1.2),
    ("Hospitality", 1.15),
    ("Education", 1.1),
    ("Other", 1.0),
];

const TIMELINE_MULTIPLIERS: &[(&str, f64)] = &[
    ("Rush (2-4 weeks)", 1.5),
    ("Standard (1-2 months)", 1.0),
    ("Flexible (3+ months)", 0.9),
];

fn lookup(table: &[(&str, f64)], name: &str) -> f64 {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

/// Estimates the project cost for `answers`, rounded to whole units.
///
/// Multipliers compound in a fixed order: each selected feature in the
/// collection's insertion order, then industry, then timeline. Unrecognized
/// names contribute a factor of 1.0.
pub fn estimate_cost(answers: &AnswerMap) -> i64 {
    let mut cost = BASE_COST;
    if let Some(features) = answers.get(question::FEATURES).and_then(Answer::as_multi) {
        for feature in features {
            cost *= lookup(FEATURE_MULTIPLIERS, feature);
        }
    }
    if let Some(industry) = answers.get(question::INDUSTRY).and_then(Answer::as_text) {
        cost *= lookup(INDUSTRY_MULTIPLIERS, industry);
    }
    if let Some(timeline) = answers.get(question::TIMELINE).and_then(Answer::as_text) {
        cost *= lookup(TIMELINE_MULTIPLIERS, timeline);
    }
    cost.round() as i64
}

/// Final figure produced when the user confirms from the summary view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub estimated_cost: i64,
    pub currency: String,
    pub generated_at: DateTime<Utc>,
}

impl QuoteResult {
    pub fn from_answers(answers: &AnswerMap) -> Self {
        Self {
            estimated_cost: estimate_cost(answers),
            currency: "USD".into(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::question::{FEATURES, INDUSTRY, TIMELINE};

    fn scenario_answers() -> AnswerMap {
        let mut answers = AnswerMap::new();
        answers.insert(FEATURES.into(), Answer::multi(["E-commerce"]));
        answers.insert(INDUSTRY.into(), Answer::text("Healthcare"));
        answers.insert(TIMELINE.into(), Answer::text("Rush (2-4 weeks)"));
        answers
    }

    #[test]
    fn empty_answers_price_at_base() {
        assert_eq!(estimate_cost(&AnswerMap::new()), 2500);
    }

    #[test]
    fn rush_healthcare_ecommerce_scenario() {
        // 2500 * 1.8 * 1.4 * 1.5 = 9450
        assert_eq!(estimate_cost(&scenario_answers()), 9450);
    }

    #[test]
    fn identical_answers_price_identically() {
        let answers = scenario_answers();
        assert_eq!(estimate_cost(&answers), estimate_cost(&answers));
    }

    #[test]
    fn feature_order_does_not_change_the_figure() {
        let mut forward = AnswerMap::new();
        forward.insert(
            FEATURES.into(),
            Answer::multi(["E-commerce", "Booking system"]),
        );
        let mut reversed = AnswerMap::new();
        reversed.insert(
            FEATURES.into(),
            Answer::multi(["Booking system", "E-commerce"]),
        );
        assert_eq!(estimate_cost(&forward), estimate_cost(&reversed));
        // 2500 * 1.8 * 1.4 = 6300
        assert_eq!(estimate_cost(&forward), 6300);
    }

    #[test]
    fn unrecognized_names_contribute_nothing() {
        let mut answers = AnswerMap::new();
        answers.insert(FEATURES.into(), Answer::multi(["Hologram support"]));
        answers.insert(INDUSTRY.into(), Answer::text("Space mining"));
        answers.insert(TIMELINE.into(), Answer::text("Yesterday"));
        assert_eq!(estimate_cost(&answers), 2500);
    }

    #[test]
    fn text_shaped_features_are_ignored() {
        let mut answers = AnswerMap::new();
        answers.insert(FEATURES.into(), Answer::text("E-commerce"));
        assert_eq!(estimate_cost(&answers), 2500);
    }

    #[test]
    fn quote_result_carries_the_estimate() {
        let result = QuoteResult::from_answers(&scenario_answers());
        assert_eq!(result.estimated_cost, 9450);
        assert_eq!(result.currency, "USD");
    }
}
