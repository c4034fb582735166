//! The questionnaire state machine: the sole mutable aggregate and the closed
//! action set that mutates it.
//!
//! Every action is total over the state. Navigation clamps instead of
//! wrapping, undo/redo outside the history bounds are no-ops, and nothing in
//! here performs I/O: persistence happens beside `SaveProgress` dispatches,
//! never inside the reducer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::questionnaire::answer::Answer;
use crate::questionnaire::history::HistoryStack;
use crate::questionnaire::pricing::{self, QuoteResult};
use crate::questionnaire::question::{self, TOTAL_STEPS};

pub type AnswerMap = BTreeMap<String, Answer>;

/// Content fields captured in a history entry. Never contains the history
/// itself, so entries stay flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_step: usize,
    pub answers: AnswerMap,
    pub quick_mode: bool,
    pub is_complete: bool,
}

/// Governs which content mutations append a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckpointPolicy {
    /// Every content-changing action snapshots.
    #[default]
    EveryMutation,
    /// Only step transitions snapshot, for coarser undo.
    StepTransitions,
}

impl CheckpointPolicy {
    fn records_edits(self) -> bool {
        matches!(self, CheckpointPolicy::EveryMutation)
    }
}

/// The closed set of legal state mutators.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAnswer { id: String, value: Answer },
    NextStep,
    PrevStep,
    SetQuickMode(bool),
    /// Marker only; the controller performs the store write beside the
    /// dispatch.
    SaveProgress,
    /// Irreversible; callers confirm with the user before dispatching.
    Reset,
    /// Verbatim replacement with a previously saved snapshot.
    LoadState(Box<QuestionnaireState>),
    Undo,
    Redo,
    /// Issued once from the summary view to finalize the quote.
    Complete(QuoteResult),
}

/// Flat fields older snapshots stored beside the answer map. Tolerated on
/// load and re-emitted on save so older readers keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LegacyFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(rename = "subIndustry", default, skip_serializing_if = "Option::is_none")]
    pub sub_industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(rename = "isCompleted", default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl LegacyFields {
    fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// The questionnaire aggregate. Mutated exclusively through [`apply`].
///
/// [`apply`]: QuestionnaireState::apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionnaireState {
    pub current_step: usize,
    pub answers: AnswerMap,
    pub quick_mode: bool,
    #[serde(flatten)]
    pub history: HistoryStack,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_result: Option<QuoteResult>,
    #[serde(flatten)]
    pub legacy: LegacyFields,
    #[serde(skip)]
    pub checkpoint_policy: CheckpointPolicy,
}

impl QuestionnaireState {
    /// Captures the content fields for a history entry.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_step: self.current_step,
            answers: self.answers.clone(),
            quick_mode: self.quick_mode,
            is_complete: self.is_complete,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Derived estimate for the current answers; a read, not a side effect.
    pub fn estimate(&self) -> i64 {
        pricing::estimate_cost(&self.answers)
    }

    /// Applies `action`. Total over the state: no variant panics or errors.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetAnswer { id, value } => {
                let record = self.checkpoint_policy.records_edits();
                self.mutate(record, |state| {
                    state.answers.insert(id, value);
                });
            }
            Action::NextStep => {
                if self.current_step < TOTAL_STEPS {
                    self.mutate(true, |state| state.current_step += 1);
                }
            }
            Action::PrevStep => {
                if self.current_step > 0 {
                    self.mutate(true, |state| state.current_step -= 1);
                }
            }
            Action::SetQuickMode(flag) => {
                let record = self.checkpoint_policy.records_edits();
                self.mutate(record, |state| state.quick_mode = flag);
            }
            Action::SaveProgress => {}
            Action::Reset => self.reset(),
            Action::LoadState(snapshot) => self.load(*snapshot),
            Action::Undo => {
                if let Some(snapshot) = self.history.undo() {
                    self.restore(snapshot);
                }
            }
            Action::Redo => {
                if let Some(snapshot) = self.history.redo() {
                    self.restore(snapshot);
                }
            }
            Action::Complete(result) => {
                self.is_complete = true;
                self.quote_result = Some(result);
            }
        }
    }

    fn mutate(&mut self, record: bool, change: impl FnOnce(&mut Self)) {
        let before = self.snapshot();
        change(self);
        if record {
            let after = self.snapshot();
            if after != before {
                self.history.record(before, after);
            }
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.current_step = snapshot.current_step;
        self.answers = snapshot.answers;
        self.quick_mode = snapshot.quick_mode;
        self.is_complete = snapshot.is_complete;
    }

    fn reset(&mut self) {
        let policy = self.checkpoint_policy;
        let limit = self.history.limit();
        *self = Self::default();
        self.checkpoint_policy = policy;
        self.history.set_limit(limit);
    }

    fn load(&mut self, mut snapshot: QuestionnaireState) {
        snapshot.checkpoint_policy = self.checkpoint_policy;
        snapshot.history.set_limit(self.history.limit());
        *self = snapshot;
    }

    /// Mirrors the well-known answers into the flat fields older readers
    /// expect. Called on the serialization path only.
    pub fn sync_legacy_mirror(&mut self) {
        self.legacy = LegacyFields {
            industry: text_answer(&self.answers, question::INDUSTRY),
            sub_industry: text_answer(&self.answers, question::SUB_INDUSTRY),
            goals: multi_answer(&self.answers, question::GOALS),
            features: multi_answer(&self.answers, question::FEATURES),
            pages: text_answer(&self.answers, question::PAGES),
            timeline: text_answer(&self.answers, question::TIMELINE),
            is_completed: Some(self.is_complete),
        };
    }

    /// Folds flat legacy fields from older snapshots into the answer map,
    /// then clears the mirror. The map always wins when both are present.
    pub fn absorb_legacy_fields(&mut self) {
        if self.legacy.is_clear() {
            return;
        }
        let legacy = std::mem::take(&mut self.legacy);
        self.absorb_text(question::INDUSTRY, legacy.industry);
        self.absorb_text(question::SUB_INDUSTRY, legacy.sub_industry);
        self.absorb_multi(question::GOALS, legacy.goals);
        self.absorb_multi(question::FEATURES, legacy.features);
        self.absorb_text(question::PAGES, legacy.pages);
        self.absorb_text(question::TIMELINE, legacy.timeline);
        if let Some(completed) = legacy.is_completed {
            self.is_complete = self.is_complete || completed;
        }
    }

    fn absorb_text(&mut self, id: &str, value: Option<String>) {
        if let Some(value) = value {
            self.answers
                .entry(id.to_string())
                .or_insert(Answer::Text(value));
        }
    }

    fn absorb_multi(&mut self, id: &str, value: Option<Vec<String>>) {
        if let Some(values) = value {
            self.answers
                .entry(id.to_string())
                .or_insert(Answer::Multi(values));
        }
    }
}

fn text_answer(answers: &AnswerMap, id: &str) -> Option<String> {
    answers.get(id).and_then(Answer::as_text).map(str::to_string)
}

fn multi_answer(answers: &AnswerMap, id: &str) -> Option<Vec<String>> {
    answers.get(id).and_then(Answer::as_multi).map(<[String]>::to_vec)
}
