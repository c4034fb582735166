//! The mounted wizard loop.
//!
//! Owns autosave cadence, the transient notice line, and the keyboard chords,
//! and glues the reducer, the step validator, and the session store together.
//! The reducer itself stays side-effect free: store writes happen here,
//! beside the `SaveProgress` dispatches. All resources the loop acquires
//! (raw mode, the poll timer) are released when the controller drops.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::errors::QuoteError;
use crate::questionnaire::{
    is_step_complete, question, Action, Answer, QuestionKind, QuestionnaireState, QuoteResult,
    TOTAL_STEPS,
};
use crate::session::SessionStore;

use super::input::{Key, KeyPress, WizardInput};
use super::view::{Frame, WizardView};

const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// How a wizard run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    /// The user confirmed from the summary view.
    Completed(QuoteResult),
    /// The user left; the session may still be resumable.
    Left,
}

struct Notice {
    text: String,
    until: Instant,
}

pub struct WizardController<I, V> {
    state: QuestionnaireState,
    store: SessionStore,
    config: Config,
    input: I,
    view: V,
    session_id: Option<String>,
    selection: usize,
    draft: String,
    hint: Option<String>,
    notice: Option<Notice>,
    dirty: bool,
    next_autosave: Instant,
}

impl<I: WizardInput, V: WizardView> WizardController<I, V> {
    pub fn new(store: SessionStore, config: Config, input: I, view: V) -> Self {
        let mut state = QuestionnaireState::default();
        state.history.set_limit(config.history_limit);
        let next_autosave = Instant::now() + Duration::from_secs(config.autosave_secs);
        let mut controller = Self {
            state,
            store,
            config,
            input,
            view,
            session_id: None,
            selection: 0,
            draft: String::new(),
            hint: None,
            notice: None,
            dirty: false,
            next_autosave,
        };
        controller.sync_from_state();
        controller
    }

    /// Restores a saved session before the loop starts. Unresolvable ids
    /// fall back to a fresh questionnaire with a warning notice.
    pub fn restore(&mut self, session_id: &str) {
        match self.store.load(session_id) {
            Some(saved) => {
                self.state.apply(Action::LoadState(Box::new(saved)));
                self.session_id = Some(session_id.to_string());
                self.push_notice("Session restored.");
            }
            None => {
                tracing::warn!(session = session_id, "session not found; starting fresh");
                self.push_notice("Saved session could not be restored; starting fresh.");
            }
        }
        self.sync_from_state();
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn state(&self) -> &QuestionnaireState {
        &self.state
    }

    /// Drives the wizard until the user completes or leaves.
    pub fn run(&mut self) -> Result<WizardOutcome, QuoteError> {
        let mut redraw = true;
        loop {
            if self.expire_notice() {
                redraw = true;
            }
            if self.autosave_if_due() {
                redraw = true;
            }
            if redraw {
                self.render();
                redraw = false;
            }
            let Some(key) = self.input.poll_key(POLL_INTERVAL)? else {
                continue;
            };
            redraw = true;
            if let Some(outcome) = self.handle_key(key)? {
                return Ok(outcome);
            }
        }
    }

    fn handle_key(&mut self, key: KeyPress) -> Result<Option<WizardOutcome>, QuoteError> {
        if key.ctrl {
            return self.handle_chord(key);
        }
        if self.on_text_step() {
            return self.handle_text_key(key);
        }
        match key.key {
            Key::Esc => return self.try_leave(),
            Key::Enter => {
                if self.state.current_step >= TOTAL_STEPS {
                    return Ok(Some(self.finalize()));
                }
                self.select_highlighted_radio();
                self.try_advance();
            }
            Key::Left => {
                self.state.apply(Action::PrevStep);
                self.after_navigation();
            }
            Key::Right => self.try_advance(),
            Key::Up => self.move_selection(-1),
            Key::Down => self.move_selection(1),
            Key::Char(' ') => self.toggle_selected_option(),
            Key::Char(ch) if ch.eq_ignore_ascii_case(&'q') => self.toggle_quick_mode(),
            _ => {}
        }
        Ok(None)
    }

    fn handle_chord(&mut self, key: KeyPress) -> Result<Option<WizardOutcome>, QuoteError> {
        let Key::Char(ch) = key.key else {
            return Ok(None);
        };
        match ch.to_ascii_lowercase() {
            's' => {
                self.state.apply(Action::SaveProgress);
                self.save_now(false);
            }
            'z' if key.shift => self.apply_history(Action::Redo),
            'z' => self.apply_history(Action::Undo),
            'y' => self.apply_history(Action::Redo),
            'r' => {
                if self
                    .input
                    .confirm("Reset the questionnaire? This cannot be undone.")?
                {
                    self.state.apply(Action::Reset);
                    self.dirty = true;
                    self.sync_from_state();
                    self.push_notice("Questionnaire reset.");
                }
            }
            'c' => return self.try_leave(),
            _ => {}
        }
        Ok(None)
    }

    fn handle_text_key(&mut self, key: KeyPress) -> Result<Option<WizardOutcome>, QuoteError> {
        match key.key {
            Key::Esc => return self.try_leave(),
            Key::Enter => {
                self.commit_draft();
                self.try_advance();
            }
            Key::Backspace => {
                self.draft.pop();
            }
            Key::Char(ch) => self.draft.push(ch),
            // Focus stays in the text field; arrows do not navigate here.
            _ => {}
        }
        Ok(None)
    }

    fn on_text_step(&self) -> bool {
        self.current_question()
            .is_some_and(|question| question.kind.is_text())
    }

    fn current_question(&self) -> Option<&'static question::Question> {
        question::at(self.state.current_step)
    }

    fn toggle_quick_mode(&mut self) {
        let flag = !self.state.quick_mode;
        self.state.apply(Action::SetQuickMode(flag));
        self.dirty = true;
        self.push_notice(if flag {
            "Quick mode on: step gating relaxed."
        } else {
            "Quick mode off."
        });
    }

    fn apply_history(&mut self, action: Action) {
        self.state.apply(action);
        self.dirty = true;
        self.sync_from_state();
    }

    fn commit_draft(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        let value = Answer::Text(self.draft.clone());
        if self.state.answers.get(question.id) != Some(&value) {
            self.state.apply(Action::SetAnswer {
                id: question.id.to_string(),
                value,
            });
            self.dirty = true;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self
            .current_question()
            .map(|question| question.options.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = (self.selection as isize + delta).rem_euclid(count as isize);
        self.selection = next as usize;
    }

    fn toggle_selected_option(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        let Some(option) = question.options.get(self.selection) else {
            return;
        };
        let value = match question.kind {
            QuestionKind::Radio => Answer::Text((*option).to_string()),
            QuestionKind::Checkbox => {
                let mut picked = self
                    .state
                    .answers
                    .get(question.id)
                    .and_then(Answer::as_multi)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                if let Some(position) = picked.iter().position(|existing| existing == option) {
                    picked.remove(position);
                } else {
                    picked.push((*option).to_string());
                }
                Answer::Multi(picked)
            }
            _ => return,
        };
        self.state.apply(Action::SetAnswer {
            id: question.id.to_string(),
            value,
        });
        self.dirty = true;
        self.hint = None;
    }

    /// Enter on an unanswered radio step adopts the highlighted option.
    fn select_highlighted_radio(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        if question.kind != QuestionKind::Radio {
            return;
        }
        let answered = self
            .state
            .answers
            .get(question.id)
            .is_some_and(|answer| !answer.is_empty());
        if !answered {
            self.toggle_selected_option();
        }
    }

    /// Forward navigation is gated here, not in the reducer: the step must
    /// validate, or quick mode must be on.
    fn try_advance(&mut self) {
        let step = self.state.current_step;
        if step >= TOTAL_STEPS {
            return;
        }
        if self.state.quick_mode || is_step_complete(step, &self.state.answers) {
            self.state.apply(Action::NextStep);
            self.after_navigation();
        } else {
            self.hint = Some("This step needs an answer before moving on.".into());
        }
    }

    fn after_navigation(&mut self) {
        self.dirty = true;
        self.sync_from_state();
    }

    /// Re-derives the selection cursor and the text draft after the step or
    /// the answers changed underneath the view (navigation, undo, restore).
    fn sync_from_state(&mut self) {
        self.hint = None;
        self.selection = 0;
        self.draft.clear();
        let Some(question) = self.current_question() else {
            return;
        };
        if let Some(Answer::Text(value)) = self.state.answers.get(question.id) {
            if question.kind.is_text() {
                self.draft = value.clone();
            } else if let Some(index) = question
                .options
                .iter()
                .position(|option| *option == value.as_str())
            {
                self.selection = index;
            }
        }
    }

    fn finalize(&mut self) -> WizardOutcome {
        let result = QuoteResult::from_answers(&self.state.answers);
        self.state.apply(Action::Complete(result.clone()));
        self.state.apply(Action::SaveProgress);
        self.save_now(false);
        WizardOutcome::Completed(result)
    }

    fn try_leave(&mut self) -> Result<Option<WizardOutcome>, QuoteError> {
        if self.dirty && !self.input.confirm("Leave without saving your progress?")? {
            return Ok(None);
        }
        Ok(Some(WizardOutcome::Left))
    }

    fn save_now(&mut self, automatic: bool) {
        let saved = match &self.session_id {
            Some(id) => self.store.save_as(id, &self.state),
            None => self.store.save(&self.state),
        };
        match saved {
            Some(id) => {
                self.session_id = Some(id);
                self.dirty = false;
                self.push_notice(if automatic {
                    "Progress saved automatically"
                } else {
                    "Progress saved"
                });
            }
            None => {
                self.push_notice("Saving failed; your progress is kept in memory.");
            }
        }
    }

    fn autosave_if_due(&mut self) -> bool {
        if Instant::now() < self.next_autosave {
            return false;
        }
        self.next_autosave = Instant::now() + Duration::from_secs(self.config.autosave_secs);
        if !self.dirty {
            return false;
        }
        tracing::debug!("autosave tick");
        self.state.apply(Action::SaveProgress);
        self.save_now(true);
        true
    }

    fn push_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            until: Instant::now() + Duration::from_secs(self.config.notice_secs),
        });
    }

    fn expire_notice(&mut self) -> bool {
        if let Some(notice) = &self.notice {
            if Instant::now() >= notice.until {
                self.notice = None;
                return true;
            }
        }
        false
    }

    fn render(&mut self) {
        let frame = Frame {
            step: self.state.current_step,
            question: question::at(self.state.current_step),
            answers: &self.state.answers,
            selection: self.selection,
            draft: &self.draft,
            quick_mode: self.state.quick_mode,
            can_undo: self.state.can_undo(),
            can_redo: self.state.can_redo(),
            estimate: self.state.estimate(),
            notice: self.notice.as_ref().map(|notice| notice.text.as_str()),
            hint: self.hint.as_deref(),
        };
        self.view.render(&frame);
    }
}
