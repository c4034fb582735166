//! Terminal rendering for the wizard loop.

use std::io::{self, Write};

use colored::Colorize;
use crossterm::{cursor, terminal, ExecutableCommand};

use crate::questionnaire::{question, Answer, AnswerMap, Question, QuestionKind, TOTAL_STEPS};

/// Everything the view needs to draw one frame of the wizard.
pub struct Frame<'a> {
    pub step: usize,
    /// `None` on the summary view.
    pub question: Option<&'a Question>,
    pub answers: &'a AnswerMap,
    pub selection: usize,
    pub draft: &'a str,
    pub quick_mode: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub estimate: i64,
    pub notice: Option<&'a str>,
    pub hint: Option<&'a str>,
}

/// Rendering seam for the controller; tests record frames instead.
pub trait WizardView {
    fn render(&mut self, frame: &Frame<'_>);
}

#[derive(Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    fn render_step(&self, lines: &mut Vec<String>, frame: &Frame<'_>, question: &Question) {
        lines.push(
            format!(
                "Step {} of {} – {}",
                frame.step + 1,
                TOTAL_STEPS,
                question.title
            )
            .bold()
            .to_string(),
        );
        lines.push(question.description.dimmed().to_string());
        lines.push(String::new());

        match question.kind {
            QuestionKind::Checkbox | QuestionKind::Radio => {
                for (index, option) in question.options.iter().enumerate() {
                    let marker = if index == frame.selection { ">" } else { " " };
                    let picked = self.is_picked(frame.answers, question, option);
                    let box_marker = match (question.kind, picked) {
                        (QuestionKind::Checkbox, true) => "[x]",
                        (QuestionKind::Checkbox, false) => "[ ]",
                        (_, true) => "(o)",
                        (_, false) => "( )",
                    };
                    let line = format!("{marker} {box_marker} {option}");
                    if picked {
                        lines.push(line.bright_green().to_string());
                    } else {
                        lines.push(line);
                    }
                }
                lines.push(String::new());
                lines.push(
                    "Up/Down highlight, Space select, Enter continue, Left back, Q quick mode"
                        .dimmed()
                        .to_string(),
                );
            }
            QuestionKind::Textarea | QuestionKind::Input => {
                if frame.draft.is_empty() {
                    let placeholder = question.placeholder.unwrap_or("type your answer");
                    lines.push(format!("> {}", placeholder.dimmed()));
                } else {
                    lines.push(format!("> {}_", frame.draft));
                }
                lines.push(String::new());
                lines.push("Type your answer, Enter to continue".dimmed().to_string());
            }
        }
    }

    fn render_summary(&self, lines: &mut Vec<String>, frame: &Frame<'_>) {
        lines.push("Quote summary".bold().to_string());
        lines.push(String::new());
        for question in question::all() {
            let rendered = frame
                .answers
                .get(question.id)
                .map(format_answer)
                .unwrap_or_else(|| "(unanswered)".dimmed().to_string());
            lines.push(format!("  {}: {}", question.title, rendered));
        }
        lines.push(String::new());
        lines.push("Press Enter to confirm your quote request.".to_string());
    }

    fn is_picked(&self, answers: &AnswerMap, question: &Question, option: &str) -> bool {
        match answers.get(question.id) {
            Some(Answer::Text(value)) => value == option,
            Some(Answer::Multi(values)) => values.iter().any(|value| value == option),
            _ => false,
        }
    }
}

impl WizardView for TerminalView {
    fn render(&mut self, frame: &Frame<'_>) {
        let mut lines = Vec::new();
        match frame.question {
            Some(question) => self.render_step(&mut lines, frame, question),
            None => self.render_summary(&mut lines, frame),
        }

        lines.push(String::new());
        let mut status = vec![format!("Estimated cost: ${}", frame.estimate)];
        if frame.quick_mode {
            status.push("quick mode".bright_yellow().to_string());
        }
        if frame.can_undo {
            status.push("Ctrl+Z undo".dimmed().to_string());
        }
        if frame.can_redo {
            status.push("Ctrl+Y redo".dimmed().to_string());
        }
        lines.push(status.join("  |  "));

        if let Some(hint) = frame.hint {
            lines.push(hint.bright_yellow().to_string());
        }
        if let Some(notice) = frame.notice {
            lines.push(notice.bright_green().to_string());
        }

        // Raw mode needs explicit carriage returns; redraw from the top left.
        let mut stdout = io::stdout();
        let _ = stdout.execute(terminal::Clear(terminal::ClearType::All));
        let _ = stdout.execute(cursor::MoveTo(0, 0));
        for line in lines {
            let _ = write!(stdout, "{line}\r\n");
        }
        let _ = stdout.flush();
    }
}

/// Renders an answer for summaries and `show` output.
pub fn format_answer(answer: &Answer) -> String {
    match answer {
        Answer::Text(value) => value.clone(),
        Answer::Multi(values) => values.join(", "),
        Answer::Number(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_render_readably() {
        assert_eq!(format_answer(&Answer::text("Healthcare")), "Healthcare");
        assert_eq!(
            format_answer(&Answer::multi(["E-commerce", "Live chat"])),
            "E-commerce, Live chat"
        );
        assert_eq!(format_answer(&Answer::Number(12.0)), "12");
    }
}
