//! Console output for tutor answers, note proposals and review feedback

use colored::{Color, Colorize};
use tutor_application::SavedBlock;
use tutor_domain::{ReconcileOutcome, to_light_markup};

const RULE_WIDTH: usize = 20;

/// Formats tutor output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Session banner
    pub fn welcome(backend: &str, notes: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("Loaded {} notes from the {} store.\n\n", notes, backend));
        output.push_str(&Self::header("German Tutor is Ready"));
        output.push_str("Ask me anything about German. Type 'quit' to exit.\n");
        output.push_str(&format!(
            "Type '{}' to review tagged cards.\n",
            "check <tag>".cyan()
        ));
        output
    }

    /// A titled note body followed by a dim rule
    pub fn note_panel(title: &str, content: &str, color: Color) -> String {
        format!(
            "\n{}\n{}\n{}",
            format!("--- {} ---", title).color(color).bold(),
            content,
            "-".repeat(RULE_WIDTH).dimmed()
        )
    }

    /// Panel for a proposal as the tutor wrote it
    pub fn proposal(index: usize, block: &str, existing: bool) -> String {
        let title = if existing {
            format!("Note {} [EXISTING]", index)
        } else {
            format!("Note {}", index)
        };
        Self::note_panel(&title, block, Color::Cyan)
    }

    /// Stored note shown before a keep/overwrite decision
    pub fn stored_note(title: &str, front: &str, back: &str, color: Color) -> String {
        Self::note_panel(
            title,
            &format!("{}\n\n{}", front, to_light_markup(back)),
            color,
        )
    }

    pub fn tutor_answer(text: &str) -> String {
        format!("\n{}\n{}", "Tutor:".cyan().bold(), text)
    }

    pub fn proposal_count(count: usize) -> String {
        format!(
            "\n{}\nTutor has {} new note proposal(s) for you:",
            "-".repeat(33),
            count
        )
    }

    pub fn proposal_position(index: usize, total: usize) -> String {
        format!("\n--- Proposal {} of {} ---", index, total)
    }

    /// One line describing what reconciliation did
    pub fn outcome(outcome: ReconcileOutcome, front: Option<&str>) -> String {
        let front = front.unwrap_or_default();
        match outcome {
            ReconcileOutcome::Inserted => format!("{} Added new note '{}'.", "v".green(), front),
            ReconcileOutcome::Updated => {
                format!("{} Updated existing note '{}'.", "v".green(), front)
            }
            ReconcileOutcome::Kept => "Keeping existing note.".to_string(),
            ReconcileOutcome::Skipped => "Not a vocabulary note, skipping.".dimmed().to_string(),
        }
    }

    /// Result line for one accepted proposal
    pub fn saved_block(saved: SavedBlock, front: Option<&str>) -> String {
        if saved.archived && saved.outcome == ReconcileOutcome::Skipped {
            return format!("{} Added grammar note to the notebook.", "v".green());
        }
        Self::outcome(saved.outcome, front)
    }

    /// Per-response summary; `None` when nothing was saved
    pub fn saved_summary(count: usize) -> Option<String> {
        (count > 0).then(|| format!("{} Saved {} new note(s)!", "v".green(), count))
    }

    pub fn batch_header(index: usize, total: usize) -> String {
        format!("\n--- Checking Batch {} of {} ---", index + 1, total)
            .bold()
            .to_string()
    }

    pub fn feedback(index: usize, total: usize, text: &str) -> String {
        format!(
            "\n{}\n{}",
            format!("--- Feedback {} of {} ---", index + 1, total)
                .cyan()
                .bold(),
            text
        )
    }

    pub fn error(message: impl std::fmt::Display) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(45);
        format!("{}\n  {}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }
}
