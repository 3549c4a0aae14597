//! REPL (Read-Eval-Print Loop) for the tutoring session

use super::prompt::{confirm_save, pause_on};
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::io::{self, BufRead, Write};
use tracing::debug;
use tutor_application::{
    AnswerGateway, AskTutorUseCase, DuplicateResolver, NoteStore, RetryNotifier, ReviewBatch,
    ReviewCardsUseCase, SaveNoteUseCase, SessionParams,
};
use tutor_domain::{ReconciliationCache, TutorPromptTemplate, classify, split_response};

/// One line of user input, interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Empty,
    Quit,
    /// `check` or `check <tag>`
    Check(Option<&'a str>),
    Question(&'a str),
}

/// Interpret a line typed at the prompt.
pub fn parse_command(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }

    let lower = line.to_lowercase();
    if lower == "quit" || lower == "exit" {
        return ReplCommand::Quit;
    }

    let mut words = line.split_whitespace();
    if words.next().is_some_and(|w| w.eq_ignore_ascii_case("check")) {
        match (words.next(), words.next()) {
            (None, _) => return ReplCommand::Check(None),
            (Some(tag), None) => return ReplCommand::Check(Some(tag)),
            _ => {}
        }
    }

    ReplCommand::Question(line)
}

/// Show one batch's feedback, pausing between items.
///
/// Returns `true` if the user quit before the last item.
pub fn page_feedback<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    feedback: &[String],
) -> io::Result<bool> {
    for (idx, item) in feedback.iter().enumerate() {
        writeln!(output, "{}", ConsoleFormatter::feedback(idx, feedback.len(), item))?;
        if idx + 1 < feedback.len() {
            if pause_on(input, output, "\nPress Enter to see the next result...")? {
                return Ok(true);
            }
        } else {
            writeln!(output, "\nEnd of batch results.")?;
        }
    }
    Ok(false)
}

/// Whether review goes on after a finished batch.
///
/// A quit while paging ends the review without asking again; the last
/// batch never asks.
pub fn continue_review<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    batch: &ReviewBatch,
    quit_in_batch: bool,
) -> io::Result<bool> {
    if quit_in_batch {
        return Ok(false);
    }
    if batch.is_last() {
        return Ok(true);
    }
    let quit = pause_on(
        input,
        output,
        "\nPress Enter to go to the next batch, or type 'q' to quit: ",
    )?;
    Ok(!quit)
}

/// Interactive tutoring session
pub struct TutorRepl<G, S, D>
where
    G: AnswerGateway + 'static,
    S: NoteStore + 'static,
    D: DuplicateResolver + 'static,
{
    ask: AskTutorUseCase<G>,
    save: SaveNoteUseCase<S, D>,
    review: ReviewCardsUseCase<G, S>,
    params: SessionParams,
    cache: ReconciliationCache,
    show_progress: bool,
}

impl<G, S, D> TutorRepl<G, S, D>
where
    G: AnswerGateway + 'static,
    S: NoteStore + 'static,
    D: DuplicateResolver + 'static,
{
    pub fn new(
        ask: AskTutorUseCase<G>,
        save: SaveNoteUseCase<S, D>,
        review: ReviewCardsUseCase<G, S>,
        params: SessionParams,
        cache: ReconciliationCache,
    ) -> Self {
        Self {
            ask,
            save,
            review,
            params,
            cache,
            show_progress: true,
        }
    }

    /// Set whether to show a spinner while waiting
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL until `quit` or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        // In-memory history only
        let mut line_editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("You".to_string()),
            DefaultPromptSegment::Empty,
        );

        loop {
            println!();
            let line = match line_editor.read_line(&prompt)? {
                Signal::Success(buffer) => buffer,
                Signal::CtrlC => continue,
                Signal::CtrlD => break,
            };

            match parse_command(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Quit => break,
                ReplCommand::Check(tag) => {
                    let tag = self.params.review_tag_or_default(tag).to_string();
                    self.check_cards(&tag).await;
                }
                ReplCommand::Question(question) => self.process_question(question).await,
            }
        }

        println!("\nAuf Wiedersehen!");
        Ok(())
    }

    fn notifier(&self) -> Box<dyn RetryNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    async fn process_question(&mut self, question: &str) {
        let mode = self.params.mode;
        let progress = self.notifier();
        let answer = match self
            .ask
            .execute_with_progress(
                question,
                &TutorPromptTemplate::system_instruction(mode),
                progress.as_ref(),
            )
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::error(e));
                return;
            }
        };

        let split = split_response(&answer, mode.tag());
        if !split.has_proposals() {
            println!("{}", ConsoleFormatter::tutor_answer(&answer));
            return;
        }

        println!("{}", ConsoleFormatter::tutor_answer(&split.preamble));
        let total = split.blocks.len();
        println!("{}", ConsoleFormatter::proposal_count(total));

        let mut saved = 0;
        for (i, item) in split.blocks.into_iter().enumerate() {
            let index = i + 1;
            let block = item.raw_block().to_string();
            let classified = classify(item);
            let existing = classified.front().is_some_and(|f| self.cache.contains(f));

            println!("{}", ConsoleFormatter::proposal_position(index, total));
            println!("{}", ConsoleFormatter::proposal(index, &block, existing));

            match confirm_save() {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    eprintln!("{}", ConsoleFormatter::error(e));
                    break;
                }
            }

            match self.save.save_block(&mut self.cache, &classified, &block).await {
                Ok(result) => {
                    debug!(
                        index,
                        outcome = %result.outcome,
                        archived = result.archived,
                        "Proposal saved"
                    );
                    println!(
                        "{}",
                        ConsoleFormatter::saved_block(result, classified.front())
                    );
                    if result.outcome.is_saved() {
                        saved += 1;
                    }
                }
                Err(e) => eprintln!("{}", ConsoleFormatter::error(e)),
            }
        }

        if let Some(summary) = ConsoleFormatter::saved_summary(saved) {
            println!("{}", summary);
        }
    }

    async fn check_cards(&self, tag: &str) {
        println!("Fetching notes with tag '{}'...", tag);
        let batches = match self.review.fetch_batches(tag).await {
            Ok(batches) => batches,
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::error(e));
                return;
            }
        };

        let Some(first) = batches.first() else {
            println!("No notes found with tag '{}'.", tag);
            return;
        };
        let cards: usize = batches.iter().map(|b| b.cards.len()).sum();
        println!(
            "Found {} notes. Processing in batches of {}...",
            cards,
            first.cards.len()
        );

        for batch in &batches {
            println!("{}", ConsoleFormatter::batch_header(batch.index, batch.total));

            let progress = self.notifier();
            let feedback = match self.review.review_batch(batch, progress.as_ref()).await {
                Ok(feedback) => feedback,
                Err(e) => {
                    eprintln!("{}", ConsoleFormatter::error(e));
                    continue;
                }
            };

            let stdin = io::stdin();
            // Quitting mid-batch still removes the tag below
            let quit = page_feedback(&mut stdin.lock(), &mut io::stdout(), &feedback)
                .unwrap_or(true);

            match self.review.finish_batch(batch, tag).await {
                Ok(0) => {}
                Ok(n) => println!("Removed '{}' tag from {} notes.", tag, n),
                Err(e) => eprintln!("{}", ConsoleFormatter::error(e)),
            }

            let go_on = continue_review(&mut stdin.lock(), &mut io::stdout(), batch, quit)
                .unwrap_or(false);
            if !go_on {
                println!("Exiting card review.");
                break;
            }
        }
    }
}
