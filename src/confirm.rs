//! Confirmation policy: the narrow capability through which the core
//! asks for operator decisions.
//!
//! # Overview
//!
//! The backup and revert engines never read input directly. They depend
//! on a two-method capability:
//!
//! - [`ConfirmPolicy::confirm`] — a yes/no question about one action
//! - [`ConfirmPolicy::choose`] — pick which file of a group to keep, or
//!   cancel the group
//!
//! Three implementations are provided: [`AutoConfirm`] answers yes and
//! keeps the canonical candidate, [`TerminalPrompt`] asks the operator
//! on stdin, and [`Scripted`] replays pre-seeded answers (useful for
//! non-interactive runs and tests).

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::scanner::FileRecord;

/// Decision source for backup and revert operations.
pub trait ConfirmPolicy {
    /// Ask a yes/no question about one action. `false` leaves the item
    /// untouched.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Present a duplicate group and pick the index of the file to keep.
    /// `None` cancels the whole group with no side effects.
    fn choose(&mut self, files: &[FileRecord]) -> Option<usize>;
}

/// Policy that always proceeds and always keeps the canonical candidate
/// (index 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmPolicy for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }

    fn choose(&mut self, _files: &[FileRecord]) -> Option<usize> {
        Some(0)
    }
}

/// Interactive policy reading operator answers from stdin.
///
/// `confirm` defaults to no; `choose` accepts a 1-based index or `q` to
/// cancel the group, re-asking on invalid input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_line(&self) -> String {
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input).is_err() {
            return String::new();
        }
        input.trim().to_string()
    }
}

impl ConfirmPolicy for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("[y/N] {prompt} ");
        let _ = io::stdout().flush();

        let answer = self.read_line().to_lowercase();
        answer == "y" || answer == "yes"
    }

    fn choose(&mut self, files: &[FileRecord]) -> Option<usize> {
        for (i, file) in files.iter().enumerate() {
            println!("[{}] {}", i + 1, file.path.display());
        }

        loop {
            print!("Which file to keep? (1-{}, q to skip): ", files.len());
            let _ = io::stdout().flush();

            let input = self.read_line();
            if input == "q" || input == "quit" {
                return None;
            }

            match input.parse::<usize>() {
                Ok(choice) if choice >= 1 && choice <= files.len() => {
                    return Some(choice - 1);
                }
                _ => {
                    println!(
                        "Invalid input. Enter a number between 1 and {}, or 'q' to skip.",
                        files.len()
                    );
                }
            }
        }
    }
}

/// Policy replaying a fixed sequence of answers.
///
/// Exhausted queues fall back to yes / keep-first, matching
/// [`AutoConfirm`].
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    confirms: VecDeque<bool>,
    choices: VecDeque<Option<usize>>,
}

impl Scripted {
    /// Create a scripted policy with queued answers.
    #[must_use]
    pub fn new(
        confirms: impl IntoIterator<Item = bool>,
        choices: impl IntoIterator<Item = Option<usize>>,
    ) -> Self {
        Self {
            confirms: confirms.into_iter().collect(),
            choices: choices.into_iter().collect(),
        }
    }
}

impl ConfirmPolicy for Scripted {
    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = self.confirms.pop_front().unwrap_or(true);
        log::debug!("Scripted confirm '{prompt}' -> {answer}");
        answer
    }

    fn choose(&mut self, _files: &[FileRecord]) -> Option<usize> {
        self.choices.pop_front().unwrap_or(Some(0))
    }
}
