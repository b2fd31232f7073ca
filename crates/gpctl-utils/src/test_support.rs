//! Test doubles shared across gpctl crates (feature `test-utils`)

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::prompt::Prompter;
use crate::time::Clock;

pub use crate::paths::{HomeGuard, with_isolated_home};

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    #[must_use]
    pub fn at(ts: i64) -> Self {
        Self(AtomicI64::new(ts))
    }

    pub fn set(&self, ts: i64) {
        self.0.store(ts, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// One scripted reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Choose(Option<usize>),
}

/// Prompter that replays canned answers and records every question asked.
///
/// Running out of answers behaves like an abandoned prompt (decline / no
/// choice).
#[derive(Debug)]
pub struct ScriptedPrompter {
    interactive: bool,
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn interactive(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            interactive: true,
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// A non-interactive prompter that panics if it is ever asked anything
    #[must_use]
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            answers: Mutex::new(VecDeque::new()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    fn record(&self, question: &str) {
        assert!(
            self.interactive,
            "non-interactive prompter was asked: {question}"
        );
        self.asked.lock().unwrap().push(question.to_string());
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn confirm(&self, question: &str, _default: bool) -> bool {
        self.record(question);
        match self.answers.lock().unwrap().pop_front() {
            Some(Answer::Confirm(yes)) => yes,
            Some(other) => panic!("expected a confirm answer for {question:?}, got {other:?}"),
            None => false,
        }
    }

    fn choose(&self, question: &str, options: &[String]) -> Option<usize> {
        self.record(question);
        match self.answers.lock().unwrap().pop_front() {
            Some(Answer::Choose(choice)) => choice.filter(|idx| *idx < options.len()),
            Some(other) => panic!("expected a choice answer for {question:?}, got {other:?}"),
            None => None,
        }
    }
}

/// A token-shaped string that is obviously fake
#[must_use]
pub fn fake_token(seed: u8) -> String {
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut idx = usize::from(seed) % alphabet.len();
    let mut out = String::from("gp_test_");
    for _ in 0..40 {
        out.push(alphabet[idx] as char);
        idx = (idx + 7) % alphabet.len();
    }
    out
}
