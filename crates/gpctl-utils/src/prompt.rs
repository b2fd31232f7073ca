//! User interaction seam
//!
//! Components never read stdin directly. They ask a [`Prompter`], which is the
//! terminal in normal use, a fixed-answer implementation for non-interactive
//! runs, and a scripted one in tests.

use std::io::{self, BufRead, IsTerminal, Write};

/// Questions a component may ask the user
pub trait Prompter: Send + Sync {
    /// Whether a human can answer prompts
    fn is_interactive(&self) -> bool;

    /// Ask a yes/no question. An abandoned prompt (EOF) is a decline.
    fn confirm(&self, question: &str, default: bool) -> bool;

    /// Ask the user to pick one of `options`; `None` when nothing was chosen
    fn choose(&self, question: &str, options: &[String]) -> Option<usize>;
}

/// Prompts on stderr and reads answers from stdin
#[derive(Debug, Default)]
pub struct TerminalPrompter;

const MAX_CHOICE_ATTEMPTS: usize = 3;

impl TerminalPrompter {
    /// Terminal prompter when stdin is a TTY and `non_interactive` is not set
    #[must_use]
    pub fn detect(non_interactive: bool) -> Box<dyn Prompter> {
        if !non_interactive && io::stdin().is_terminal() {
            Box::new(TerminalPrompter)
        } else {
            Box::new(NonInteractivePrompter)
        }
    }

    fn read_answer() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        true
    }

    fn confirm(&self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{question} {hint} ");
        let _ = stderr.flush();

        match Self::read_answer() {
            Some(answer) => parse_confirm(&answer, default),
            None => false,
        }
    }

    fn choose(&self, question: &str, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        let mut stderr = io::stderr();
        let _ = writeln!(stderr, "{question}");
        for (idx, option) in options.iter().enumerate() {
            let _ = writeln!(stderr, "  {}) {option}", idx + 1);
        }

        for _ in 0..MAX_CHOICE_ATTEMPTS {
            let _ = write!(stderr, "Enter a number (1-{}): ", options.len());
            let _ = stderr.flush();
            let answer = Self::read_answer()?;
            if answer.trim().is_empty() {
                return None;
            }
            if let Some(idx) = parse_choice(&answer, options.len()) {
                return Some(idx);
            }
            let _ = writeln!(stderr, "'{}' is not a valid choice", answer.trim());
        }
        None
    }
}

/// Answers every question with its default and never chooses
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn is_interactive(&self) -> bool {
        false
    }

    fn confirm(&self, _question: &str, default: bool) -> bool {
        default
    }

    fn choose(&self, _question: &str, _options: &[String]) -> Option<usize> {
        None
    }
}

/// Interpret a yes/no answer; blank means `default`, anything unknown is a no
#[must_use]
pub fn parse_confirm(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Interpret a 1-based menu choice as a 0-based index
#[must_use]
pub fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirm() {
        assert!(parse_confirm("", true));
        assert!(!parse_confirm("\n", false));
        assert!(parse_confirm("y\n", false));
        assert!(parse_confirm(" YES ", false));
        assert!(!parse_confirm("n", true));
        assert!(!parse_confirm("maybe", true));
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n", 3), Some(0));
        assert_eq!(parse_choice("3", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
    }

    #[test]
    fn test_non_interactive_uses_defaults() {
        let p = NonInteractivePrompter;
        assert!(!p.is_interactive());
        assert!(p.confirm("?", true));
        assert!(!p.confirm("?", false));
        assert_eq!(p.choose("?", &["a".to_string()]), None);
    }

    #[test]
    fn test_detect_respects_flag() {
        assert!(!TerminalPrompter::detect(true).is_interactive());
    }
}
