//! Text rendering of diagnostics.
//!
//! The human renderer prints a rustc-style report with a source snippet and
//! underlines. The plain renderer prints header, location, notes and help
//! only, and never adds a joke, so its output is stable run to run.

use crate::{Diagnostic, DiagnosticKind, Label};
use colored::{ColoredString, Colorize};
use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

const JOKES: &[&str] = &[
    "I would tell you a UDP joke, but you might not get it.",
    "There are 10 kinds of people: those who read binary and those who don't.",
    "It works on my machine. Ship the machine.",
    "A null walks into a bar. Nobody notices.",
    "Off-by-one errors are the second hardest problem. Or the third.",
    "The bug is not in the compiler. It is never in the compiler.",
    "Have you tried turning the recursion off and on again?",
    "This error message was hand-crafted by a small team of artisans.",
    "Debugging: being the detective in a crime movie where you are also the murderer.",
    "The semicolon was optional. The bug was not.",
    "Somewhere, a rubber duck is waiting to hear about this.",
    "Every program has at least one bug. This one is proving it.",
];

pub const DEFAULT_JOKE_PROBABILITY: f64 = 0.3;

/// Whether the human renderer appends a joke line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JokePolicy {
    Off,
    /// Each render rolls against `probability` using a hash of the seed, a
    /// per-renderer counter and the diagnostic message.
    Seeded { probability: f64, seed: u64 },
}

impl JokePolicy {
    pub fn seeded(seed: u64) -> Self {
        JokePolicy::Seeded {
            probability: DEFAULT_JOKE_PROBABILITY,
            seed,
        }
    }

    /// The default policy, seeded from the system clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::seeded(seed)
    }
}

impl Default for JokePolicy {
    fn default() -> Self {
        Self::from_clock()
    }
}

#[derive(Debug)]
pub struct Renderer {
    color: bool,
    jokes: JokePolicy,
    nonce: Cell<u64>,
}

impl Renderer {
    pub fn new(color: bool, jokes: JokePolicy) -> Self {
        Self {
            color,
            jokes,
            nonce: Cell::new(0),
        }
    }

    /// A renderer for tests and logs: no color, no jokes.
    pub fn plain() -> Self {
        Self::new(false, JokePolicy::Off)
    }

    /// Full report: header, location, snippet with underlines, notes, help and
    /// possibly a joke.
    pub fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        let gutter = self.gutter_width(diag);
        let pad = " ".repeat(gutter);

        let header = format!("{}[{}]", diag.kind.as_str(), diag.code);
        let _ = writeln!(
            out,
            "{}{} {}",
            self.paint_kind(diag.kind, &header),
            self.paint(":", |s| s.bold()),
            self.paint(&diag.message, |s| s.bold())
        );

        if let Some(loc) = diag.location() {
            let _ = writeln!(out, "{pad}{} {loc}", self.paint("-->", |s| s.blue().bold()));
        }

        if let Some(source) = diag.source.as_deref() {
            if !diag.labels.is_empty() {
                self.render_snippet(&mut out, diag, source, gutter);
            }
        }

        let bar = self.paint("=", |s| s.blue().bold());
        for note in &diag.notes {
            let _ = writeln!(out, "{pad} {bar} {}: {note}", self.paint("note", |s| s.bold()));
        }
        if let Some(help) = &diag.help {
            let _ = writeln!(out, "{pad} {bar} {}: {help}", self.paint("help", |s| s.bold()));
        }
        if let Some(joke) = self.roll_joke(&diag.message) {
            let _ = writeln!(
                out,
                "{pad} {bar} {}: {}",
                self.paint("joke", |s| s.bold()),
                self.paint(joke, |s| s.italic())
            );
        }
        out
    }

    /// Header, location arrow, notes and help. No color, snippet or joke.
    pub fn render_plain(diag: &Diagnostic) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{diag}");
        if let Some(loc) = diag.location() {
            let _ = writeln!(out, "  --> {loc}");
        }
        for label in diag.labels.iter().filter(|l| !l.primary) {
            let _ = writeln!(out, "  = also: {} ({})", label.message, label.location);
        }
        for note in &diag.notes {
            let _ = writeln!(out, "  = note: {note}");
        }
        if let Some(help) = &diag.help {
            let _ = writeln!(out, "  = help: {help}");
        }
        out
    }

    fn render_snippet(&self, out: &mut String, diag: &Diagnostic, source: &str, gutter: usize) {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return;
        }
        let first = diag.labels.iter().map(|l| l.location.line).min().unwrap_or(1);
        let last = diag.labels.iter().map(|l| l.location.line).max().unwrap_or(first);
        let start = first.saturating_sub(1).max(1);
        let end = (last + 1).min(lines.len());
        let pad = " ".repeat(gutter);
        let bar = self.paint("|", |s| s.blue().bold());

        let _ = writeln!(out, "{pad} {bar}");
        for line_no in start..=end {
            let Some(text) = lines.get(line_no - 1) else {
                break;
            };
            let number = self.paint(&format!("{line_no:>gutter$}"), |s| s.blue().bold());
            let _ = writeln!(out, "{number} {bar} {text}");
            for label in diag.labels.iter().filter(|l| l.location.line == line_no) {
                let indent = underline_indent(text, label.location.column);
                let _ = writeln!(out, "{pad} {bar} {indent}{}", self.underline(label));
            }
        }
        let _ = writeln!(out, "{pad} {bar}");
    }

    fn underline(&self, label: &Label) -> String {
        let (mark, width) = (if label.primary { "^" } else { "-" }, label.location.width());
        let text = if label.message.is_empty() {
            mark.repeat(width)
        } else {
            format!("{} {}", mark.repeat(width), label.message)
        };
        if label.primary {
            self.paint(&text, |s| s.red().bold())
        } else {
            self.paint(&text, |s| s.blue().bold())
        }
    }

    fn gutter_width(&self, diag: &Diagnostic) -> usize {
        let last = diag.labels.iter().map(|l| l.location.line).max().unwrap_or(1) + 1;
        last.to_string().len()
    }

    fn paint_kind(&self, kind: DiagnosticKind, text: &str) -> String {
        match kind {
            DiagnosticKind::Error => self.paint(text, |s| s.red().bold()),
            DiagnosticKind::Warning => self.paint(text, |s| s.yellow().bold()),
            DiagnosticKind::Note => self.paint(text, |s| s.green().bold()),
            DiagnosticKind::Help => self.paint(text, |s| s.cyan().bold()),
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn roll_joke(&self, message: &str) -> Option<&'static str> {
        let JokePolicy::Seeded { probability, seed } = self.jokes else {
            return None;
        };
        let nonce = self.nonce.get();
        self.nonce.set(nonce.wrapping_add(1));

        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        hasher.update(message.as_bytes());
        let digest = hasher.finalize();

        let mut roll = [0u8; 8];
        roll.copy_from_slice(&digest[..8]);
        let fraction = u64::from_le_bytes(roll) as f64 / u64::MAX as f64;
        if fraction >= probability {
            return None;
        }
        let mut pick = [0u8; 8];
        pick.copy_from_slice(&digest[8..16]);
        let index = (u64::from_le_bytes(pick) % JOKES.len() as u64) as usize;
        JOKES.get(index).copied()
    }
}

/// Whitespace that lines a marker up under `column`, keeping tabs as tabs.
fn underline_indent(text: &str, column: usize) -> String {
    text.chars()
        .take(column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}
