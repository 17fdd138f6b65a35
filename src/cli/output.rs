//! Handles all user-facing output for the CLI.
//!
//! [`TextListener`] reports a run as it happens: one progress mark per test, then the
//! failure list and a summary once the run finishes. Plan and listing output lives here
//! too, so every command prints through the same coloured writer.

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::description::Description;
use crate::notification::{Failure, Outcome, RunListener, RunResult};

// ============================================================================
// RUN LISTENER
// ============================================================================

pub struct TextListener<W: WriteColor> {
    out: W,
}

impl<W: WriteColor> TextListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn mark(&mut self, text: &str, color: Option<Color>) {
        let _ = self.out.set_color(ColorSpec::new().set_fg(color).set_bold(color.is_some()));
        let _ = write!(self.out, "{}", text);
        let _ = self.out.reset();
    }

    fn print_failure(&mut self, number: usize, failure: &Failure) {
        let _ = writeln!(self.out, "{}) {}", number, failure.test_header());
        let _ = writeln!(self.out, "{}", failure.message());
        if let Some((expected, actual)) = failure.cause().comparison() {
            let changeset = Changeset::new(expected, actual, "\n");
            print_diff(&mut self.out, &changeset.diffs);
        }
    }

    fn print_summary(&mut self, result: &RunResult) {
        if result.was_successful() {
            let _ = self.out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
            let _ = writeln!(self.out, "OK ({} tests)", result.run_count());
        } else {
            let _ = self.out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            let _ = writeln!(self.out, "FAILURES!!!");
            let _ = writeln!(
                self.out,
                "Tests run: {},  Failures: {}",
                result.run_count(),
                result.failure_count()
            );
        }
        let _ = self.out.reset();
    }
}

impl<W: WriteColor> RunListener for TextListener<W> {
    fn test_started(&mut self, _description: &Description) {
        self.mark(".", None);
    }

    fn test_finished(&mut self, _description: &Description, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => {}
            Outcome::Failed(_) => self.mark("F", Some(Color::Red)),
            Outcome::Errored(_) => self.mark("E", Some(Color::Yellow)),
        }
    }

    fn suite_failure(&mut self, _failure: &Failure) {
        self.mark("E", Some(Color::Yellow));
    }

    fn test_run_finished(&mut self, result: &RunResult) {
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "Time: {:.3}", result.run_time().as_secs_f64());
        match result.failure_count() {
            0 => {}
            1 => {
                let _ = writeln!(self.out, "There was 1 failure:");
            }
            n => {
                let _ = writeln!(self.out, "There were {} failures:", n);
            }
        }
        for (i, failure) in result.failures().iter().enumerate() {
            self.print_failure(i + 1, failure);
        }
        let _ = writeln!(self.out);
        self.print_summary(result);
    }
}

// ============================================================================
// PLANS AND LISTINGS
// ============================================================================

/// Prints a pre-run description tree followed by its test count.
pub fn print_plan<W: WriteColor>(out: &mut W, description: &Description, test_count: usize) {
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    let _ = write!(out, "{}", description.render_tree());
    let _ = out.reset();
    let _ = writeln!(out, "tests: {}", test_count);
}

pub fn print_names<W: WriteColor>(out: &mut W, names: &[&str]) {
    for name in names {
        let _ = writeln!(out, "{}", name);
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                let _ = out.reset();
                let _ = writeln!(out, " {}", x);
            }
            Difference::Rem(x) => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(out, "-{}", x);
            }
            Difference::Add(x) => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(out, "+{}", x);
            }
        }
    }
    let _ = out.reset();
}
