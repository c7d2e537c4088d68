//! Line-based interactive form filling.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::Result;
use crate::forms::{Form, FormState, SubmitOutcome};
use crate::store::SubmissionStore;

/// Answer that blanks a field instead of keeping its current value.
pub const CLEAR_ANSWER: &str = "-";

/// Asks for field values on `output` and reads answers from `input`.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// `full_name` becomes `Full name`.
fn label(field: &str) -> String {
    let text = field.replace('_', " ");
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input and output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for one value. An empty answer keeps `current` and
    /// [`CLEAR_ANSWER`] blanks it.
    ///
    /// Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn ask(&mut self, field: &str, current: &str, error: Option<&str>) -> Result<Option<String>> {
        if let Some(message) = error {
            writeln!(self.output, "  ! {message}")?;
        }
        if current.is_empty() {
            write!(self.output, "{}: ", label(field))?;
        } else {
            write!(
                self.output,
                "{} [{current}, {CLEAR_ANSWER} to clear]: ",
                label(field)
            )?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        Ok(Some(match answer {
            "" => current.to_string(),
            CLEAR_ANSWER => String::new(),
            _ => answer.to_string(),
        }))
    }

    /// Ask for each of `fields` in turn. Returns `false` if input ran out.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn fill<F: Form>(&mut self, state: &mut FormState<F>, fields: &[&'static str]) -> Result<bool> {
        for field in fields {
            let current = state.value(field).unwrap_or_default().to_string();
            let error = state.error(field).map(str::to_string);
            let Some(value) = self.ask(field, &current, error.as_deref())? else {
                return Ok(false);
            };
            state.set_field(field, value)?;
        }
        Ok(true)
    }

    /// Fill every field, submit, and re-ask only the failing fields until
    /// the form is accepted, the insert fails, or input runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub async fn run<F: Form>(
        &mut self,
        state: &mut FormState<F>,
        store: &dyn SubmissionStore,
    ) -> Result<SubmitOutcome> {
        let mut fields: Vec<&'static str> = F::FIELDS.to_vec();
        loop {
            // Fields the user never reached keep their errors.
            let complete = self.fill(state, &fields)?;
            let outcome = state.submit(store).await;

            let violations = match outcome {
                SubmitOutcome::Rejected(violations) if complete => violations,
                other => return Ok(other),
            };

            writeln!(self.output, "Please correct the following:")?;
            for violation in &violations {
                writeln!(self.output, "  {}: {}", label(violation.field), violation.message)?;
            }
            debug!(form = F::NAME, retry = ?violations.fields(), "Re-prompting");
            fields = violations.fields();
        }
    }
}
