//! Line-oriented terminal rendering of the prediction form

use crate::config::OutputFormat;
use crate::error::PredictorError;
use crate::form::FormState;
use crate::models::inference::InferenceEngine;
use crate::types::prediction::PredictionResult;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

pub const TITLE: &str = "Solar Power Generation Predictor";

/// Shown once the engine holds a usable artifact
pub const LOADED_NOTICE: &str = "Model and Scaler Loaded!";

const USAGE: &str = "\
Commands:
  set <field> <value>   set a parameter (field is its key or list number)
  + <field>             increase a parameter by its step (also: inc)
  - <field>             decrease a parameter by its step (also: dec)
  predict               predict solar power generated (also: p)
  reset                 reset every parameter to its default (also: r)
  show                  list the parameters (also: s)
  help                  show this help (also: h, ?)
  quit                  leave (also: q, exit)";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: String, value: String },
    Increment(String),
    Decrement(String),
    Predict,
    Reset,
    Show,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parse a command line; the error is a short usage message
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Command::Empty);
        };
        let args: Vec<&str> = words.collect();

        let field = |usage: &str| match args.as_slice() {
            [field] => Ok(field.to_string()),
            _ => Err(format!("usage: {}", usage)),
        };

        match verb.to_lowercase().as_str() {
            "set" => match args.as_slice() {
                [field, value] => Ok(Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }),
                _ => Err("usage: set <field> <value>".to_string()),
            },
            "+" | "inc" => field("+ <field>").map(Command::Increment),
            "-" | "dec" => field("- <field>").map(Command::Decrement),
            "predict" | "p" => Ok(Command::Predict),
            "reset" | "r" => Ok(Command::Reset),
            "show" | "s" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command `{}`; type `help`", other)),
        }
    }
}

/// Terminal host: renders the form, applies commands, shows predictions
pub struct Console<R, W> {
    form: FormState,
    engine: InferenceEngine,
    output: OutputFormat,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(engine: InferenceEngine, output: OutputFormat, input: R, out: W) -> Self {
        let form = FormState::new(engine.shared_schema());
        Self {
            form,
            engine,
            output,
            input,
            out,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Process commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", TITLE)?;
        writeln!(
            self.out,
            "{} ({} scaler, {} model)",
            LOADED_NOTICE,
            self.engine.artifact().scaler().kind(),
            self.engine.artifact().model().kind()
        )?;
        writeln!(
            self.out,
            "Adjust the weather parameters, then type `predict`. Type `help` for commands."
        )?;
        self.render_form()?;

        let mut line = String::new();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                break;
            }

            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(usage) => writeln!(self.out, "{}", usage)?,
            }
        }

        debug!("Console input closed");
        Ok(())
    }

    /// Apply one command. Predictor errors are shown to the user, not returned.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        let outcome = match command {
            Command::Set { field, value } => self
                .resolve(&field)
                .and_then(|key| self.form.set_from_str(key, &value)),
            Command::Increment(field) => self
                .resolve(&field)
                .and_then(|key| self.form.increment(key).map(|_| ())),
            Command::Decrement(field) => self
                .resolve(&field)
                .and_then(|key| self.form.decrement(key).map(|_| ())),
            Command::Predict => return self.predict(),
            Command::Reset => {
                self.form.reset();
                writeln!(self.out, "All parameters reset to defaults.")?;
                return self.render_form();
            }
            Command::Show => return self.render_form(),
            Command::Help => {
                writeln!(self.out, "{}", USAGE)?;
                return Ok(());
            }
            Command::Quit | Command::Empty => return Ok(()),
        };

        match outcome {
            Ok(()) => self.render_form(),
            Err(err) => self.render_error(&err),
        }
    }

    /// Map a list number (1-based) or schema key to the schema key
    fn resolve(&self, field: &str) -> std::result::Result<&'static str, PredictorError> {
        let schema = self.form.schema();
        if let Ok(number) = field.parse::<usize>() {
            if let Some(spec) = number.checked_sub(1).and_then(|i| schema.iter().nth(i)) {
                return Ok(spec.key);
            }
        }
        schema.spec_for(field).map(|spec| spec.key)
    }

    fn predict(&mut self) -> Result<()> {
        let inputs = self.form.collect();

        match self.engine.predict(&inputs) {
            Ok(result) => {
                info!(prediction_kw = result.value, "Prediction served");
                self.render_prediction(&result)
            }
            Err(err) => {
                warn!(error = %err, "Prediction failed");
                self.render_error(&err)
            }
        }
    }

    fn render_form(&mut self) -> Result<()> {
        let width = label_width(self.form.entries().map(|(spec, _)| spec.display_label));

        writeln!(self.out, "\nInput Parameters")?;
        for (i, (spec, value)) in self.form.entries().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {:<width$}  {:<28}  {:>10}  (step {})",
                i + 1,
                spec.display_label,
                spec.key,
                value,
                spec.step,
                width = width
            )?;
        }
        Ok(())
    }

    fn render_prediction(&mut self, result: &PredictionResult) -> Result<()> {
        if self.output == OutputFormat::Json {
            writeln!(self.out, "{}", serde_json::to_string(result)?)?;
            return Ok(());
        }

        writeln!(self.out, "\nPrediction Result")?;
        writeln!(
            self.out,
            "Predicted Solar Power Generated (kW): {}",
            result.formatted_value()
        )?;

        let rows = result.rows(self.engine.schema());
        let width = label_width(rows.iter().map(|(label, _)| *label));

        writeln!(self.out, "\nInput Parameters Used")?;
        writeln!(self.out, "  {:<width$}  {:>10}", "", "Value", width = width)?;
        for (label, value) in rows {
            writeln!(self.out, "  {:<width$}  {:>10}", label, value, width = width)?;
        }
        Ok(())
    }

    fn render_error(&mut self, err: &PredictorError) -> Result<()> {
        writeln!(self.out, "error: {}", err)?;
        writeln!(self.out, "hint: {}", err.hint())?;
        Ok(())
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|label| label.chars().count()).max().unwrap_or(0)
}
