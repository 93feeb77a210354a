use std::collections::VecDeque;
use std::io::Write;

use anyhow::{Result, bail};
use rand::Rng;
use rlwm_core::{Action, BlockResult, ExperimentResults, StimulusId, format_percent};
use rlwm_experiment::{Effect, EngineEvent, ExperimentConfig, ExperimentController, TrialView};
use rlwm_timing::Timer;

use crate::input::LineSource;

const PROGRESS_WIDTH: usize = 30;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(ExperimentResults),
    /// The participant quit or input ran out; nothing is kept.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Respond(Action),
    ToggleLegend,
    Quit,
}

fn parse_key(line: &str) -> Option<Key> {
    match line.trim() {
        "1" => Some(Key::Respond(Action::One)),
        "2" => Some(Key::Respond(Action::Two)),
        "3" => Some(Key::Respond(Action::Three)),
        "k" | "K" => Some(Key::ToggleLegend),
        "q" | "Q" => Some(Key::Quit),
        _ => None,
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Line-oriented driver: turns engine effects into text, key presses and waits.
///
/// Lines typed while no answer is requested are dropped before the next prompt.
pub struct App<T: Timer, L: LineSource, W: Write> {
    experiment: ExperimentController,
    timer: T,
    input: L,
    out: W,
    legend: Vec<(StimulusId, Action)>,
    show_legend: bool,
}

impl<T: Timer, L: LineSource, W: Write> App<T, L, W> {
    pub fn new<R: Rng>(
        config: &ExperimentConfig,
        rng: &mut R,
        timer: T,
        input: L,
        out: W,
    ) -> Result<Self> {
        Ok(Self {
            experiment: ExperimentController::new(config, rng)?,
            timer,
            input,
            out,
            legend: Vec::new(),
            show_legend: false,
        })
    }

    pub fn run(&mut self) -> Result<Outcome> {
        writeln!(self.out, "=== RLWM TASK ===")?;
        writeln!(
            self.out,
            "Each symbol is rewarded by one of the actions 1, 2 or 3. Learn which by trial and error."
        )?;
        writeln!(self.out, "Type 1, 2 or 3 and press Enter. 'k' toggles the answer key, 'q' quits.\n")?;

        let mut pending: VecDeque<Effect> = self.experiment.begin().into();
        while let Some(effect) = pending.pop_front() {
            let next = match effect {
                Effect::BlockStarted {
                    block_number,
                    set_size,
                    total_trials,
                    legend,
                } => {
                    let total_blocks = self.experiment.state().blocks().len();
                    writeln!(
                        self.out,
                        "--- Block {block_number}/{total_blocks}: {set_size} symbols, {total_trials} trials ---"
                    )?;
                    self.legend = legend;
                    self.show_legend = false;
                    Vec::new()
                }
                Effect::PresentTrial(view) => {
                    self.input.discard_pending();
                    self.show_trial(&view)?;
                    let shown_at = self.timer.now();
                    let Some(action) = self.read_action()? else {
                        return Ok(Outcome::Abandoned);
                    };
                    self.experiment.dispatch(EngineEvent::SubmitResponse {
                        action,
                        reaction_time_ms: Some(self.timer.elapsed_ms(shown_at)),
                    })
                }
                Effect::ResponseScored { action, correct } => {
                    let verdict = if correct { "Correct! ✓" } else { "Incorrect ✗" };
                    writeln!(self.out, "  [{action}] {verdict}")?;
                    Vec::new()
                }
                Effect::Schedule { delay_ms, event } => {
                    self.out.flush()?;
                    self.timer.sleep_ms(delay_ms);
                    self.experiment.dispatch(event)
                }
                Effect::BlockEnded(result) => {
                    self.show_block_end(&result)?;
                    if !self.wait_for_continue(&result)? {
                        return Ok(Outcome::Abandoned);
                    }
                    self.experiment.dispatch(EngineEvent::ContinueToNextBlock)
                }
                Effect::ExperimentEnded(results) => {
                    self.show_results(&results)?;
                    return Ok(Outcome::Completed(results));
                }
            };
            pending.extend(next);
        }

        bail!("engine stopped before the experiment finished")
    }

    fn show_trial(&mut self, view: &TrialView) -> Result<()> {
        writeln!(
            self.out,
            "\n{} trial {}/{} (block {})",
            progress_bar(view.progress, PROGRESS_WIDTH),
            view.trial_number,
            view.total_trials_in_block,
            view.block_number,
        )?;
        if self.show_legend {
            self.write_legend()?;
        }
        writeln!(self.out, "        {}", view.stimulus)?;
        Ok(())
    }

    fn write_legend(&mut self) -> Result<()> {
        let key = self
            .legend
            .iter()
            .map(|(stimulus, action)| format!("{stimulus} → {action}"))
            .collect::<Vec<_>>()
            .join("   ");
        writeln!(self.out, "  answer key: {key}")?;
        Ok(())
    }

    /// Reads lines until an action arrives. `None` means quit or end of input.
    fn read_action(&mut self) -> Result<Option<Action>> {
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.input.next_line() else {
                return Ok(None);
            };
            match parse_key(&line) {
                Some(Key::Respond(action)) => return Ok(Some(action)),
                Some(Key::ToggleLegend) => {
                    self.show_legend = !self.show_legend;
                    if self.show_legend {
                        self.write_legend()?;
                    } else {
                        writeln!(self.out, "  answer key hidden")?;
                    }
                }
                Some(Key::Quit) => return Ok(None),
                None => writeln!(self.out, "  Press 1, 2, or 3")?,
            }
        }
    }

    fn show_block_end(&mut self, result: &BlockResult) -> Result<()> {
        writeln!(
            self.out,
            "\nBlock {} complete! Accuracy: {} over {} trials. Take a short break if needed.",
            result.block + 1,
            format_percent(result.accuracy),
            result.trials,
        )?;
        Ok(())
    }

    fn wait_for_continue(&mut self, result: &BlockResult) -> Result<bool> {
        self.input.discard_pending();
        let last = result.block + 1 >= self.experiment.state().blocks().len();
        let next = if last { "see results" } else { "start the next block" };
        write!(self.out, "Press Enter to {next} ('q' quits) ")?;
        self.out.flush()?;

        let Some(line) = self.input.next_line() else {
            return Ok(false);
        };
        Ok(parse_key(&line) != Some(Key::Quit))
    }

    fn show_results(&mut self, results: &ExperimentResults) -> Result<()> {
        let summary = results.summary();
        writeln!(self.out, "\n=== RESULTS ===")?;
        writeln!(self.out, "Overall accuracy: {}", summary.overall_accuracy_percent())?;
        writeln!(self.out, "Trials completed: {}", summary.total_trials)?;
        writeln!(self.out, "Blocks completed: {}", summary.blocks_completed)?;
        for block in &results.block_results {
            writeln!(
                self.out,
                "  block {} (set size {}): {}",
                block.block + 1,
                block.set_size,
                format_percent(block.accuracy)
            )?;
        }
        Ok(())
    }
}
