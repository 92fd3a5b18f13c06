use std::collections::VecDeque;

use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::errors::Result;
use crate::types::CaptureMatch;

/// Which question a selection menu asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Candidates all have different names.
    SelectName,
    /// Candidates all come from different sources.
    SelectMod,
    /// Candidates share a source and differ by variant.
    SelectVariant,
    /// No shape heuristic applies.
    AnyVariant,
    /// Nothing matched closely; candidates are ranked guesses.
    DoYouMean,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::SelectName => "select_name",
            PromptKind::SelectMod => "select_mod",
            PromptKind::SelectVariant => "select_variant",
            PromptKind::AnyVariant => "any_variant",
            PromptKind::DoYouMean => "do_you_mean",
        }
    }
}

/// A selection question about one capture.
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub kind: PromptKind,
    /// Raw capture text, modifiers included.
    pub capture: &'a str,
    /// Where the capture sits in the document.
    pub context: &'a CaptureMatch,
}

impl Prompt<'_> {
    /// Heading shown above the choices.
    pub fn heading(&self) -> String {
        let capture = format!("[{}]", self.capture.on_green().black());
        let question = match self.kind {
            PromptKind::SelectName => format!("Select full name of {capture}"),
            PromptKind::SelectMod => format!("Select {} for {capture}", "mod".black().on_blue()),
            PromptKind::SelectVariant => {
                format!("Select {} of {capture}", "variant".black().on_cyan())
            }
            PromptKind::AnyVariant => {
                format!("Have no clue what you are looking for {capture}\nSelect any variant")
            }
            PromptKind::DoYouMean => {
                format!("❗ can't be found: {capture}\nDo you mean (ESC - skip)")
            }
        };
        format!(
            "{question} in line {}:\n{}",
            self.context.line,
            self.context.line_text.dimmed()
        )
    }
}

/// Presents a list of choices and returns the selected index, or `None` when
/// the user cancels.
pub trait Chooser {
    fn choose(&mut self, prompt: &Prompt<'_>, items: &[String]) -> Result<Option<usize>>;
}

/// Single-column terminal menu; ESC cancels.
#[derive(Debug, Default)]
pub struct TerminalChooser;

impl Chooser for TerminalChooser {
    fn choose(&mut self, prompt: &Prompt<'_>, items: &[String]) -> Result<Option<usize>> {
        let theme = ColorfulTheme::default();
        let selection = Select::with_theme(&theme)
            .with_prompt(prompt.heading())
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(selection)
    }
}

/// Chooser replaying pre-recorded answers, for non-terminal runs and tests.
///
/// Every question asked is recorded along with its choices. Once the
/// answers run out, every further question is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedChooser {
    answers: VecDeque<Option<usize>>,
    asked: Vec<(PromptKind, Vec<String>)>,
}

impl ScriptedChooser {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[(PromptKind, Vec<String>)] {
        &self.asked
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, prompt: &Prompt<'_>, items: &[String]) -> Result<Option<usize>> {
        self.asked.push((prompt.kind, items.to_vec()));
        Ok(self.answers.pop_front().flatten())
    }
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, prompt: &Prompt<'_>, items: &[String]) -> Result<Option<usize>> {
        (**self).choose(prompt, items)
    }
}
