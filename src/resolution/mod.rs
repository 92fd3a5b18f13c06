/// Capture resolution module.
///
/// Turns one bracket capture into zero, one or several records by running
/// the strategy cascade, narrowing with the filter pipeline, and escalating
/// to interactive disambiguation when several candidates survive.
mod chooser;
mod disambiguator;
mod resolver;

pub use chooser::{Chooser, Prompt, PromptKind, ScriptedChooser, TerminalChooser};
pub use disambiguator::Disambiguator;
pub use resolver::{FilterStep, MatchResolver, Strategy};
