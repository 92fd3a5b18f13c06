use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::chooser::Chooser;
use super::disambiguator::Disambiguator;
use crate::context::AssetContext;
use crate::errors::Result;
use crate::modifiers::{refine, ModifierFilter};
use crate::search::EditDistanceResolver;
use crate::types::{CaptureMatch, Record, PRIMARY_SOURCE};

/// `<source:entry:...>`: a literal item id.
static COMMAND_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(.+)>$").expect("valid regex"));

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// One way of turning capture text into candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `<source:entry>` literal ids.
    CommandString,
    /// The one primary-source record among exact name matches.
    PrimaryExactName,
    /// Every record whose name equals the capture.
    ExactName,
    /// Word-prefix search over names.
    TokenSearch,
    /// Nearest names by edit distance.
    EditDistance,
}

impl Strategy {
    /// Strategies in the order they are attempted.
    pub const CASCADE: [Strategy; 5] = [
        Strategy::CommandString,
        Strategy::PrimaryExactName,
        Strategy::ExactName,
        Strategy::TokenSearch,
        Strategy::EditDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CommandString => "command_string",
            Strategy::PrimaryExactName => "primary_exact_name",
            Strategy::ExactName => "exact_name",
            Strategy::TokenSearch => "token_search",
            Strategy::EditDistance => "edit_distance",
        }
    }
}

/// One narrowing step applied to a strategy's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStep {
    /// Accepts a lone candidate as is.
    Identity,
    /// Trailing `(option)`: a variant number or a mod prefix.
    Option,
    /// Collapses candidates rendering the same icon.
    SameIcon,
    /// `(Every)` / `(Any)` modifiers.
    Modifiers,
}

impl FilterStep {
    /// Steps in the order they are applied.
    pub const PIPELINE: [FilterStep; 4] = [
        FilterStep::Identity,
        FilterStep::Option,
        FilterStep::SameIcon,
        FilterStep::Modifiers,
    ];
}

/// Resolves bracket captures against the asset context.
///
/// Strategies from [`Strategy::CASCADE`] are tried in order; the first one
/// producing candidates that survive the filter pipeline decides the
/// outcome. Captures still ambiguous after filtering go to the
/// [`Disambiguator`].
pub struct MatchResolver<'a> {
    ctx: &'a AssetContext,
    distance: EditDistanceResolver,
}

impl<'a> MatchResolver<'a> {
    /// Creates a resolver; `threshold` is the edit distance under which a
    /// unique nearest name is accepted without asking.
    pub fn new(ctx: &'a AssetContext, threshold: usize) -> Self {
        Self {
            ctx,
            distance: EditDistanceResolver::new(threshold),
        }
    }

    /// Resolves one capture.
    ///
    /// Returns `None` for skipped captures (blank, blank once modifiers are
    /// stripped, or a lone `x` used as a Markdown checkbox) and for
    /// unresolved ones; the latter are recorded by the disambiguator.
    pub fn resolve<C: Chooser>(
        &self,
        m: &CaptureMatch,
        disambiguator: &mut Disambiguator<C>,
    ) -> Result<Option<Vec<&'a Record>>> {
        let raw_capture = m.capture.as_str();
        if is_skipped(raw_capture) {
            return Ok(None);
        }

        let refined = refine(raw_capture);
        if refined.capture.is_empty() {
            return Ok(None);
        }
        let option = m.option.as_deref();

        for strategy in Strategy::CASCADE {
            let found = self.attempt(strategy, &refined.capture)?;
            if found.is_empty() {
                continue;
            }
            debug!(
                capture = raw_capture,
                strategy = strategy.as_str(),
                candidates = found.len(),
                "strategy produced candidates"
            );

            let mut result = found;
            for step in FilterStep::PIPELINE {
                let (narrowed, is_final) =
                    self.apply_step(step, result, option, &refined.filter)?;
                result = narrowed;
                if result.len() == 1 || is_final {
                    debug!(
                        capture = raw_capture,
                        step = ?step,
                        resolved = result.len(),
                        "capture resolved"
                    );
                    return Ok(Some(result));
                }
            }

            if result.len() > 1 {
                let chosen = if strategy == Strategy::EditDistance {
                    disambiguator.do_you_mean(raw_capture, &result, m)?
                } else {
                    disambiguator.resolve(raw_capture, &result, m)?
                };
                return Ok(chosen.map(|record| vec![record]));
            }
        }

        disambiguator.cant_be_found(raw_capture);
        Ok(None)
    }

    /// Runs one strategy against the modifier-free capture text.
    pub fn attempt(&self, strategy: Strategy, capture: &str) -> Result<Vec<&'a Record>> {
        let index = self.ctx.index()?;
        let found: Vec<&'a Record> = match strategy {
            Strategy::CommandString => COMMAND_STRING_RE
                .captures(capture)
                .and_then(|caps| caps.get(1))
                .and_then(|id| index.lookup_exact(id.as_str()))
                .into_iter()
                .collect(),
            Strategy::PrimaryExactName => {
                let primary: Vec<&Record> = index
                    .records_named(&capture.to_lowercase())
                    .into_iter()
                    .filter(|r| r.source == PRIMARY_SOURCE)
                    .collect();
                if primary.len() == 1 {
                    primary
                } else {
                    Vec::new()
                }
            }
            Strategy::ExactName => index.records_named(&capture.to_lowercase()),
            Strategy::TokenSearch => self.ctx.tokens()?.search(index, capture),
            Strategy::EditDistance => self.distance.resolve(index, capture),
        };
        Ok(found)
    }

    /// Applies one filter step, returning the narrowed candidates and whether
    /// they are final.
    pub fn apply_step(
        &self,
        step: FilterStep,
        candidates: Vec<&'a Record>,
        option: Option<&str>,
        modifiers: &ModifierFilter,
    ) -> Result<(Vec<&'a Record>, bool)> {
        Ok(match step {
            FilterStep::Identity => (candidates, false),
            FilterStep::Option => (filter_by_option(candidates, option), false),
            FilterStep::SameIcon => (self.dedup_by_icon(candidates)?, false),
            FilterStep::Modifiers => modifiers.apply(candidates),
        })
    }

    /// Keeps the first candidate of every group rendering the same image.
    /// Candidates without an icon only collapse with identical ids.
    fn dedup_by_icon(&self, candidates: Vec<&'a Record>) -> Result<Vec<&'a Record>> {
        let icons = self.ctx.icons();
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(candidates.len());
        for record in candidates {
            let key = match icons.icon(record)? {
                Some(path) => format!("icon:{path}"),
                None => format!("id:{}", record.id),
            };
            if seen.insert(key) {
                kept.push(record);
            }
        }
        Ok(kept)
    }
}

/// Blank captures and a lone `x` (Markdown checkboxes) are not mentions.
fn is_skipped(raw_capture: &str) -> bool {
    raw_capture.trim().is_empty() || raw_capture.eq_ignore_ascii_case("x")
}

/// Narrows candidates by the trailing option: a number selects the variant,
/// anything else is a case-insensitive prefix of the mod abbreviation, mod
/// name or source.
fn filter_by_option<'a>(candidates: Vec<&'a Record>, option: Option<&str>) -> Vec<&'a Record> {
    let Some(option) = option else {
        return candidates;
    };

    if NUMERIC_RE.is_match(option) {
        return candidates
            .into_iter()
            .filter(|r| r.variant == option)
            .collect();
    }

    let option_low = option.to_lowercase();
    candidates
        .into_iter()
        .filter(|r| {
            r.mod_abbr.starts_with(&option_low)
                || r.mod_name.to_lowercase().starts_with(&option_low)
                || r.source.starts_with(&option_low)
        })
        .collect()
}
