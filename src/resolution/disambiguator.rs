use std::collections::HashSet;

use colored::Colorize;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use super::chooser::{Chooser, Prompt, PromptKind, TerminalChooser};
use crate::errors::Result;
use crate::types::{CaptureMatch, Record};

/// Rows kept free for the prompt heading when sizing a menu page.
const RESERVED_ROWS: u16 = 8;

/// Page size used when the terminal size is unknown.
const DEFAULT_PAGE_SIZE: usize = 20;

/// Width used for the summary when the terminal size is unknown.
const DEFAULT_WIDTH: usize = 80;

/// Longest tagged data shown in a menu row.
const MAX_TAG_LABEL: usize = 50;

/// Resolves ambiguous captures by asking the user, and keeps track of every
/// capture that could not be resolved.
///
/// In silent mode nothing is ever asked: ambiguous captures are recorded as
/// unresolved straight away.
pub struct Disambiguator<C: Chooser = TerminalChooser> {
    chooser: C,
    silent: bool,
    page_size: usize,
    unresolved: Vec<String>,
}

impl Disambiguator<TerminalChooser> {
    /// Disambiguator asking through terminal menus sized to the terminal.
    pub fn terminal(silent: bool) -> Self {
        Self::new(TerminalChooser, silent).with_page_size(terminal_page_size())
    }
}

impl<C: Chooser> Disambiguator<C> {
    pub fn new(chooser: C, silent: bool) -> Self {
        Self {
            chooser,
            silent,
            page_size: DEFAULT_PAGE_SIZE,
            unresolved: Vec::new(),
        }
    }

    /// Sets how many candidates a menu shows before paging.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn chooser(&self) -> &C {
        &self.chooser
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Captures recorded as unresolved, in the order they were met.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Records `capture` as unresolved.
    pub fn cant_be_found(&mut self, capture: &str) {
        warn!(capture, "capture can't be found");
        self.unresolved.push(capture.to_string());
    }

    /// Picks one of several candidates for `raw_capture`.
    ///
    /// Candidates whose name equals the capture are preferred when there
    /// are several of them. The menu shape is chosen from the candidates:
    /// by name when all names differ, by mod when all sources differ, by
    /// variant when one source has distinct variants, generic otherwise.
    pub fn resolve<'r>(
        &mut self,
        raw_capture: &str,
        candidates: &[&'r Record],
        context: &CaptureMatch,
    ) -> Result<Option<&'r Record>> {
        let capture_low = raw_capture.to_lowercase();
        let exact: Vec<&Record> = candidates
            .iter()
            .copied()
            .filter(|r| r.name_low == capture_low)
            .collect();
        let candidates = if exact.len() > 1 { exact } else { candidates.to_vec() };

        if candidates.is_empty() || self.silent {
            self.cant_be_found(raw_capture);
            return Ok(None);
        }

        let kind = prompt_kind(&candidates);
        let label: fn(&Record) -> String = match kind {
            PromptKind::SelectName => name_label,
            PromptKind::SelectMod => mod_label,
            PromptKind::SelectVariant => variant_label,
            _ => full_label,
        };
        self.ask(kind, raw_capture, &candidates, context, label)
    }

    /// Offers ranked guesses for a capture nothing matched closely.
    pub fn do_you_mean<'r>(
        &mut self,
        raw_capture: &str,
        ranked: &[&'r Record],
        context: &CaptureMatch,
    ) -> Result<Option<&'r Record>> {
        if ranked.is_empty() || self.silent {
            self.cant_be_found(raw_capture);
            return Ok(None);
        }
        self.ask(PromptKind::DoYouMean, raw_capture, ranked, context, full_label)
    }

    /// Shows `candidates` a page at a time until one is chosen or the menu
    /// is cancelled. Cancelling records the capture as unresolved.
    fn ask<'r>(
        &mut self,
        kind: PromptKind,
        raw_capture: &str,
        candidates: &[&'r Record],
        context: &CaptureMatch,
        label: fn(&Record) -> String,
    ) -> Result<Option<&'r Record>> {
        let prompt = Prompt {
            kind,
            capture: raw_capture,
            context,
        };

        debug!(
            capture = raw_capture,
            kind = kind.as_str(),
            candidates = candidates.len(),
            "asking to disambiguate"
        );

        let mut offset = 0;
        loop {
            let page_end = (offset + self.page_size).min(candidates.len());
            let page = &candidates[offset..page_end];
            let rest = candidates.len() - page_end;

            let mut items: Vec<String> = page.iter().map(|r| label(r)).collect();
            if rest > 0 {
                items.push(format!("{{and other {rest} variants}}"));
            }

            match self.chooser.choose(&prompt, &items)? {
                Some(i) if i < page.len() => return Ok(Some(page[i])),
                Some(i) if i == page.len() && rest > 0 => offset = page_end,
                _ => {
                    self.cant_be_found(raw_capture);
                    return Ok(None);
                }
            }
        }
    }

    /// Unresolved captures laid out in as many columns as fit in `width`.
    pub fn summary_lines(&self, width: usize) -> Vec<String> {
        self.grid(width, str::to_string)
    }

    /// Prints the unresolved captures, unless silent.
    pub fn print(&self) {
        if self.silent || self.unresolved.is_empty() {
            return;
        }
        println!("{}", "❌ can't be found:".black().on_bright_black());
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);
        for line in self.grid(width, |s| s.black().on_green().to_string()) {
            println!("{line}");
        }
        println!();
    }

    fn grid(&self, width: usize, paint: impl Fn(&str) -> String) -> Vec<String> {
        let max_len = self
            .unresolved
            .iter()
            .map(|s| UnicodeWidthStr::width(s.as_str()))
            .max()
            .unwrap_or(0);
        let columns = (width / (max_len + 4)).max(1);

        self.unresolved
            .chunks(columns)
            .map(|row| {
                row.iter()
                    .map(|s| {
                        let pad = max_len - UnicodeWidthStr::width(s.as_str());
                        format!("[{}]{}", paint(s), " ".repeat(pad))
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}

/// Chooses the menu shape for a candidate list.
fn prompt_kind(candidates: &[&Record]) -> PromptKind {
    let all = candidates.len();
    if distinct_count(candidates, |r| r.name.as_str()) == all {
        PromptKind::SelectName
    } else if distinct_count(candidates, |r| r.source.as_str()) == all {
        PromptKind::SelectMod
    } else if distinct_count(candidates, |r| r.source.as_str()) == 1
        && distinct_count(candidates, |r| r.variant.as_str()) == all
    {
        PromptKind::SelectVariant
    } else {
        PromptKind::AnyVariant
    }
}

fn distinct_count<'r>(candidates: &[&'r Record], key: impl Fn(&'r Record) -> &'r str) -> usize {
    candidates
        .iter()
        .map(|&r| key(r))
        .collect::<HashSet<_>>()
        .len()
}

fn name_label(record: &Record) -> String {
    format!("[{}]", record.name)
}

fn mod_label(record: &Record) -> String {
    format!("({})", record.mod_name)
}

fn variant_label(record: &Record) -> String {
    format!("({})", record.variant)
}

/// `[name] <source:entry:variant>` followed by the tagged data, if any.
fn full_label(record: &Record) -> String {
    let mut label = format!(
        "[{}] <{}:{}:{}>",
        record.name, record.source, record.entry, record.variant
    );
    if let Some(tagged) = &record.tagged_data {
        label.push(' ');
        if tagged.chars().count() > MAX_TAG_LABEL {
            label.extend(tagged.chars().take(MAX_TAG_LABEL - 1));
            label.push('…');
        } else {
            label.push_str(tagged);
        }
    }
    label
}

fn terminal_page_size() -> usize {
    crossterm::terminal::size()
        .map(|(_, rows)| rows.saturating_sub(RESERVED_ROWS) as usize)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::super::chooser::ScriptedChooser;
    use super::*;

    fn rec(name: &str, id: &str) -> Record {
        Record::new(name, id, "Some Mod")
    }

    #[test]
    fn prompt_kind_priority() {
        let a = rec("Wool", "minecraft:wool:1");
        let b = rec("Wool", "minecraft:wool:2");
        let c = rec("Wool", "thermal:wool");
        let d = rec("Cloth", "minecraft:cloth");
        assert_eq!(prompt_kind(&[&a, &d]), PromptKind::SelectName);
        assert_eq!(prompt_kind(&[&a, &c]), PromptKind::SelectMod);
        assert_eq!(prompt_kind(&[&a, &b]), PromptKind::SelectVariant);
        assert_eq!(prompt_kind(&[&a, &b, &c]), PromptKind::AnyVariant);
    }

    #[test]
    fn overflow_row_pages_through_candidates() {
        let records: Vec<Record> = ["Ale", "Beer", "Cider", "Mead", "Wine"]
            .iter()
            .map(|name| rec(name, &format!("drinks:{}", name.to_lowercase())))
            .collect();
        let candidates: Vec<&Record> = records.iter().collect();

        let chooser = ScriptedChooser::new([Some(2), Some(1)]);
        let mut dis = Disambiguator::new(chooser, false).with_page_size(2);
        let chosen = dis
            .resolve("drink", &candidates, &CaptureMatch::bare("drink", None))
            .unwrap();
        assert_eq!(chosen.map(|r| r.name.as_str()), Some("Mead"));

        let asked = dis.chooser().asked();
        assert_eq!(asked[0].1, vec!["[Ale]", "[Beer]", "{and other 3 variants}"]);
        assert_eq!(
            asked[1].1,
            vec!["[Cider]", "[Mead]", "{and other 1 variants}"]
        );
        assert!(dis.unresolved().is_empty());
    }

    #[test]
    fn out_of_range_answer_is_unresolved() {
        let a = rec("Ale", "drinks:ale");
        let b = rec("Beer", "drinks:beer");
        let chooser = ScriptedChooser::new([Some(9)]);
        let mut dis = Disambiguator::new(chooser, false);
        let chosen = dis
            .resolve("drink", &[&a, &b], &CaptureMatch::bare("drink", None))
            .unwrap();
        assert!(chosen.is_none());
        assert_eq!(dis.unresolved(), &["drink"]);
    }

    #[test]
    fn exact_names_narrow_the_menu() {
        let a = rec("Wool", "minecraft:wool:1");
        let b = rec("Wool Block", "thermal:wool_block");
        let c = rec("Wool", "minecraft:wool:2");
        let chooser = ScriptedChooser::new([Some(1)]);
        let mut dis = Disambiguator::new(chooser, false);
        let chosen = dis
            .resolve("wool", &[&a, &b, &c], &CaptureMatch::bare("wool", None))
            .unwrap();
        assert_eq!(chosen, Some(&c));
        assert_eq!(dis.chooser().asked()[0].0, PromptKind::SelectVariant);
    }

    #[test]
    fn summary_wraps_to_width() {
        let chooser = ScriptedChooser::default();
        let mut dis = Disambiguator::new(chooser, true);
        dis.cant_be_found("Coal");
        dis.cant_be_found("Very Long Name");
        assert_eq!(
            dis.summary_lines(80),
            vec![format!("[Coal]{}[Very Long Name]", " ".repeat(12))]
        );
        assert_eq!(dis.summary_lines(20), vec!["[Coal]", "[Very Long Name]"]);
    }

    #[test]
    fn summary_pads_by_display_width() {
        let mut dis = Disambiguator::new(ScriptedChooser::default(), true);
        dis.cant_be_found("石炭");
        dis.cant_be_found("Coal");
        dis.cant_be_found("Iron");
        // Two wide glyphs fill four columns, same as "Coal".
        assert_eq!(
            dis.summary_lines(16),
            vec!["[石炭]  [Coal]", "[Iron]"]
        );
    }

    #[test]
    fn full_label_truncates_long_tags() {
        let long = format!("minecraft:book:0:{{{}}}", "x".repeat(80));
        let label = full_label(&rec("Book", &long));
        assert!(label.ends_with('…'));
        let tag_part = label.rsplit(' ').next().unwrap();
        assert_eq!(tag_part.chars().count(), MAX_TAG_LABEL);
    }
}
