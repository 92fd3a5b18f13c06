use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::assets::AssetSnapshot;
use crate::config::{resolve_assets_dir, IconizeConfig};
use crate::context::AssetContext;
use crate::errors::Result;
use crate::resolution::{Chooser, Disambiguator, MatchResolver, TerminalChooser};
use crate::rewrite::{IsGd, KeepUrls, Replacement, Rewriter, UrlShortener};
use crate::scan::scan_captures;

/// Central orchestrator of one run over one document.
///
/// Captures are resolved one at a time in document order, since a prompt
/// must be answered before the next capture is looked at.
pub struct Session<C: Chooser = TerminalChooser> {
    ctx: AssetContext,
    config: IconizeConfig,
    disambiguator: Disambiguator<C>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Rewritten document.
    pub text: String,
    /// Number of bracket captures found.
    pub captures: usize,
    /// Number of captures resolved to at least one record.
    pub resolved: usize,
    /// Number of captures replaced by icons.
    pub replaced: usize,
    /// Number of image links emitted.
    pub icons: usize,
    /// Captures that could not be resolved.
    pub unresolved: Vec<String>,
    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

impl Session<TerminalChooser> {
    /// Opens a session for the project at `project_root`, loading assets
    /// from the configured asset directory and prompting in the terminal.
    pub fn open(project_root: &Path, config: IconizeConfig) -> Result<Self> {
        let assets_dir = resolve_assets_dir(project_root, &config);
        let snapshot = AssetSnapshot::load(&assets_dir)?;
        let ctx = AssetContext::new(snapshot, config.modpack.clone());
        let disambiguator = Disambiguator::terminal(config.silent);
        Ok(Self::new(ctx, config, disambiguator))
    }
}

impl<C: Chooser> Session<C> {
    pub fn new(ctx: AssetContext, config: IconizeConfig, disambiguator: Disambiguator<C>) -> Self {
        Self {
            ctx,
            config,
            disambiguator,
        }
    }

    pub fn context(&self) -> &AssetContext {
        &self.ctx
    }

    pub fn config(&self) -> &IconizeConfig {
        &self.config
    }

    pub fn disambiguator(&self) -> &Disambiguator<C> {
        &self.disambiguator
    }

    /// Resolves every capture of `document`.
    ///
    /// The asset index is built before the first capture, so a bad modpack
    /// aborts the run before anything is resolved.
    pub fn resolve_document(&mut self, document: &str) -> Result<(usize, Vec<Replacement>)> {
        self.ctx.index()?;
        let resolver = MatchResolver::new(&self.ctx, self.config.threshold);

        let captures = scan_captures(document);
        let mut replacements = Vec::new();
        for m in &captures {
            if let Some(records) = resolver.resolve(m, &mut self.disambiguator)? {
                replacements.push(Replacement {
                    start: m.start,
                    end: m.end,
                    records: records.into_iter().cloned().collect(),
                });
            }
        }
        Ok((captures.len(), replacements))
    }

    /// Resolves and rewrites `document`.
    pub fn run(&mut self, document: &str) -> Result<RunResult> {
        let mut shortener: Box<dyn UrlShortener> = if self.config.short {
            Box::new(IsGd::default())
        } else {
            Box::new(KeepUrls)
        };
        self.run_with(document, shortener.as_mut())
    }

    /// Resolves and rewrites `document` with a given URL shortener.
    pub fn run_with(
        &mut self,
        document: &str,
        shortener: &mut dyn UrlShortener,
    ) -> Result<RunResult> {
        let start = Instant::now();

        let (captures, replacements) = self.resolve_document(document)?;
        let rewriter = Rewriter::new(self.ctx.icons(), &self.config.repo, self.config.max);
        let outcome = rewriter.rewrite(document, &replacements, shortener)?;

        let result = RunResult {
            text: outcome.text,
            captures,
            resolved: replacements.len(),
            replaced: outcome.replaced,
            icons: outcome.icons,
            unresolved: self.disambiguator.unresolved().to_vec(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            captures = result.captures,
            resolved = result.resolved,
            replaced = result.replaced,
            unresolved = result.unresolved.len(),
            "run complete"
        );
        Ok(result)
    }

    /// Prints unresolved captures collected so far, unless silent.
    pub fn print_summary(&self) {
        self.disambiguator.print();
    }
}
