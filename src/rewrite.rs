use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::icons::IconIndex;
use crate::types::Record;

/// is.gd endpoint returning the short URL as plain text.
pub const ISGD_ENDPOINT: &str = "https://is.gd/create.php";

/// A resolved capture and the span of the document it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: usize,
    pub end: usize,
    pub records: Vec<Record>,
}

/// Summary of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Spans actually replaced.
    pub replaced: usize,
    /// Image links emitted.
    pub icons: usize,
}

/// Turns long icon URLs into short ones.
pub trait UrlShortener {
    fn shorten(&mut self, url: &str) -> Result<String>;
}

/// Leaves URLs untouched.
#[derive(Debug, Default)]
pub struct KeepUrls;

impl UrlShortener for KeepUrls {
    fn shorten(&mut self, url: &str) -> Result<String> {
        Ok(url.to_string())
    }
}

/// Shortens URLs through is.gd, asking once per distinct URL.
#[derive(Debug, Default)]
pub struct IsGd {
    cache: HashMap<String, String>,
}

impl UrlShortener for IsGd {
    fn shorten(&mut self, url: &str) -> Result<String> {
        if let Some(short) = self.cache.get(url) {
            return Ok(short.clone());
        }
        let short = ureq::get(ISGD_ENDPOINT)
            .query("format", "simple")
            .query("url", url)
            .call()?
            .body_mut()
            .read_to_string()?
            .trim()
            .to_string();
        debug!(url, short = %short, "shortened url");
        self.cache.insert(url.to_string(), short.clone());
        Ok(short)
    }
}

/// Replaces resolved captures with inline image links.
pub struct Rewriter<'a> {
    icons: &'a IconIndex,
    /// URL prefix the icon paths are appended to.
    repo: &'a str,
    /// Most icons emitted for a single capture.
    max_icons: usize,
}

impl<'a> Rewriter<'a> {
    pub fn new(icons: &'a IconIndex, repo: &'a str, max_icons: usize) -> Self {
        Self {
            icons,
            repo,
            max_icons,
        }
    }

    /// Full icon URL for `record`, `None` when it has no icon.
    pub fn icon_url(&self, record: &Record) -> Result<Option<String>> {
        Ok(self
            .icons
            .icon(record)?
            .map(|path| format!("{}{}.png", self.repo, path)))
    }

    /// Rewrites `document`, splicing each replacement at its span.
    ///
    /// Replacements must not overlap. A replacement whose records have no
    /// icons leaves the original text in place. A URL the shortener fails on
    /// is emitted unshortened.
    pub fn rewrite(
        &self,
        document: &str,
        replacements: &[Replacement],
        shortener: &mut dyn UrlShortener,
    ) -> Result<RewriteOutcome> {
        let mut ordered: Vec<&Replacement> = replacements.iter().collect();
        ordered.sort_by_key(|r| r.start);

        let mut text = String::with_capacity(document.len());
        let mut cursor = 0;
        let mut replaced = 0;
        let mut icons = 0;

        for repl in ordered {
            let mut links = String::new();
            let mut emitted = 0;
            for record in &repl.records {
                if emitted >= self.max_icons {
                    break;
                }
                let Some(url) = self.icon_url(record)? else {
                    continue;
                };
                let url = match shortener.shorten(&url) {
                    Ok(short) => short,
                    Err(e) => {
                        warn!(url = %url, error = %e, "url shortening failed, keeping long url");
                        url
                    }
                };
                links.push_str(&image_link(&url, &record.name));
                emitted += 1;
            }
            if emitted == 0 {
                continue;
            }

            icons += emitted;
            replaced += 1;
            text.push_str(&document[cursor..repl.start]);
            text.push_str(&links);
            cursor = repl.end;
        }
        text.push_str(&document[cursor..]);

        Ok(RewriteOutcome {
            text,
            replaced,
            icons,
        })
    }
}

/// `![](url "title")` with quotes in the title escaped.
pub fn image_link(url: &str, title: &str) -> String {
    format!("![]({} \"{}\")", url, title.replace('"', "\\\""))
}
