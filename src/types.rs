use serde::{Deserialize, Serialize};

/// Source that gets priority when several records share an exact name.
pub const PRIMARY_SOURCE: &str = "minecraft";

/// Pseudo-sources that stay visible regardless of the modpack filter.
pub const ALWAYS_VISIBLE_SOURCES: [&str; 3] = ["gas", "fluid", "placeholder"];

/// A canonical item entry, the unit of search and disambiguation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display name as it appears in game.
    pub name: String,
    /// Lowercased display name.
    pub name_low: String,
    /// Serialized identity, `source:entry[:variant[:tagged data]]`.
    pub id: String,
    pub source: String,
    pub entry: String,
    /// Numeric sub-type, empty when absent.
    pub variant: String,
    /// Serialized extra state (sNBT), if any.
    pub tagged_data: Option<String>,
    /// Human readable mod name, falls back to the source.
    pub mod_name: String,
    /// Abbreviation of `mod_name` used for option matching.
    pub mod_abbr: String,
}

impl Record {
    /// Builds a record from a display name and a serialized id.
    pub fn new(name: &str, id: &str, mod_name: &str) -> Self {
        let parsed = ItemId::parse(id);
        Self {
            name: name.to_string(),
            name_low: name.to_lowercase(),
            id: id.to_string(),
            source: parsed.source,
            entry: parsed.entry,
            variant: parsed.variant.unwrap_or_default(),
            tagged_data: parsed.tagged_data,
            mod_name: mod_name.to_string(),
            mod_abbr: mod_abbreviation(mod_name),
        }
    }

    /// Tag key used in the hierarchical index; empty when untagged.
    pub fn tag_key(&self) -> &str {
        self.tagged_data.as_deref().unwrap_or("")
    }
}

/// A serialized item id split into its four identity parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemId {
    pub source: String,
    pub entry: String,
    pub variant: Option<String>,
    pub tagged_data: Option<String>,
}

impl ItemId {
    /// Splits `source:entry:variant:tagged` where the tagged part may itself
    /// contain colons.
    pub fn parse(id: &str) -> Self {
        let mut parts = id.splitn(4, ':');
        let source = parts.next().unwrap_or_default().to_string();
        let entry = parts.next().unwrap_or_default().to_string();
        let variant = parts.next().map(str::to_string);
        let tagged_data = parts
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            source,
            entry,
            variant,
            tagged_data,
        }
    }
}

/// Derives the short form of a mod name: `"Thermal Expansion"` becomes `te`.
///
/// Lowercase letters that start a word are promoted, then everything that
/// is lowercase or not a word character is dropped.
pub fn mod_abbreviation(mod_name: &str) -> String {
    let mut promoted = String::with_capacity(mod_name.len());
    let mut chars = mod_name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ' ' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                promoted.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        promoted.push(c);
    }

    promoted
        .chars()
        .filter(|c| (c.is_ascii_alphanumeric() || *c == '_') && !c.is_ascii_lowercase())
        .collect::<String>()
        .to_lowercase()
}

/// A bracket capture found in a document, with enough context to point the
/// user at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMatch {
    /// Full matched text, including brackets and the option tail.
    pub full: String,
    /// Raw text inside the brackets, modifiers included.
    pub capture: String,
    /// Text inside the trailing parenthesis, if any.
    pub option: Option<String>,
    /// Byte offset of the match in the document.
    pub start: usize,
    /// Byte offset just past the match.
    pub end: usize,
    /// 1-based line number of the match.
    pub line: usize,
    /// Full text of the line holding the match.
    pub line_text: String,
}

impl CaptureMatch {
    /// Builds a match without document context, handy for direct resolution.
    pub fn bare(capture: &str, option: Option<&str>) -> Self {
        let full = match option {
            Some(opt) => format!("[{}] ({})", capture, opt),
            None => format!("[{}]", capture),
        };
        Self {
            end: full.len(),
            line_text: full.clone(),
            full,
            capture: capture.to_string(),
            option: option.map(str::to_string),
            start: 0,
            line: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviation_promotes_lowercase_words() {
        assert_eq!(mod_abbreviation("Thermal Expansion"), "te");
        assert_eq!(mod_abbreviation("Industrial Craft 2"), "ic2");
        assert_eq!(mod_abbreviation("applied energistics"), "e");
        assert_eq!(mod_abbreviation("Minecraft"), "m");
    }

    #[test]
    fn parse_keeps_colons_in_tagged_data() {
        let id = ItemId::parse("minecraft:potion:0:{Potion:\"minecraft:water\"}");
        assert_eq!(id.source, "minecraft");
        assert_eq!(id.entry, "potion");
        assert_eq!(id.variant.as_deref(), Some("0"));
        assert_eq!(
            id.tagged_data.as_deref(),
            Some("{Potion:\"minecraft:water\"}")
        );
    }

    #[test]
    fn record_normalizes_missing_parts() {
        let r = Record::new("Coal", "minecraft:coal", "Minecraft");
        assert_eq!(r.variant, "");
        assert_eq!(r.tagged_data, None);
        assert_eq!(r.name_low, "coal");
        assert_eq!(r.tag_key(), "");
    }
}
