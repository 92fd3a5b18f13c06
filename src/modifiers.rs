use std::sync::LazyLock;

use regex::Regex;

/// Inline capture annotation changing how many candidates are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `(Every)`: accept every surviving candidate.
    Every,
    /// `(Any)`: accept only the first candidate.
    Any,
}

impl Modifier {
    /// All modifiers, in the order they are stripped and applied.
    pub const ALL: [Modifier; 2] = [Modifier::Every, Modifier::Any];

    fn pattern(&self) -> &'static Regex {
        static EVERY: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?i)\s*\(Every\)\s*").expect("valid regex"));
        static ANY: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?i)\s*\(Any\)\s*").expect("valid regex"));
        match self {
            Modifier::Every => LazyLock::force(&EVERY),
            Modifier::Any => LazyLock::force(&ANY),
        }
    }

    /// Applies this modifier to a candidate list. The flag is `true` when the
    /// result should be accepted as final.
    pub fn apply<T>(&self, candidates: Vec<T>) -> (Vec<T>, bool) {
        let is_final = !candidates.is_empty();
        match self {
            Modifier::Every => (candidates, is_final),
            Modifier::Any => (candidates.into_iter().take(1).collect(), is_final),
        }
    }
}

/// Composition of the modifiers found in one capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierFilter {
    modifiers: Vec<Modifier>,
}

impl ModifierFilter {
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Folds every modifier over `candidates`, left to right. The result is
    /// final if any modifier marked it final.
    pub fn apply<T>(&self, candidates: Vec<T>) -> (Vec<T>, bool) {
        self.modifiers
            .iter()
            .fold((candidates, false), |(list, was_final), modifier| {
                let (list, is_final) = modifier.apply(list);
                (list, was_final || is_final)
            })
    }
}

/// A capture with its modifiers stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refined {
    /// Capture text the search strategies see.
    pub capture: String,
    pub filter: ModifierFilter,
}

/// Strips every recognized modifier from `raw_capture`.
///
/// Each modifier pattern is applied once, in [`Modifier::ALL`] order, to the
/// output of the previous one.
pub fn refine(raw_capture: &str) -> Refined {
    let mut capture = raw_capture.to_string();
    let mut modifiers = Vec::new();

    for modifier in Modifier::ALL {
        let pattern = modifier.pattern();
        if pattern.is_match(&capture) {
            capture = pattern.replace_all(&capture, " ").trim().to_string();
            modifiers.push(modifier);
        } else {
            capture = capture.trim().to_string();
        }
    }

    Refined {
        capture,
        filter: ModifierFilter { modifiers },
    }
}
