//! Static word-pair catalog shared by every client.
//!
//! The session record stores only a theme key and a pair index, never the
//! literal words, so every build of this catalog must resolve the same
//! `(theme, index)` to the same pair. The tables below are consts and the
//! `"random"` concatenation follows declaration order to keep lookups
//! deterministic across independent processes.

/// Sentinel theme key spanning the pairs of every named theme.
pub const RANDOM_THEME: &str = "random";

/// A common/odd word pairing for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPair {
    /// Word shown to every regular member.
    pub common: &'static str,
    /// Word shown to the odd ones out.
    pub odd: &'static str,
}

/// Metadata describing a selectable theme.
#[derive(Debug, Clone, Copy)]
pub struct ThemeInfo {
    /// Stable key persisted in session records.
    pub key: &'static str,
    /// Human-readable label for theme pickers.
    pub label: &'static str,
}

const fn pair(common: &'static str, odd: &'static str) -> WordPair {
    WordPair { common, odd }
}

const PLACES: &[WordPair] = &[
    pair("library", "bookstore"),
    pair("volcano", "geyser"),
    pair("harbor", "airport"),
    pair("temple", "castle"),
    pair("subway", "tram"),
    pair("lighthouse", "watchtower"),
];

const FOODS: &[WordPair] = &[
    pair("cinnamon", "nutmeg"),
    pair("avocado", "cucumber"),
    pair("espresso", "matcha"),
    pair("honey", "syrup"),
    pair("cheese", "butter"),
    pair("lobster", "crab"),
];

const OBJECTS: &[WordPair] = &[
    pair("compass", "sundial"),
    pair("mirror", "window"),
    pair("lantern", "candle"),
    pair("book", "magazine"),
    pair("hourglass", "metronome"),
    pair("umbrella", "parasol"),
];

const CONCEPTS: &[WordPair] = &[
    pair("whisper", "hum"),
    pair("dreaming", "daydreaming"),
    pair("climbing", "hiking"),
    pair("forgiving", "apologizing"),
    pair("escaping", "hiding"),
    pair("waiting", "pausing"),
];

/// Named themes in declaration order. The `"random"` theme is derived from
/// this table and is deliberately not listed here.
const NAMED_THEMES: &[(&str, &str, &[WordPair])] = &[
    ("places", "Places", PLACES),
    ("foods", "Foods", FOODS),
    ("objects", "Everyday Objects", OBJECTS),
    ("concepts", "Actions & Concepts", CONCEPTS),
];

/// Every selectable theme, the random sentinel first.
pub fn themes() -> Vec<ThemeInfo> {
    let mut all = vec![ThemeInfo {
        key: RANDOM_THEME,
        label: "Random (all themes)",
    }];
    all.extend(NAMED_THEMES.iter().map(|(key, label, _)| ThemeInfo { key, label }));
    all
}

/// Resolve the ordered pair list for a theme key.
///
/// `"random"` concatenates every named theme's pairs in declaration order.
/// Returns `None` for keys this build does not know, which callers must
/// treat as a degrade-to-placeholder situation rather than an error.
pub fn pairs_for_theme(theme: &str) -> Option<Vec<WordPair>> {
    if theme == RANDOM_THEME {
        return Some(
            NAMED_THEMES
                .iter()
                .flat_map(|(_, _, pairs)| pairs.iter().copied())
                .collect(),
        );
    }

    NAMED_THEMES
        .iter()
        .find(|(key, _, _)| *key == theme)
        .map(|(_, _, pairs)| pairs.to_vec())
}

/// Bounds-safe lookup of a single pair, tolerating unknown themes and
/// out-of-range indexes left behind by older builds.
pub fn pair_at(theme: &str, index: usize) -> Option<WordPair> {
    pairs_for_theme(theme).and_then(|pairs| pairs.get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_theme_lookup_is_deterministic() {
        let first = pairs_for_theme("foods").unwrap();
        let second = pairs_for_theme("foods").unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn random_theme_concatenates_all_named_themes() {
        let random = pairs_for_theme(RANDOM_THEME).unwrap();
        let total: usize = themes()
            .iter()
            .filter(|info| info.key != RANDOM_THEME)
            .map(|info| pairs_for_theme(info.key).unwrap().len())
            .sum();
        assert_eq!(random.len(), total);

        // Prefix must match the first named theme so stored indexes stay stable.
        let places = pairs_for_theme("places").unwrap();
        assert_eq!(&random[..places.len()], places.as_slice());
    }

    #[test]
    fn unknown_theme_resolves_to_none() {
        assert!(pairs_for_theme("clashroyale").is_none());
        assert!(pair_at("clashroyale", 0).is_none());
    }

    #[test]
    fn pair_at_is_bounds_safe() {
        let pairs = pairs_for_theme("objects").unwrap();
        assert_eq!(pair_at("objects", 0), Some(pairs[0]));
        assert!(pair_at("objects", pairs.len()).is_none());
    }

    #[test]
    fn every_theme_key_is_listed_once() {
        let listing = themes();
        let mut keys: Vec<_> = listing.iter().map(|info| info.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), listing.len());
    }
}
