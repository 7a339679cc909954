//! Locale-aware count formatting.
//!
//! Formatter instances are cached per locale in a process-wide map; the
//! cache only saves construction work and never changes output.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

/// Grouped, zero-decimal number formatter for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    group_separator: &'static str,
}

impl NumberFormat {
    /// Build a formatter. Unknown locales group with `,`.
    pub fn new(locale: &str) -> Self {
        Self {
            group_separator: group_separator(locale),
        }
    }

    /// Format an integer count with thousands grouping.
    pub fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3 * self.group_separator.len());
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(self.group_separator);
            }
            out.push(ch);
        }
        out
    }
}

fn group_separator(locale: &str) -> &'static str {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match lang.as_str() {
        "id" | "de" | "es" | "it" | "nl" | "pt" | "da" | "tr" => ".",
        "fr" | "sv" | "nb" | "fi" | "cs" | "pl" | "ru" => "\u{202f}",
        _ => ",",
    }
}

static NUMBER_FORMATS: LazyLock<DashMap<String, Arc<NumberFormat>>> = LazyLock::new(DashMap::new);

/// Cached formatter for a locale.
pub fn number_format(locale: &str) -> Arc<NumberFormat> {
    if let Some(existing) = NUMBER_FORMATS.get(locale) {
        return Arc::clone(existing.value());
    }
    Arc::clone(
        NUMBER_FORMATS
            .entry(locale.to_owned())
            .or_insert_with(|| Arc::new(NumberFormat::new(locale)))
            .value(),
    )
}

/// Format a count for display, e.g. `12,345` in `en-US`.
pub fn format_number(value: u64, locale: &str) -> String {
    number_format(locale).format(value)
}
