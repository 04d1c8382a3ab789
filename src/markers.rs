//! Locale-tagged words that open a chapter heading ("Chapter 3", "Глава 3").
//!
//! New locales are added by appending rows to [`MARKERS`].

/// How strongly a marker word implies a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Numbered division of the book: "chapter", "part".
    Division,
    /// Named front or back matter: "prologue", "epilogue".
    Matter,
}

#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub locale: &'static str,
    pub word: &'static str,
    pub kind: MarkerKind,
}

const fn marker(locale: &'static str, word: &'static str, kind: MarkerKind) -> Marker {
    Marker { locale, word, kind }
}

pub const MARKERS: &[Marker] = &[
    marker("en", "chapter", MarkerKind::Division),
    marker("en", "part", MarkerKind::Division),
    marker("en", "prologue", MarkerKind::Matter),
    marker("en", "epilogue", MarkerKind::Matter),
    marker("ru", "глава", MarkerKind::Division),
    marker("ru", "часть", MarkerKind::Division),
    marker("ru", "пролог", MarkerKind::Matter),
    marker("ru", "эпилог", MarkerKind::Matter),
    marker("ru", "введение", MarkerKind::Matter),
    marker("ru", "заключение", MarkerKind::Matter),
];

/// Whether `text` starts with any marker word, case-insensitively.
pub fn starts_with_marker(text: &str) -> bool {
    starts_with_any(text, MARKERS.iter())
}

/// Whether `text` starts with a chapter or part marker.
pub fn starts_with_division(text: &str) -> bool {
    starts_with_any(
        text,
        MARKERS
            .iter()
            .filter(|marker| marker.kind == MarkerKind::Division),
    )
}

fn starts_with_any<'a>(text: &str, mut markers: impl Iterator<Item = &'a Marker>) -> bool {
    let lowered = text.trim_start().to_lowercase();
    markers.any(|marker| lowered.starts_with(marker.word))
}
