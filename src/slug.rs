//! URL-safe book addresses derived from the title and source path.

use std::path::Path;

const MAX_STEM_CHARS: usize = 30;
const HASH_CHARS: usize = 6;

/// Lower-case Cyrillic letters and their Latin spelling.
const TRANSLIT: &[(char, &str)] = &[
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "yo"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "y"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    // Ukrainian and Belarusian
    ('і', "i"),
    ('ї', "yi"),
    ('є', "ye"),
    ('ґ', "g"),
    ('ў', "u"),
];

/// Slug for a book: transliterated title stem plus a short hash of `source`.
///
/// The same title and path always give the same slug; equal titles from
/// different paths differ in the hash suffix.
pub fn slugify(title: &str, source: &Path) -> String {
    let hash = path_hash(source);
    let stem = stem(title);

    if stem.is_empty() {
        hash
    } else {
        format!("{stem}-{hash}")
    }
}

fn stem(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in transliterate(title).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_STEM_CHARS).collect();
    truncated.trim_end_matches('-').to_string()
}

/// Replace Cyrillic letters, keeping the case of the first letter.
fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match TRANSLIT.iter().find(|(cyrillic, _)| *cyrillic == lower) {
            Some((_, latin)) if lower != c => out.push_str(&capitalize(latin)),
            Some((_, latin)) => out.push_str(latin),
            None => out.push(c),
        }
    }

    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn path_hash(source: &Path) -> String {
    let digest = sha1_smol::Sha1::from(source.to_string_lossy().as_bytes())
        .digest()
        .to_string();
    digest[..HASH_CHARS].to_string()
}
