//! Canonical forms for free-text input: room labels, person names, asset tags.
//!
//! Every function here is pure and total: no I/O, no failure.

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel code for general storage.
pub const STORAGE_ROOM: &str = "BODEGA";

/// Canonical word placed in front of every regular room token.
pub const ROOM_PREFIX: &str = "Room";

const STORAGE_SYNONYMS: &[&str] = &[
    "bodega",
    "bodegas",
    "la bodega",
    "almacen",
    "almacén",
    "deposito",
    "depósito",
    "storage",
    "warehouse",
];

const LOCATIONAL_WORDS: &[&str] = &["room", "sala", "salon", "salón", "aula", "classroom"];

/// Words kept lowercase inside a person name unless they open it.
const NAME_CONNECTORS: &[&str] = &[
    "de", "del", "la", "las", "los", "y", "e", "da", "do", "van", "von", "of", "the", "and",
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static NUMBER_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-?(\p{Lu})$").expect("static regex"));

/// Trim and collapse every run of whitespace into a single space.
pub fn collapse_spaces(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

fn is_storage(label: &str) -> bool {
    STORAGE_SYNONYMS.contains(&label)
}

/// Remove one leading locational word ("room 7", "Sala 316F", "room7").
fn strip_locational_word(lower: &str) -> &str {
    for word in LOCATIONAL_WORDS {
        if let Some(rest) = lower.strip_prefix(word) {
            if rest.starts_with(' ') {
                return rest.trim_start();
            }
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                return rest;
            }
        }
    }
    lower
}

/// Canonical room code.
///
/// - `""` stays `""` (no room supplied)
/// - storage synonyms map to [`STORAGE_ROOM`]
/// - anything else becomes `"Room <TOKEN>"`, e.g. `"sala 316f"` → `"Room 316-F"`
pub fn normalize_room_code(raw: &str) -> String {
    let lower = collapse_spaces(raw).to_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    if is_storage(&lower) {
        return STORAGE_ROOM.to_string();
    }

    let rest = strip_locational_word(&lower);
    if is_storage(rest) {
        return STORAGE_ROOM.to_string();
    }

    let token: String = rest
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_uppercase();
    let token = token.trim_matches('-');

    if token.is_empty() {
        return String::new();
    }
    if is_storage(&token.to_lowercase()) {
        return STORAGE_ROOM.to_string();
    }

    let token = NUMBER_LETTER.replace(token, "$1-$2");
    format!("{ROOM_PREFIX} {token}")
}

/// Room used when equipment is registered without one.
pub fn room_or_storage(raw: &str) -> String {
    let code = normalize_room_code(raw);
    if code.is_empty() {
        STORAGE_ROOM.to_string()
    } else {
        code
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case a person name, keeping connectors lowercase.
///
/// `"ana   maría DE la cruz"` → `"Ana María de la Cruz"`
pub fn normalize_person_name(raw: &str) -> String {
    let lower = collapse_spaces(raw).to_lowercase();

    lower
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && NAME_CONNECTORS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed, uppercased asset tag; empty means "untagged".
pub fn normalize_asset_tag(raw: Option<&str>) -> Option<String> {
    let tag = raw.map(str::trim).unwrap_or_default().to_uppercase();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Trimmed free text; empty means absent.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(collapse_spaces).filter(|s| !s.is_empty())
}
