//! Model name → source path and table name derivation (Rails conventions).

use std::path::{Path, PathBuf};

use convert_case::{Boundary, Case, Converter};

/// Irregular endings, matched at the end of the last word (`chairman` → `chairmen`).
const IRREGULAR_SUFFIXES: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("mouse", "mice"),
    ("move", "moves"),
    ("sex", "sexes"),
    ("zombie", "zombies"),
];

/// Irregular plurals of the whole last word only.
const IRREGULARS: &[(&str, &str)] = &[
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
];

const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
    "data",
];

/// Suffix rules, first match wins: (suffix, characters to drop, replacement).
const SUFFIX_RULES: &[(&str, usize, &str)] = &[
    ("quiz", 0, "zes"),
    ("matrix", 2, "ices"),
    ("vertex", 2, "ices"),
    ("index", 2, "ices"),
    ("octopus", 2, "i"),
    ("virus", 2, "i"),
    ("alias", 0, "es"),
    ("status", 0, "es"),
    ("bus", 0, "es"),
    ("buffalo", 0, "es"),
    ("tomato", 0, "es"),
    ("sis", 2, "es"),
    ("ium", 2, "a"),
    ("ch", 0, "es"),
    ("sh", 0, "es"),
    ("ss", 0, "es"),
    ("x", 0, "es"),
    ("hive", 0, "s"),
    ("ife", 2, "ves"),
    ("lf", 1, "ves"),
    ("rf", 1, "ves"),
];

/// Snake case that keeps digits attached to the word before them.
///
/// Only a digit followed by an uppercase letter starts a new word, so
/// `Oauth2Token` → `oauth2_token` and `Address1` → `address1`.
fn snake_case(segment: &str) -> String {
    Converter::new()
        .remove_boundaries(&Boundary::letter_digit())
        .remove_boundary(Boundary::DigitLower)
        .to_case(Case::Snake)
        .convert(segment)
}

/// `Admin::ZipCode` → `admin/zip_code`.
pub fn underscore(model_name: &str) -> String {
    model_name
        .split("::")
        .map(snake_case)
        .collect::<Vec<_>>()
        .join("/")
}

/// `Admin::ZipCode` → `ZipCode`.
pub fn demodulize(model_name: &str) -> &str {
    model_name.rsplit("::").next().unwrap_or(model_name)
}

/// Source file of a model below `root`: `<root>/<underscored name>.rb`.
pub fn model_file_path(root: &Path, model_name: &str) -> PathBuf {
    root.join(format!("{}.rb", underscore(model_name)))
}

/// Conventional table name: `Person` → `people`, `ZipCode` → `zip_codes`.
pub fn table_name_for(model_name: &str) -> String {
    pluralize(&snake_case(demodulize(model_name)))
}

/// English pluralization of the last word of a snake_case identifier.
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    };
    let lower = last.to_lowercase();

    if lower.is_empty() || UNCOUNTABLES.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULARS.iter().find(|(singular, _)| *singular == lower) {
        return format!("{head}{plural}");
    }
    if let Some((singular, plural)) = IRREGULAR_SUFFIXES
        .iter()
        .find(|(singular, _)| lower.ends_with(singular))
    {
        let keep = &last[..last.len() - singular.len()];
        return format!("{head}{keep}{plural}");
    }
    let already_plural = IRREGULARS.iter().any(|(_, plural)| *plural == lower)
        || IRREGULAR_SUFFIXES.iter().any(|(_, plural)| lower.ends_with(plural));
    if already_plural {
        return word.to_string();
    }
    for (suffix, drop, replacement) in SUFFIX_RULES {
        if lower.ends_with(suffix) {
            let keep = &last[..last.len() - drop];
            return format!("{head}{keep}{replacement}");
        }
    }
    if let Some(stem) = lower.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{head}{}ies", &last[..last.len() - 1]);
        }
    }
    if lower.ends_with('s') {
        return word.to_string();
    }
    format!("{word}s")
}
