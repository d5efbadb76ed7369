//! Code-safe variable names from human style names.
//!
//! Names coming out of a design file are free text ("Brand / Primary Red",
//! "Überschrift 1"). They are transliterated to ASCII, split into words on
//! anything that is not a letter or digit and on lower-to-upper case changes,
//! then joined in the case the target language expects.

use deunicode::deunicode;
use serde::{Deserialize, Serialize};

/// Identifier convention of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableCase {
    /// `brandPrimaryRed`
    #[default]
    LowerCamel,
    /// `brand-primary-red`
    Kebab,
    /// `brand_primary_red`
    Snake,
}

const FALLBACK_WORDS: [&str; 2] = ["unnamed", "style"];

impl VariableCase {
    /// Picks the convention for an output file extension. Unknown extensions
    /// get lowerCamelCase.
    pub fn for_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "css" | "scss" | "less" => VariableCase::Kebab,
            "xml" | "py" | "rs" | "rb" => VariableCase::Snake,
            _ => VariableCase::LowerCamel,
        }
    }

    /// Converts a style name into a variable name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stylesync::VariableCase;
    ///
    /// assert_eq!(VariableCase::LowerCamel.variable_name("Brand / Primary Red"), "brandPrimaryRed");
    /// assert_eq!(VariableCase::Kebab.variable_name("Brand / Primary Red"), "brand-primary-red");
    /// assert_eq!(VariableCase::Snake.variable_name("Überschrift 1"), "uberschrift_1");
    /// assert_eq!(VariableCase::LowerCamel.variable_name("1 Large"), "_1Large");
    /// ```
    pub fn variable_name(self, name: &str) -> String {
        let words = split_words(&deunicode(name));
        let joined = if words.is_empty() {
            self.join(FALLBACK_WORDS.iter().map(|w| w.to_string()).collect())
        } else {
            self.join(words)
        };

        if joined.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{}", joined)
        } else {
            joined
        }
    }

    fn join(self, words: Vec<String>) -> String {
        match self {
            VariableCase::LowerCamel => words
                .iter()
                .enumerate()
                .map(|(index, word)| {
                    if index == 0 {
                        word.to_ascii_lowercase()
                    } else {
                        capitalize(word)
                    }
                })
                .collect(),
            VariableCase::Kebab => lowercase_all(&words).join("-"),
            VariableCase::Snake => lowercase_all(&words).join("_"),
        }
    }
}

fn split_words(ascii: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in ascii.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        // camelCase boundary
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        previous = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_extension() {
        assert_eq!(VariableCase::for_extension("swift"), VariableCase::LowerCamel);
        assert_eq!(VariableCase::for_extension("kt"), VariableCase::LowerCamel);
        assert_eq!(VariableCase::for_extension("SCSS"), VariableCase::Kebab);
        assert_eq!(VariableCase::for_extension("xml"), VariableCase::Snake);
        assert_eq!(VariableCase::for_extension("rs"), VariableCase::Snake);
        assert_eq!(VariableCase::for_extension("unknown"), VariableCase::LowerCamel);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("Brand / Primary Red"), vec!["Brand", "Primary", "Red"]);
        assert_eq!(split_words("primaryRed"), vec!["primary", "Red"]);
        assert_eq!(split_words("H1 Title"), vec!["H1", "Title"]);
        assert_eq!(split_words("UIColor"), vec!["UIColor"]);
        assert_eq!(split_words("--"), Vec::<String>::new());
    }

    #[test]
    fn test_lower_camel() {
        let case = VariableCase::LowerCamel;
        assert_eq!(case.variable_name("Red"), "red");
        assert_eq!(case.variable_name("Heading 1"), "heading1");
        assert_eq!(case.variable_name("heading XL"), "headingXl");
        assert_eq!(case.variable_name("primaryRed"), "primaryRed");
    }

    #[test]
    fn test_kebab_and_snake() {
        assert_eq!(VariableCase::Kebab.variable_name("Heading 1"), "heading-1");
        assert_eq!(VariableCase::Snake.variable_name("Brand/Primary Red"), "brand_primary_red");
    }

    #[test]
    fn test_transliteration() {
        assert_eq!(VariableCase::LowerCamel.variable_name("Café Crème"), "cafeCreme");
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(VariableCase::LowerCamel.variable_name("1 Large"), "_1Large");
        assert_eq!(VariableCase::Kebab.variable_name("2x"), "_2x");
    }

    #[test]
    fn test_empty_name_falls_back() {
        assert_eq!(VariableCase::LowerCamel.variable_name(""), "unnamedStyle");
        assert_eq!(VariableCase::Kebab.variable_name("***"), "unnamed-style");
        assert_eq!(VariableCase::Snake.variable_name(" "), "unnamed_style");
    }
}
