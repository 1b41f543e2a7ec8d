use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static SNIPPET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/snippets");

const LANGUAGE_COUNT: usize = 2;

/// Languages that have bundled snippets
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Python,
}

impl Language {
    pub const ALL: [Language; LANGUAGE_COUNT] = [Language::Javascript, Language::Python];

    pub fn index(self) -> usize {
        match self {
            Language::Javascript => 0,
            Language::Python => 1,
        }
    }

    /// The language after this one, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn file_name(self) -> String {
        format!("{self}.json")
    }
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("snippet file {0} not found")]
    NotFound(String),
    #[error("snippet file {0} is not valid utf-8")]
    NotUtf8(String),
    #[error("unable to parse snippet file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no snippets for {0}")]
    NoSnippets(Language),
    #[error("empty snippet #{index} for {language}")]
    EmptySnippet { language: Language, index: usize },
}

#[derive(Deserialize, Debug)]
struct SnippetFile {
    #[allow(dead_code)]
    name: String,
    snippets: Vec<String>,
}

/// Immutable table of snippets, one ordered list per language
#[derive(Debug, Clone)]
pub struct SnippetTable {
    by_language: [Vec<String>; LANGUAGE_COUNT],
}

impl SnippetTable {
    /// Build a table, normalizing every snippet. Every language needs at
    /// least one non-empty snippet.
    pub fn new<I>(entries: I) -> Result<Self, SnippetError>
    where
        I: IntoIterator<Item = (Language, Vec<String>)>,
    {
        let mut by_language: [Vec<String>; LANGUAGE_COUNT] = std::array::from_fn(|_| Vec::new());

        for (language, snippets) in entries {
            by_language[language.index()].extend(snippets.iter().map(|s| strip_indent(s)));
        }

        for language in Language::ALL {
            let snippets = &by_language[language.index()];
            if snippets.is_empty() {
                return Err(SnippetError::NoSnippets(language));
            }
            if let Some(index) = snippets.iter().position(|s| s.is_empty()) {
                return Err(SnippetError::EmptySnippet { language, index });
            }
        }

        Ok(Self { by_language })
    }

    /// The snippets bundled into the binary
    pub fn builtin() -> Result<Self, SnippetError> {
        let entries = Language::ALL
            .into_iter()
            .map(|language| read_snippet_file(language).map(|snippets| (language, snippets)))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(entries)
    }

    pub fn snippets(&self, language: Language) -> &[String] {
        &self.by_language[language.index()]
    }
}

fn read_snippet_file(language: Language) -> Result<Vec<String>, SnippetError> {
    let file_name = language.file_name();
    let file = SNIPPET_DIR
        .get_file(&file_name)
        .ok_or_else(|| SnippetError::NotFound(file_name.clone()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| SnippetError::NotUtf8(file_name.clone()))?;

    let parsed: SnippetFile = serde_json::from_str(contents).map_err(|source| {
        SnippetError::Parse {
            file: file_name,
            source,
        }
    })?;

    Ok(parsed.snippets)
}

/// Drop leading spaces and tabs from every line so indentation never has
/// to be typed.
pub fn strip_indent(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_start_matches(|c: char| c.is_whitespace() && c != '\r'))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn builtin_table_covers_every_language() {
        let table = SnippetTable::builtin().unwrap();

        for language in Language::ALL {
            assert!(!table.snippets(language).is_empty());
        }
        assert_eq!(table.snippets(Language::Javascript).len(), 3);
        assert_eq!(table.snippets(Language::Python).len(), 3);
    }

    #[test]
    fn builtin_snippets_have_no_indentation() {
        let table = SnippetTable::builtin().unwrap();

        for language in Language::ALL {
            for snippet in table.snippets(language) {
                for line in snippet.lines() {
                    assert!(!line.starts_with(' '), "indented line in {language}: {line:?}");
                    assert!(!line.starts_with('\t'));
                }
            }
        }
    }

    #[test]
    fn builtin_snippets_keep_blank_lines() {
        let table = SnippetTable::builtin().unwrap();
        let fib = &table.snippets(Language::Python)[0];

        assert!(fib.starts_with("def fibonacci(n):\na, b = 0, 1\n"));
        assert!(fib.contains("\n\nfor num in fibonacci(50):"));
    }

    #[test]
    fn strip_indent_only_touches_leading_whitespace() {
        assert_eq!(strip_indent("a {\n  b c;\n\t}"), "a {\nb c;\n}");
        assert_eq!(strip_indent("   \nx"), "\nx");
        assert_eq!(strip_indent("x\r\n  y"), "x\r\ny");
    }

    #[test]
    fn new_rejects_missing_language() {
        let result = SnippetTable::new(vec![(Language::Javascript, vec!["a".to_string()])]);

        assert_matches!(result, Err(SnippetError::NoSnippets(Language::Python)));
    }

    #[test]
    fn new_rejects_empty_snippet() {
        let result = SnippetTable::new(vec![
            (Language::Javascript, vec!["a".to_string()]),
            (Language::Python, vec!["b".to_string(), "  ".to_string()]),
        ]);

        assert_matches!(
            result,
            Err(SnippetError::EmptySnippet {
                language: Language::Python,
                index: 1
            })
        );
    }

    #[test]
    fn language_cycles_and_displays_lowercase() {
        assert_eq!(Language::Javascript.next(), Language::Python);
        assert_eq!(Language::Python.next(), Language::Javascript);
        assert_eq!(Language::Javascript.to_string(), "javascript");
        assert_eq!(Language::Python.to_string(), "python");
    }

    #[test]
    fn language_serde_is_lowercase() {
        let json = serde_json::to_string(&Language::Python).unwrap();
        assert_eq!(json, "\"python\"");

        let parsed: Language = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(parsed, Language::Javascript);
    }
}
