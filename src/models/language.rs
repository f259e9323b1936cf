//! Supported submission languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::languages;

/// Closed set of languages the engine can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cpp,
    Java,
    JavaScript,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::JavaScript,
    ];

    /// Canonical identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => languages::PYTHON,
            Language::C => languages::C,
            Language::Cpp => languages::CPP,
            Language::Java => languages::JAVA,
            Language::JavaScript => languages::JAVASCRIPT,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a language identifier is outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            languages::PYTHON => Ok(Language::Python),
            languages::C => Ok(Language::C),
            languages::CPP => Ok(Language::Cpp),
            languages::JAVA => Ok(Language::Java),
            languages::JAVASCRIPT => Ok(Language::JavaScript),
            other if languages::JAVASCRIPT_ALIASES.contains(&other) => Ok(Language::JavaScript),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("cpp".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!(" java ".parse::<Language>(), Ok(Language::Java));
        assert_eq!("node".parse::<Language>(), Ok(Language::JavaScript));
        assert_eq!("nodejs".parse::<Language>(), Ok(Language::JavaScript));
        assert!("ruby".parse::<Language>().is_err());
        assert!("Python".parse::<Language>().is_err());
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for language in Language::ALL {
            assert_eq!(language.as_str().parse::<Language>(), Ok(language));
        }
    }
}
