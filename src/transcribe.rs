//! Switching between the ASCII and Unicode spellings of the connectives.

use crate::{
    parse::ProofStep,
    sentence::Sentence,
    strings::{ASCII_CONNECTIVES, UNICODE_CONNECTIVES},
};
use aho_corasick::{AhoCorasick, MatchKind};
use std::sync::LazyLock;

static FROM_UNICODE: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(UNICODE_CONNECTIVES).expect("unicode connectives are valid patterns")
});

// `<->` has to win over the `->` inside it.
static FROM_ASCII: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(ASCII_CONNECTIVES)
        .expect("ascii connectives are valid patterns")
});

/// Replace Unicode connectives with their ASCII spelling. Safe on whole proof
/// lines.
pub fn to_ascii(text: &str) -> String {
    FROM_UNICODE.replace_all(text, &ASCII_CONNECTIVES[..])
}

/// Replace ASCII connectives with Unicode ones. Only for sentence text: the
/// depth bars of a proof line would be read as disjunctions.
pub fn to_unicode(text: &str) -> String {
    FROM_ASCII.replace_all(text, &UNICODE_CONNECTIVES[..])
}

/// How sentences are shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Notation {
    #[default]
    Ascii,
    Unicode,
}

impl Notation {
    pub fn from_unicode_flag(unicode: bool) -> Self {
        if unicode {
            Notation::Unicode
        } else {
            Notation::Ascii
        }
    }

    /// Respell text that contains no proof-line bars.
    pub fn text(self, text: &str) -> String {
        match self {
            Notation::Ascii => text.to_string(),
            Notation::Unicode => to_unicode(text),
        }
    }

    pub fn sentence(self, sentence: &Sentence) -> String {
        self.text(&sentence.to_string())
    }

    pub fn step(self, step: &ProofStep) -> String {
        format!(
            "{}{} {} {}",
            "|".repeat(step.depth),
            step.line + 1,
            self.sentence(&step.sentence),
            step.rule
        )
    }
}
