//! The catalogue of inference rules.

use crate::{
    parse::{parse_pattern, stream::ParseErrorCtx},
    semant::unify::{MatchError, Premise, Substitution, match_argument},
    sentence::Sentence,
    strings::{ASSUMPTION_RULE, PREMISE_RULE},
};
use itertools::Itertools;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;
use ustr::Ustr;

const BUILTIN_RULES: &str = include_str!("../../rules/default.toml");

static BUILTIN: LazyLock<ArgumentLibrary> = LazyLock::new(|| {
    ArgumentLibrary::from_toml(BUILTIN_RULES)
        .unwrap_or_else(|e| panic!("built-in rule library is malformed: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    Object,
    Meta,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::Object => write!(f, "object"),
            ArgumentKind::Meta => write!(f, "meta"),
        }
    }
}

/// How a premise pattern is matched: against one line, or against the
/// implications a sub-proof establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiseRole {
    Object,
    Meta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremisePattern {
    pub role: PremiseRole,
    pub pattern: Sentence,
}

impl fmt::Display for PremisePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            PremiseRole::Object => write!(f, "{}", self.pattern),
            PremiseRole::Meta => write!(f, "[{}]", self.pattern),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTemplate {
    name: Ustr,
    kind: ArgumentKind,
    premises: Vec<PremisePattern>,
    conclusion: Sentence,
    repeat_last_premise: bool,
}

impl ArgumentTemplate {
    pub fn name(&self) -> Ustr {
        self.name
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    pub fn arity(&self) -> usize {
        self.premises.len()
    }

    pub fn premises(&self) -> &[PremisePattern] {
        &self.premises
    }

    pub fn conclusion(&self) -> &Sentence {
        &self.conclusion
    }

    /// Whether a citation with fewer premises than the arity is filled up by
    /// repeating its last premise.
    pub fn repeats_last_premise(&self) -> bool {
        self.repeat_last_premise
    }
}

impl fmt::Display for ArgumentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} => {}",
            self.name,
            self.kind,
            self.premises.iter().join(", "),
            self.conclusion
        )?;
        if self.repeat_last_premise {
            write!(f, " (last premise may repeat)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("could not read rule library `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("invalid rule library: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("`{0}` is not a valid rule name")]
    InvalidName(String),
    #[error("`{0}` is reserved and cannot name a rule")]
    ReservedName(String),
    #[error("rule `{name}`: cannot read pattern `{pattern}`: {error}")]
    Pattern {
        name: String,
        pattern: String,
        error: ParseErrorCtx,
    },
    #[error("rule `{name}` declares arity {arity} but lists {premises} premises")]
    ArityMismatch {
        name: String,
        arity: usize,
        premises: usize,
    },
    #[error("rule `{name}`: meta premise `{pattern}` is not an implication")]
    MetaPremiseNotImplication { name: String, pattern: Sentence },
    #[error("rule `{name}` is an object rule but has a meta premise")]
    MetaPremiseInObjectRule { name: String },
    #[error("rule `{name}` repeats its last premise but has no premises")]
    PaddingWithoutPremises { name: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryFile {
    #[serde(default)]
    rule: Vec<RuleDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDef {
    name: String,
    kind: ArgumentKind,
    arity: usize,
    #[serde(default)]
    premises: Vec<PremiseDef>,
    conclusion: String,
    #[serde(default)]
    repeat_last_premise: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PremiseDef {
    Pattern(String),
    WithRole { role: PremiseRole, pattern: String },
}

fn is_rule_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphabetic() || c == '+' || c == '-')
}

impl RuleDef {
    fn into_template(self) -> Result<ArgumentTemplate, LibraryError> {
        let name = self.name;

        if !is_rule_name(&name) {
            return Err(LibraryError::InvalidName(name));
        }
        if name == PREMISE_RULE.as_str() || name == ASSUMPTION_RULE.as_str() {
            return Err(LibraryError::ReservedName(name));
        }
        if self.arity != self.premises.len() {
            return Err(LibraryError::ArityMismatch {
                name,
                arity: self.arity,
                premises: self.premises.len(),
            });
        }
        if self.repeat_last_premise && self.arity == 0 {
            return Err(LibraryError::PaddingWithoutPremises { name });
        }

        let read = |text: &str| {
            parse_pattern(text).map_err(|e| LibraryError::Pattern {
                name: name.clone(),
                pattern: text.to_string(),
                error: e.ctx().clone(),
            })
        };

        let default_role = match self.kind {
            ArgumentKind::Object => PremiseRole::Object,
            ArgumentKind::Meta => PremiseRole::Meta,
        };

        let mut premises = Vec::new();
        for def in &self.premises {
            let (role, text) = match def {
                PremiseDef::Pattern(text) => (default_role, text),
                PremiseDef::WithRole { role, pattern } => (*role, pattern),
            };
            premises.push(PremisePattern {
                role,
                pattern: read(text)?,
            });
        }
        let conclusion = read(&self.conclusion)?;

        for premise in &premises {
            match (self.kind, premise.role) {
                (ArgumentKind::Object, PremiseRole::Meta) => {
                    return Err(LibraryError::MetaPremiseInObjectRule { name });
                }
                (_, PremiseRole::Meta) if !premise.pattern.is_implication() => {
                    return Err(LibraryError::MetaPremiseNotImplication {
                        name,
                        pattern: premise.pattern.clone(),
                    });
                }
                _ => {}
            }
        }

        Ok(ArgumentTemplate {
            name: Ustr::from(name.as_str()),
            kind: self.kind,
            premises,
            conclusion,
            repeat_last_premise: self.repeat_last_premise,
        })
    }
}

/// Rule templates by name. Templates sharing a name are alternatives.
#[derive(Debug, Clone, Default)]
pub struct ArgumentLibrary {
    templates: FxHashMap<Ustr, Vec<ArgumentTemplate>>,
    order: Vec<Ustr>,
}

impl ArgumentLibrary {
    /// The rules shipped with natded.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_toml(text: &str) -> Result<Self, LibraryError> {
        let file: LibraryFile = toml::from_str(text)?;
        let mut library = Self::default();

        for def in file.rule {
            library.add(def.into_template()?);
        }

        debug!(
            "loaded {} rules ({} templates)",
            library.order.len(),
            library.templates.values().map(Vec::len).sum::<usize>()
        );
        Ok(library)
    }

    pub fn from_file(path: &Path) -> Result<Self, LibraryError> {
        let text =
            fs::read_to_string(path).map_err(|e| LibraryError::Io(path.to_path_buf(), e))?;
        Self::from_toml(&text)
    }

    pub fn add(&mut self, template: ArgumentTemplate) {
        let name = template.name();
        let entry = self.templates.entry(name).or_default();
        if entry.is_empty() {
            self.order.push(name);
        }
        entry.push(template);
    }

    pub fn contains(&self, name: Ustr) -> bool {
        self.templates.contains_key(&name)
    }

    pub fn get(&self, name: Ustr) -> &[ArgumentTemplate] {
        self.templates
            .get(&name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Rule names in the order they were defined.
    pub fn names(&self) -> &[Ustr] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgumentTemplate> {
        self.order.iter().flat_map(|name| self.get(*name))
    }

    /// Check an application of the rule `name`, trying each of its templates.
    ///
    /// Fails with [`MatchError::InvalidArgumentUsage`] when no template takes
    /// that many premises, and [`MatchError::ArgumentDoesNotMatch`]
    /// otherwise.
    pub fn check(
        &self,
        name: Ustr,
        premises: &[Premise],
        conclusion: &Sentence,
    ) -> Result<Substitution, MatchError> {
        let mut error = MatchError::InvalidArgumentUsage;

        for (i, template) in self.get(name).iter().enumerate() {
            match match_argument(template, premises, conclusion) {
                Ok(substitution) => {
                    trace!("`{name}` matched alternative {i}");
                    return Ok(substitution);
                }
                Err(e) => {
                    trace!("`{name}` alternative {i} rejected: {e}");
                    if e != MatchError::InvalidArgumentUsage {
                        error = MatchError::ArgumentDoesNotMatch;
                    }
                }
            }
        }

        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_sentence;

    fn s(text: &str) -> Sentence {
        parse_sentence(text).unwrap()
    }

    fn check(rule: &str, premises: &[&str], conclusion: &str) -> Result<Substitution, MatchError> {
        let premises = premises.iter().map(|p| s(p)).collect::<Vec<_>>();
        let premises = premises.iter().map(Premise::Sentence).collect::<Vec<_>>();
        ArgumentLibrary::builtin().check(Ustr::from(rule), &premises, &s(conclusion))
    }

    fn check_meta(rule: &str, subproofs: &[&[&str]], conclusion: &str) -> bool {
        let subproofs = subproofs
            .iter()
            .map(|lines| lines.iter().map(|l| s(l)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let premises = subproofs
            .iter()
            .map(|lines| Premise::Subproof(lines.iter().collect()))
            .collect::<Vec<_>>();
        ArgumentLibrary::builtin()
            .check(Ustr::from(rule), &premises, &s(conclusion))
            .is_ok()
    }

    #[test]
    fn builtin_library_loads() {
        let library = ArgumentLibrary::builtin();
        for name in [
            "R", "T", "+K", "-K", "+A", "-A", "+I", "-I", "+Ä", "-Ä", "+DN", "-DN", "RAA", "EFQ",
            "VEQ",
        ] {
            assert!(library.contains(Ustr::from(name)), "{name}");
        }
        assert!(!library.contains(*PREMISE_RULE));
        assert!(!library.contains(*ASSUMPTION_RULE));
        assert_eq!(library.names()[0].as_str(), "R");
        assert_eq!(library.get(Ustr::from("+A")).len(), 4);
    }

    #[test]
    fn conjunction() {
        assert!(check("+K", &["p", "q"], "(p & q)").is_ok());
        assert!(check("+K", &["(p -> r)", "!q"], "((p -> r) & !q)").is_ok());
        assert_eq!(
            check("+K", &["p", "q"], "(p | q)"),
            Err(MatchError::ArgumentDoesNotMatch)
        );
        assert_eq!(
            check("+K", &["q"], "(p & p)"),
            Err(MatchError::InvalidArgumentUsage)
        );

        assert!(check("-K", &["(p & q)"], "p").is_ok());
        assert!(check("-K", &["((p -> r) & !q)"], "!q").is_ok());
        assert!(check("-K", &["(p & q)"], "r").is_err());
        assert!(check("-K", &["((p -> r) & !q)"], "q").is_err());
    }

    #[test]
    fn disjunction() {
        assert!(check("+A", &["(p -> q)", "(!p -> r)"], "(q | r)").is_ok());
        assert!(check("+A", &["(!p -> r)", "(p -> q)"], "(r | q)").is_ok());
        assert!(check("+A", &["p"], "(p | q)").is_ok());
        assert!(check("+A", &["q"], "(p | q)").is_ok());
        assert!(check("+A", &["(p -> q)", "(!p -> r)"], "(r | q)").is_err());
        assert!(check("+A", &["p"], "(!p | q)").is_err());

        assert!(check("-A", &["(p | q)", "(p -> r)", "(q -> r)"], "r").is_ok());
        assert!(check("-A", &["(p | !q)", "(p -> r)", "(!q -> r)"], "r").is_ok());
        assert!(check("-A", &["(p | q)", "(q -> r)", "(p -> r)"], "r").is_ok());
        assert!(check("-A", &["(p | q)", "(p -> r)", "(q -> r)"], "!r").is_err());
        assert!(check("-A", &["(p | q)", "(p -> r)", "(!q -> r)"], "r").is_err());
    }

    #[test]
    fn disjunction_elimination_repeats_last_premise() {
        assert!(check("-A", &["(p | p)", "(p -> r)"], "r").is_ok());
        assert!(check("-A", &["(p | q)", "(p -> r)"], "r").is_err());
    }

    #[test]
    fn implication_and_equivalence() {
        assert!(check("-I", &["(p -> q)", "p"], "q").is_ok());
        assert!(check("-I", &["(!p -> q)", "!p"], "q").is_ok());
        assert!(check("-I", &["(p -> q)", "q"], "p").is_err());
        assert!(check("-I", &["(p -> !q)", "p"], "q").is_err());

        assert!(check("+Ä", &["(p -> !q)", "(!q -> p)"], "(p <-> !q)").is_ok());
        assert!(check("+Ä", &["(p -> q)", "(q -> p)"], "(p <-> p)").is_err());
        assert!(check("-Ä", &["(!p <-> q)"], "(q -> !p)").is_ok());
        assert!(check("-Ä", &["(!p <-> q)"], "(p -> q)").is_err());
    }

    #[test]
    fn negation_and_trivial_rules() {
        assert!(check("+DN", &["!p"], "!!!p").is_ok());
        assert!(check("+DN", &["p"], "!p").is_err());
        assert!(check("-DN", &["!!(p -> q)"], "(p -> q)").is_ok());
        assert!(check("-DN", &["!p"], "p").is_err());

        assert!(check("T", &[], "(p -> p)").is_ok());
        assert!(check("T", &[], "(p -> q)").is_err());
        assert!(check("R", &["(p & q)"], "(p & q)").is_ok());
        assert!(check("R", &["p"], "q").is_err());

        assert!(check("EFQ", &["!p"], "(p -> q)").is_ok());
        assert!(check("EFQ", &["p"], "(!p -> (q & r))").is_ok());
        assert!(check("EFQ", &["p"], "(p -> q)").is_err());
        assert!(check("VEQ", &["p"], "(q -> p)").is_ok());
        assert!(check("VEQ", &["p"], "(p -> q)").is_err());
    }

    #[test]
    fn implication_introduction() {
        assert!(check_meta("+I", &[&["p", "r", "q"]], "(p -> q)"));
        assert!(check_meta("+I", &[&["p"]], "(p -> p)"));
        assert!(check_meta(
            "+I",
            &[&["(p | q)", "(p -> r)", "(q -> r)"]],
            "((p | q) -> (q -> r))"
        ));
        assert!(!check_meta("+I", &[&["p", "r", "q"]], "(r -> q)"));
        assert!(!check_meta(
            "+I",
            &[&["(p | q)", "(p -> r)", "(q -> r)"]],
            "((p | q) -> !(r -> p))"
        ));
    }

    #[test]
    fn reductio_uses_two_lines_of_one_subproof() {
        let subproof: &[&str] = &["p", "q", "r", "!q"];
        assert!(check_meta("RAA", &[subproof, subproof], "!p"));
        assert!(check_meta("RAA", &[subproof], "!p"));
        assert!(!check_meta("RAA", &[subproof], "p"));
        assert!(!check_meta("RAA", &[subproof], "r"));

        let subproof: &[&str] = &["!p", "!!q", "r", "!q"];
        assert!(check_meta("RAA", &[subproof], "!!p"));
        assert!(check_meta("RAA", &[subproof], "p"));
        assert!(!check_meta("RAA", &[subproof], "!p"));
    }

    #[test]
    fn mixed_disjunction_elimination() {
        let disjunction = s("(p | q)");
        let left = [s("p"), s("(p & p)"), s("r")];
        let right = [s("q"), s("r")];
        let premises = [
            Premise::Sentence(&disjunction),
            Premise::Subproof(left.iter().collect()),
            Premise::Subproof(right.iter().collect()),
        ];
        let library = ArgumentLibrary::builtin();
        assert!(library.check(Ustr::from("-A"), &premises, &s("r")).is_ok());
        assert!(library.check(Ustr::from("-A"), &premises, &s("q")).is_err());
        assert!(
            library
                .check(Ustr::from("-A"), &premises[..2], &s("r"))
                .is_err()
        );
    }

    #[test]
    fn role_mismatch_does_not_match() {
        let p = s("p");
        let premises = [Premise::Subproof(vec![&p])];
        assert_eq!(
            ArgumentLibrary::builtin().check(Ustr::from("R"), &premises, &p),
            Err(MatchError::ArgumentDoesNotMatch)
        );
    }

    #[test]
    fn custom_library() {
        let library = ArgumentLibrary::from_toml(
            r#"
            [[rule]]
            name = "MT"
            kind = "object"
            arity = 2
            premises = ["(A -> B)", "!B"]
            conclusion = "!A"
            "#,
        )
        .unwrap();
        let premises = [s("(p -> q)"), s("!q")];
        let premises = premises.iter().map(Premise::Sentence).collect::<Vec<_>>();
        let sub = library.check(Ustr::from("MT"), &premises, &s("!p")).unwrap();
        assert_eq!(sub.get(&'A'), Some(&s("p")));
        assert!(!library.contains(Ustr::from("+K")));
        assert_eq!(library.iter().count(), 1);
    }

    #[test]
    fn malformed_libraries() {
        let cases = [
            (
                r#"[[rule]]
                name = "X"
                kind = "object"
                arity = 2
                premises = ["A"]
                conclusion = "A""#,
                "arity",
            ),
            (
                r#"[[rule]]
                name = "V"
                kind = "object"
                arity = 0
                conclusion = "(A -> A)""#,
                "reserved",
            ),
            (
                r#"[[rule]]
                name = "X"
                kind = "meta"
                arity = 1
                premises = ["A"]
                conclusion = "A""#,
                "implication",
            ),
            (
                r#"[[rule]]
                name = "X"
                kind = "object"
                arity = 1
                premises = [{ role = "meta", pattern = "(A -> B)" }]
                conclusion = "B""#,
                "object rule",
            ),
            (
                r#"[[rule]]
                name = "X"
                kind = "object"
                arity = 1
                premises = ["(A & )"]
                conclusion = "A""#,
                "pattern",
            ),
            (
                r#"[[rule]]
                name = "X"
                kind = "object"
                arity = 0
                conclusion = "A"
                repeat_last_premise = true"#,
                "no premises",
            ),
            (
                r#"[[rule]]
                name = "X Y"
                kind = "object"
                arity = 0
                conclusion = "A""#,
                "valid rule name",
            ),
            (
                r#"[[rule]]
                name = "X"
                kind = "object"
                arity = 0
                conclusion = "A"
                colour = "red""#,
                "colour",
            ),
        ];

        for (text, message) in cases {
            let err = ArgumentLibrary::from_toml(text).unwrap_err();
            assert!(err.to_string().contains(message), "{err}");
        }
    }
}
