//! Rule templates, matching, and proof checking.

mod check_proof;
pub mod library;
pub mod unify;

pub use check_proof::{CheckErrorKind, check_steps};
pub use library::{ArgumentKind, ArgumentLibrary, ArgumentTemplate, LibraryError, PremiseRole};
pub use unify::{MatchError, Premise, Substitution};
