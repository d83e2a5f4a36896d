//! A checker for natural-deduction proofs in propositional logic.
//!
//! Proofs are written one step per line:
//!
//! ```text
//! |1 p -> q V
//! |2 p V
//! |-
//! |3 q -I(1,2)
//! ```
//!
//! [`verify::check_proof`] parses such text and checks every step against an
//! [`semant::ArgumentLibrary`] of rule templates.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod parse;
pub mod report;
pub mod semant;
pub mod sentence;
pub mod source;
pub mod strings;
pub mod transcribe;
pub mod util;
pub mod verify;
