use std::sync::LazyLock;
use ustr::Ustr;

macro_rules! str_const {
    ($($name:ident = $str:literal);*; ) => {
        $(pub static $name: LazyLock<Ustr> = LazyLock::new(|| Ustr::from($str));)*
    };
}

// Reserved rule names:
str_const! {
    PREMISE_RULE = "V";
    ASSUMPTION_RULE = "A";
}

// Proof notation:
str_const! {
    SEPARATOR = "|-";
}

str_const! {
    CONFIG_FILE = "natded.toml";
    PROOF_EXTENSION = "nd";
}

/// ASCII spellings of the connectives.
pub mod symbols {
    pub const NOT: &str = "!";
    pub const AND: &str = "&";
    pub const OR: &str = "|";
    pub const FOLLOWS: &str = "->";
    pub const EQUIVALENT: &str = "<->";
}

/// Unicode spellings of the connectives, in the same order as
/// [`ASCII_CONNECTIVES`].
pub const UNICODE_CONNECTIVES: [&str; 5] = ["¬", "∧", "∨", "→", "↔"];
pub const ASCII_CONNECTIVES: [&str; 5] = [
    symbols::NOT,
    symbols::AND,
    symbols::OR,
    symbols::FOLLOWS,
    symbols::EQUIVALENT,
];
