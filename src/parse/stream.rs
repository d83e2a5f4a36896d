use std::fmt;

/// A cursor over a single line of proof text.
#[derive(Debug)]
pub struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl<'a> Stream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn rewind(&mut self, to: Checkpoint) {
        self.pos = to.0;
    }

    /// Run `f`, restoring the cursor if it fails.
    pub fn fallible<F, T>(&mut self, mut f: F) -> ParseResult<T>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        let check = self.checkpoint();
        let res = f(self);

        if res.is_err() {
            self.rewind(check);
        }

        res
    }

    /// Run `f` and turn any failure into one that alternatives must not
    /// recover from.
    pub fn commit<F, T>(&mut self, mut f: F) -> ParseResult<T>
    where
        F: FnMut(&mut Self) -> ParseResult<T>,
    {
        f(self).map_err(|e| match e {
            ParseError::Backtrack(e) => ParseError::Commit(e),
            ParseError::Commit(e) => ParseError::Commit(e),
        })
    }

    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    pub fn pop(&mut self) -> Option<char> {
        let char = self.peek()?;
        self.pos += char.len_utf8();
        Some(char)
    }

    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pop();
        }
        self.pos - start
    }

    /// Fail at the current position.
    pub fn fail<T>(&self) -> ParseResult<T> {
        Err(ParseError::new(self.pos))
    }

    pub fn expect_whitespace(&mut self) -> ParseResult<()> {
        if self.skip_whitespace() > 0 {
            Ok(())
        } else {
            self.fail().ctx_expect_desc("whitespace")
        }
    }

    pub fn expect_char_is<F>(&mut self, pred: F) -> ParseResult<char>
    where
        F: Fn(char) -> bool,
    {
        if let Some(char) = self.peek()
            && pred(char)
        {
            self.pop();
            Ok(char)
        } else {
            Err(ParseError::new(self.pos))
        }
    }

    pub fn expect_char(&mut self, char: char) -> ParseResult<char> {
        self.expect_char_is(|c| c == char).ctx_expect_char(char)
    }

    pub fn expect_str(&mut self, str: &'static str) -> ParseResult<()> {
        self.fallible(|s| {
            for char in str.chars() {
                s.expect_char(char)?;
            }

            Ok(())
        })
        .ctx_clear()
        .ctx_expect_str(str)
    }

    pub fn expect_number(&mut self) -> ParseResult<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pop();
        }

        self.text[start..self.pos]
            .parse()
            .map_err(|_| ParseError::new(start))
            .ctx_expect_desc("a line number")
    }

    pub fn expect_eof(&self) -> ParseResult<()> {
        if self.pos >= self.text.len() {
            Ok(())
        } else {
            Err(ParseError::new(self.pos)).ctx_expect_desc("end of line")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorCtxTy {
    ExpectChar(char),
    ExpectStr(&'static str),
    ExpectDescription(&'static str),
    Label(&'static str),
}

impl fmt::Display for ParseErrorCtxTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorCtxTy::ExpectChar(c) => write!(f, "expected '{c}'"),
            ParseErrorCtxTy::ExpectStr(s) => write!(f, "expected \"{s}\""),
            ParseErrorCtxTy::ExpectDescription(d) => write!(f, "expected {d}"),
            ParseErrorCtxTy::Label(l) => write!(f, "while parsing {l}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorCtx {
    place: usize,
    trace: Vec<ParseErrorCtxTy>,
}

impl ParseErrorCtx {
    fn new(place: usize) -> Self {
        Self {
            place,
            trace: Vec::new(),
        }
    }

    /// Byte offset into the line where parsing stopped.
    pub fn place(&self) -> usize {
        self.place
    }

    pub fn trace(&self) -> &[ParseErrorCtxTy] {
        &self.trace
    }
}

impl fmt::Display for ParseErrorCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trace.first() {
            Some(first) => write!(f, "{first}")?,
            None => write!(f, "unexpected input")?,
        }
        for ctx in self.trace.iter().skip(1) {
            if let ParseErrorCtxTy::Label(_) = ctx {
                write!(f, " {ctx}")?;
            }
        }
        write!(f, " at column {}", self.place + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Backtrack(ParseErrorCtx),
    Commit(ParseErrorCtx),
}

impl ParseError {
    fn new(place: usize) -> Self {
        Self::Backtrack(ParseErrorCtx::new(place))
    }

    pub fn ctx(&self) -> &ParseErrorCtx {
        match self {
            ParseError::Backtrack(ctx) | ParseError::Commit(ctx) => ctx,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, ParseError::Commit(_))
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub trait ParseErrorCtxHolder {
    fn ctx_expect_char(self, char: char) -> Self;
    fn ctx_expect_str(self, str: &'static str) -> Self;
    fn ctx_expect_desc(self, desc: &'static str) -> Self;
    fn ctx_label(self, label: &'static str) -> Self;

    fn ctx_clear(self) -> Self;
}

impl<T> ParseErrorCtxHolder for ParseResult<T> {
    fn ctx_expect_char(mut self, char: char) -> Self {
        if let Err(ParseError::Backtrack(e) | ParseError::Commit(e)) = &mut self {
            e.trace.push(ParseErrorCtxTy::ExpectChar(char));
        }
        self
    }

    fn ctx_expect_str(mut self, str: &'static str) -> Self {
        if let Err(ParseError::Backtrack(e) | ParseError::Commit(e)) = &mut self {
            e.trace.push(ParseErrorCtxTy::ExpectStr(str));
        }
        self
    }

    fn ctx_expect_desc(mut self, desc: &'static str) -> Self {
        if let Err(ParseError::Backtrack(e) | ParseError::Commit(e)) = &mut self {
            e.trace.push(ParseErrorCtxTy::ExpectDescription(desc));
        }
        self
    }

    fn ctx_label(mut self, label: &'static str) -> Self {
        if let Err(ParseError::Backtrack(e) | ParseError::Commit(e)) = &mut self {
            e.trace.push(ParseErrorCtxTy::Label(label));
        }
        self
    }

    fn ctx_clear(mut self) -> Self {
        if let Err(ParseError::Backtrack(e) | ParseError::Commit(e)) = &mut self {
            e.trace.clear();
        }
        self
    }
}
