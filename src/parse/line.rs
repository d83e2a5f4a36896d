use crate::parse::{
    proof::{Citation, ParsedLine, ProofStep, RuleCitation},
    sentence::{Variables, top_sentence},
    stream::{ParseErrorCtxHolder, ParseResult, Stream},
};
use ustr::Ustr;

/// Parse one raw line of proof text.
///
/// A line is either a separator `|-` or a step
/// `<bars><number> <sentence> <rule>[(<citations>)]`.
pub fn parse_line(text: &str, raw_line: usize) -> ParseResult<ParsedLine> {
    let mut s = Stream::new(text);
    let line = line(&mut s, raw_line)?;
    s.skip_whitespace();
    s.expect_eof()?;
    Ok(line)
}

fn line(s: &mut Stream, raw_line: usize) -> ParseResult<ParsedLine> {
    s.skip_whitespace();
    let depth = bars(s)?;

    if s.expect_char('-').is_ok() {
        return Ok(ParsedLine::Separator { depth });
    }

    s.commit(|s| {
        s.skip_whitespace();
        let line = line_number(s)?;
        s.expect_whitespace()?;
        let sentence = top_sentence(s, Variables::Forbidden)?;
        s.expect_whitespace()?;
        let rule = rule_citation(s)?;

        Ok(ParsedLine::Step(ProofStep {
            raw_line,
            line,
            depth,
            sentence,
            rule,
        }))
    })
    .ctx_label("a proof line")
}

fn bars(s: &mut Stream) -> ParseResult<usize> {
    let mut depth = 0;
    while s.expect_char('|').is_ok() {
        depth += 1;
    }

    if depth == 0 {
        s.fail().ctx_expect_char('|')
    } else {
        Ok(depth)
    }
}

/// A 1-based line number, returned 0-based.
fn line_number(s: &mut Stream) -> ParseResult<usize> {
    let check = s.checkpoint();
    let number = s.expect_number()?;

    if number == 0 {
        s.rewind(check);
        return s.fail().ctx_expect_desc("a line number of at least 1");
    }

    Ok(number - 1)
}

fn is_rule_char(c: char) -> bool {
    c.is_alphabetic() || c == '+' || c == '-'
}

fn rule_citation(s: &mut Stream) -> ParseResult<RuleCitation> {
    let mut name = String::new();
    while let Ok(c) = s.expect_char_is(is_rule_char) {
        name.push(c);
    }

    if name.is_empty() {
        return s.fail().ctx_expect_desc("a rule name");
    }

    let rule = RuleCitation::new(Ustr::from(name.as_str()), Vec::new());

    let check = s.checkpoint();
    let premises = citations(s)?;
    if (rule.is_premise() || rule.is_assumption()) && !premises.is_empty() {
        s.rewind(check);
        return s
            .fail()
            .ctx_expect_desc("no citations on a premise or assumption");
    }

    Ok(RuleCitation { premises, ..rule })
}

fn citations(s: &mut Stream) -> ParseResult<Vec<Citation>> {
    if s.expect_char('(').is_err() {
        return Ok(Vec::new());
    }

    s.commit(|s| {
        let mut citations = vec![citation(s)?];
        loop {
            s.skip_whitespace();
            if s.expect_char(',').is_ok() {
                citations.push(citation(s)?);
            } else {
                s.expect_char(')')?;
                return Ok(citations);
            }
        }
    })
}

fn citation(s: &mut Stream) -> ParseResult<Citation> {
    s.skip_whitespace();
    let start = line_number(s)?;
    s.skip_whitespace();

    if s.expect_char('-').is_ok() {
        s.skip_whitespace();
        let end = line_number(s)?;
        Ok(Citation::Range(start, end))
    } else {
        Ok(Citation::Line(start))
    }
}
