use thiserror::Error;
use winnow::combinator::{alt, cut_err, eof, fail, opt, peek, preceded, repeat, terminated};
use winnow::error::{
    ContextError, ErrMode, FromExternalError, ModalResult, StrContext, StrContextValue,
};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::types::{qualified, Category, CompareOp, Condition, Pattern, Value, ValueError};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace).void().parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// `segment ('.' segment)*`. The dots are part of the name.
fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (segment, repeat(0.., ('.', segment)).map(|()| ()))
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn text_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        match any.parse_next(input)? {
            '"' => return Ok(s),
            '\\' => match any.parse_next(input)? {
                '"' => s.push('"'),
                '\\' => s.push('\\'),
                other => {
                    s.push('\\');
                    s.push(other);
                }
            },
            c => s.push(c),
        }
    }
}

/// Body of `/.../`, with `\/` unescaped and every other escape left for
/// the regex engine.
fn regex_body(input: &mut &str) -> ModalResult<String> {
    '/'.parse_next(input)?;
    let mut source = String::new();
    loop {
        match any.parse_next(input)? {
            '/' => return Ok(source),
            '\\' => match any.parse_next(input)? {
                '/' => source.push('/'),
                other => {
                    source.push('\\');
                    source.push(other);
                }
            },
            c => source.push(c),
        }
    }
}

fn regex_literal(input: &mut &str) -> ModalResult<Pattern> {
    (regex_body, opt('i'))
        .try_map(|(source, flag)| Pattern::new(&source, flag.is_some()))
        .parse_next(input)
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '-')
}

/// `yyyy-` opens every timestamp form.
fn looks_like_timestamp(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// Decide the kind of a digit-led token from its shape. A token opening like
/// a date that is not one falls back to a version when it has a dot.
fn classify_numeric(token: &str) -> Result<Value, ValueError> {
    if token.starts_with('-') {
        token.parse().map(Value::Quantity)
    } else if looks_like_timestamp(token) {
        token.parse().map(Value::Timestamp).or_else(|err| {
            if token.contains('.') {
                token.parse().map(Value::Version).map_err(|_| err)
            } else {
                Err(err)
            }
        })
    } else if token.contains('.') {
        token.parse().map(Value::Version)
    } else {
        token.parse().map(Value::Quantity)
    }
}

fn numeric_literal(input: &mut &str) -> ModalResult<Value> {
    take_while(1.., is_numeric_char)
        .try_map(classify_numeric)
        .parse_next(input)
}

fn category_literal(input: &mut &str) -> ModalResult<Category> {
    segment
        .try_map(|s: &str| s.parse::<Category>())
        .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    match peek(any).parse_next(input)? {
        '"' => text_literal
            .map(Value::Text)
            .context(StrContext::Label("text"))
            .parse_next(input),
        '/' => regex_literal
            .map(Value::Pattern)
            .context(StrContext::Label("regex"))
            .parse_next(input),
        c if c.is_ascii_digit() || c == '-' => numeric_literal
            .context(StrContext::Label("number"))
            .parse_next(input),
        c if c.is_ascii_alphabetic() || c == '_' => category_literal
            .map(Value::Category)
            .context(StrContext::Label("category"))
            .parse_next(input),
        _ => fail.parse_next(input),
    }
}

// -- Operators --------------------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        "==".value(CompareOp::Eq),
        "=~".value(CompareOp::Matches),
        "!=".value(CompareOp::Ne),
        "<=".value(CompareOp::Le),
        ">=".value(CompareOp::Ge),
        "<".value(CompareOp::Lt),
        ">".value(CompareOp::Gt),
        "contains".value(CompareOp::Contains),
    ))
    .parse_next(input)
}

// -- Conditions (precedence: || < && < primary) -----------------------------

/// Deepest nesting of parentheses and qualification bodies accepted by
/// [`parse`](super::parse).
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Error)]
#[error("nesting deeper than {MAX_NESTING} levels")]
struct NestingTooDeep;

/// Depth of the body about to be opened, or a cut error past [`MAX_NESTING`].
fn enter(input: &mut &str, depth: usize) -> ModalResult<usize> {
    if depth >= MAX_NESTING {
        return Err(ErrMode::Cut(ContextError::from_external_error(
            input,
            NestingTooDeep,
        )));
    }
    Ok(depth + 1)
}

/// A name followed by a qualification body, an operator and literal, or
/// nothing at all for the `true` keyword.
fn name_led(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    let name = ident.parse_next(input)?;
    ws.parse_next(input)?;

    if opt('{').parse_next(input)?.is_some() {
        let depth = enter(input, depth)?;
        let inner = cut_err(terminated(|i: &mut &str| expr(i, depth), (ws, '}')))
            .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
            .parse_next(input)?;
        return Ok(qualified(name, inner));
    }

    if let Some(op) = opt(compare_op).parse_next(input)? {
        let value = cut_err(preceded(ws, literal))
            .context(StrContext::Expected(StrContextValue::Description(
                "text, regex, number or category literal",
            )))
            .parse_next(input)?;
        return Ok(Condition::Compare {
            name: name.to_owned(),
            op,
            value,
        });
    }

    if name == "true" {
        return Ok(Condition::AlwaysTrue);
    }

    cut_err(fail)
        .context(StrContext::Expected(StrContextValue::Description(
            "comparison operator or '{'",
        )))
        .parse_next(input)
}

fn group(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    '('.parse_next(input)?;
    let depth = enter(input, depth)?;
    cut_err(terminated(move |i: &mut &str| expr(i, depth), (ws, ')')))
        .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)
}

fn primary(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    ws.parse_next(input)?;
    alt((
        |i: &mut &str| group(i, depth),
        |i: &mut &str| name_led(i, depth),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "condition",
    )))
    .parse_next(input)
}

fn conjunction(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    let first = primary(input, depth)?;
    let rest: Vec<Condition> = repeat(
        0..,
        preceded((ws, "&&"), cut_err(|i: &mut &str| primary(i, depth))),
    )
    .parse_next(input)?;
    Ok(flatten(first, rest, Condition::And))
}

fn disjunction(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    let first = conjunction(input, depth)?;
    let rest: Vec<Condition> = repeat(
        0..,
        preceded((ws, "||"), cut_err(|i: &mut &str| conjunction(i, depth))),
    )
    .parse_next(input)?;
    Ok(flatten(first, rest, Condition::Or))
}

/// One operand stays as is; more become a single N-ary node.
fn flatten(
    first: Condition,
    rest: Vec<Condition>,
    node: fn(Vec<Condition>) -> Condition,
) -> Condition {
    if rest.is_empty() {
        return first;
    }
    let mut subs = Vec::with_capacity(rest.len() + 1);
    subs.push(first);
    subs.extend(rest);
    node(subs)
}

fn expr(input: &mut &str, depth: usize) -> ModalResult<Condition> {
    disjunction(input, depth)
}

// -- Top-level parser -------------------------------------------------------

/// A whole condition. Blank input is the always-true condition.
pub(crate) fn condition(input: &mut &str) -> ModalResult<Condition> {
    ws.parse_next(input)?;
    if input.is_empty() {
        return Ok(Condition::AlwaysTrue);
    }
    let parsed = expr(input, 0)?;
    ws.parse_next(input)?;
    cut_err(eof)
        .context(StrContext::Expected(StrContextValue::Description(
            "'&&', '||' or end of input",
        )))
        .parse_next(input)?;
    Ok(parsed)
}
