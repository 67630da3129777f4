//! nom parser for the textual selector syntax.

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, none_of, one_of},
    combinator::{all_consuming, map, opt, recognize},
    error::{convert_error, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};

use super::Selector;
use crate::error::ExposeError;

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Deepest accepted nesting of `(..)` and `{..}` groups.
pub(super) const MAX_NESTING: usize = 64;

/// Parses a complete selector, rejecting trailing input.
pub(super) fn parse_selector(input: &str) -> Result<Selector, ExposeError> {
    let (_, selector) = all_consuming(delimited(multispace0, selector_list, multispace0))(input)
        .finish()
        .map_err(|e| {
            ExposeError::invalid_selector(format!(
                "cannot parse selector `{}`:\n{}",
                input,
                convert_error(input, e)
            ))
        })?;
    Ok(selector)
}

/// Wraps a parser so it skips surrounding whitespace.
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: FnMut(&'a str) -> ParseResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// `item (',' item)*`; a single item stands for itself.
fn selector_list<'a>(input: &'a str) -> ParseResult<'a, Selector> {
    let (input, mut items) = separated_list0(ws(char(',')), |i: &'a str| item(i, 0))(input)?;
    if items.len() == 1 {
        if let Some(item) = items.pop() {
            return Ok((input, item));
        }
    }
    Ok((input, Selector::Tuple(items)))
}

/// One item inside `depth` enclosing groups.
fn item<'a>(input: &'a str, depth: usize) -> ParseResult<'a, Selector> {
    alt((
        |i: &'a str| group(i, '(', ')', depth),
        |i: &'a str| group(i, '{', '}', depth),
        literal,
        chain,
    ))(input)
}

/// A parenthesized or braced tuple. Always a tuple, even with one item.
fn group<'a>(input: &'a str, open: char, close: char, depth: usize) -> ParseResult<'a, Selector> {
    let (input, _) = terminated(char(open), multispace0)(input)?;
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("selector nested too deeply"))],
        }));
    }
    let (input, items) = separated_list0(ws(char(',')), |i: &'a str| item(i, depth + 1))(input)?;
    let (input, _) = preceded(multispace0, char(close))(input)?;
    Ok((input, Selector::Tuple(items)))
}

/// Numbers and double-quoted strings.
fn literal(input: &str) -> ParseResult<'_, Selector> {
    map(
        alt((
            recognize(pair(opt(char('-')), digit1)),
            recognize(delimited(
                char('"'),
                opt(escaped(none_of("\\\""), '\\', one_of("\\\"nt"))),
                char('"'),
            )),
        )),
        |text: &str| Selector::Literal(text.to_string()),
    )(input)
}

/// `segment ('.' segment)*`, folded left onto the root.
fn chain(input: &str) -> ParseResult<'_, Selector> {
    let (input, first) = segment(input)?;
    let (input, rest) = many0(preceded(ws(char('.')), segment))(input)?;

    let selector = std::iter::once(first)
        .chain(rest)
        .fold(Selector::Root, |receiver, (name, is_call)| {
            let receiver = Box::new(receiver);
            if is_call {
                Selector::Call { receiver, name }
            } else {
                Selector::Member { receiver, name }
            }
        });
    Ok((input, selector))
}

/// An identifier, optionally followed by `()`.
fn segment(input: &str) -> ParseResult<'_, (String, bool)> {
    let (input, name) = identifier(input)?;
    let (input, call) = opt(pair(
        preceded(multispace0, char('(')),
        preceded(multispace0, char(')')),
    ))(input)?;
    Ok((input, (name.to_string(), call.is_some())))
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}
