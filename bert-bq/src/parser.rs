use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while},
    character::complete::{char, digit1, none_of, one_of, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    Finish,
    IResult,
};
use bert::{Bitstring, Integer, Term};
use anyhow::{anyhow, Result};

const WHITESPACE: &str = " \t\r\n";

/// One element of a binary: either a byte with an optional bit size or a string literal
enum Segment {
    Byte(u8, Option<u8>),
    Text(String),
}

fn white(i: &str) -> IResult<&str, &str> {
    take_while(move |c| WHITESPACE.contains(c))(i)
}

fn exponent(i: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(i)
}

/// Floats need either a fraction or an exponent to tell them apart from integers
fn float(i: &str) -> IResult<&str, f32> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            alt((recognize(tuple((char('.'), digit1, opt(exponent)))), exponent)),
        ))),
        |n: &str| n.parse(),
    )(i)
}

fn integer(i: &str) -> IResult<&str, Term> {
    map_res(recognize(pair(opt(char('-')), digit1)), |n: &str| n.parse::<Integer>().map(Term::from))(i)
}

fn string(i: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(opt(escaped_transform(
            none_of("\\\""),
            '\\',
            alt((
                value("\\", char('\\')),
                value("\"", char('"')),
                value("\n", char('n')),
                value("\t", char('t')),
            )))), Option::unwrap_or_default),
        char('"'),
    )(i)
}

fn quoted_atom(i: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(opt(escaped_transform(
            none_of("\\'"),
            '\\',
            alt((
                value("\\", char('\\')),
                value("'", char('\'')),
                value("\n", char('n')),
                value("\t", char('t')),
            )))), Option::unwrap_or_default),
        char('\''),
    )(i)
}

fn atom(i: &str) -> IResult<&str, Term> {
    map(
        recognize(pair(
            satisfy(|c| c.is_ascii_lowercase()),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '@'),
        )),
        |a: &str| match a {
            "true" => Term::Bool(true),
            "false" => Term::Bool(false),
            _ => Term::atom(a),
        },
    )(i)
}

fn segment(i: &str) -> IResult<&str, Segment> {
    delimited(
        white,
        alt((
            map(string, Segment::Text),
            map(
                pair(
                    map_res(digit1, |n: &str| n.parse::<u8>()),
                    opt(preceded(delimited(white, char(':'), white), map_res(digit1, |n: &str| n.parse::<u8>()))),
                ),
                |(byte, size)| Segment::Byte(byte, size),
            ),
        )),
        white,
    )(i)
}

/// Only the last segment may carry a bit size, which has to lie within 1..=8 and hold its value
fn assemble(segments: Vec<Segment>) -> std::result::Result<Term, &'static str> {
    let count = segments.len();
    let mut bytes = Vec::new();
    let mut trailing = 8;
    for (n, segment) in segments.into_iter().enumerate() {
        match segment {
            Segment::Text(text) => bytes.extend_from_slice(text.as_bytes()),
            Segment::Byte(byte, None) => bytes.push(byte),
            Segment::Byte(byte, Some(size)) if n + 1 == count && (1..=8).contains(&size) => {
                if u16::from(byte) >> size != 0 {
                    return Err("value exceeds bit size");
                }
                // the value occupies the most significant bits
                bytes.push(byte << (8 - size));
                trailing = size;
            }
            Segment::Byte(_, Some(_)) => return Err("bit size out of place"),
        }
    }
    match trailing {
        8 => Ok(Term::Binary(bytes)),
        bits => Bitstring::from_parts(bytes, bits).map(Term::Bitstring).ok_or("malformed bitstring"),
    }
}

fn binary(i: &str) -> IResult<&str, Term> {
    map_res(delimited(tag("<<"), separated_list0(char(','), segment), tag(">>")), assemble)(i)
}

fn elements<'a>(open: char, close: char) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<Term>> {
    delimited(char(open), separated_list0(char(','), term), preceded(white, char(close)))
}

fn term(i: &str) -> IResult<&str, Term> {
    delimited(
        white,
        alt((
            map(elements('{', '}'), Term::Tuple),
            map(elements('[', ']'), |e| if e.is_empty() { Term::Nil } else { Term::List(e) }),
            binary,
            map(string, Term::String),
            map(quoted_atom, Term::Atom),
            map(float, Term::Float),
            integer,
            atom,
        )),
        white,
    )(i)
}

/// Parses a single term in Erlang syntax. `[]` is nil, `true` and `false` are booleans.
pub fn parse(i: &str) -> Result<Term> {
    Ok(all_consuming(term)(i).finish().map_err(|e| anyhow!("{}", e))?.1)
}

#[cfg(test)]
mod tests {
    use super::parse;
    use bert::{Bitstring, Integer, Term};

    #[test]
    fn scalars() {
        assert_eq!(Term::Int(42), parse("42").unwrap());
        assert_eq!(Term::Int(-7), parse(" -7\n").unwrap());
        assert_eq!(Term::BigInt(Integer::from(u64::MAX)), parse("18446744073709551615").unwrap());
        assert_eq!(Term::Float(1.5), parse("1.5").unwrap());
        assert_eq!(Term::Float(-250.0), parse("-2.5e2").unwrap());
        assert_eq!(Term::Float(1e20), parse("1e20").unwrap());
        assert_eq!(Term::atom("ok"), parse("ok").unwrap());
        assert_eq!(Term::atom("Hello World"), parse("'Hello World'").unwrap());
        assert_eq!(Term::atom(""), parse("''").unwrap());
        assert_eq!(Term::string("say \"hi\"\n"), parse(r#""say \"hi\"\n""#).unwrap());
        assert_eq!(Term::string(""), parse(r#""""#).unwrap());
        assert_eq!(Term::Bool(true), parse("true").unwrap());
        assert_eq!(Term::atom("true"), parse("'true'").unwrap());
        assert_eq!(Term::Nil, parse("[ ]").unwrap());
    }

    #[test]
    fn binaries() {
        assert_eq!(Term::Binary(vec![1, 2, 3]), parse("<<1,2,3>>").unwrap());
        assert_eq!(Term::Binary(vec![]), parse("<<>>").unwrap());
        assert_eq!(Term::Binary(b"abc".to_vec()), parse(r#"<<"abc">>"#).unwrap());
        assert_eq!(Term::Bitstring(Bitstring::new(vec![1, 128], 9)), parse("<<1, 1:1>>").unwrap());
        assert_eq!(Term::Bitstring(Bitstring::new(vec![0b1010_0000], 3)), parse("<<5:3>>").unwrap());
        assert_eq!(Term::Binary(vec![1, 2]), parse("<<1,2:8>>").unwrap());
        assert_eq!(Term::Binary(vec![255]), parse("<<255:8>>").unwrap());
        assert!(parse("<<2:1>>").is_err());
        assert!(parse("<<128:1>>").is_err());
        assert!(parse("<<256>>").is_err());
        assert!(parse("<<1:3,2>>").is_err());
        assert!(parse("<<1:9>>").is_err());
    }

    #[test]
    fn collections() {
        assert_eq!(
            Term::Tuple(vec![Term::atom("reply"), Term::List(vec![Term::Int(1), Term::Nil]), Term::Tuple(vec![])]),
            parse("{reply, [1, []], {}}").unwrap(),
        );
        assert!(parse("{1, 2").is_err());
        assert!(parse("[1,]").is_err());
        assert!(parse("ok ok").is_err());
        assert!(parse("Ok").is_err());
    }

    #[test]
    fn display_roundtrip() {
        for text in [
            "{call, lists, reverse, [[1, 2, 3]]}",
            "{'Quoted Atom', \"string\", <<1,2,3>>, <<7,1:1>>}",
            "[true, false, [], 1.5, -42, 100000000000]",
        ] {
            let term = parse(text).unwrap();
            assert_eq!(text, term.to_string());
            assert_eq!(term, parse(&term.to_string()).unwrap());
        }
    }

}
