// Predicate parser for the CLI filter string
//
// Grammar:
//   predicates := predicate ('&' predicate)*
//   predicate  := column '==' scalar
//               | column '!=' scalar
//               | column 'in' number '..' number     (inclusive bounds)
//   column     := identifier | "quoted string"
//   scalar     := number | identifier | "quoted string"

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list1,
    sequence::{preceded, separated_pair},
    IResult,
};

use super::lexer::{identifier, number, string_literal, ws};
use crate::select::Predicate;
use crate::table::Value;

fn column_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}

fn scalar(input: &str) -> IResult<&str, Value> {
    alt((
        map(number, Value::Float),
        map(string_literal, Value::Str),
        map(identifier, Value::Str),
    ))(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    let (input, column) = ws(column_name)(input)?;
    alt((
        map(preceded(ws(tag("==")), scalar), {
            let column = column.clone();
            move |value| Predicate::Eq {
                column: column.clone(),
                value,
            }
        }),
        map(preceded(ws(tag("!=")), scalar), {
            let column = column.clone();
            move |value| Predicate::NotEq {
                column: column.clone(),
                value,
            }
        }),
        map(
            preceded(ws(tag("in")), separated_pair(number, tag(".."), number)),
            move |(min, max)| Predicate::Between {
                column: column.clone(),
                min,
                max,
            },
        ),
    ))(input)
}

/// Parse a conjunction of predicates, e.g.
/// `"Country name" == "United States" & year in 2010..2024`.
pub fn parse_predicates(input: &str) -> IResult<&str, Vec<Predicate>> {
    separated_list1(ws(char('&')), predicate)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_equality() {
        let (rest, preds) = parse_predicates(r#""Country name" == "United States""#).unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            preds,
            vec![Predicate::eq("Country name", "United States")]
        );
    }

    #[test]
    fn test_parse_bare_identifiers() {
        let (_, preds) = parse_predicates("SEX != Total").unwrap();
        assert_eq!(preds, vec![Predicate::not_eq("SEX", "Total")]);
    }

    #[test]
    fn test_parse_range() {
        let (_, preds) = parse_predicates("year in 2010..2024").unwrap();
        assert_eq!(preds, vec![Predicate::between("year", 2010.0, 2024.0)]);
    }

    #[test]
    fn test_parse_numeric_equality() {
        let (_, preds) = parse_predicates("year == 2024").unwrap();
        assert_eq!(
            preds,
            vec![Predicate::Eq {
                column: "year".to_string(),
                value: Value::Float(2024.0),
            }]
        );
    }

    #[test]
    fn test_parse_conjunction() {
        let (rest, preds) =
            parse_predicates(r#""Country name" == "United States" & year in 2010..2024"#).unwrap();
        assert!(rest.is_empty());
        assert_eq!(preds.len(), 2);
    }

    #[test]
    fn test_unparsed_trailing_input_is_left_over() {
        let (rest, _) = parse_predicates("year == 2024 garbage").unwrap();
        assert!(!rest.trim().is_empty());
    }

    #[test]
    fn test_parse_error() {
        assert!(parse_predicates("== 2024").is_err());
        assert!(parse_predicates("year ~ 2024").is_err());
    }
}
