//! # Scanner
//!
//! Turns CAFE source text into a flat list of [`Token`]s terminated by a
//! single `Eof` token. Whitespace, tabs and line breaks are consumed without
//! producing tokens; anything no rule recognizes becomes a one-character
//! `Error` token rather than aborting the scan.

mod cursor;
mod rules;
mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Position, Token, TokenBuilder, TokenKind, TokenizerError, TokenizerResult};

#[tracing::instrument(level = "debug", skip(input))]
pub fn tokenize(input: &str) -> TokenizerResult<Vec<Token>> {
    Scanner::new(input).scan()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BASIC: &str = include_str!("../../tests/data/basic.cafe");
    const FUNCTIONS: &str = include_str!("../../tests/data/functions.cafe");

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text.as_str())
            .collect()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_document_texts() {
        let tokens = tokenize(BASIC).unwrap();
        let multi = "\"multi\" \\\n\t\t\t\"line\" \\\n\t\t\t\"string\"";
        let block_array = [
            r#""this""#, "10", r#""is""#, "false", r#""an""#, r#""array""#, r#""inside""#,
            "false", r#""of""#, r#""a""#, r#""block""#,
        ];

        let mut expected = vec![
            "// This is a comment",
            "str", r#""string""#,
            "// Inline comment",
            "multistr", multi,
            "number1", "2023",
            "number2", "3.14159",
            "trickNumber1", r#""2023""#,
            "trickNumber2", r#""3.14159""#,
            "// These", "// are", "// multiple", "// comments",
            "boolean1", "true",
            "boolean2", "false",
            "trickBoolean1", r#""true""#,
            "trickBoolean2", r#""false""#,
            "array1", "",
            r#""just""#, r#""strings""#, "",
            "array2", "",
            r#""strings""#, "10", "1.0001", r#""and""#, "false", r#""other""#, r#""types""#, "",
            "array3", "",
            r#""multi""#, "123", r#""line""#, "false", r#""array""#, "",
            "trickArray", r#""[this is to trick an array]""#,
            "block1", "",
            "block2",
            "blockString", r#""block string""#,
            "blockInt", "1234",
            "blockFloat", "10.10",
            "blockBool", "false",
            "blockArray", "",
        ];
        expected.extend(block_array);
        expected.extend(["", "", "block3", "", "// Comment", "block4", "nested1"]);
        expected.extend([
            "blockNestedString", r#""block string""#,
            "blockNestedInt", "1234",
            "blockNestedFloat", "10.10",
            "blockNestedBool", "false",
            "blockNestedArray", "",
        ]);
        expected.extend(block_array);
        expected.extend(["", "", ""]);
        expected.extend([
            "arith1", "10 + 10",
            "arith2", "10-8",
            "arith3", "1 * 4",
            "arith4", "10/ 10",
            "compare1", "10 == 20",
            "compare2", "10 != 20",
            "compare3", "10 > 20",
            "compare4", "10 >= 20",
            "compare5", "10 < 20",
            "compare6", "10 <= 20",
            "compare7", "true == true",
            "compare8", "true != true",
            "condition1", "if compare1 : true ? false",
            "// Comment",
            "condition2", "for array1 ...",
        ]);

        assert_eq!(texts(&tokens), expected);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Error));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_function_document_texts() {
        let tokens = tokenize(FUNCTIONS).unwrap();
        let expected = vec![
            "// Strings",
            "testFuncString1", r#"upper("test function")"#,
            "testFuncString2", r#"lower("TEST FUNCTION")"#,
            "testFuncString3", r#"append("test", " function")"#,
            "arr1", "",
            r#""test""#, r#""string""#, r#""concat""#, r#""function""#, "",
            "testFuncString4", r#"concat(arr1, " ")"#,
            "testFuncString5", r#"length("test function")"#,
            "// Numerical",
            "testFuncNumerical1", "power(5, 2)",
            "testFuncNumerical2", "floor(25, 7)",
            "testFuncNumerical3", "remainder(10, 3)",
            "// Gate Logic",
            "testFuncGateLogic1", "and(true, true)",
            "testFuncGateLogic2", "or(true, false)",
            "testFuncGateLogic3", "nand(true, true)",
            "testFuncGateLogic4", "nor(true, true)",
            "testFuncGateLogic5", "xor(true, false)",
            "testFuncGateLogic6", "xnor(true, true)",
        ];
        assert_eq!(texts(&tokens), expected);
        assert!(tokens
            .iter()
            .filter(|t| t.text.contains('('))
            .all(|t| t.kind == TokenKind::Function));
    }

    #[test]
    fn test_literal_kinds() {
        use TokenKind::*;
        assert_eq!(kinds("x = 2023"), vec![AttrDef, Int, Eof]);
        assert_eq!(kinds("x = -5"), vec![AttrDef, Int, Eof]);
        assert_eq!(kinds("x = 3.14159"), vec![AttrDef, Float, Eof]);
        assert_eq!(kinds("x = 1e-5"), vec![AttrDef, Float, Eof]);
        assert_eq!(kinds("x = \"3.14159\""), vec![AttrDef, String, Eof]);
        assert_eq!(kinds("x = false"), vec![AttrDef, Bool, Eof]);
        assert_eq!(kinds("x = other"), vec![AttrDef, AttrCall, Eof]);
        assert_eq!(kinds("x = 1 % 2"), vec![AttrDef, Arithmetic, Eof]);
        assert_eq!(kinds("x = 10 >= 2"), vec![AttrDef, Comparison, Eof]);
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = tokenize(BASIC).unwrap();
        let line_of = |text: &str| {
            tokens
                .iter()
                .find(|t| t.text == text)
                .map(|t| t.position.line)
        };
        assert_eq!(line_of("// This is a comment"), Some(1));
        assert_eq!(line_of("multistr"), Some(3));
        assert_eq!(line_of("number1"), Some(6));
        assert_eq!(line_of("block1"), Some(27));
        assert_eq!(line_of("condition2"), Some(62));

        let str_value = &tokens[2];
        assert_eq!(str_value.text, r#""string""#);
        assert_eq!(str_value.position.line, 2);
        assert_eq!(str_value.position.length, 8);
    }

    #[test]
    fn test_unrecognized_input_becomes_error_tokens() {
        let tokens = tokenize("x = 1\n@\n").unwrap();
        let errors: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "@");
        assert_eq!(errors[0].position.line, 2);
    }

    #[test]
    fn test_unterminated_multi_string() {
        let err = tokenize("x = \"a\" \\").unwrap_err();
        assert!(matches!(err, TokenizerError::UnterminatedMultiString { .. }));
    }

    #[test]
    fn test_unterminated_multi_string_before_trailing_newline() {
        for input in ["x = \"a\" \\\n", "x = \"a\" \\\n    \n\n", "x = \"a\" \\\n\"b\" \\\n"] {
            let err = tokenize(input).unwrap_err();
            assert!(
                matches!(err, TokenizerError::UnterminatedMultiString { .. }),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_condition_words_match_inside_values() {
        use TokenKind::*;
        for input in ["x = platform\n", "x = if a : b ? c\n"] {
            assert_eq!(kinds(input), vec![AttrDef, Condition, Eof], "{input:?}");
        }
        assert_eq!(
            kinds("x = info // for later\n"),
            vec![AttrDef, Condition, Comment, Eof]
        );
        assert_eq!(kinds("x = other // if\n"), vec![AttrDef, AttrCall, Comment, Eof]);
        assert_eq!(kinds("x = other\n"), vec![AttrDef, AttrCall, Eof]);
        assert_eq!(kinds("x = \"platform\"\n"), vec![AttrDef, String, Eof]);
    }

    #[test]
    fn test_comment_inside_multi_line_array() {
        use TokenKind::*;
        let input = "x = [\n    1, // first\n    2\n]\n";
        assert_eq!(
            kinds(input),
            vec![AttrDef, ArrayStart, ArrayElem, Comment, ArrayElem, ArrayEnd, Eof]
        );
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
