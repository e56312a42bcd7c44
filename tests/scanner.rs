#[cfg(test)]
mod scanner_tests {
    use tlox::error::LoxError;
    use tlox::report::{Diagnostics, Reporter};
    use tlox::scanner::*;
    use tlox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn assert_token_matches(
        result: &Result<Token, LoxError>,
        expected_type: TokenType,
        expected_lexeme: &str,
    ) {
        match result {
            Ok(token) => {
                assert_eq!(
                    token.token_type, expected_type,
                    "Expected token type {:?}, got {:?}",
                    expected_type, token.token_type
                );
                assert_eq!(
                    token.lexeme, expected_lexeme,
                    "Expected lexeme '{}', got '{}'",
                    expected_lexeme, token.lexeme
                );
            }
            Err(e) => panic!("Expected token but got error: {}", e),
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_are_greedy() {
        assert_token_sequence(
            "!= == <= >= ! = < >",
            &[
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::BANG, "!"),
                (TokenType::EQUAL, "="),
                (TokenType::LESS, "<"),
                (TokenType::GREATER, ">"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "let classy = nil; class Foo < Bar {} _under",
            &[
                (TokenType::LET, "let"),
                (TokenType::IDENTIFIER, "classy"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::IDENTIFIER, "_under"),
                (TokenType::EOF, ""),
            ],
        );

        assert_eq!(keyword("while"), Some(TokenType::WHILE));
        assert_eq!(keyword("var"), None);
    }

    #[test]
    fn test_scanner_04_comments_are_skipped() {
        assert_token_sequence(
            "print 123; // example\n// whole line\n/",
            &[
                (TokenType::PRINT, "print"),
                (TokenType::NUMBER(0.0), "123"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_number_literals() {
        let tokens: Vec<Token> = Scanner::new("123 2.5 7. .5")
            .filter_map(Result::ok)
            .collect();

        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["123", "2.5", "7", ".", ".", "5", ""]);

        match tokens[1].token_type {
            TokenType::NUMBER(n) => assert_eq!(n, 2.5),
            ref other => panic!("Expected NUMBER, got {:?}", other),
        }

        assert_eq!(tokens[0].to_string(), "NUMBER 123 123.0");
        assert_eq!(tokens[1].to_string(), "NUMBER 2.5 2.5");
    }

    #[test]
    fn test_scanner_06_multiline_string_counts_lines() {
        let tokens: Vec<Token> = Scanner::new("\"one\ntwo\" x")
            .filter_map(Result::ok)
            .collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "one\ntwo"),
            other => panic!("Expected STRING, got {:?}", other),
        }

        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_07_unterminated_string() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("print \"oops").scan_tokens(&mut diagnostics);

        assert!(diagnostics.had_error());
        assert_eq!(
            diagnostics.messages(),
            &["[line 1] Error: Unterminated string.".to_string()]
        );
        assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }
    }

    #[test]
    fn test_scanner_08_errors_keep_line_numbers() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("let a = 1;\n@\nlet é = 2;").scan_tokens(&mut diagnostics);

        assert_eq!(
            diagnostics.messages(),
            &[
                "[line 2] Error: Unexpected character: @".to_string(),
                "[line 3] Error: Unexpected character: é".to_string(),
            ]
        );

        // Scanning carried on after both errors.
        let lets = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::LET)
            .count();
        assert_eq!(lets, 2);
    }
}
