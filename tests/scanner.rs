#[cfg(test)]
mod scanner_tests {
    use minipy::scanner::Scanner;
    use minipy::token::{Token, TokenType};

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(
            tokens.len(),
            expected.len(),
            "token count mismatch: {:?}",
            tokens
        );

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_symbols() {
        assert_token_sequence(
            "(*.,+*):",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::COLON, ":"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_keywords_and_identifiers() {
        assert_token_sequence(
            "and def else false global if none not or return true print foo _bar x1",
            &[
                (TokenType::AND, "and"),
                (TokenType::DEF, "def"),
                (TokenType::ELSE, "else"),
                (TokenType::FALSE, "false"),
                (TokenType::GLOBAL, "global"),
                (TokenType::IF, "if"),
                (TokenType::NONE, "none"),
                (TokenType::NOT, "not"),
                (TokenType::OR, "or"),
                (TokenType::RETURN, "return"),
                (TokenType::TRUE, "true"),
                (TokenType::PRINT, "print"),
                (TokenType::IDENTIFIER, "foo"),
                (TokenType::IDENTIFIER, "_bar"),
                (TokenType::IDENTIFIER, "x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_indentation_tokens() {
        // Each newline yields one INDENT carrying the width of the space run.
        let source = "x = 5\n  y = 6\n    z\nw";
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        let indents: Vec<(usize, usize)> = tokens
            .iter()
            .filter_map(|t| match t.token_type {
                TokenType::INDENT(width) => Some((width, t.line)),
                _ => None,
            })
            .collect();

        assert_eq!(indents, vec![(2, 2), (4, 3), (0, 4)]);
    }

    #[test]
    fn test_scanner_blank_line_yields_empty_indent() {
        assert_token_sequence(
            "x\n\ny",
            &[
                (TokenType::IDENTIFIER, "x"),
                (TokenType::INDENT(0), ""),
                (TokenType::INDENT(0), ""),
                (TokenType::IDENTIFIER, "y"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_comments_both_styles() {
        // Both comment forms run to end of line; the newline still produces
        // its indentation token.
        assert_token_sequence(
            "x # trailing\ny // also trailing\nz",
            &[
                (TokenType::IDENTIFIER, "x"),
                (TokenType::INDENT(0), ""),
                (TokenType::IDENTIFIER, "y"),
                (TokenType::INDENT(0), ""),
                (TokenType::IDENTIFIER, "z"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_single_slash_is_division() {
        assert_token_sequence(
            "8 / 2",
            &[
                (TokenType::NUMBER, "8"),
                (TokenType::SLASH, "/"),
                (TokenType::NUMBER, "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_string_literal_contents() {
        let scanner = Scanner::new(b"\"hello world\"");
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 2);

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello world"),
            other => panic!("expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn test_scanner_multiline_string_bumps_line_counter() {
        let source = "\"a\nb\"\nx";
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected STRING, got {:?}", other),
        }

        // The identifier after the string sits on line 3.
        let x = tokens
            .iter()
            .find(|t| t.token_type == TokenType::IDENTIFIER)
            .expect("identifier token");

        assert_eq!(x.line, 3);
    }

    #[test]
    fn test_scanner_unterminated_string_is_an_error() {
        let results: Vec<_> = Scanner::new(b"\"open").collect();

        assert!(results.iter().any(|r| match r {
            Err(e) => e.to_string().contains("Unterminated string"),
            Ok(_) => false,
        }));
    }

    #[test]
    fn test_scanner_unexpected_chars_are_skipped_not_fatal() {
        let results: Vec<_> = Scanner::new(b",.$(@").collect();

        // 2 errors for '$' and '@', and scanning continues to EOF.
        let errors = results.iter().filter(|r| r.is_err()).count();
        let tokens: Vec<&Token> = results.iter().filter_map(|r| r.as_ref().ok()).collect();

        assert_eq!(errors, 2);
        assert_eq!(tokens.len(), 4); // ',', '.', '(', EOF
        assert_eq!(tokens[2].token_type, TokenType::LEFT_PAREN);
        assert_eq!(tokens[3].token_type, TokenType::EOF);

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "unexpected message: {}",
                err
            );
        }
    }

    #[test]
    fn test_scanner_emits_exactly_one_eof() {
        let mut scanner = Scanner::new(b"x");

        let mut eofs = 0;

        for item in &mut scanner {
            if let Ok(token) = item {
                if token.token_type == TokenType::EOF {
                    eofs += 1;
                }
            }
        }

        assert_eq!(eofs, 1);
        assert!(scanner.next().is_none()); // fused
    }
}
