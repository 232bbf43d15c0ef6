mod scanner_tests {
    use loxide::scanner::Scanner;
    use loxide::token::TokenType;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len(), "token count for {:?}", source);

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
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
    fn test_scanner_02_two_byte_operators() {
        assert_token_sequence(
            "! != = == < <= > >= ++ --",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::PLUS_PLUS, "++"),
                (TokenType::MINUS_MINUS, "--"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_logic_tier_operators() {
        assert_token_sequence(
            "a & b | c",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::LOGIC_AND, "&"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::LOGIC_OR, "|"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_keywords() {
        assert_token_sequence(
            "do break continue while for fun class super this",
            &[
                (TokenType::DO, "do"),
                (TokenType::BREAK, "break"),
                (TokenType::CONTINUE, "continue"),
                (TokenType::WHILE, "while"),
                (TokenType::FOR, "for"),
                (TokenType::FUN, "fun"),
                (TokenType::CLASS, "class"),
                (TokenType::SUPER, "super"),
                (TokenType::THIS, "this"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_ternary_tokens_in_place() {
        // The question mark and colon appear in the stream exactly where
        // they appeared in the source.
        assert_token_sequence(
            "1 ? 2 : 3",
            &[
                (TokenType::NUMBER(1.0), "1"),
                (TokenType::TERNARY_QUESTION_MARK, "?"),
                (TokenType::NUMBER(2.0), "2"),
                (TokenType::TERNARY_COLON, ":"),
                (TokenType::NUMBER(3.0), "3"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_06_nested_ternary_balanced() {
        assert_token_sequence(
            "a ? b ? c : d : e",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::TERNARY_QUESTION_MARK, "?"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::TERNARY_QUESTION_MARK, "?"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::TERNARY_COLON, ":"),
                (TokenType::IDENTIFIER, "d"),
                (TokenType::TERNARY_COLON, ":"),
                (TokenType::IDENTIFIER, "e"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_stray_colon_is_error() {
        let results: Vec<_> = Scanner::new(b"1 : 2").collect();

        let errors: Vec<_> = results.iter().filter(|r| r.is_err()).collect();
        assert_eq!(errors.len(), 1);

        let message = format!("{}", results[1].as_ref().unwrap_err());
        assert!(message.contains("Stray ':'"), "got: {}", message);

        // scanning continued past the bad colon
        let tokens: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(tokens.last().unwrap().token_type, TokenType::EOF);
        assert_eq!(tokens.len(), 3); // 1, 2, EOF
    }

    #[test]
    fn test_scanner_08_unterminated_ternary_is_error() {
        let results: Vec<_> = Scanner::new(b"1 ? 2").collect();

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| format!("{}", e))
            .collect();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unterminated ternary"), "got: {}", errors[0]);

        // the EOF token still follows the error
        let tokens: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(tokens.last().unwrap().token_type, TokenType::EOF);
    }

    #[test]
    fn test_scanner_09_line_comment_skipped() {
        assert_token_sequence(
            "var x; // the rest is ignored ?!:\nprint x;",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::PRINT, "print"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_10_block_comment_skipped_and_lines_counted() {
        let source = "1 /* spans\ntwo lines */ 2";
        let tokens: Vec<_> = Scanner::new(source.as_bytes())
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].token_type, TokenType::NUMBER(1.0));
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].token_type, TokenType::NUMBER(2.0));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_11_unterminated_block_comment_is_error() {
        let results: Vec<_> = Scanner::new(b"1 /* never closed").collect();

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| format!("{}", e))
            .collect();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unterminated block comment"));
    }

    #[test]
    fn test_scanner_12_string_and_number_literals() {
        let tokens: Vec<_> = Scanner::new(b"\"hello\" 3 3.14")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
        if let TokenType::STRING(s) = &tokens[0].token_type {
            assert_eq!(s, "hello");
        }
        assert_eq!(tokens[0].lexeme, "\"hello\"");

        if let TokenType::NUMBER(n) = tokens[1].token_type {
            assert_eq!(n, 3.0);
        } else {
            panic!("expected number token");
        }

        if let TokenType::NUMBER(n) = tokens[2].token_type {
            assert_eq!(n, 3.14);
        } else {
            panic!("expected number token");
        }
    }

    #[test]
    fn test_scanner_13_unterminated_string_is_error() {
        let results: Vec<_> = Scanner::new(b"\"open").collect();

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| format!("{}", e))
            .collect();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unterminated string"));
    }

    #[test]
    fn test_scanner_14_unexpected_char_then_continue() {
        let results: Vec<_> = Scanner::new(b",.$(#").collect();

        // COMMA, DOT, error, LEFT_PAREN, error, EOF
        assert_eq!(results.len(), 6);

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2);

        let tokens: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(tokens[0].token_type, TokenType::COMMA);
        assert_eq!(tokens[1].token_type, TokenType::DOT);
        assert_eq!(tokens[2].token_type, TokenType::LEFT_PAREN);
        assert_eq!(tokens[3].token_type, TokenType::EOF);
    }

    #[test]
    fn test_scanner_15_slash_vs_comment() {
        assert_token_sequence(
            "8 / 2",
            &[
                (TokenType::NUMBER(8.0), "8"),
                (TokenType::SLASH, "/"),
                (TokenType::NUMBER(2.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_16_multiline_string_counts_lines() {
        let tokens: Vec<_> = Scanner::new(b"\"a\nb\" x")
            .filter_map(Result::ok)
            .collect();

        if let TokenType::STRING(s) = &tokens[0].token_type {
            assert_eq!(s, "a\nb");
        } else {
            panic!("expected string token");
        }

        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 2);
    }
}
