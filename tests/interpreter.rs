#[cfg(test)]
mod interpreter_tests {
    use minipy::error::MinipyError;
    use minipy::interpreter::{Flow, Interpreter};
    use minipy::parser::Parser;
    use minipy::scanner::Scanner;
    use minipy::stmt::Stmt;
    use minipy::token::{Token, TokenType};

    /// Run a full pipeline over `source`, returning whatever the program
    /// printed plus the runtime error that stopped it, if any.
    fn run(source: &str) -> (String, Option<MinipyError>) {
        let tokens: Vec<Token<'_>> = Scanner::new(source.as_bytes())
            .filter_map(Result::ok)
            .collect();

        let mut parser = Parser::new(&tokens);
        let (statements, errors) = parser.parse();

        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        let mut interpreter = Interpreter::new(Vec::new());
        let result = interpreter.interpret(&statements);
        let output = String::from_utf8(interpreter.into_output()).expect("utf8 output");

        (output, result.err())
    }

    fn run_ok(source: &str) -> String {
        let (output, error) = run(source);

        assert!(error.is_none(), "unexpected runtime error: {:?}", error);

        output
    }

    fn runtime_error(source: &str) -> (String, MinipyError) {
        let (output, error) = run(source);

        (output, error.expect("expected a runtime error"))
    }

    // ───────────────────────── arithmetic & text ─────────────────────────

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(run_ok("print(12 + 30, 7 - 9, 6 * 7)"), "42 -2 42\n");
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(run_ok("print(7 / 2, -7 / 2, 9 / 3)"), "3 -3 3\n");
    }

    #[test]
    fn test_division_by_zero_fails() {
        let (_, error) = runtime_error("print(1 / 0)");

        assert!(error.to_string().contains("Division by zero"));
    }

    #[test]
    fn test_addition_overflow_is_a_runtime_error() {
        let (_, error) = runtime_error("print(9223372036854775807 + 1)");

        assert!(error.to_string().contains("Integer overflow"));
    }

    #[test]
    fn test_division_overflow_is_a_runtime_error() {
        // i64::MIN / -1 is the one quotient that does not fit in i64.
        let (_, error) = runtime_error("print((0 - 9223372036854775807 - 1) / (0 - 1))");

        assert!(error.to_string().contains("Integer overflow"));
    }

    #[test]
    fn test_negation_overflow_is_a_runtime_error() {
        let (_, error) = runtime_error("print(-(0 - 9223372036854775807 - 1))");

        assert!(error.to_string().contains("Integer overflow"));
    }

    #[test]
    fn test_plus_concatenates_non_numeric_operands() {
        assert_eq!(
            run_ok("print(1 + 2, \"a\" + \"b\", \"a\" + 1, 1 + \"a\")"),
            "3 ab a1 1a\n"
        );
    }

    #[test]
    fn test_minus_requires_numbers() {
        let (_, error) = runtime_error("x = \"a\" - 1");

        assert!(error.to_string().contains("Operands must be numbers"));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(run_ok("print(-5, --5, -(2 + 3))"), "-5 5 -5\n");
    }

    #[test]
    fn test_unary_minus_rejects_text() {
        let (_, error) = runtime_error("print(-\"abc\")");

        assert!(error.to_string().contains("Operand must be a number"));
    }

    // ───────────────────────── truthiness & logic ────────────────────────

    #[test]
    fn test_falsy_set_is_exact() {
        // Falsy: "", "0", "null", "false". Everything else truthy, "00" too.
        assert_eq!(
            run_ok("print(!\"\", !\"0\", !\"null\", !\"false\", !\"00\", !\"abc\", !1)"),
            "true true true true false false false\n"
        );
    }

    #[test]
    fn test_bang_uses_boolean_text_domain() {
        assert_eq!(run_ok("print(!true, !false, !!none)"), "false true false\n");
    }

    #[test]
    fn test_logical_short_circuit_returns_operand() {
        assert_eq!(
            run_ok("print(\"\" or \"fallback\", \"x\" or \"y\", 0 and 1, 1 and 0)"),
            "fallback x 0 0\n"
        );
    }

    #[test]
    fn test_short_circuit_skips_right_side_effects() {
        // The right-hand call would fail (undefined function) if evaluated.
        assert_eq!(run_ok("x = 1 or boom()\nprint(x)"), "1\n");
    }

    // ───────────────────────── comparison & equality ─────────────────────

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(run_ok("print(9 < 10, \"9\" < \"10\", 3 >= 3)"), "true true true\n");
    }

    #[test]
    fn test_lexicographic_comparison() {
        assert_eq!(run_ok("print(\"abc\" < \"abd\", \"b\" > \"a\")"), "true true\n");
    }

    #[test]
    fn test_mixed_comparison_is_a_type_error() {
        let (_, error) = runtime_error("print(\"abc\" < 5)");

        assert!(error.to_string().contains("matching types"));
    }

    #[test]
    fn test_equality_is_plain_text() {
        assert_eq!(
            run_ok("print(1 == 1, \"1\" == 1, \"a\" != \"b\", none == \"null\")"),
            "true true true true\n"
        );
    }

    // ───────────────────────── variables & scoping ───────────────────────

    #[test]
    fn test_uninitialized_variable_is_empty_text() {
        assert_eq!(run_ok("x\nprint(x == \"\")"), "true\n");
    }

    #[test]
    fn test_assignment_expression_yields_value() {
        assert_eq!(run_ok("x = 1\nprint(x = 42)\nprint(x)"), "42\n42\n");
    }

    #[test]
    fn test_undefined_variable_cites_line_and_halts() {
        let (output, error) = runtime_error("print(1)\nprint(y)\nprint(2)");

        // Output before the failure remains; nothing after it runs.
        assert_eq!(output, "1\n");
        assert!(error.to_string().contains("Undefined variable 'y'"));
        assert!(matches!(error, MinipyError::Runtime { line: 2, .. }));
    }

    #[test]
    fn test_explicit_block_gets_fresh_scope() {
        // No surface syntax produces Stmt::Block; embedders drive it via
        // the AST.  An inner assignment shadows and is dropped on exit.
        let name = Token::new(TokenType::IDENTIFIER, "x", 1);
        let one = Token::new(TokenType::NUMBER, "1", 1);
        let two = Token::new(TokenType::NUMBER, "2", 2);

        let program = vec![
            Stmt::Var {
                name: &name,
                initializer: Some(minipy::expr::Expr::Literal(&one)),
            },
            Stmt::Block(vec![Stmt::Var {
                name: &name,
                initializer: Some(minipy::expr::Expr::Literal(&two)),
            }]),
            Stmt::Print(vec![minipy::expr::Expr::Variable(&name)]),
        ];

        let mut interpreter = Interpreter::new(Vec::new());
        interpreter.interpret(&program).expect("no runtime error");

        assert_eq!(interpreter.into_output(), b"1\n".to_vec());
    }

    #[test]
    fn test_if_branches_share_caller_scope() {
        // Branch bodies are unscoped: an assignment inside the branch
        // mutates the surrounding binding.
        let source = "x = 1\nif true:\n  x = 2\nprint(x)";

        assert_eq!(run_ok(source), "2\n");
    }

    #[test]
    fn test_call_scope_does_not_leak() {
        let source = "x = 1\ndef f():\n  x = 2\nf()\nprint(x)";

        assert_eq!(run_ok(source), "1\n");
    }

    // ───────────────────────── branching ─────────────────────────────────

    #[test]
    fn test_if_else_takes_then_branch() {
        let source = "x = 5\nif x > 3:\n  print(\"big\")\nelse:\n  print(\"small\")";

        assert_eq!(run_ok(source), "big\n");
    }

    #[test]
    fn test_if_else_takes_else_branch() {
        let source = "x = 2\nif x > 3:\n  print(\"big\")\nelse:\n  print(\"small\")";

        assert_eq!(run_ok(source), "small\n");
    }

    // ───────────────────────── print ─────────────────────────────────────

    #[test]
    fn test_print_space_separates_arguments() {
        assert_eq!(run_ok("print(1 + 2, \"a\" + \"b\")"), "3 ab\n");
    }

    #[test]
    fn test_print_evaluates_left_to_right_before_writing() {
        // A failure in the second argument suppresses the whole line.
        let (output, _) = runtime_error("print(\"x\", 1 / 0)");

        assert_eq!(output, "");
    }

    // ───────────────────────── functions ─────────────────────────────────

    #[test]
    fn test_function_call_returns_value() {
        let source = "def f(a, b):\n  return a + b\nprint(f(3, 4))";

        assert_eq!(run_ok(source), "7\n");
    }

    #[test]
    fn test_function_template_survives_repeated_calls() {
        let source = "def f(a, b):\n  return a + b\nprint(f(3, 4))\nprint(f(1, 2))\nprint(f(\"a\", \"b\"))";

        assert_eq!(run_ok(source), "7\n3\nab\n");
    }

    #[test]
    fn test_recursive_function() {
        let source = concat!(
            "def fact(n):\n",
            "  if n < 2:\n",
            "    return 1\n",
            "  return n * fact(n - 1)\n",
            "print(fact(5), fact(6))",
        );

        assert_eq!(run_ok(source), "120 720\n");
    }

    #[test]
    fn test_falling_off_the_end_returns_empty_text() {
        let source = "def f():\n  x = 1\nprint(f() == \"\")";

        assert_eq!(run_ok(source), "true\n");
    }

    #[test]
    fn test_return_unwinds_out_of_nested_branches() {
        let source = concat!(
            "def pick(n):\n",
            "  if n > 0:\n",
            "    return \"pos\"\n",
            "  return \"neg\"\n",
            "print(pick(1), pick(0))",
        );

        assert_eq!(run_ok(source), "pos neg\n");
    }

    #[test]
    fn test_arity_mismatch_is_a_caller_error() {
        let (_, error) = runtime_error("def f(a):\n  return a\nf(1, 2)");

        assert!(error.to_string().contains("Expected 1 arguments but got 2"));
    }

    #[test]
    fn test_undefined_function_call_fails() {
        let (_, error) = runtime_error("boom()");

        assert!(error.to_string().contains("Undefined variable 'boom'"));
    }

    #[test]
    fn test_function_name_evaluates_to_itself() {
        // A name bound only as a function resolves to its own name as
        // text, so an alias stays callable.
        let source = "def f():\n  return \"hi\"\ng = f\nprint(g())";

        assert_eq!(run_ok(source), "hi\n");
    }

    #[test]
    fn test_parameters_bind_positionally() {
        let source = "def sub(a, b):\n  return a - b\nprint(sub(10, 4))";

        assert_eq!(run_ok(source), "6\n");
    }

    #[test]
    fn test_no_closure_over_definition_scope() {
        // Activations link to the call-site scope; module-level bindings
        // are visible through it.
        let source = "def f():\n  return x\nx = 10\nprint(f())";

        assert_eq!(run_ok(source), "10\n");
    }

    // ───────────────────────── return at top level ───────────────────────

    #[test]
    fn test_top_level_return_abandons_remaining_statements() {
        let source = "print(\"a\")\nreturn\nprint(\"b\")";

        assert_eq!(run_ok(source), "a\n");
    }

    // ───────────────────────── numeric-valid edge cases ──────────────────

    #[test]
    fn test_malformed_numeric_text_fails_arithmetic() {
        // "1-2" is numeric-valid so `+` attempts arithmetic, and then the
        // text is not a well-formed integer.
        let (_, error) = runtime_error("x = \"1-2\" + 1");

        assert!(error.to_string().contains("not a valid integer"));
    }

    #[test]
    fn test_lex_error_suppresses_execution() {
        // The '$' is a scan error; the surviving tokens still parse, but
        // the program must not run and the error comes back for the exit
        // code.
        let mut out: Vec<u8> = Vec::new();
        let result = minipy::run_source(b"print(1)\n$", &mut out);

        assert!(matches!(result, Err(MinipyError::Lex { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_flow_is_inspectable() {
        let tokens: Vec<Token<'_>> = Scanner::new(b"return 7")
            .filter_map(Result::ok)
            .collect();
        let mut parser = Parser::new(&tokens);
        let (statements, errors) = parser.parse();

        assert!(errors.is_empty());

        let mut interpreter = Interpreter::new(Vec::new());
        let flow = interpreter.execute(&statements[0]).expect("executes");

        assert_eq!(flow, Flow::Return(minipy::value::Value::from("7")));
    }
}
