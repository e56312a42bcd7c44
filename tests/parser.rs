#[cfg(test)]
mod parser_tests {
    use tlox::ast::{Expr, Stmt};
    use tlox::ast_printer::Ast;
    use tlox::parser::{Parser, MAX_ARGUMENTS, MAX_NESTING};
    use tlox::report::{Diagnostics, Reporter};
    use tlox::scanner::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        (statements, diagnostics)
    }

    fn print_clean(source: &str) -> String {
        let (statements, diagnostics) = parse(source);

        assert!(
            !diagnostics.had_error(),
            "Unexpected diagnostics: {:?}",
            diagnostics.messages()
        );

        Ast.print_program(&statements)
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(
            print_clean("print 1 + 2 * 3 - -4;"),
            "(print (- (+ 1.0 (* 2.0 3.0)) (- 4.0)))"
        );
        assert_eq!(
            print_clean("print !(1 < 2) == false;"),
            "(print (== (! (group (< 1.0 2.0))) false))"
        );
    }

    #[test]
    fn test_parser_02_logical_operators() {
        assert_eq!(
            print_clean("print a or b and c;"),
            "(print (or a (and b c)))"
        );
    }

    #[test]
    fn test_parser_03_assignment_is_right_associative() {
        assert_eq!(print_clean("a = b = 1;"), "(; (= a (= b 1.0)))");
        assert_eq!(
            print_clean("point.x = point.y;"),
            "(; (= (. point x) (. point y)))"
        );
    }

    #[test]
    fn test_parser_04_for_loop_desugars_to_while() {
        assert_eq!(
            print_clean("for (let i = 0; i < 3; i = i + 1) print i;"),
            "(block (let i = 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"
        );

        // Every clause omitted: an endless loop over the bare body.
        assert_eq!(print_clean("for (;;) print 1;"), "(while true (print 1.0))");
    }

    #[test]
    fn test_parser_05_functions_and_classes() {
        assert_eq!(
            print_clean("fun add(a, b) { return a + b; }"),
            "(fun add (a b) (return (+ a b)))"
        );
        assert_eq!(
            print_clean("class B < A { init(x) { this.x = x; } m() { return super.m(); } }"),
            "(class B < A (init (x) (; (= (. this x) x))) (m () (return (call (super m)))))"
        );
    }

    #[test]
    fn test_parser_06_calls_chain() {
        assert_eq!(
            print_clean("f(1)(2).g(3, 4);"),
            "(; (call (. (call (call f 1.0) 2.0) g) 3.0 4.0))"
        );
    }

    #[test]
    fn test_parser_07_reparse_is_structurally_identical() {
        let source = "let x = 1;\nwhile (x < 10) { if (x == 5) print \"five\"; else x = x + 1; }";

        let (first, _) = parse(source);
        let (second, _) = parse(source);

        assert_eq!(Ast.print_program(&first), Ast.print_program(&second));
    }

    #[test]
    fn test_parser_08_recovers_at_statement_boundaries() {
        let (statements, diagnostics) = parse("print ;\nlet x = 1;\nprint x");

        assert_eq!(
            diagnostics.messages(),
            &[
                "[line 1] Error at ';': Expected expression".to_string(),
                "[line 3] Error at end: Expected ';' after value".to_string(),
            ]
        );

        assert_eq!(statements.len(), 1);
        assert!(matches!(&statements[0], Stmt::Let { name, .. } if name.lexeme == "x"));
    }

    #[test]
    fn test_parser_09_errors_inside_a_block_are_all_reported() {
        let (statements, diagnostics) = parse("{ print ; print 1 + ; }\nprint 2;");

        assert_eq!(
            diagnostics.messages(),
            &[
                "[line 1] Error at ';': Expected expression".to_string(),
                "[line 1] Error at ';': Expected expression".to_string(),
            ]
        );

        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Stmt::Block(inner) if inner.is_empty()));
    }

    #[test]
    fn test_parser_10_invalid_assignment_target_is_not_fatal() {
        let (statements, diagnostics) = parse("1 = 2;\nprint 3;");

        assert_eq!(
            diagnostics.messages(),
            &["[line 1] Error at '=': Invalid assignment target".to_string()]
        );

        // Both statements still come out.
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Stmt::Expression(Expr::Literal(_))));
    }

    #[test]
    fn test_parser_11_argument_limit() {
        let arguments: Vec<String> = (0..=MAX_ARGUMENTS).map(|n| n.to_string()).collect();
        let source = format!("f({});", arguments.join(", "));

        let (statements, diagnostics) = parse(&source);

        assert_eq!(diagnostics.messages().len(), 1);
        assert!(diagnostics.messages()[0]
            .ends_with(&format!("Can't have more than {} arguments", MAX_ARGUMENTS)));

        // The call is still built with every argument.
        match &statements[0] {
            Stmt::Expression(Expr::Call { arguments, .. }) => {
                assert_eq!(arguments.len(), MAX_ARGUMENTS + 1)
            }
            other => panic!("Expected a call statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_12_parameter_limit() {
        let params: Vec<String> = (0..=MAX_ARGUMENTS).map(|n| format!("p{}", n)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (statements, diagnostics) = parse(&source);

        assert_eq!(diagnostics.messages().len(), 1);
        assert!(diagnostics.messages()[0]
            .ends_with(&format!("Can't have more than {} parameters", MAX_ARGUMENTS)));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parser_13_empty_input() {
        let (statements, diagnostics) = parse("");

        assert!(statements.is_empty());
        assert!(!diagnostics.had_error());

        // A token stream without EOF is completed by the parser.
        let mut diagnostics = Diagnostics::new();
        assert!(Parser::new(Vec::new()).parse(&mut diagnostics).is_empty());
    }

    #[test]
    fn test_parser_14_missing_class_brace() {
        let (_, diagnostics) = parse("class A\nprint 1;");

        assert_eq!(
            diagnostics.messages(),
            &["[line 2] Error at 'print': Expected '{' before class body".to_string()]
        );
    }

    #[test]
    fn test_parser_15_deep_nesting_is_a_syntax_error() {
        let source = format!("print {}1{};\nprint 2;", "(".repeat(50_000), ")".repeat(50_000));

        let (statements, diagnostics) = parse(&source);

        assert_eq!(
            diagnostics.messages(),
            &["[line 1] Error at '(': Expression nesting too deep.".to_string()]
        );

        // Parsing picks up again at the next statement.
        assert_eq!(statements.len(), 1);
        assert_eq!(Ast.print_program(&statements), "(print 2.0)");
    }

    #[test]
    fn test_parser_16_nesting_below_the_limit_parses() {
        let depth = MAX_NESTING / 2;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));

        let (statements, diagnostics) = parse(&source);

        assert!(!diagnostics.had_error(), "{:?}", diagnostics.messages());
        assert_eq!(statements.len(), 1);

        let blocks = format!("{}print 1;{}", "{".repeat(depth), "}".repeat(depth));
        let (_, diagnostics) = parse(&blocks);
        assert!(!diagnostics.had_error(), "{:?}", diagnostics.messages());

        let negations = format!("print {}true;", "!".repeat(100_000));
        let (_, diagnostics) = parse(&negations);
        assert_eq!(
            diagnostics.messages(),
            &["[line 1] Error at '!': Expression nesting too deep.".to_string()]
        );
    }
}
