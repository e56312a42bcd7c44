#[cfg(test)]
mod resolver_tests {
    use tlox::ast::{Expr, Stmt};
    use tlox::interpreter::Interpreter;
    use tlox::parser::Parser;
    use tlox::report::{Diagnostics, Reporter};
    use tlox::resolver::Resolver;
    use tlox::scanner::Scanner;

    fn resolve_with(interpreter: &mut Interpreter, source: &str) -> (Vec<Stmt>, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        assert!(
            !diagnostics.had_error(),
            "Parse failed: {:?}",
            diagnostics.messages()
        );

        Resolver::new(interpreter, &mut diagnostics).resolve(&statements);

        (statements, diagnostics.take_messages())
    }

    fn resolve(source: &str) -> Vec<String> {
        let mut interpreter = Interpreter::default();
        resolve_with(&mut interpreter, source).1
    }

    #[test]
    fn test_resolver_01_clean_program() {
        let messages = resolve(
            "class A { init(n) { this.n = n; } get() { return this.n; } }\n\
             class B < A { get() { return super.get() + 1; } }\n\
             fun make() { let b = B(1); return b.get(); }\n\
             print make();",
        );

        assert!(messages.is_empty(), "Unexpected: {:?}", messages);
    }

    #[test]
    fn test_resolver_02_read_in_own_initializer() {
        assert_eq!(
            resolve("{ let a = 1; { let a = a; } }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );

        // Same rule for a first top-level declaration.
        assert_eq!(
            resolve("let b = b;"),
            vec!["[line 1] Error at 'b': Can't read local variable in its own initializer."]
        );

        // A global that already exists may be re-declared from itself.
        assert!(resolve("let c = 1;\nlet c = c + 1;").is_empty());
    }

    #[test]
    fn test_resolver_03_duplicate_local() {
        assert_eq!(
            resolve("fun f() {\n  let a = 1;\n  let a = 2;\n}"),
            vec!["[line 3] Error at 'a': Already a variable with this name in this scope."]
        );

        assert_eq!(
            resolve("fun g(x, x) {}"),
            vec!["[line 1] Error at 'x': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_resolver_04_return_rules() {
        assert_eq!(
            resolve("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );

        assert_eq!(
            resolve("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );

        // A bare return is fine in an initializer.
        assert!(resolve("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_resolver_05_this_and_super_placement() {
        assert_eq!(
            resolve("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );

        assert_eq!(
            resolve("fun f() { return this; }"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );

        assert_eq!(
            resolve("print super.x;"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );

        assert_eq!(
            resolve("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_resolver_06_class_inherits_from_itself() {
        assert_eq!(
            resolve("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_resolver_07_undefined_global() {
        assert_eq!(
            resolve("print nope;"),
            vec!["[line 1] Error at 'nope': Undefined variable 'nope'."]
        );

        assert_eq!(
            resolve("missing = 1;"),
            vec!["[line 1] Error at 'missing': Undefined variable 'missing'."]
        );

        // Natives and later top-level declarations are known.
        assert!(resolve("print clock;").is_empty());
        assert!(resolve("fun f() { return g(); }\nfun g() { return 1; }").is_empty());
    }

    #[test]
    fn test_resolver_08_keeps_going_after_errors() {
        let messages = resolve("return 1;\nprint this;\n{ let a = 1; let a = 2; }");

        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("[line 1]"));
        assert!(messages[1].starts_with("[line 2]"));
        assert!(messages[2].starts_with("[line 3]"));
    }

    #[test]
    fn test_resolver_09_records_local_depths() {
        let mut interpreter = Interpreter::default();
        let (statements, messages) =
            resolve_with(&mut interpreter, "let g = 0;\n{ let a = 1; { print a; print g; } }");

        assert!(messages.is_empty(), "Unexpected: {:?}", messages);

        let Stmt::Block(outer) = &statements[1] else {
            panic!("Expected a block, got {:?}", statements[1]);
        };
        let Stmt::Block(inner) = &outer[1] else {
            panic!("Expected a nested block, got {:?}", outer[1]);
        };

        let (Stmt::Print(Expr::Variable { id: local, .. }), Stmt::Print(Expr::Variable { id: global, .. })) =
            (&inner[0], &inner[1])
        else {
            panic!("Expected two variable prints, got {:?}", inner);
        };

        // `a` lives one scope out; `g` is left to the globals.
        assert_eq!(interpreter.local_depth(*local), Some(1));
        assert_eq!(interpreter.local_depth(*global), None);
    }

    #[test]
    fn test_resolver_10_earlier_session_globals_are_known() {
        let mut interpreter = Interpreter::default();
        let mut diagnostics = Diagnostics::new();

        let (first, messages) = resolve_with(&mut interpreter, "let kept = 1;");
        assert!(messages.is_empty());
        interpreter.interpret(&first, &mut diagnostics);

        let (_, messages) = resolve_with(&mut interpreter, "print kept;");
        assert!(messages.is_empty(), "Unexpected: {:?}", messages);
    }
}
