mod runtime_tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use loxide::error::LoxError;
    use loxide::interpreter::Interpreter;
    use loxide::parser::Parser;
    use loxide::resolver::Resolver;
    use loxide::scanner::Scanner;
    use loxide::token::Token;

    /// Cloneable sink: the test keeps one handle, the interpreter the other.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run a program that must lex, parse, and resolve cleanly; return its
    /// printed output and the interpreter result.
    fn run(source: &str) -> (String, Result<(), LoxError>) {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("source lexes cleanly");

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse();
        assert!(
            parser.errors().is_empty(),
            "unexpected parse errors: {:?}",
            parser.errors()
        );

        let (resolutions, errors) = Resolver::new().resolve(&statements);
        assert!(errors.is_empty(), "unexpected resolve errors: {:?}", errors);

        let buf = SharedBuf::default();
        let mut interpreter = Interpreter::with_output(Box::new(buf.clone()));
        interpreter.add_resolutions(resolutions);

        let result = interpreter.interpret(&statements);

        (buf.contents(), result)
    }

    fn run_ok(source: &str) -> String {
        let (output, result) = run(source);
        result.expect("program runs without runtime errors");

        output
    }

    fn run_runtime_error(source: &str) -> String {
        let (_, result) = run(source);

        format!("{}", result.expect_err("expected a runtime error"))
    }

    /// Static errors only: the program never executes.
    fn resolve_errors(source: &str) -> Vec<LoxError> {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("source lexes cleanly");

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse();
        assert!(parser.errors().is_empty());

        let (_, errors) = Resolver::new().resolve(&statements);

        errors
    }

    // ───────────────────────── scoping & closures ──────────────────────────

    #[test]
    fn shadowing_is_confined_to_its_block() {
        let output = run_ok(
            "var a = \"outer\";\
             { var a = \"inner\"; print a; }\
             print a;",
        );

        assert_eq!(output, "inner\nouter\n");
    }

    #[test]
    fn closures_capture_by_reference_not_snapshot() {
        let output = run_ok(
            "fun makeCounter() {\
               var i = 0;\
               fun count() { i = i + 1; print i; }\
               return count;\
             }\
             var counter = makeCounter();\
             counter();\
             counter();",
        );

        assert_eq!(output, "1\n2\n");
    }

    #[test]
    fn resolved_reference_ignores_later_shadowing() {
        let output = run_ok(
            "var a = \"global\";\
             {\
               fun showA() { print a; }\
               showA();\
               var a = \"block\";\
               showA();\
             }",
        );

        assert_eq!(output, "global\nglobal\n");
    }

    #[test]
    fn self_referential_initializer_is_static_error() {
        let errors = resolve_errors("var a = 1; { var a = a + 1; print a; }");

        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("its own initializer"));
    }

    #[test]
    fn duplicate_declaration_in_local_scope_is_static_error() {
        let errors = resolve_errors("{ var a = 1; var a = 2; }");

        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("Already a variable"));
    }

    #[test]
    fn global_redeclaration_is_allowed() {
        let output = run_ok("var a = 1; var a = 2; print a;");

        assert_eq!(output, "2\n");
    }

    #[test]
    fn undefined_variable_is_runtime_error() {
        let message = run_runtime_error("print missing;");

        assert!(message.contains("Undefined variable 'missing'"));
    }

    // ───────────────────────── operators ───────────────────────────────────

    #[test]
    fn ternary_picks_branch_by_truthiness() {
        assert_eq!(run_ok("print 1 ? 2 : 3;"), "2\n");
        assert_eq!(run_ok("print nil ? 2 : 3;"), "3\n");
        assert_eq!(run_ok("print true ? false ? 1 : 2 : 3;"), "2\n");
    }

    #[test]
    fn ternary_only_evaluates_taken_branch() {
        // the untaken branch would blow up at runtime
        let output = run_ok("print true ? \"ok\" : missing;");

        assert_eq!(output, "ok\n");
    }

    #[test]
    fn comma_evaluates_left_and_yields_right() {
        assert_eq!(run_ok("print (1, 2);"), "2\n");

        let output = run_ok("var a = 0; var b = (a = 3, a + 1); print a; print b;");
        assert_eq!(output, "3\n4\n");
    }

    #[test]
    fn print_statement_takes_comma_expression() {
        assert_eq!(run_ok("print 1, 2;"), "2\n");
    }

    #[test]
    fn logic_tier_evaluates_both_operands() {
        // 0 is truthy in Lox
        assert_eq!(run_ok("print 1 & 0;"), "true\n");
        assert_eq!(run_ok("print false & true;"), "false\n");
        assert_eq!(run_ok("print false | nil;"), "false\n");
        assert_eq!(run_ok("print nil | 1;"), "true\n");
    }

    #[test]
    fn logical_or_and_short_circuit() {
        assert_eq!(run_ok("print \"hi\" or 2;"), "hi\n");
        assert_eq!(run_ok("print nil or \"yes\";"), "yes\n");
        assert_eq!(run_ok("print nil and missing;"), "nil\n");
    }

    #[test]
    fn plus_is_numbers_or_strings_only() {
        assert_eq!(run_ok("print 1 + 2;"), "3\n");
        assert_eq!(run_ok("print \"a\" + \"b\";"), "ab\n");

        let message = run_runtime_error("print 1 + \"a\";");
        assert!(message.contains("two numbers or two strings"));
    }

    #[test]
    fn comparison_requires_numbers() {
        let message = run_runtime_error("print \"a\" < \"b\";");

        assert!(message.contains("Operands must be numbers"));
    }

    #[test]
    fn division_by_zero_is_runtime_error() {
        let message = run_runtime_error("print 1 / 0;");

        assert!(message.contains("Division by zero"));
    }

    #[test]
    fn equality_never_crosses_kinds() {
        assert_eq!(run_ok("print nil == nil;"), "true\n");
        assert_eq!(run_ok("print 1 == \"1\";"), "false\n");
        assert_eq!(run_ok("print \"a\" == \"a\";"), "true\n");
        assert_eq!(run_ok("print 0 == false;"), "false\n");
    }

    #[test]
    fn postfix_increment_yields_original_value() {
        assert_eq!(run_ok("var a = 1; print a++; print a;"), "1\n2\n");
        assert_eq!(run_ok("var a = 1; print a--; print a;"), "1\n0\n");
    }

    #[test]
    fn postfix_increment_works_on_fields() {
        let output = run_ok(
            "class Box {}\
             var b = Box();\
             b.n = 5;\
             print b.n++;\
             print b.n;",
        );

        assert_eq!(output, "5\n6\n");
    }

    #[test]
    fn postfix_increment_requires_number() {
        let message = run_runtime_error("var a = \"s\"; a++;");

        assert!(message.contains("Operand must be a number"));
    }

    // ───────────────────────── control flow ────────────────────────────────

    #[test]
    fn for_loop_desugaring_counts_up() {
        assert_eq!(run_ok("for (var i = 0; i < 3; i++) print i;"), "0\n1\n2\n");
    }

    #[test]
    fn break_terminates_a_for_loop() {
        let output = run_ok(
            "for (var i = 0; i < 5; i++) {\
               if (i == 3) break;\
               print i;\
             }",
        );

        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn continue_skips_to_the_condition_check() {
        let output = run_ok(
            "var i = 0;\
             while (i < 5) {\
               i++;\
               if (i == 2) continue;\
               if (i == 5) break;\
               print i;\
             }",
        );

        assert_eq!(output, "1\n3\n4\n");
    }

    #[test]
    fn do_while_runs_body_before_condition() {
        assert_eq!(run_ok("var j = 10; do print j; while (false);"), "10\n");

        let output = run_ok("var i = 0; do { print i; i = i + 1; } while (i < 2);");
        assert_eq!(output, "0\n1\n");
    }

    #[test]
    fn while_loop_with_break_inside_function() {
        let output = run_ok(
            "fun f() {\
               var i = 0;\
               while (true) { i++; if (i > 2) break; }\
               return i;\
             }\
             print f();",
        );

        assert_eq!(output, "3\n");
    }

    #[test]
    fn return_unwinds_out_of_nested_loop() {
        let output = run_ok(
            "fun firstOver(limit) {\
               for (var i = 0;; i++) {\
                 if (i > limit) return i;\
               }\
             }\
             print firstOver(3);",
        );

        assert_eq!(output, "4\n");
    }

    #[test]
    fn return_outside_function_is_static_error() {
        let errors = resolve_errors("return 1;");
        assert_eq!(errors.len(), 1);

        // a bare loop does not make 'return' legal
        let errors = resolve_errors("while (true) return 1;");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn break_outside_loop_is_static_error() {
        assert!(!resolve_errors("break;").is_empty());
        assert!(!resolve_errors("continue;").is_empty());
        assert!(!resolve_errors("fun f() { break; }").is_empty());
    }

    // ───────────────────────── functions & lambdas ─────────────────────────

    #[test]
    fn arity_mismatch_reports_expected_vs_actual() {
        let message = run_runtime_error("fun f() {} f(1);");

        assert!(message.contains("Expected 0 arguments but got 1"));
    }

    #[test]
    fn function_without_return_yields_nil() {
        assert_eq!(run_ok("fun f() {} print f();"), "nil\n");
    }

    #[test]
    fn lambda_is_a_first_class_value() {
        let output = run_ok(
            "var twice = fun (x) { return x + x; };\
             print twice(4);",
        );

        assert_eq!(output, "8\n");
    }

    #[test]
    fn lambda_argument_applies() {
        let output = run_ok(
            "fun apply(f, v) { return f(v); }\
             print apply(fun (n) { return n * n; }, 5);",
        );

        assert_eq!(output, "25\n");
    }

    #[test]
    fn calling_a_non_callable_is_runtime_error() {
        let message = run_runtime_error("var x = 1; x();");

        assert!(message.contains("Can only call functions and classes"));
    }

    #[test]
    fn recursion_through_declaration_name() {
        let output = run_ok(
            "fun fib(n) {\
               if (n < 2) return n;\
               return fib(n - 1) + fib(n - 2);\
             }\
             print fib(10);",
        );

        assert_eq!(output, "55\n");
    }

    // ───────────────────────── classes ─────────────────────────────────────

    #[test]
    fn inherited_method_binds_this_to_subclass_instance() {
        let output = run_ok(
            "class A { who() { print this; } m() { print \"from A\"; } }\
             class B < A {}\
             var b = B();\
             b.m();\
             b.who();",
        );

        assert_eq!(output, "from A\nB instance\n");
    }

    #[test]
    fn subclass_override_fully_shadows() {
        let output = run_ok(
            "class A { m() { print \"A\"; } }\
             class B < A { m() { print \"B\"; } }\
             B().m();",
        );

        assert_eq!(output, "B\n");
    }

    #[test]
    fn super_starts_lookup_above_defining_class() {
        let output = run_ok(
            "class A { method() { print \"A method\"; } }\
             class B < A {\
               method() { print \"B method\"; }\
               test() { super.method(); }\
             }\
             B().test();",
        );

        assert_eq!(output, "A method\n");
    }

    #[test]
    fn super_binds_current_this() {
        let output = run_ok(
            "class A { describe() { print this; } }\
             class B < A { describe() { super.describe(); } }\
             B().describe();",
        );

        assert_eq!(output, "B instance\n");
    }

    #[test]
    fn initializer_runs_on_construction_and_yields_instance() {
        let output = run_ok(
            "class Point { init(x) { this.x = x; } }\
             var p = Point(3);\
             print p.x;\
             print p;",
        );

        assert_eq!(output, "3\nPoint instance\n");
    }

    #[test]
    fn class_arity_follows_initializer() {
        let message = run_runtime_error("class Point { init(x, y) {} } Point(1);");

        assert!(message.contains("Expected 2 arguments but got 1"));
    }

    #[test]
    fn initializer_is_inherited() {
        let output = run_ok(
            "class A { init(v) { this.v = v; } }\
             class B < A {}\
             print B(7).v;",
        );

        assert_eq!(output, "7\n");
    }

    #[test]
    fn valued_return_in_initializer_is_static_error() {
        let errors = resolve_errors("class C { init() { return 1; } }");

        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("initializer"));
    }

    #[test]
    fn bare_return_in_initializer_still_yields_instance() {
        let output = run_ok(
            "class C { init() { this.x = 1; return; this.x = 2; } }\
             print C().x;",
        );

        assert_eq!(output, "1\n");
    }

    #[test]
    fn fields_shadow_methods() {
        let output = run_ok(
            "class C { m() { return \"method\"; } }\
             var c = C();\
             c.m = fun () { return \"field\"; };\
             print c.m();",
        );

        assert_eq!(output, "field\n");
    }

    #[test]
    fn getter_is_invoked_by_property_access() {
        let output = run_ok(
            "class Circle {\
               init(r) { this.r = r; }\
               area { return 3 * this.r * this.r; }\
             }\
             print Circle(2).area;",
        );

        assert_eq!(output, "12\n");
    }

    #[test]
    fn getter_result_is_not_a_callable_property() {
        // obj.area already ran the getter; calling its numeric result fails
        let message = run_runtime_error(
            "class Circle {\
               init(r) { this.r = r; }\
               area { return 3 * this.r * this.r; }\
             }\
             Circle(2).area();",
        );

        assert!(message.contains("Can only call functions and classes"));
    }

    #[test]
    fn getter_lookup_walks_superclass_chain() {
        let output = run_ok(
            "class A { g { return 1; } }\
             class B < A {}\
             print B().g;",
        );

        assert_eq!(output, "1\n");
    }

    #[test]
    fn static_method_is_called_on_the_class_value() {
        let output = run_ok(
            "class Math { class square(n) { return n * n; } }\
             print Math.square(3);",
        );

        assert_eq!(output, "9\n");
    }

    #[test]
    fn static_method_is_not_visible_on_instances() {
        let message = run_runtime_error(
            "class Math { class square(n) { return n * n; } }\
             Math().square(3);",
        );

        assert!(message.contains("Undefined property 'square'"));
    }

    #[test]
    fn this_outside_class_is_static_error() {
        assert!(!resolve_errors("print this;").is_empty());
        assert!(!resolve_errors("fun f() { return this; }").is_empty());
    }

    #[test]
    fn this_in_static_method_is_static_error() {
        let errors = resolve_errors("class C { class m() { return this; } }");

        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("static method"));
    }

    #[test]
    fn super_misuse_is_static_error() {
        assert!(!resolve_errors("class C { m() { super.m(); } }").is_empty());
        assert!(!resolve_errors("fun f() { super.m(); }").is_empty());
    }

    #[test]
    fn class_cannot_inherit_from_itself() {
        let errors = resolve_errors("class A < A {}");

        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("inherit from itself"));
    }

    #[test]
    fn superclass_must_be_a_class_at_runtime() {
        let message = run_runtime_error("var A = 1; class B < A {}");

        assert!(message.contains("Superclass must be a class"));
    }

    #[test]
    fn undefined_property_is_runtime_error() {
        let message = run_runtime_error("class C {} C().missing;");

        assert!(message.contains("Undefined property 'missing'"));
    }

    #[test]
    fn only_instances_have_fields() {
        let message = run_runtime_error("var x = 1; x.field = 2;");

        assert!(message.contains("Only instances have fields"));
    }

    #[test]
    fn bound_method_remembers_its_receiver() {
        let output = run_ok(
            "class Person {\
               init(name) { this.name = name; }\
               greet() { print this.name; }\
             }\
             var m = Person(\"ada\").greet;\
             m();",
        );

        assert_eq!(output, "ada\n");
    }

    // ───────────────────────── stringification ─────────────────────────────

    #[test]
    fn whole_numbers_drop_the_fraction() {
        assert_eq!(run_ok("print 3.0;"), "3\n");
        assert_eq!(run_ok("print 2.5;"), "2.5\n");
        assert_eq!(run_ok("print 10 / 4;"), "2.5\n");
    }

    #[test]
    fn value_kinds_stringify_by_rule() {
        assert_eq!(run_ok("print nil;"), "nil\n");
        assert_eq!(run_ok("print true;"), "true\n");
        assert_eq!(run_ok("fun f() {} print f;"), "<fn f>\n");
        assert_eq!(run_ok("print fun (x) { return x; };"), "<fn>\n");
        assert_eq!(run_ok("class K {} print K;"), "K\n");
        assert_eq!(run_ok("class K {} print K();"), "K instance\n");
    }

    #[test]
    fn literal_round_trip_through_stringification() {
        // printing a literal and re-feeding the text reproduces the value
        for literal in ["3", "2.5", "true", "false", "nil"] {
            let first = run_ok(&format!("print {};", literal));
            let second = run_ok(&format!("print {};", first.trim_end()));

            assert_eq!(first, second);
        }

        let first = run_ok("print \"round trip\";");
        let second = run_ok(&format!("print \"{}\";", first.trim_end()));

        assert_eq!(first, second);
    }
}
