//! cmplint analyzer - comparisons against the address of new values
//!
//! Flags `x == &T{}`, `x != new(T)` and catalogued comparison calls such
//! as `errors.Is(err, &T{})`, whose result is always false (or undefined
//! for zero-sized `T`).

pub mod alloc;
pub mod analysis;
pub mod catalog;
mod cmp;
mod handle;
pub mod options;
pub mod rules;
pub mod settings;
pub mod suppress;
pub mod zerosized;

pub use analysis::{Analyzer, AnalyzerError, Pass, PassResult};
pub use options::Options;

#[cfg(test)]
mod fixture_tests {
    use crate::analysis::{Analyzer, PassResult};
    use crate::options::Options;
    use cmplint_diagnostics::diagnostic::{DiagnosticSource, Severity};
    use cmplint_ir::builder::PackageBuilder;
    use cmplint_ir::ir::{BinaryOp, Expr, TypeId};

    const ASSERT: &str = "github.com/stretchr/testify/assert";
    const REQUIRE: &str = "github.com/stretchr/testify/require";

    fn run(b: PackageBuilder) -> PassResult {
        Analyzer::default().run_package(&b.build()).unwrap()
    }

    fn run_with(b: PackageBuilder, options: Options) -> PassResult {
        Analyzer::new(options).run_package(&b.build()).unwrap()
    }

    fn titles(result: &PassResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.title.as_str()).collect()
    }

    /// `type MyErr struct{ Msg string }`
    fn my_err(b: &mut PackageBuilder) -> TypeId {
        let st = b.struct_type(vec![PackageBuilder::field("Msg", b.string_type())]);
        b.named("MyErr", st)
    }

    /// `type Empty struct{}`
    fn empty(b: &mut PackageBuilder, name: &str) -> TypeId {
        let st = b.struct_type(vec![]);
        b.named(name, st)
    }

    fn err_var(b: &mut PackageBuilder) -> Expr {
        let e = b.error_type();
        b.var("err", e)
    }

    fn errors_is(b: &mut PackageBuilder, x: Expr, y: Expr) -> Expr {
        let f = b.func("errors", "Is");
        let bool_ty = b.bool_type();
        b.call_typed(f, vec![x, y], bool_ty)
    }

    // -- recorded Go frontend output ----------------------------------------

    #[test]
    fn test_errors_is_fixture() {
        let input = cmplint_ir::load_fixture("errors_is");
        let result = Analyzer::default().run_package(&input.packages[0]).unwrap();

        let summary: Vec<String> = result
            .diagnostics
            .iter()
            .map(|d| format!("{} {} {}", d.location, d.rule, d.title))
            .collect();
        assert_eq!(
            summary,
            vec![
                r#"app.go:4:5 CMP001 Result of comparison of "err" with address of new variable of type "MyErr" is always false"#,
                r#"app.go:7:5 CMP002 Result of comparison of "err" with address of new zero-sized variable of type "Empty" is false or undefined"#,
            ]
        );
        assert_eq!(result.diagnostics[0].source, DiagnosticSource::Binary);
        assert_eq!(result.diagnostics[1].source, DiagnosticSource::Call);
        assert_eq!(result.diagnostics[1].location.end_column, 29);
        assert!(result.internal.is_empty());
    }

    #[test]
    fn test_errors_is_fixture_without_check_is() {
        let input = cmplint_ir::load_fixture("errors_is");
        let analyzer = Analyzer::new(Options::default().with_check_is(false));
        let result = analyzer.run_package(&input.packages[0]).unwrap();
        assert_eq!(result.diagnostics.len(), 3);
        assert_eq!(result.diagnostics[2].location.line, 10);
        assert!(result.diagnostics[2].title.contains(r#"type "Matcher""#));
    }

    #[test]
    fn test_clean_fixture() {
        let input = cmplint_ir::load_fixture("clean");
        let result = Analyzer::default().run_package(&input.packages[0]).unwrap();
        assert_eq!(result, PassResult::default());
    }

    // -- binary comparisons -------------------------------------------------

    #[test]
    fn test_binary_composite_literal() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let cmp = b.eq(err, lit);
        b.stmt(cmp);

        let result = run(b);
        assert_eq!(
            titles(&result),
            vec![r#"Result of comparison of "err" with address of new variable of type "MyErr" is always false"#]
        );
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
        assert_eq!(result.diagnostics[0].location.line, 1);
    }

    #[test]
    fn test_binary_new_and_inequality() {
        let mut b = PackageBuilder::new("example.com/app");
        let int_ty = b.int_type();
        let p_ty = b.pointer(int_ty);
        let p = b.var("p", p_ty);
        let alloc = b.new_call(int_ty);
        let cmp = b.binary(BinaryOp::Neq, alloc, p);
        b.stmt(cmp);

        let result = run(b);
        insta::assert_snapshot!(
            titles(&result).join("\n"),
            @r#"Result of comparison of "p" with address of new variable of type "int" is always false"#
        );
    }

    #[test]
    fn test_ordering_operators_are_ignored() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let x = b.var("x", t);
        let lit = b.addr_of_composite(t);
        let cmp = b.binary(BinaryOp::Lss, x, lit);
        b.stmt(cmp);

        assert!(run(b).diagnostics.is_empty());
    }

    #[test]
    fn test_zero_sized_types() {
        let mut b = PackageBuilder::new("example.com/app");
        let int_ty = b.int_type();
        let arr0 = b.array(0, int_ty);
        let e = empty(&mut b, "Empty");
        let arr_of_empty = b.array(4, e);
        let nested = b.struct_type(vec![
            PackageBuilder::field("a", e),
            PackageBuilder::field("b", arr0),
        ]);
        let wrapper = b.named("Wrapper", nested);

        for (name, ty) in [("a", arr0), ("b", arr_of_empty), ("c", wrapper)] {
            let p = b.pointer(ty);
            let v = b.var(name, p);
            let alloc = b.new_call(ty);
            let cmp = b.eq(v, alloc);
            b.stmt(cmp);
        }

        let result = run(b);
        assert_eq!(result.diagnostics.len(), 3);
        for d in &result.diagnostics {
            assert_eq!(d.rule, "CMP002");
            assert_eq!(d.severity, Severity::Warning);
            assert!(d.title.ends_with("is false or undefined"), "{}", d.title);
        }
        assert!(result.diagnostics[0].title.contains(r#"type "[0]int""#));
        assert!(result.diagnostics[1].title.contains(r#"type "[4]Empty""#));
        assert!(result.diagnostics[2].title.contains(r#"type "Wrapper""#));
    }

    #[test]
    fn test_zero_sized_against_nil() {
        let mut b = PackageBuilder::new("example.com/app");
        let e = empty(&mut b, "Empty");
        let lit = b.addr_of_composite(e);
        let n = b.nil();
        let cmp = b.eq(lit, n);
        b.stmt(cmp);

        let result = run(b);
        assert_eq!(
            titles(&result),
            vec![r#"Result of comparison of "nil" with address of new variable of type "Empty" is always false"#]
        );
    }

    #[test]
    fn test_both_sides_allocated_reports_once() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let left = b.addr_of_composite(t);
        let right = b.addr_of_composite(t);
        let cmp = b.eq(left, right);
        b.stmt(cmp);

        let result = run(b);
        assert_eq!(
            titles(&result),
            vec![r#"Result of comparison of "&MyErr{}" with address of new variable of type "MyErr" is always false"#]
        );
    }

    #[test]
    fn test_ordinary_comparisons() {
        let mut b = PackageBuilder::new("example.com/app");
        let s = b.string_type();
        let x = b.var("a", s);
        let y = b.var("b", s);
        let cmp = b.eq(x, y);
        b.stmt(cmp);
        let err = err_var(&mut b);
        let n = b.nil();
        let cmp = b.binary(BinaryOp::Neq, err, n);
        b.stmt(cmp);
        let int_ty = b.int_type();
        let v = b.var("v", int_ty);
        let addr = b.addr_of(v);
        let p_ty = b.pointer(int_ty);
        let p = b.var("p", p_ty);
        let cmp = b.eq(p, addr);
        b.stmt(cmp);

        assert_eq!(run(b), PassResult::default());
    }

    #[test]
    fn test_nested_comparisons_in_document_order() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let inner = b.eq(err, lit);
        let target = b.addr_of_composite(t);
        let err2 = err_var(&mut b);
        let outer_call = errors_is(&mut b, err2, target);
        let cmp = b.binary(BinaryOp::LAnd, inner, outer_call);
        b.stmt(cmp);

        let result = run(b);
        let sources: Vec<_> = result.diagnostics.iter().map(|d| d.source).collect();
        assert_eq!(sources, vec![DiagnosticSource::Binary, DiagnosticSource::Call]);
    }

    #[test]
    fn test_idempotent() {
        let build = || {
            let mut b = PackageBuilder::new("example.com/app");
            let t = my_err(&mut b);
            let err = err_var(&mut b);
            let lit = b.addr_of_composite(t);
            let cmp = b.eq(err, lit);
            b.stmt(cmp);
            b.build()
        };
        let pkg = build();
        let analyzer = Analyzer::default();
        let first = analyzer.run_package(&pkg).unwrap();
        let second = analyzer.run_package(&pkg).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, analyzer.run_package(&build()).unwrap());
    }

    // -- errors.Is and suppression ------------------------------------------

    #[test]
    fn test_errors_is_with_is_method_is_suppressed_on_both_sides() {
        let mut b = PackageBuilder::new("example.com/app");
        let e = empty(&mut b, "Matcher");
        b.add_is_method(e);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(e);
        let call = errors_is(&mut b, err, lit);
        b.stmt(call);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(e);
        let call = errors_is(&mut b, lit, err);
        b.stmt(call);

        assert!(run(b).diagnostics.is_empty());
    }

    #[test]
    fn test_unwrap_suppresses_only_on_the_left() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        b.add_unwrap_method(t);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let call = errors_is(&mut b, lit, err);
        b.stmt(call);
        let err = err_var(&mut b);
        let alloc = b.new_call(t);
        let call = errors_is(&mut b, err, alloc);
        b.stmt(call);

        let result = run(b);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].location.line, 2);
    }

    #[test]
    fn test_binary_comparison_is_never_suppressed() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        b.add_is_method(t);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let cmp = b.eq(err, lit);
        b.stmt(cmp);

        assert_eq!(run(b).diagnostics.len(), 1);
    }

    #[test]
    fn test_check_is_disabled_restores_diagnostics() {
        let build = || {
            let mut b = PackageBuilder::new("example.com/app");
            let e = empty(&mut b, "Matcher");
            b.add_is_method(e);
            let t = my_err(&mut b);
            b.add_unwrap_method(t);
            let err = err_var(&mut b);
            let lit = b.addr_of_composite(e);
            let call = errors_is(&mut b, err, lit);
            b.stmt(call);
            let err = err_var(&mut b);
            let lit = b.addr_of_composite(t);
            let call = errors_is(&mut b, lit, err);
            b.stmt(call);
            b
        };

        assert!(run(build()).diagnostics.is_empty());
        let result = run_with(build(), Options::default().with_check_is(false));
        let rules: Vec<_> = result.diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["CMP002", "CMP001"]);
    }

    #[test]
    fn test_unrelated_is_function() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let f = b.func("example.com/app/errors", "Is");
        let call = b.call(f, vec![err, lit]);
        b.stmt(call);

        assert!(run(b).diagnostics.is_empty());
    }

    #[test]
    fn test_errors_is_too_few_arguments() {
        let mut b = PackageBuilder::new("example.com/app");
        let err = err_var(&mut b);
        let f = b.func("github.com/pkg/errors", "Is");
        let call = b.call(f, vec![err]);
        b.stmt(call);

        let result = run(b);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.internal.len(), 1);
        assert_eq!(result.internal[0].rule, "CMP900");
        assert_eq!(result.internal[0].severity, Severity::Info);
        assert_eq!(result.internal[0].source, DiagnosticSource::Internal);
        assert_eq!(
            result.internal[0].title,
            "call to github.com/pkg/errors.Is has 1 argument(s), catalog shape ErrorIs needs 2"
        );
    }

    // -- assertion libraries ------------------------------------------------

    #[test]
    fn test_testify_functions() {
        let mut b = PackageBuilder::new("example.com/app_test");
        b.file("app_test.go");
        let t = my_err(&mut b);
        let int_ty = b.int_type();
        for (path, name) in [(ASSERT, "ErrorIs"), (REQUIRE, "NotErrorIsf")] {
            let tv = b.var("t", int_ty);
            let err = err_var(&mut b);
            let lit = b.addr_of_composite(t);
            let mut args = vec![tv, err, lit];
            if name.ends_with('f') {
                args.push(b.string_lit("%v"));
                args.push(b.int_lit(1));
            }
            let f = b.func(path, name);
            let call = b.call(f, args);
            b.stmt(call);
        }

        let result = run(b);
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.location.file == "app_test.go" && d.rule == "CMP001"));
    }

    #[test]
    fn test_testify_suite_method_and_method_expression() {
        let mut b = PackageBuilder::new("example.com/app_test");
        let t = my_err(&mut b);
        let st = b.struct_type(vec![]);
        let suite = b.named("Suite", st);
        let assertions = b.named_in(ASSERT, "Assertions", st);
        let assertions_ptr = b.pointer(assertions);

        // s.ErrorIs(err, &MyErr{})
        let s = b.var("s", suite);
        let m = b.method_value(s, ASSERT, "Assertions", "ErrorIs");
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let call = b.call(m, vec![err, lit]);
        b.stmt(call);

        // (*assert.Assertions).ErrorIs(a, err, &MyErr{})
        let m = b.method_expr(ASSERT, "Assertions", "ErrorIs");
        let a = b.var("a", assertions_ptr);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let call = b.call(m, vec![a, err, lit]);
        b.stmt(call);

        // (*assert.Assertions).ErrorIs(a, err)
        let m = b.method_expr(ASSERT, "Assertions", "ErrorIs");
        let a = b.var("a", assertions_ptr);
        let err = err_var(&mut b);
        let call = b.call(m, vec![a, err]);
        b.stmt(call);

        let result = run(b);
        let lines: Vec<_> = result.diagnostics.iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(result.internal.len(), 1);
        assert_eq!(
            result.internal[0].title,
            "call to (*github.com/stretchr/testify/assert.Assertions).ErrorIs has 2 argument(s), \
             catalog shape ErrorIs needs 3"
        );
    }

    #[test]
    fn test_method_field_is_not_a_method() {
        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let st = b.struct_type(vec![]);
        let holder = b.named("Holder", st);
        let sig = b.signature(vec![], vec![]);
        let h = b.var("h", holder);
        let field = b.field_value(h, "ErrorIs", sig);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let call = b.call(field, vec![err, lit]);
        b.stmt(call);

        assert_eq!(run(b), PassResult::default());
    }

    #[test]
    fn test_multi_value_argument_is_skipped() {
        let mut b = PackageBuilder::new("example.com/app_test");
        let int_ty = b.int_type();
        let err_ty = b.error_type();
        let tuple = b.tuple(vec![int_ty, err_ty, err_ty]);
        let wrap = b.func("example.com/app_test", "wrap");
        let inner = b.call_typed(wrap, vec![], tuple);
        let f = b.func(ASSERT, "ErrorIs");
        let call = b.call(f, vec![inner]);
        b.stmt(call);

        assert_eq!(run(b), PassResult::default());
    }

    #[test]
    fn test_testify_equal_is_not_an_identity_comparison() {
        let mut b = PackageBuilder::new("example.com/app_test");
        let t = my_err(&mut b);
        let int_ty = b.int_type();
        let tv = b.var("t", int_ty);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let f = b.func(ASSERT, "Equal");
        let call = b.call(f, vec![tv, err, lit]);
        b.stmt(call);

        assert!(run(b).diagnostics.is_empty());
    }

    #[test]
    fn test_gotest_tools() {
        let mut b = PackageBuilder::new("example.com/app_test");
        let e = empty(&mut b, "myError1");
        b.add_unwrap_method(e);
        let int_ty = b.int_type();

        // assert.Equal(t, err, &myError1{})
        let tv = b.var("t", int_ty);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(e);
        let f = b.func("gotest.tools/v3/assert", "Equal");
        let call = b.call(f, vec![tv, err, lit]);
        b.stmt(call);

        // cmp.Equal(&myError1{}, err): error-style, Unwrap on the left suppresses.
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(e);
        let f = b.func("gotest.tools/v3/assert/cmp", "Equal");
        let call = b.call(f, vec![lit, err]);
        b.stmt(call);

        // cmp.Equal(err, &myError1{})
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(e);
        let f = b.func("gotest.tools/v3/assert/cmp", "Equal");
        let call = b.call(f, vec![err, lit]);
        b.stmt(call);

        let result = run(b);
        let lines: Vec<_> = result.diagnostics.iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert!(result.diagnostics.iter().all(|d| d.rule == "CMP002"));
    }

    #[test]
    fn test_catalog_extension() {
        use crate::catalog::{Catalog, CatalogEntry, ComparisonShape, FuncName};
        use std::sync::Arc;

        let mut b = PackageBuilder::new("example.com/app");
        let t = my_err(&mut b);
        let err = err_var(&mut b);
        let lit = b.addr_of_composite(t);
        let f = b.func("example.com/check", "Same");
        let call = b.call(f, vec![err, lit]);
        b.stmt(call);
        let pkg = b.build();

        assert!(Analyzer::default().run_package(&pkg).unwrap().diagnostics.is_empty());

        let catalog = Catalog::extended([CatalogEntry {
            func: FuncName::func("example.com/check", "Same"),
            shape: ComparisonShape::Equal,
        }]);
        let analyzer = Analyzer::default().with_catalog(Arc::new(catalog));
        assert_eq!(analyzer.run_package(&pkg).unwrap().diagnostics.len(), 1);
    }
}
