#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on correctness of specific syntactic forms and on the parser’s
/// error recovery behavior (avoiding cascaded errors).
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        parse_source(source)
    }

    fn val_value(program: &Program, index: usize) -> &Expr {
        match &program.declarations[index].node {
            Declaration::Val(v) => &v.value.node,
            other => panic!("Expected val, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_class_with_variance_and_companion() {
        let source = r#"
class Box<out T, in U, V> : Holder<T>, Any {
    fun get(): T
    companion object {
        fun <T> make(size: Int): Box<T, T, T>
    }
}
"#;
        let program = parse_str(source).unwrap();
        let Declaration::Class(class) = &program.declarations[0].node else {
            panic!("Expected class");
        };
        assert_eq!(class.name, "Box");
        let variances: Vec<_> = class.type_params.iter().map(|p| p.variance).collect();
        assert_eq!(variances, vec![Variance::Out, Variance::In, Variance::Invariant]);
        assert_eq!(class.supertypes.len(), 2);
        assert_eq!(class.members.len(), 1);
        assert_eq!(class.companion.len(), 1);
        assert_eq!(class.companion[0].node.name, "make");
    }

    #[test]
    fn test_parse_builder_extension() {
        let source =
            "fun <E> Set.Companion.buildFrom(size: Int, init: SequenceBuilder<Set<E>, E>.() -> Unit): Set<E>";
        let program = parse_str(source).unwrap();
        let Declaration::Function(f) = &program.declarations[0].node else {
            panic!("Expected function");
        };
        assert_eq!(f.name, "buildFrom");
        assert_eq!(f.receiver.as_ref().map(|r| &r.node), Some(&TypeExpr::Companion("Set".into())));
        assert_eq!(f.params.len(), 2);
        match &f.params[1].node.ty.node {
            TypeExpr::Function(ft) => {
                assert!(ft.receiver.is_some());
                assert!(ft.params.is_empty());
                assert_eq!(ft.ret.node, TypeExpr::named("Unit"));
            }
            other => panic!("Expected function type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_generic_receiver_extension() {
        let program = parse_str("fun <T> Box<T>.first(): T").unwrap();
        let Declaration::Function(f) = &program.declarations[0].node else {
            panic!("Expected function");
        };
        assert_eq!(f.name, "first");
        assert!(matches!(
            f.receiver.as_ref().map(|r| &r.node),
            Some(TypeExpr::Named { name, args }) if name == "Box" && args.len() == 1
        ));
    }

    #[test]
    fn test_variance_rejected_on_functions() {
        let errs = parse_str("fun <out T> f(): T").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Variance"));
    }

    #[test]
    fn test_parse_intersection_and_function_types() {
        let program = parse_str("val a: List<Int> & Set<Int> = b\nval f: (Int, String) -> Unit = g").unwrap();
        let Declaration::Val(a) = &program.declarations[0].node else {
            panic!("Expected val");
        };
        assert!(matches!(&a.ty.as_ref().map(|t| &t.node), Some(TypeExpr::Intersection(m)) if m.len() == 2));
        let Declaration::Val(f) = &program.declarations[1].node else {
            panic!("Expected val");
        };
        assert!(matches!(&f.ty.as_ref().map(|t| &t.node), Some(TypeExpr::Function(ft)) if ft.params.len() == 2));
    }

    #[test]
    fn test_parse_sequence_literal() {
        let program = parse_str("val xs = [1, 2, 3,]").unwrap();
        let Expr::CollectionLiteral(lit) = val_value(&program, 0) else {
            panic!("Expected literal");
        };
        assert_eq!(lit.kind, LiteralKind::Sequence);
        assert_eq!(lit.entries.len(), 3);
        assert_eq!(lit.id, LiteralId(0));
    }

    #[test]
    fn test_parse_dictionary_literal() {
        let program = parse_str(r#"val m = ["a": 1, "b": 2]"#).unwrap();
        let Expr::CollectionLiteral(lit) = val_value(&program, 0) else {
            panic!("Expected literal");
        };
        assert_eq!(lit.kind, LiteralKind::Dictionary);
        assert!(matches!(&lit.entries[1], LiteralEntry::Pair(k, v)
            if k.node == Expr::String("b".into()) && v.node == Expr::Int(2)));
    }

    #[test]
    fn test_parse_empty_literals() {
        let program = parse_str("val a = []\nval b = [:]").unwrap();
        assert!(matches!(val_value(&program, 0),
            Expr::CollectionLiteral(l) if l.kind == LiteralKind::Sequence && l.entries.is_empty()));
        assert!(matches!(val_value(&program, 1),
            Expr::CollectionLiteral(l) if l.kind == LiteralKind::Dictionary && l.entries.is_empty()));
    }

    #[test]
    fn test_literal_ids_follow_source_order() {
        let program = parse_str("val a = [[1], [2]]\nval b = [3]").unwrap();
        let Expr::CollectionLiteral(outer) = val_value(&program, 0) else {
            panic!("Expected literal");
        };
        assert_eq!(outer.id, LiteralId(0));
        let inner_ids: Vec<_> = outer
            .family(0)
            .into_iter()
            .map(|e| match &e.node {
                Expr::CollectionLiteral(l) => l.id,
                other => panic!("Expected literal, got {other:?}"),
            })
            .collect();
        assert_eq!(inner_ids, vec![LiteralId(1), LiteralId(2)]);
        assert!(matches!(val_value(&program, 1), Expr::CollectionLiteral(l) if l.id == LiteralId(3)));
    }

    #[test]
    fn test_mixed_literal_entries_are_rejected() {
        let errs = parse_str("val a = [1, 2: 3]").unwrap_err();
        assert!(errs[0].message.contains("Sequence literal"));
        let errs = parse_str("val b = [1: 2, 3]").unwrap_err();
        assert!(errs[0].message.contains("Dictionary literal"));
    }

    #[test]
    fn test_parse_call_with_block() {
        let program = parse_str("val s = Set.buildFrom<Int>(2) { add(1); add(2) }").unwrap();
        let Expr::Call(call) = val_value(&program, 0) else {
            panic!("Expected call");
        };
        assert_eq!(call.name.node, "buildFrom");
        assert!(matches!(call.receiver.as_deref().map(|r| &r.node), Some(Expr::Ident(n)) if n == "Set"));
        assert_eq!(call.type_args.len(), 1);
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.block.as_ref().map(|b| b.node.statements.len()), Some(2));
    }

    #[test]
    fn test_parse_block_without_semicolons() {
        let program = parse_str("val s = build { add(1) add(2) }").unwrap();
        let Expr::Call(call) = val_value(&program, 0) else {
            panic!("Expected call");
        };
        assert!(call.args.is_empty());
        assert_eq!(call.block.as_ref().map(|b| b.node.statements.len()), Some(2));
    }

    #[test]
    fn test_member_access_requires_call() {
        let errs = parse_str("val a = b.c").unwrap_err();
        assert!(errs[0].message.contains("after '.c'"));
    }

    #[test]
    fn test_recovery_reports_each_bad_declaration_once() {
        let errs = parse_str("val a = ,\nval b = 2\nval c = :\n").unwrap_err();
        assert_eq!(errs.len(), 2, "one error per broken declaration, got {errs:?}");
        assert!(errs.iter().all(|e| e.message.contains("Expected expression")));
    }

    #[test]
    fn test_literal_syntax_errors() {
        let messages: Vec<String> = ["val a = [1, 2: 3]", "val b = [1: 2, 3]", "val c = [1"]
            .into_iter()
            .flat_map(|source| parse_str(source).unwrap_err())
            .map(|e| e.message)
            .collect();
        insta::assert_snapshot!(messages.join("\n"), @r"
        Sequence literal entries cannot contain 'key: value' pairs
        Dictionary literal entries must all be 'key: value' pairs
        Expected ']' to close collection literal, found Eof
        ");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("val a = {}1{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse_str(&nested(MAX_NESTING_DEPTH - 1)).is_ok());

        for depth in [MAX_NESTING_DEPTH, 200] {
            let errs = parse_str(&nested(depth)).unwrap_err();
            assert_eq!(errs.len(), 1, "{errs:?}");
            assert_eq!(errs[0].kind, ErrorKind::Syntax);
            insta::allow_duplicates! {
                insta::assert_snapshot!(errs[0].message, @"Nesting is too deep (more than 32 levels)");
            }
        }
    }

    #[test]
    fn test_type_nesting_limit() {
        let depth = MAX_NESTING_DEPTH + 1;
        let source = format!("val a: {}Int{} = b", "List<".repeat(depth), ">".repeat(depth));
        let errs = parse_str(&source).unwrap_err();
        insta::assert_snapshot!(errs[0].message, @"Nesting is too deep (more than 32 levels)");
    }

    #[test]
    fn test_top_level_expression_is_rejected() {
        let errs = parse_str("[1, 2]").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Expected declaration"));
    }
}
