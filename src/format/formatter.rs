//! Walks the AST and prints it back as colit source.
//!
//! After checking, rewritten literals are ordinary builder calls, so printing a checked program shows what every
//! literal was desugared into.

use super::config::FormatConfig;
use super::writer::FormatWriter;
use crate::frontend::ast::*;

/// Formatter that transforms an AST back to source code
pub struct Formatter {
    writer: FormatWriter,
    config: FormatConfig,
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(&config),
            config,
        }
    }

    /// Format a program and return the source
    pub fn format(mut self, program: &Program) -> String {
        for decl in &program.declarations {
            self.format_declaration(&decl.node);
        }
        self.writer.finish()
    }

    /// Format a single expression (no trailing newline)
    pub fn format_expression(mut self, expr: &Expr) -> String {
        self.format_expr(expr);
        self.writer.finish()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn format_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Class(class) => self.format_class(class),
            Declaration::Function(func) => {
                self.format_function(func);
                self.writer.newline();
            }
            Declaration::Val(val) => {
                self.writer.write("val ");
                self.writer.write(&val.name);
                if let Some(ty) = &val.ty {
                    self.writer.write(": ");
                    self.format_type(&ty.node);
                }
                self.writer.write(" = ");
                self.format_expr(&val.value.node);
                self.writer.newline();
            }
        }
    }

    fn format_class(&mut self, class: &ClassDecl) {
        self.writer.write("class ");
        self.writer.write(&class.name);
        self.format_type_params(&class.type_params);
        if !class.supertypes.is_empty() {
            self.writer.write(" : ");
            self.writer
                .separated(&class.supertypes, ", ", |w, ty| type_into(w, &ty.node));
        }
        if class.members.is_empty() && class.companion.is_empty() {
            self.writer.newline();
            return;
        }

        self.writer.writeln(" {");
        self.writer.indent();
        for member in &class.members {
            self.format_function(&member.node);
            self.writer.newline();
        }
        if !class.companion.is_empty() {
            self.writer.writeln("companion object {");
            self.writer.indent();
            for func in &class.companion {
                self.format_function(&func.node);
                self.writer.newline();
            }
            self.writer.dedent();
            self.writer.writeln("}");
        }
        self.writer.dedent();
        self.writer.writeln("}");
    }

    fn format_function(&mut self, func: &FunctionDecl) {
        self.writer.write("fun ");
        if !func.type_params.is_empty() {
            self.format_type_params(&func.type_params);
            self.writer.write(" ");
        }
        if let Some(receiver) = &func.receiver {
            self.format_type(&receiver.node);
            self.writer.write(".");
        }
        self.writer.write(&func.name);
        self.writer.write("(");
        self.writer.separated(&func.params, ", ", |w, param| {
            w.write(&param.node.name);
            w.write(": ");
            type_into(w, &param.node.ty.node);
        });
        self.writer.write("): ");
        self.format_type(&func.return_type.node);
    }

    fn format_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.writer.write("<");
        self.writer.separated(params, ", ", |w, param| {
            match param.variance {
                Variance::Out => w.write("out "),
                Variance::In => w.write("in "),
                Variance::Invariant => {}
            }
            w.write(&param.name);
            if let Some(bound) = &param.bound {
                w.write(" : ");
                type_into(w, &bound.node);
            }
        });
        self.writer.write(">");
    }

    fn format_type(&mut self, ty: &TypeExpr) {
        type_into(&mut self.writer, ty);
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn format_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Int(value) => self.writer.write(&value.to_string()),
            Expr::Double(value) => self.writer.write(&format!("{value:?}")),
            Expr::String(value) => self.writer.write(&escape_string(value)),
            Expr::Bool(value) => self.writer.write(if *value { "true" } else { "false" }),
            Expr::Ident(name) => self.writer.write(name),
            Expr::Paren(inner) => {
                self.writer.write("(");
                self.format_expr(&inner.node);
                self.writer.write(")");
            }
            Expr::Call(call) => self.format_call(call),
            Expr::CollectionLiteral(literal) => self.format_literal(literal),
            Expr::Error => self.writer.write("<error>"),
        }
    }

    fn format_call(&mut self, call: &CallExpr) {
        if let Some(receiver) = &call.receiver {
            self.format_expr(&receiver.node);
            self.writer.write(".");
        }
        self.writer.write(&call.name.node);
        if !call.type_args.is_empty() {
            self.writer.write("<");
            self.writer
                .separated(&call.type_args, ", ", |w, ty| type_into(w, &ty.node));
            self.writer.write(">");
        }
        if !call.args.is_empty() || call.block.is_none() {
            self.writer.write("(");
            self.format_exprs(&call.args, ", ");
            self.writer.write(")");
        }
        if let Some(block) = &call.block {
            self.writer.write(" ");
            self.format_block(&block.node);
        }
    }

    fn format_block(&mut self, block: &Block) {
        if block.statements.is_empty() {
            self.writer.write("{}");
        } else if self.config.inline_blocks {
            self.writer.write("{ ");
            self.format_exprs(&block.statements, "; ");
            self.writer.write(" }");
        } else {
            self.writer.writeln("{");
            self.writer.indent();
            for statement in &block.statements {
                self.format_expr(&statement.node);
                self.writer.newline();
            }
            self.writer.dedent();
            self.writer.write("}");
        }
    }

    fn format_literal(&mut self, literal: &CollectionLiteral) {
        if literal.entries.is_empty() {
            let spelling = match literal.kind {
                LiteralKind::Sequence => "[]",
                LiteralKind::Dictionary => "[:]",
            };
            self.writer.write(spelling);
            return;
        }
        self.writer.write("[");
        for (i, entry) in literal.entries.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            match entry {
                LiteralEntry::Single(value) => self.format_expr(&value.node),
                LiteralEntry::Pair(key, value) => {
                    self.format_expr(&key.node);
                    self.writer.write(": ");
                    self.format_expr(&value.node);
                }
            }
        }
        self.writer.write("]");
    }

    fn format_exprs(&mut self, exprs: &[Spanned<Expr>], sep: &str) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.writer.write(sep);
            }
            self.format_expr(&expr.node);
        }
    }
}

fn type_into(writer: &mut FormatWriter, ty: &TypeExpr) {
    match ty {
        TypeExpr::Named { name, args } => {
            writer.write(name);
            if !args.is_empty() {
                writer.write("<");
                writer.separated(args, ", ", |w, arg| type_into(w, &arg.node));
                writer.write(">");
            }
        }
        TypeExpr::Companion(name) => {
            writer.write(name);
            writer.write(".Companion");
        }
        TypeExpr::Function(func) => {
            if let Some(receiver) = &func.receiver {
                type_into(writer, &receiver.node);
                writer.write(".");
            }
            writer.write("(");
            writer.separated(&func.params, ", ", |w, param| type_into(w, &param.node));
            writer.write(") -> ");
            type_into(writer, &func.ret.node);
        }
        TypeExpr::Intersection(members) => {
            writer.separated(members, " & ", |w, member| type_into(w, &member.node));
        }
        TypeExpr::Error => writer.write("<error>"),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser;

    fn reprint(source: &str) -> String {
        let program = parser::parse_source(source).expect("parses");
        Formatter::new(FormatConfig::default()).format(&program)
    }

    #[test]
    fn test_declarations_round_trip() {
        let source = "class Bag<out E> : Collection<E>\n\
                      fun <E : Number> Bag.Companion.buildFrom(size: Int, init: SequenceBuilder<Bag<E>, E>.() -> Unit): Bag<E>\n\
                      val a: Set<Int> = [1, 2, 3]\n";
        assert_eq!(reprint(source), source);
    }

    #[test]
    fn test_class_body() {
        let source = "class Box<out T> {\n    fun get(): T\n    companion object {\n        fun <T> of(value: T): Box<T>\n    }\n}\n";
        assert_eq!(reprint(source), source);
    }

    #[test]
    fn test_literals_and_calls() {
        let source = "val m = [\"a\\n\": 1.5, \"b\": 2.0]\nval e = [:]\nval c = Set.buildFrom<Int>(1) { add(1) }\nval p = (listOf(true, false))\n";
        assert_eq!(reprint(source), source);
    }

    #[test]
    fn test_multiline_blocks() {
        let program = parser::parse_source("val c = Set.buildFrom<Int>(2) { add(1); add(2) }").expect("parses");
        let config = FormatConfig::new().with_indent_width(2).with_inline_blocks(false);
        let printed = Formatter::new(config).format(&program);
        assert_eq!(printed, "val c = Set.buildFrom<Int>(2) {\n  add(1)\n  add(2)\n}\n");
    }
}
