use std::fmt::Write;

use crate::frontend::ast::*;
use crate::meta::{LocationMeta, TypeMeta};
use crate::util::symbol::{IdTable, Symbol};

/// metadata that may carry an inferred type of the expression
pub trait DumpType {
    fn dump_type(&self) -> Option<Symbol>;
    fn dump_line(&self) -> u32;
}

impl DumpType for LocationMeta {
    fn dump_type(&self) -> Option<Symbol> {
        Option::None
    }

    fn dump_line(&self) -> u32 {
        self.line
    }
}

impl DumpType for TypeMeta {
    fn dump_type(&self) -> Option<Symbol> {
        Option::Some(self.t)
    }

    fn dump_line(&self) -> u32 {
        self.line
    }
}

/// escape string so it can be read back as a double-quoted literal
fn escape(val: &str) -> String {
    let mut escaped = String::with_capacity(val.len() + 2);
    escaped.push('"');
    for c in val.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(escaped, "\\{:03o}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

struct DumpWriter<'ids> {
    ids: &'ids IdTable,
    out: String,
}

impl<'ids> DumpWriter<'ids> {
    fn line(&mut self, indent: usize, text: &str) {
        let _ = writeln!(self.out, "{:indent$}{}", "", text, indent = indent);
    }

    fn symbol(&mut self, indent: usize, sym: Symbol) {
        let ids = self.ids;
        self.line(indent, ids.resolve(sym));
    }

    fn line_number(&mut self, indent: usize, line: u32) {
        self.line(indent, &format!("#{}", line));
    }

    fn type_annotation<M: DumpType>(&mut self, indent: usize, meta: &M) {
        let ids = self.ids;
        let t = ids.resolve(meta.dump_type().unwrap_or(Symbol::NO_TYPE));
        self.line(indent, &format!(": {}", t));
    }

    fn class<M: DumpType>(&mut self, indent: usize, cls: &Class<M>) {
        self.line_number(indent, cls.get_meta().line);
        self.line(indent, "_class");
        self.symbol(indent + 2, cls.get_key());
        self.symbol(indent + 2, cls.item.parent.unwrap_or(Symbol::NO_CLASS));
        self.line(indent + 2, &escape(&cls.item.file));
        self.line(indent + 2, "(");
        for feature in cls.item.features.iter() {
            self.feature(indent + 2, feature);
        }
        self.line(indent + 2, ")");
    }

    fn feature<M: DumpType>(&mut self, indent: usize, feature: &Feature<M>) {
        self.line_number(indent, feature.get_meta().line);
        match &feature.item {
            FeatureKind::Attribute(attr) => {
                self.line(indent, "_attr");
                self.symbol(indent + 2, attr.ident);
                self.symbol(indent + 2, attr.t);
                self.optional_expression(indent + 2, attr.init.as_deref(), feature.get_meta().line);
            }
            FeatureKind::Method(method) => {
                self.line(indent, "_method");
                self.symbol(indent + 2, method.ident);
                for formal in method.formals.iter() {
                    self.line_number(indent + 2, formal.get_meta().line);
                    self.line(indent + 2, "_formal");
                    self.symbol(indent + 4, formal.item.ident);
                    self.symbol(indent + 4, formal.item.t);
                }
                self.symbol(indent + 2, method.ret);
                self.optional_expression(indent + 2, method.body.as_deref(), feature.get_meta().line);
            }
        }
    }

    fn optional_expression<M: DumpType>(&mut self, indent: usize, expr: Option<&Expression<M>>, line: u32) {
        match expr {
            Some(expr) => self.expression(indent, expr),
            None => {
                self.line_number(indent, line);
                self.line(indent, "_no_expr");
                self.type_annotation(indent, &LocationMeta::from(line));
            }
        }
    }

    fn binary<M: DumpType>(&mut self, indent: usize, kind: &str, left: &Expression<M>, right: &Expression<M>) {
        self.line(indent, kind);
        self.expression(indent + 2, left);
        self.expression(indent + 2, right);
    }

    fn args<M: DumpType>(&mut self, indent: usize, args: &[Expression<M>]) {
        self.line(indent, "(");
        for arg in args.iter() {
            self.expression(indent, arg);
        }
        self.line(indent, ")");
    }

    fn expression<M: DumpType>(&mut self, indent: usize, expr: &Expression<M>) {
        let meta = expr.get_meta();
        self.line_number(indent, meta.dump_line());
        let inner = indent + 2;
        match &expr.item {
            ExpressionKind::LitInt { val } => {
                self.line(indent, "_int");
                self.line(inner, val);
            }
            ExpressionKind::LitFloat { val } => {
                self.line(indent, "_float");
                self.line(inner, &format!("{:?}", val));
            }
            ExpressionKind::LitStr { val } => {
                self.line(indent, "_string");
                self.line(inner, &escape(val));
            }
            ExpressionKind::LitBool { val } => {
                self.line(indent, "_bool");
                self.line(inner, if *val { "1" } else { "0" });
            }
            ExpressionKind::Object { ident } => {
                self.line(indent, "_object");
                self.symbol(inner, *ident);
            }
            ExpressionKind::Assign { ident, expr } => {
                self.line(indent, "_assign");
                self.symbol(inner, *ident);
                self.expression(inner, expr);
            }
            ExpressionKind::Dispatch { receiver, method, args } => {
                self.line(indent, "_dispatch");
                self.expression(inner, receiver);
                self.symbol(inner, *method);
                self.args(inner, args);
            }
            ExpressionKind::StaticDispatch { receiver, class, method, args } => {
                self.line(indent, "_static_dispatch");
                self.expression(inner, receiver);
                self.symbol(inner, *class);
                self.symbol(inner, *method);
                self.args(inner, args);
            }
            ExpressionKind::Cond { pred, then_expr, else_expr } => {
                self.line(indent, "_cond");
                self.expression(inner, pred);
                self.expression(inner, then_expr);
                self.expression(inner, else_expr);
            }
            ExpressionKind::Loop { pred, body } => self.binary(indent, "_loop", pred, body),
            ExpressionKind::Block { body } => {
                self.line(indent, "_block");
                for e in body.iter() {
                    self.expression(inner, e);
                }
            }
            ExpressionKind::Let { ident, t, init, body } => {
                self.line(indent, "_let");
                self.symbol(inner, *ident);
                self.symbol(inner, *t);
                self.optional_expression(inner, init.as_deref(), meta.dump_line());
                self.expression(inner, body);
            }
            ExpressionKind::Case { scrutinee, branches } => {
                self.line(indent, "_typcase");
                self.expression(inner, scrutinee);
                for branch in branches.iter() {
                    self.line_number(inner, branch.get_meta().line);
                    self.line(inner, "_branch");
                    self.symbol(inner + 2, branch.item.ident);
                    self.symbol(inner + 2, branch.item.t);
                    self.expression(inner + 2, &branch.item.body);
                }
            }
            ExpressionKind::Arith { op, left, right } => {
                let kind = match op {
                    ArithOperator::Plus => "_plus",
                    ArithOperator::Minus => "_sub",
                    ArithOperator::Times => "_mul",
                    ArithOperator::Divide => "_divide",
                };
                self.binary(indent, kind, left, right);
            }
            ExpressionKind::Compare { op, left, right } => {
                let kind = match op {
                    CompareOperator::Less => "_lt",
                    CompareOperator::LessEqual => "_leq",
                };
                self.binary(indent, kind, left, right);
            }
            ExpressionKind::Equal { left, right } => self.binary(indent, "_eq", left, right),
            ExpressionKind::Unary { op, arg } => {
                let kind = match op {
                    UnaryOperator::Neg => "_neg",
                    UnaryOperator::Not => "_comp",
                };
                self.line(indent, kind);
                self.expression(inner, arg);
            }
            ExpressionKind::IsVoid { arg } => {
                self.line(indent, "_isvoid");
                self.expression(inner, arg);
            }
            ExpressionKind::New { t } => {
                self.line(indent, "_new");
                self.symbol(inner, *t);
            }
        }
        self.type_annotation(indent, meta);
    }
}

/// write program in the dump format; checked programs include inferred types of all expressions
pub fn dump_program<M: DumpType>(program: &Program<M>, ids: &IdTable) -> String {
    let mut writer = DumpWriter { ids, out: String::new() };
    let line = program.classes.first().map_or(1, |cls| cls.get_meta().line);
    writer.line_number(0, line);
    writer.line(0, "_program");
    for cls in program.classes.iter() {
        writer.class(2, cls);
    }
    writer.out
}

/// single expression in the dump format, mostly for debugging
pub fn dump_expression<M: DumpType>(expr: &Expression<M>, ids: &IdTable) -> String {
    let mut writer = DumpWriter { ids, out: String::new() };
    writer.expression(0, expr);
    writer.out
}
