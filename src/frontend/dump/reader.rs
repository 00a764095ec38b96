use crate::frontend::ast::*;
use crate::frontend::error::{FrontendError, FrontendErrorKind};
use crate::meta::LocationMeta;
use crate::util::symbol::{IdTable, Symbol};

/// errors of the reader are located by byte offset in the dump
pub type DumpError = FrontendError<usize>;
pub type DumpResult<T> = Result<T, DumpError>;

/// single non-empty line of the dump, without indentation
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    offset: usize,
    text: &'src str,
}

/// reads a program from the text format produced by the cool parser
struct DumpReader<'src, 'ids> {
    lines: Vec<Line<'src>>,
    pos: usize,
    /// offset of the end of input, for errors at eof
    end: usize,
    ids: &'ids mut IdTable,
}

fn dump_error(message: String, offset: usize) -> DumpError {
    DumpError::new(FrontendErrorKind::DumpError { message }, offset)
}

/// reverses escaping of a double-quoted string literal
fn unescape(quoted: &str, offset: usize) -> DumpResult<String> {
    let inner = quoted.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| dump_error(format!("Expected quoted string, got {}", quoted), offset))?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(d) if d.is_digit(8) => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                match std::char::from_u32(code) {
                    Some(ch) => result.push(ch),
                    None => return Err(dump_error(format!("Invalid escape code {}", code), offset)),
                }
            }
            Some(other) => result.push(other),
            None => return Err(dump_error(String::from("Unterminated escape sequence"), offset)),
        }
    }
    Ok(result)
}

impl<'src, 'ids> DumpReader<'src, 'ids> {
    fn new(source: &'src str, ids: &'ids mut IdTable) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for raw in source.split('\n') {
            let trimmed_start = raw.trim_start();
            let text = trimmed_start.trim_end();
            if !text.is_empty() {
                lines.push(Line { offset: offset + (raw.len() - trimmed_start.len()), text });
            }
            offset += raw.len() + 1;
        }
        Self { lines, pos: 0, end: source.len(), ids }
    }

    fn peek(&self) -> Option<Line<'src>> {
        self.lines.get(self.pos).copied()
    }

    fn next_line(&mut self) -> DumpResult<Line<'src>> {
        match self.peek() {
            Some(line) => {
                self.pos += 1;
                Ok(line)
            }
            None => Err(dump_error(String::from("Unexpected end of input"), self.end)),
        }
    }

    fn expect(&mut self, expected: &str) -> DumpResult<()> {
        let line = self.next_line()?;
        if line.text == expected {
            Ok(())
        } else {
            Err(dump_error(format!("Expected {}, got {}", expected, line.text), line.offset))
        }
    }

    fn at_node(&self) -> bool {
        self.peek().map_or(false, |line| line.text.starts_with('#'))
    }

    /// `#<line>` prefix of every node
    fn read_line_number(&mut self) -> DumpResult<LocationMeta> {
        let line = self.next_line()?;
        line.text.strip_prefix('#')
            .and_then(|n| n.parse::<u32>().ok())
            .map(LocationMeta::from)
            .ok_or_else(|| dump_error(format!("Expected line number, got {}", line.text), line.offset))
    }

    fn read_kind(&mut self) -> DumpResult<Line<'src>> {
        let line = self.next_line()?;
        if line.text.starts_with('_') {
            Ok(line)
        } else {
            Err(dump_error(format!("Expected node kind, got {}", line.text), line.offset))
        }
    }

    fn read_symbol(&mut self) -> DumpResult<Symbol> {
        let line = self.next_line()?;
        if line.text.contains(char::is_whitespace) || line.text.starts_with(|c: char| "#():\"".contains(c)) {
            return Err(dump_error(format!("Expected identifier, got {}", line.text), line.offset));
        }
        Ok(self.ids.intern(line.text))
    }

    fn read_string(&mut self) -> DumpResult<String> {
        let line = self.next_line()?;
        unescape(line.text, line.offset)
    }

    fn read_value<T: std::str::FromStr>(&mut self, what: &str) -> DumpResult<T> {
        let line = self.next_line()?;
        line.text.parse::<T>()
            .map_err(|_| dump_error(format!("Expected {}, got {}", what, line.text), line.offset))
    }

    /// integer literal is kept as text, so any number accepted by the parser passes through
    fn read_digits(&mut self) -> DumpResult<String> {
        let line = self.next_line()?;
        if !line.text.is_empty() && line.text.chars().all(|c| c.is_ascii_digit()) {
            Ok(String::from(line.text))
        } else {
            Err(dump_error(format!("Expected integer, got {}", line.text), line.offset))
        }
    }

    /// `: <type>` line closing every expression, the type itself is recomputed by the analysis
    fn read_type_annotation(&mut self) -> DumpResult<()> {
        let line = self.next_line()?;
        if line.text.starts_with(':') {
            Ok(())
        } else {
            Err(dump_error(format!("Expected type annotation, got {}", line.text), line.offset))
        }
    }

    fn read_program(&mut self) -> DumpResult<Program<LocationMeta>> {
        self.read_line_number()?;
        self.expect("_program")?;
        let mut classes = Vec::new();
        while self.at_node() {
            classes.push(self.read_class()?);
        }
        if let Some(line) = self.peek() {
            return Err(dump_error(format!("Unexpected content after program: {}", line.text), line.offset));
        }
        Ok(Program::new(classes))
    }

    fn read_class(&mut self) -> DumpResult<Class<LocationMeta>> {
        let loc = self.read_line_number()?;
        self.expect("_class")?;
        let ident = self.read_symbol()?;
        let parent = match self.read_symbol()? {
            Symbol::NO_CLASS => Option::None,
            parent => Option::Some(parent),
        };
        let file = self.read_string()?;
        self.expect("(")?;
        let mut features = Vec::new();
        while self.at_node() {
            features.push(self.read_feature()?);
        }
        self.expect(")")?;
        Ok(Class::new(ClassItem::new(ident, parent, features, &file), loc))
    }

    fn read_feature(&mut self) -> DumpResult<Feature<LocationMeta>> {
        let loc = self.read_line_number()?;
        let kind = self.read_kind()?;
        let feature = match kind.text {
            "_attr" => {
                let ident = self.read_symbol()?;
                let t = self.read_symbol()?;
                let init = self.read_optional_expression()?;
                FeatureKind::Attribute(AttributeItem { ident, t, init })
            }
            "_method" => {
                let ident = self.read_symbol()?;
                let mut formals = Vec::new();
                while self.at_node() {
                    formals.push(self.read_formal()?);
                }
                let ret = self.read_symbol()?;
                let body = Box::new(self.read_expression()?);
                FeatureKind::Method(MethodItem { ident, formals, ret, body: Option::Some(body) })
            }
            other => {
                return Err(dump_error(format!("Expected feature, got {}", other), kind.offset));
            }
        };
        Ok(Feature::new(feature, loc))
    }

    fn read_formal(&mut self) -> DumpResult<Formal> {
        let loc = self.read_line_number()?;
        self.expect("_formal")?;
        let ident = self.read_symbol()?;
        let t = self.read_symbol()?;
        Ok(Formal::new(FormalItem { ident, t }, loc))
    }

    fn read_branch(&mut self) -> DumpResult<CaseBranch<LocationMeta>> {
        let loc = self.read_line_number()?;
        self.expect("_branch")?;
        let ident = self.read_symbol()?;
        let t = self.read_symbol()?;
        let body = Box::new(self.read_expression()?);
        Ok(CaseBranch::new(CaseBranchItem { ident, t, body }, loc))
    }

    fn read_boxed(&mut self) -> DumpResult<Box<Expression<LocationMeta>>> {
        self.read_expression().map(Box::new)
    }

    /// `_no_expr` stands for a missing initializer
    fn read_optional_expression(&mut self) -> DumpResult<Option<Box<Expression<LocationMeta>>>> {
        let is_empty = self.lines.get(self.pos + 1).map_or(false, |line| line.text == "_no_expr");
        if is_empty {
            self.read_line_number()?;
            self.expect("_no_expr")?;
            self.read_type_annotation()?;
            Ok(Option::None)
        } else {
            self.read_boxed().map(Option::Some)
        }
    }

    fn read_args(&mut self) -> DumpResult<Vec<Expression<LocationMeta>>> {
        self.expect("(")?;
        let mut args = Vec::new();
        while self.at_node() {
            args.push(self.read_expression()?);
        }
        self.expect(")")?;
        Ok(args)
    }

    fn read_arith(&mut self, op: ArithOperator) -> DumpResult<ExpressionKind<LocationMeta>> {
        let left = self.read_boxed()?;
        let right = self.read_boxed()?;
        Ok(ExpressionKind::Arith { op, left, right })
    }

    fn read_compare(&mut self, op: CompareOperator) -> DumpResult<ExpressionKind<LocationMeta>> {
        let left = self.read_boxed()?;
        let right = self.read_boxed()?;
        Ok(ExpressionKind::Compare { op, left, right })
    }

    fn read_expression(&mut self) -> DumpResult<Expression<LocationMeta>> {
        let loc = self.read_line_number()?;
        let kind = self.read_kind()?;
        let expr = match kind.text {
            "_int" => ExpressionKind::LitInt { val: self.read_digits()? },
            "_float" => ExpressionKind::LitFloat { val: self.read_value("float")? },
            "_string" => ExpressionKind::LitStr { val: self.read_string()? },
            "_bool" => ExpressionKind::LitBool { val: self.read_value::<u8>("boolean")? != 0 },
            "_object" => ExpressionKind::Object { ident: self.read_symbol()? },
            "_assign" => {
                let ident = self.read_symbol()?;
                let expr = self.read_boxed()?;
                ExpressionKind::Assign { ident, expr }
            }
            "_dispatch" => {
                let receiver = self.read_boxed()?;
                let method = self.read_symbol()?;
                let args = self.read_args()?;
                ExpressionKind::Dispatch { receiver, method, args }
            }
            "_static_dispatch" => {
                let receiver = self.read_boxed()?;
                let class = self.read_symbol()?;
                let method = self.read_symbol()?;
                let args = self.read_args()?;
                ExpressionKind::StaticDispatch { receiver, class, method, args }
            }
            "_cond" => {
                let pred = self.read_boxed()?;
                let then_expr = self.read_boxed()?;
                let else_expr = self.read_boxed()?;
                ExpressionKind::Cond { pred, then_expr, else_expr }
            }
            "_loop" => {
                let pred = self.read_boxed()?;
                let body = self.read_boxed()?;
                ExpressionKind::Loop { pred, body }
            }
            "_block" => {
                let mut body = Vec::new();
                while self.at_node() {
                    body.push(self.read_expression()?);
                }
                ExpressionKind::Block { body }
            }
            "_let" => {
                let ident = self.read_symbol()?;
                let t = self.read_symbol()?;
                let init = self.read_optional_expression()?;
                let body = self.read_boxed()?;
                ExpressionKind::Let { ident, t, init, body }
            }
            "_typcase" => {
                let scrutinee = self.read_boxed()?;
                let mut branches = Vec::new();
                while self.at_node() {
                    branches.push(self.read_branch()?);
                }
                ExpressionKind::Case { scrutinee, branches }
            }
            "_plus" => self.read_arith(ArithOperator::Plus)?,
            "_sub" => self.read_arith(ArithOperator::Minus)?,
            "_mul" => self.read_arith(ArithOperator::Times)?,
            "_divide" => self.read_arith(ArithOperator::Divide)?,
            "_lt" => self.read_compare(CompareOperator::Less)?,
            "_leq" => self.read_compare(CompareOperator::LessEqual)?,
            "_eq" => {
                let left = self.read_boxed()?;
                let right = self.read_boxed()?;
                ExpressionKind::Equal { left, right }
            }
            "_neg" => ExpressionKind::Unary { op: UnaryOperator::Neg, arg: self.read_boxed()? },
            "_comp" => ExpressionKind::Unary { op: UnaryOperator::Not, arg: self.read_boxed()? },
            "_isvoid" => ExpressionKind::IsVoid { arg: self.read_boxed()? },
            "_new" => ExpressionKind::New { t: self.read_symbol()? },
            other => {
                return Err(dump_error(format!("Unknown expression kind {}", other), kind.offset));
            }
        };
        self.read_type_annotation()?;
        Ok(Expression::new(expr, loc))
    }
}

/// read the whole program from the ast dump, identifiers are interned in ids
pub fn read_program(source: &str, ids: &mut IdTable) -> Result<Program<LocationMeta>, Vec<DumpError>> {
    DumpReader::new(source, ids)
        .read_program()
        .map_err(|e| vec![e])
}
