//! A small line-oriented expression interpreter.
//!
//! Understands one statement per line: either `name = expr` or a bare
//! expression whose `repr` is echoed. Expressions cover integer and float
//! arithmetic, strings, comparisons, attribute access and calls to a handful
//! of builtins (`print`, `len`, `list`, `locals`, `str`, `repr`, `int`,
//! `abs`, `help`). `#` starts a comment.

use crate::error::EvalError;
use std::fmt::Write as _;

type EvalResult<T> = std::result::Result<T, EvalError>;

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Ordered string-keyed mapping.
    Dict(Vec<(String, Value)>),
    /// Object whose attributes are fixed values, e.g. `VISIT`.
    Namespace {
        name: String,
        attrs: Vec<(String, Value)>,
    },
    Builtin(Builtin),
    Method {
        receiver: Box<Value>,
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Len,
    List,
    Locals,
    Str,
    Repr,
    Int,
    Abs,
    Help,
}

impl Builtin {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "print" => Self::Print,
            "len" => Self::Len,
            "list" => Self::List,
            "locals" => Self::Locals,
            "str" => Self::Str,
            "repr" => Self::Repr,
            "int" => Self::Int,
            "abs" => Self::Abs,
            "help" => Self::Help,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Len => "len",
            Self::List => "list",
            Self::Locals => "locals",
            Self::Str => "str",
            Self::Repr => "repr",
            Self::Int => "int",
            Self::Abs => "abs",
            Self::Help => "help",
        }
    }
}

impl Value {
    /// Type name as shown in error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Namespace { name, .. } => name.as_str(),
            Self::Builtin(_) => "builtin_function_or_method",
            Self::Method { .. } => "method",
        }
    }

    /// Developer-facing rendering; strings are quoted.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => float_repr(*f),
            Self::Str(s) => quote(s),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::repr).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Dict(entries) => {
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.repr()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Namespace { name, .. } => format!("<{name} object>"),
            Self::Builtin(b) => format!("<built-in function {}>", b.name()),
            Self::Method { receiver, name } => {
                format!("<built-in method {name} of {} object>", receiver.type_name())
            }
        }
    }

    /// User-facing rendering; strings are printed as-is.
    #[must_use]
    pub fn to_display(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.repr(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

fn float_repr(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    Op(&'static str),
}

const OPERATORS: &[&str] = &[
    "**", "//", "==", "!=", "<=", ">=", "+", "-", "*", "/", "%", "(", ")", ",", ".", "=", "<", ">",
];

fn tokenize(line: &str) -> EvalResult<Vec<Token>> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '#' {
            break;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
                i += 1;
            }
            let is_float = i < chars.len() && chars[i] == '.';
            if is_float {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let literal: String = chars[start..i].iter().filter(|&&c| c != '_').collect();
            if is_float {
                let value = literal
                    .parse()
                    .map_err(|_| EvalError::syntax("invalid decimal literal"))?;
                tokens.push(Token::Float(value));
            } else {
                let value = literal
                    .parse()
                    .map_err(|_| EvalError::new("OverflowError", "integer literal too large"))?;
                tokens.push(Token::Int(value));
            }
        } else if c == '\'' || c == '"' {
            let (s, next) = lex_string(&chars, i)?;
            tokens.push(Token::Str(s));
            i = next;
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Name(chars[start..i].iter().collect()));
        } else {
            let rest: String = chars[i..chars.len().min(i + 2)].iter().collect();
            let op = OPERATORS
                .iter()
                .find(|op| rest.starts_with(**op))
                .ok_or_else(|| EvalError::syntax(format!("invalid character '{c}'")))?;
            tokens.push(Token::Op(*op));
            i += op.len();
        }
    }
    Ok(tokens)
}

fn lex_string(chars: &[char], start: usize) -> EvalResult<(String, usize)> {
    let delim = chars[start];
    let mut out = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            c if c == delim => return Ok((out, i + 1)),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                match chars[i] {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    c @ ('\\' | '\'' | '"') => out.push(c),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            c => out.push(c),
        }
        i += 1;
    }
    Err(EvalError::syntax("unterminated string literal"))
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Literal(Value),
    Name(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Attr(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
enum Statement {
    Assign(String, Expr),
    Expr(Expr),
}

/// Deepest expression nesting the parser accepts.
const MAX_NESTING: usize = 100;

/// Longest string an expression may build, in bytes.
const MAX_STR_LEN: usize = 1 << 20;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting of the expression being built; bounds parser, evaluator and
    /// drop recursion alike.
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn nest(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(EvalError::new(
                "RecursionError",
                "maximum recursion depth exceeded",
            ));
        }
        Ok(())
    }

    /// Run `f`, then restore the nesting level it started at.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        let saved = self.depth;
        let result = f(self);
        self.depth = saved;
        result
    }

    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.peek_op() == Some(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn statement(&mut self) -> EvalResult<Statement> {
        let statement = match (self.tokens.first(), self.tokens.get(1)) {
            (Some(Token::Name(name)), Some(Token::Op("="))) => {
                if matches!(name.as_str(), "True" | "False" | "None") {
                    return Err(EvalError::syntax(format!("cannot assign to {name}")));
                }
                let name = name.clone();
                self.pos = 2;
                Statement::Assign(name, self.expr()?)
            }
            _ => Statement::Expr(self.expr()?),
        };
        if self.pos < self.tokens.len() {
            return Err(EvalError::syntax("invalid syntax"));
        }
        Ok(statement)
    }

    fn expr(&mut self) -> EvalResult<Expr> {
        let left = self.additive()?;
        let op = match self.peek_op() {
            Some("==") => BinOp::Eq,
            Some("!=") => BinOp::Ne,
            Some("<") => BinOp::Lt,
            Some("<=") => BinOp::Le,
            Some(">") => BinOp::Gt,
            Some(">=") => BinOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.additive()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    // Each link of a left-associative chain deepens the tree by one.
    fn additive(&mut self) -> EvalResult<Expr> {
        self.scoped(|p| {
            let mut left = p.term()?;
            loop {
                let op = match p.peek_op() {
                    Some("+") => BinOp::Add,
                    Some("-") => BinOp::Sub,
                    _ => return Ok(left),
                };
                p.pos += 1;
                p.nest()?;
                left = Expr::Binary(op, Box::new(left), Box::new(p.term()?));
            }
        })
    }

    fn term(&mut self) -> EvalResult<Expr> {
        self.scoped(|p| {
            let mut left = p.unary()?;
            loop {
                let op = match p.peek_op() {
                    Some("*") => BinOp::Mul,
                    Some("/") => BinOp::Div,
                    Some("//") => BinOp::FloorDiv,
                    Some("%") => BinOp::Mod,
                    _ => return Ok(left),
                };
                p.pos += 1;
                p.nest()?;
                left = Expr::Binary(op, Box::new(left), Box::new(p.unary()?));
            }
        })
    }

    fn unary(&mut self) -> EvalResult<Expr> {
        self.scoped(|p| {
            p.nest()?;
            p.unary_operand()
        })
    }

    fn unary_operand(&mut self) -> EvalResult<Expr> {
        if self.eat_op("-") {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat_op("+") {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> EvalResult<Expr> {
        let base = self.postfix()?;
        if self.eat_op("**") {
            // Right-associative, and binds tighter than a unary minus on its left.
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> EvalResult<Expr> {
        self.scoped(Self::postfix_chain)
    }

    fn postfix_chain(&mut self) -> EvalResult<Expr> {
        let mut expr = self.atom()?;
        loop {
            if matches!(self.peek_op(), Some("." | "(")) {
                self.nest()?;
            }
            if self.eat_op(".") {
                match self.tokens.get(self.pos) {
                    Some(Token::Name(attr)) => {
                        expr = Expr::Attr(Box::new(expr), attr.clone());
                        self.pos += 1;
                    }
                    _ => return Err(EvalError::syntax("invalid syntax")),
                }
            } else if self.eat_op("(") {
                let mut args = Vec::new();
                if !self.eat_op(")") {
                    loop {
                        args.push(self.expr()?);
                        if self.eat_op(")") {
                            break;
                        }
                        if !self.eat_op(",") {
                            return Err(self.unclosed_paren());
                        }
                        if self.eat_op(")") {
                            break;
                        }
                    }
                }
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    fn atom(&mut self) -> EvalResult<Expr> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err(EvalError::syntax("invalid syntax"));
        };
        self.pos += 1;
        match token {
            Token::Int(n) => Ok(Expr::Literal(Value::Int(n))),
            Token::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Name(name) => Ok(match name.as_str() {
                "True" => Expr::Literal(Value::Bool(true)),
                "False" => Expr::Literal(Value::Bool(false)),
                "None" => Expr::Literal(Value::None),
                _ => Expr::Name(name),
            }),
            Token::Op("(") => {
                let inner = self.expr()?;
                if !self.eat_op(")") {
                    return Err(self.unclosed_paren());
                }
                Ok(inner)
            }
            Token::Op(_) => Err(EvalError::syntax("invalid syntax")),
        }
    }

    fn unclosed_paren(&self) -> EvalError {
        if self.pos >= self.tokens.len() {
            EvalError::syntax("'(' was never closed")
        } else {
            EvalError::syntax("invalid syntax")
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Interpreter state: the global scope and the text `help()` prints.
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    globals: Vec<(String, Value)>,
    help_text: String,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Bind `name` in the global scope, keeping its original position if it
    /// already exists.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.globals.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.globals.push((name.to_string(), value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Global names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.globals.iter().map(|(k, _)| k.as_str())
    }

    /// Run one line and return everything it printed.
    ///
    /// Bare expressions echo their `repr` unless they evaluate to `None`.
    pub fn execute(&mut self, line: &str) -> EvalResult<String> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Ok(String::new());
        }
        let statement = Parser::new(tokens).statement()?;
        let mut out = String::new();
        match statement {
            Statement::Assign(name, expr) => {
                let value = self.eval(&expr, &mut out)?;
                self.set(&name, value);
            }
            Statement::Expr(expr) => {
                let value = self.eval(&expr, &mut out)?;
                if value != Value::None {
                    out.push_str(&value.repr());
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    fn eval(&self, expr: &Expr, out: &mut String) -> EvalResult<Value> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Name(name) => self
                .get(name)
                .cloned()
                .or_else(|| Builtin::lookup(name).map(Value::Builtin))
                .ok_or_else(|| EvalError::name(name)),
            Expr::Neg(inner) => match self.eval(inner, out)? {
                Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
                Value::Float(f) => Ok(Value::Float(-f)),
                Value::Bool(b) => Ok(Value::Int(-i64::from(b))),
                other => Err(EvalError::type_error(format!(
                    "bad operand type for unary -: '{}'",
                    other.type_name()
                ))),
            },
            Expr::Binary(op, left, right) => {
                let l = self.eval(left, out)?;
                let r = self.eval(right, out)?;
                binary(*op, l, r)
            }
            Expr::Attr(target, attr) => attribute(self.eval(target, out)?, attr),
            Expr::Call(callee, args) => {
                let callee = self.eval(callee, out)?;
                let args = args
                    .iter()
                    .map(|a| self.eval(a, out))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call(callee, args, out)
            }
        }
    }

    fn call(&self, callee: Value, args: Vec<Value>, out: &mut String) -> EvalResult<Value> {
        match callee {
            Value::Builtin(b) => self.call_builtin(b, args, out),
            Value::Method { receiver, name } => call_method(*receiver, &name, &args),
            other => Err(EvalError::type_error(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    fn call_builtin(&self, b: Builtin, args: Vec<Value>, out: &mut String) -> EvalResult<Value> {
        match b {
            Builtin::Print => {
                let parts: Vec<String> = args.iter().map(Value::to_display).collect();
                out.push_str(&parts.join(" "));
                out.push('\n');
                Ok(Value::None)
            }
            Builtin::Locals => {
                expect_args(b, &args, 0)?;
                Ok(Value::Dict(self.globals.clone()))
            }
            Builtin::Help => {
                out.push_str(&self.help_text);
                out.push('\n');
                Ok(Value::None)
            }
            _ => {
                expect_args(b, &args, 1)?;
                let Some(arg) = args.into_iter().next() else {
                    return Err(arity(b, 0));
                };
                unary_builtin(b, arg)
            }
        }
    }
}

fn check_str_len(len: usize) -> EvalResult<()> {
    if len > MAX_STR_LEN {
        return Err(EvalError::new("MemoryError", "string too large"));
    }
    Ok(())
}

fn overflow() -> EvalError {
    EvalError::new("OverflowError", "integer overflow")
}

fn arity(b: Builtin, given: usize) -> EvalError {
    match b {
        Builtin::Locals => EvalError::type_error(format!(
            "locals() takes no arguments ({given} given)"
        )),
        _ => EvalError::type_error(format!(
            "{}() takes exactly one argument ({given} given)",
            b.name()
        )),
    }
}

fn expect_args(b: Builtin, args: &[Value], n: usize) -> EvalResult<()> {
    if args.len() == n {
        Ok(())
    } else {
        Err(arity(b, args.len()))
    }
}

fn unary_builtin(b: Builtin, arg: Value) -> EvalResult<Value> {
    match b {
        Builtin::Len => match &arg {
            Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
            Value::List(items) => Ok(Value::Int(items.len() as i64)),
            Value::Dict(entries) => Ok(Value::Int(entries.len() as i64)),
            other => Err(EvalError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            ))),
        },
        Builtin::List => match arg {
            Value::List(items) => Ok(Value::List(items)),
            Value::Str(s) => Ok(Value::List(
                s.chars().map(|c| Value::Str(c.to_string())).collect(),
            )),
            Value::Dict(entries) => Ok(Value::List(
                entries.into_iter().map(|(k, _)| Value::Str(k)).collect(),
            )),
            other => Err(EvalError::type_error(format!(
                "'{}' object is not iterable",
                other.type_name()
            ))),
        },
        Builtin::Str => Ok(Value::Str(arg.to_display())),
        Builtin::Repr => Ok(Value::Str(arg.repr())),
        Builtin::Int => match arg {
            Value::Int(n) => Ok(Value::Int(n)),
            Value::Bool(v) => Ok(Value::Int(i64::from(v))),
            Value::Float(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
            Value::Str(s) => s.trim().parse().map(Value::Int).map_err(|_| {
                EvalError::new(
                    "ValueError",
                    format!("invalid literal for int() with base 10: {}", quote(&s)),
                )
            }),
            other => Err(EvalError::type_error(format!(
                "int() argument must be a string or a number, not '{}'",
                other.type_name()
            ))),
        },
        Builtin::Abs => match arg {
            Value::Int(n) => n.checked_abs().map(Value::Int).ok_or_else(overflow),
            Value::Float(f) => Ok(Value::Float(f.abs())),
            Value::Bool(v) => Ok(Value::Int(i64::from(v))),
            other => Err(EvalError::type_error(format!(
                "bad operand type for abs(): '{}'",
                other.type_name()
            ))),
        },
        Builtin::Print | Builtin::Locals | Builtin::Help => Ok(Value::None),
    }
}

fn attribute(target: Value, attr: &str) -> EvalResult<Value> {
    if let Value::Namespace { attrs, .. } = &target {
        if let Some((_, v)) = attrs.iter().find(|(k, _)| k == attr) {
            return Ok(v.clone());
        }
    }
    let is_method = matches!(
        (&target, attr),
        (Value::Dict(_), "keys" | "values")
            | (Value::Str(_), "upper" | "lower" | "strip" | "title")
    );
    if is_method {
        return Ok(Value::Method {
            receiver: Box::new(target),
            name: attr.to_string(),
        });
    }
    Err(EvalError::new(
        "AttributeError",
        format!("'{}' object has no attribute '{attr}'", target.type_name()),
    ))
}

fn call_method(receiver: Value, name: &str, args: &[Value]) -> EvalResult<Value> {
    if !args.is_empty() {
        return Err(EvalError::type_error(format!(
            "{name}() takes no arguments ({} given)",
            args.len()
        )));
    }
    match (receiver, name) {
        (Value::Dict(entries), "keys") => Ok(Value::List(
            entries.into_iter().map(|(k, _)| Value::Str(k)).collect(),
        )),
        (Value::Dict(entries), "values") => {
            Ok(Value::List(entries.into_iter().map(|(_, v)| v).collect()))
        }
        (Value::Str(s), "upper") => Ok(Value::Str(s.to_uppercase())),
        (Value::Str(s), "lower") => Ok(Value::Str(s.to_lowercase())),
        (Value::Str(s), "strip") => Ok(Value::Str(s.trim().to_string())),
        (Value::Str(s), "title") => Ok(Value::Str(title_case(&s))),
        (other, _) => Err(EvalError::new(
            "AttributeError",
            format!("'{}' object has no attribute '{name}'", other.type_name()),
        )),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(v: &Value) -> Option<Self> {
        match v {
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Bool(b) => Some(Self::Int(i64::from(*b))),
            Value::Float(f) => Some(Self::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(f) => f,
        }
    }
}

fn unsupported(op: BinOp, l: &Value, r: &Value) -> EvalError {
    if op == BinOp::Add && matches!(l, Value::Str(_)) {
        return EvalError::type_error(format!(
            "can only concatenate str (not \"{}\") to str",
            r.type_name()
        ));
    }
    EvalError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        l.type_name(),
        r.type_name()
    ))
}

fn binary(op: BinOp, l: Value, r: Value) -> EvalResult<Value> {
    if matches!(op, BinOp::Eq | BinOp::Ne) {
        let equal = match (Num::of(&l), Num::of(&r)) {
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => l == r,
        };
        return Ok(Value::Bool(equal == (op == BinOp::Eq)));
    }
    if matches!(op, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge) {
        return compare(op, &l, &r);
    }

    match (&l, &r) {
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => {
            check_str_len(a.len() + b.len())?;
            return Ok(Value::Str(format!("{a}{b}")));
        }
        (Value::List(a), Value::List(b)) if op == BinOp::Add => {
            return Ok(Value::List(a.iter().chain(b).cloned().collect()));
        }
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) if op == BinOp::Mul => {
            let count = usize::try_from(*n).unwrap_or(0);
            let len = s.len().checked_mul(count).ok_or_else(overflow)?;
            check_str_len(len)?;
            return Ok(Value::Str(s.repeat(count)));
        }
        _ => {}
    }

    let (Some(a), Some(b)) = (Num::of(&l), Num::of(&r)) else {
        return Err(unsupported(op, &l, &r));
    };
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => int_arith(op, x, y),
        _ => float_arith(op, a.as_f64(), b.as_f64()),
    }
}

fn compare(op: BinOp, l: &Value, r: &Value) -> EvalResult<Value> {
    let ordering = match (Num::of(l), Num::of(r), l, r) {
        (Some(a), Some(b), _, _) => a.as_f64().partial_cmp(&b.as_f64()),
        (_, _, Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => {
            return Err(EvalError::type_error(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.symbol(),
                l.type_name(),
                r.type_name()
            )));
        }
    };
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::Le => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    }))
}

fn int_arith(op: BinOp, x: i64, y: i64) -> EvalResult<Value> {
    let result = match op {
        BinOp::Add => x.checked_add(y),
        BinOp::Sub => x.checked_sub(y),
        BinOp::Mul => x.checked_mul(y),
        BinOp::Div => return float_arith(op, x as f64, y as f64),
        BinOp::FloorDiv | BinOp::Mod if y == 0 => {
            return Err(EvalError::new(
                "ZeroDivisionError",
                "integer division or modulo by zero",
            ));
        }
        BinOp::FloorDiv => x.checked_div(y).map(|q| {
            if (x % y != 0) && ((x < 0) != (y < 0)) {
                q - 1
            } else {
                q
            }
        }),
        BinOp::Mod => x.checked_rem(y).map(|r| {
            if r != 0 && ((r < 0) != (y < 0)) {
                r + y
            } else {
                r
            }
        }),
        BinOp::Pow => {
            if y < 0 {
                return float_arith(op, x as f64, y as f64);
            }
            u32::try_from(y).ok().and_then(|e| x.checked_pow(e))
        }
        _ => None,
    };
    result.map(Value::Int).ok_or_else(overflow)
}

fn float_arith(op: BinOp, x: f64, y: f64) -> EvalResult<Value> {
    let result = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div | BinOp::FloorDiv | BinOp::Mod if y == 0.0 => {
            let message = match op {
                BinOp::Div => "division by zero",
                BinOp::FloorDiv => "float floor division by zero",
                _ => "float modulo",
            };
            return Err(EvalError::new("ZeroDivisionError", message));
        }
        BinOp::Div => x / y,
        BinOp::FloorDiv => (x / y).floor(),
        BinOp::Mod => {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) { r + y } else { r }
        }
        BinOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(EvalError::new(
                    "ZeroDivisionError",
                    "0.0 cannot be raised to a negative power",
                ));
            }
            x.powf(y)
        }
        _ => return Err(EvalError::syntax("invalid syntax")),
    };
    Ok(Value::Float(result))
}

/// `intro` followed by one indented line per name.
#[must_use]
pub fn help_listing<'a>(intro: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::from(intro);
    for name in names {
        let _ = write!(text, "\n  {name}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> String {
        Interpreter::new().execute(line).unwrap()
    }

    fn run_err(line: &str) -> EvalError {
        Interpreter::new().execute(line).unwrap_err()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("1+1"), "2\n");
        assert_eq!(run("2 * (3 + 4)"), "14\n");
        assert_eq!(run("7 / 2"), "3.5\n");
        assert_eq!(run("6 / 3"), "2.0\n");
        assert_eq!(run("7 // 2"), "3\n");
        assert_eq!(run("-7 // 2"), "-4\n");
        assert_eq!(run("-7 % 3"), "2\n");
        assert_eq!(run("2 ** 10"), "1024\n");
        assert_eq!(run("-2 ** 2"), "-4\n");
        assert_eq!(run("2 ** -1"), "0.5\n");
        assert_eq!(run("0.1 + 0.2"), "0.30000000000000004\n");
        assert_eq!(run("1_000 + 1"), "1001\n");
    }

    #[test]
    fn test_strings() {
        assert_eq!(run("'ab' + \"cd\""), "'abcd'\n");
        assert_eq!(run("'ab' * 3"), "'ababab'\n");
        assert_eq!(run("\"it's\""), "\"it's\"\n");
        assert_eq!(run("'a\\nb'"), "'a\\nb'\n");
        assert_eq!(run("print('a\\nb')"), "a\nb\n");
        assert_eq!(run("len('héllo')"), "5\n");
        assert_eq!(run("'hi'.upper()"), "'HI'\n");
    }

    #[test]
    fn test_print_and_comments() {
        assert_eq!(run("print(1, 'x', 2.5)"), "1 x 2.5\n");
        assert_eq!(run("print()"), "\n");
        assert_eq!(run("# only a comment"), "");
        assert_eq!(run("   "), "");
        assert_eq!(run("1 + 2 # three"), "3\n");
        assert_eq!(run("None"), "");
    }

    #[test]
    fn test_assignment_and_locals() {
        let mut interp = Interpreter::new();
        interp.set("NAME", Value::from("Ada"));
        assert_eq!(interp.execute("x = 40 + 2").unwrap(), "");
        assert_eq!(interp.execute("x").unwrap(), "42\n");
        assert_eq!(
            interp.execute("list(locals().keys())").unwrap(),
            "['NAME', 'x']\n"
        );
        interp.execute("NAME = 'Bob'").unwrap();
        assert_eq!(interp.names().collect::<Vec<_>>(), ["NAME", "x"]);
        assert_eq!(interp.get("NAME"), Some(&Value::from("Bob")));
    }

    #[test]
    fn test_namespace_attribute() {
        let mut interp = Interpreter::new();
        interp.set(
            "VISIT",
            Value::Namespace {
                name: "ProfileLinks".to_string(),
                attrs: vec![("BLOG".to_string(), Value::from("https://example.com"))],
            },
        );
        assert_eq!(interp.execute("VISIT.BLOG").unwrap(), "'https://example.com'\n");
        let err = interp.execute("VISIT.NOPE").unwrap_err();
        assert_eq!(err.kind, "AttributeError");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(run("1 == 1.0"), "True\n");
        assert_eq!(run("'a' < 'b'"), "True\n");
        assert_eq!(run("3 >= 4"), "False\n");
        assert_eq!(run_err("'a' < 1").kind, "TypeError");
    }

    #[test]
    fn test_errors() {
        assert_eq!(run_err("x").to_string(), "NameError: name 'x' is not defined");
        assert_eq!(run_err("1/0").to_string(), "ZeroDivisionError: division by zero");
        assert_eq!(run_err("1 % 0").kind, "ZeroDivisionError");
        assert_eq!(
            run_err("'a' + 1").to_string(),
            "TypeError: can only concatenate str (not \"int\") to str"
        );
        assert_eq!(run_err("1 + 'a'").kind, "TypeError");
        assert_eq!(run_err("len(5)").kind, "TypeError");
        assert_eq!(run_err("5()").kind, "TypeError");
        assert_eq!(run_err("1 +").kind, "SyntaxError");
        assert_eq!(run_err("print(1").message, "'(' was never closed");
        assert_eq!(run_err("'abc").message, "unterminated string literal");
        assert_eq!(run_err("1 2").kind, "SyntaxError");
        assert_eq!(run_err("a $ b").kind, "SyntaxError");
        assert_eq!(run_err("True = 1").kind, "SyntaxError");
        assert_eq!(run_err("2 ** 100").kind, "OverflowError");
    }

    #[test]
    fn test_builtins() {
        assert_eq!(run("int('42') + 1"), "43\n");
        assert_eq!(run("int(3.9)"), "3\n");
        assert_eq!(run("abs(-5)"), "5\n");
        assert_eq!(run("str(5) + 'x'"), "'5x'\n");
        assert_eq!(run("repr('a')"), "\"'a'\"\n");
        assert_eq!(run("list('ab')"), "['a', 'b']\n");
        assert_eq!(run("print"), "<built-in function print>\n");
        assert_eq!(run_err("int('x')").kind, "ValueError");
        assert_eq!(run_err("len(1, 2)").kind, "TypeError");
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let nested = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = run_err(&nested);
        assert_eq!(err.to_string(), "RecursionError: maximum recursion depth exceeded");

        assert_eq!(run_err(&"-".repeat(10_000)).kind, "RecursionError");
        assert_eq!(run_err(&["1"; 10_000].join("+")).kind, "RecursionError");
        assert_eq!(run_err(&format!("abs{}", "(1)".repeat(10_000))).kind, "RecursionError");

        // Moderate nesting still works
        let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(run(&ok), "1\n");
        assert_eq!(run(&["1"; 60].join("+")), "60\n");
    }

    #[test]
    fn test_huge_strings_are_rejected() {
        assert_eq!(run_err("'ab' * 4611686018427387904").kind, "OverflowError");
        assert_eq!(run_err("'ab' * 1000000000").kind, "MemoryError");
        assert_eq!(run("len('ab' * 1000)"), "2000\n");

        let mut interp = Interpreter::new();
        interp.execute("x = 'a' * 1000000").unwrap();
        assert_eq!(interp.execute("x + x").unwrap_err().kind, "MemoryError");
    }

    #[test]
    fn test_help() {
        let mut interp = Interpreter::new().with_help(help_listing("Variables:", ["NAME", "ABOUT"]));
        assert_eq!(interp.execute("help()").unwrap(), "Variables:\n  NAME\n  ABOUT\n");
    }
}
