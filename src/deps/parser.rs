// Tue Jan 15 2026 - Alex

//! Evaluator for the Python-literal subset used by gclient `DEPS` files.

use crate::deps::DepsError;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    None,
    List(Vec<Value>),
    Dict(IndexMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::None => "None",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }
}

/// Evaluates `name = expression` assignments in order and returns the bindings.
///
/// `Var("x")` reads `vars["x"]` from the bindings made so far.
pub fn evaluate(source: &str) -> Result<IndexMap<String, Value>, DepsError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(&tokens);
    parser.parse_program()?;
    Ok(parser.bindings)
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Int(i64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    Equals,
    Plus,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

fn syntax(line: usize, column: usize, message: impl Into<String>) -> DepsError {
    DepsError::Syntax {
        line,
        column,
        message: message.into(),
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, DepsError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    while i < chars.len() {
        let c = chars[i];
        let (start_line, start_col) = (line, column);

        let single = match c {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Equals),
            '+' => Some(TokenKind::Plus),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, line, column });
            i += 1;
            column += 1;
            continue;
        }

        match c {
            '\n' => {
                i += 1;
                line += 1;
                column = 1;
            }
            ' ' | '\t' | '\r' | '\\' => {
                i += 1;
                column += 1;
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '"' | '\'' => {
                let quote = c;
                let triple = i + 2 < chars.len() && chars[i + 1] == quote && chars[i + 2] == quote;
                let width = if triple { 3 } else { 1 };
                i += width;
                column += width;

                let mut s = String::new();
                loop {
                    let Some(&ch) = chars.get(i) else {
                        return Err(syntax(start_line, start_col, "unterminated string"));
                    };
                    if ch == quote {
                        if !triple {
                            i += 1;
                            column += 1;
                            break;
                        }
                        if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                            i += 3;
                            column += 3;
                            break;
                        }
                    }
                    if ch == '\n' {
                        if !triple {
                            return Err(syntax(start_line, start_col, "unterminated string"));
                        }
                        line += 1;
                        column = 1;
                        s.push(ch);
                        i += 1;
                        continue;
                    }
                    if ch == '\\' {
                        let Some(&esc) = chars.get(i + 1) else {
                            return Err(syntax(start_line, start_col, "unterminated string"));
                        };
                        match esc {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            '\\' => s.push('\\'),
                            '\'' => s.push('\''),
                            '"' => s.push('"'),
                            '\n' => {
                                line += 1;
                                column = 0;
                            }
                            other => {
                                s.push('\\');
                                s.push(other);
                            }
                        }
                        i += 2;
                        column += 2;
                        continue;
                    }
                    s.push(ch);
                    i += 1;
                    column += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Str(s),
                    line: start_line,
                    column: start_col,
                });
            }
            '0'..='9' | '-' => {
                let mut text = String::new();
                text.push(c);
                i += 1;
                column += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
                    if chars[i] != '_' {
                        text.push(chars[i]);
                    }
                    i += 1;
                    column += 1;
                }
                let value = text
                    .parse::<i64>()
                    .map_err(|_| syntax(start_line, start_col, format!("invalid number {:?}", text)))?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    line: start_line,
                    column: start_col,
                });
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    ident.push(chars[i]);
                    i += 1;
                    column += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(ident),
                    line: start_line,
                    column: start_col,
                });
            }
            other => {
                return Err(syntax(line, column, format!("unexpected character {:?}", other)));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        column,
    });
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    bindings: IndexMap<String, Value>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            bindings: IndexMap::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current.min(self.tokens.len() - 1)];
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), DepsError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek();
            Err(syntax(token.line, token.column, format!("expected {}", what)))
        }
    }

    fn parse_program(&mut self) -> Result<(), DepsError> {
        while !self.check(&TokenKind::Eof) {
            let token = self.advance().clone();
            let TokenKind::Ident(name) = token.kind else {
                return Err(syntax(token.line, token.column, "expected assignment"));
            };
            self.expect(TokenKind::Equals, "'='")?;
            let value = self.parse_expression()?;
            self.bindings.insert(name, value);
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Value, DepsError> {
        let mut left = self.parse_postfix()?;
        while self.check(&TokenKind::Plus) {
            self.advance();
            let right = self.parse_postfix()?;
            left = add(left, right)?;
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Value, DepsError> {
        let mut value = self.parse_primary()?;
        while self.check(&TokenKind::LBracket) {
            let token = self.advance().clone();
            let key = self.parse_expression()?;
            self.expect(TokenKind::RBracket, "']'")?;
            value = subscript(&value, &key)
                .ok_or_else(|| syntax(token.line, token.column, "invalid subscript"))?
                .clone();
        }
        Ok(value)
    }

    fn parse_primary(&mut self) -> Result<Value, DepsError> {
        let token = self.advance().clone();
        match token.kind {
            TokenKind::Str(first) => {
                let mut s = first;
                while let TokenKind::Str(next) = &self.peek().kind {
                    s.push_str(next);
                    self.advance();
                }
                Ok(Value::Str(s))
            }
            TokenKind::Int(n) => Ok(Value::Int(n)),
            TokenKind::LBrace => self.parse_dict(),
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LParen => {
                let value = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(value)
            }
            TokenKind::Ident(name) => match name.as_str() {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                "None" => Ok(Value::None),
                "Var" | "Str" if self.check(&TokenKind::LParen) => {
                    self.advance();
                    let arg = self.parse_expression()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    if name == "Str" {
                        return Ok(arg);
                    }
                    self.lookup_var(&arg)
                }
                _ => self
                    .bindings
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| DepsError::UndefinedVar(name.clone())),
            },
            TokenKind::Eof => Err(syntax(token.line, token.column, "unexpected end of file")),
            _ => Err(syntax(token.line, token.column, "expected expression")),
        }
    }

    fn lookup_var(&self, name: &Value) -> Result<Value, DepsError> {
        let key = name
            .as_str()
            .ok_or_else(|| DepsError::Type(format!("Var() takes a str, got {}", name.type_name())))?;
        self.bindings
            .get("vars")
            .and_then(Value::as_dict)
            .and_then(|vars| vars.get(key))
            .cloned()
            .ok_or_else(|| DepsError::UndefinedVar(key.to_string()))
    }

    fn parse_dict(&mut self) -> Result<Value, DepsError> {
        let mut dict = IndexMap::new();
        while !self.check(&TokenKind::RBrace) {
            let token = self.peek().clone();
            let key = match self.parse_expression()? {
                Value::Str(s) => s,
                other => {
                    return Err(syntax(
                        token.line,
                        token.column,
                        format!("dict keys must be str, got {}", other.type_name()),
                    ))
                }
            };
            self.expect(TokenKind::Colon, "':'")?;
            let value = self.parse_expression()?;
            dict.insert(key, value);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Value::Dict(dict))
    }

    fn parse_list(&mut self) -> Result<Value, DepsError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expression()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(Value::List(items))
    }
}

fn add(left: Value, right: Value) -> Result<Value, DepsError> {
    match (left, right) {
        (Value::Str(mut a), Value::Str(b)) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
        (a, b) => Err(DepsError::Type(format!(
            "cannot add {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn subscript<'v>(value: &'v Value, key: &Value) -> Option<&'v Value> {
    match (value, key) {
        (Value::Dict(d), Value::Str(k)) => d.get(k),
        (Value::List(items), Value::Int(idx)) => usize::try_from(*idx).ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_vars_and_deps() {
        let source = r#"
# Comment line
use_relative_paths = True

vars = {
  "checkout_chromium": False,
  'skia_git': 'https://skia.googlesource.com',
}

deps = {
  "buildtools"                 : "https://chromium.googlesource.com/chromium/src/buildtools.git@b138e6ce86ae843c42a1a08f37903207bebcca75",
  "third_party/externals/zlib" : Var("skia_git") + "/third_party/zlib" + "@" + "646b7f569718921d7d4b5b8e22572ff6c76f2596",  # trailing
}
"#;
        let bindings = evaluate(source).unwrap();

        assert_eq!(bindings.get("use_relative_paths"), Some(&Value::Bool(true)));
        let deps = bindings.get("deps").and_then(Value::as_dict).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(
            deps.get("third_party/externals/zlib").and_then(Value::as_str),
            Some("https://skia.googlesource.com/third_party/zlib@646b7f569718921d7d4b5b8e22572ff6c76f2596")
        );
        assert_eq!(deps.get_index(0).map(|(k, _)| k.as_str()), Some("buildtools"));
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        let bindings = evaluate("x = ('abc'\n     'def')").unwrap();
        assert_eq!(bindings.get("x"), Some(&Value::Str("abcdef".to_string())));
    }

    #[test]
    fn test_lists_none_ints_and_subscripts() {
        let bindings = evaluate(
            "hooks = [{'name': 'gn', 'action': ['python3', 'bin/fetch-gn']}, None]\n\
             n = -3\n\
             first = hooks[0]['name']",
        )
        .unwrap();

        assert_eq!(bindings.get("n"), Some(&Value::Int(-3)));
        assert_eq!(bindings.get("first"), Some(&Value::Str("gn".to_string())));
        match bindings.get("hooks") {
            Some(Value::List(items)) => assert_eq!(items[1], Value::None),
            other => panic!("unexpected hooks value: {:?}", other),
        }
    }

    #[test]
    fn test_escapes_and_triple_quotes() {
        let bindings = evaluate("a = 'it\\'s'\nb = \"\"\"multi\nline\"\"\"").unwrap();
        assert_eq!(bindings.get("a").and_then(Value::as_str), Some("it's"));
        assert_eq!(bindings.get("b").and_then(Value::as_str), Some("multi\nline"));
    }

    #[test]
    fn test_undefined_var() {
        let err = evaluate("vars = {}\ndeps = {'a': Var('missing')}").unwrap_err();
        assert!(matches!(err, DepsError::UndefinedVar(name) if name == "missing"));
    }

    #[test]
    fn test_type_error_on_bad_concatenation() {
        let err = evaluate("x = 'a' + 1").unwrap_err();
        assert!(matches!(err, DepsError::Type(_)));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = evaluate("deps = {\n  'a': 'b'\n  'c': 'd'\n}").unwrap_err();
        match err {
            DepsError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(evaluate("x = 'abc"), Err(DepsError::Syntax { line: 1, .. })));
    }
}
