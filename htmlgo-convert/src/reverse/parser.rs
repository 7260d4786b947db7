use crate::error::ReverseError;
use crate::literal::unquote;

/// Builder-code expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Number(String),
    Ident(String),
    Call(Call),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub package: Option<String>,
    pub name: String,
    pub args: Vec<Expr>,
    pub chain: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn describe(&self) -> String {
        match self {
            Expr::Str(s) => format!("string {:?}", s),
            Expr::Number(n) => format!("number {}", n),
            Expr::Ident(i) => format!("identifier {}", i),
            Expr::Call(c) => format!("call {}", c.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(String),
    Punct(char),
    Define,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(i) => format!("'{}'", i),
            Token::Str(_) => "string literal".to_string(),
            Token::Number(n) => format!("number {}", n),
            Token::Punct(c) => format!("'{}'", c),
            Token::Define => "':='".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

// ─── Lexer ───────────────────────────────────────────────────────────────────

fn lex(src: &str) -> Result<Vec<(Token, usize)>, ReverseError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
        } else if src[i..].starts_with("//") {
            i = src[i..].find('\n').map_or(bytes.len(), |n| i + n);
        } else if src[i..].starts_with("/*") {
            i = src[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
        } else if c == b'"' {
            let start = i;
            i += 1;
            let mut escaped = false;
            loop {
                match bytes.get(i) {
                    None | Some(b'\n') => {
                        return Err(ReverseError::UnterminatedString { position: start })
                    }
                    Some(b'\\') if !escaped => escaped = true,
                    Some(b'"') if !escaped => break,
                    Some(_) => escaped = false,
                }
                i += 1;
            }
            let value = unquote(&src[start + 1..i])
                .ok_or(ReverseError::UnterminatedString { position: start })?;
            tokens.push((Token::Str(value), start));
            i += 1;
        } else if c == b'`' {
            let start = i;
            let end = src[i + 1..]
                .find('`')
                .ok_or(ReverseError::UnterminatedString { position: start })?;
            tokens.push((Token::Str(src[i + 1..i + 1 + end].to_string()), start));
            i += end + 2;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'.') {
                i += 1;
            }
            tokens.push((Token::Number(src[start..i].to_string()), start));
        } else if c == b':' && bytes.get(i + 1) == Some(&b'=') {
            tokens.push((Token::Define, i));
            i += 2;
        } else if c.is_ascii_alphabetic() || c == b'_' || !c.is_ascii() {
            let start = i;
            let rest = &src[i..];
            let len = rest
                .char_indices()
                .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
                .map_or(rest.len(), |(n, _)| n);
            if len == 0 {
                // a non-ASCII character that cannot start an identifier
                let ch = rest.chars().next().unwrap_or('?');
                tokens.push((Token::Punct(ch), start));
                i += ch.len_utf8();
                continue;
            }
            tokens.push((Token::Ident(rest[..len].to_string()), start));
            i += len;
        } else {
            tokens.push((Token::Punct(c as char), i));
            i += 1;
        }
    }
    tokens.push((Token::Eof, src.len()));
    Ok(tokens)
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse a builder-code snippet down to its single node expression.
pub fn parse_program(src: &str) -> Result<Expr, ReverseError> {
    let tokens = lex(src)?;
    let mut parser = Parser { tokens, index: 0 };
    parser.program()
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.index + offset)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.index).map_or(0, |(_, p)| *p)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    fn is_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), Token::Ident(i) if i == word)
    }

    fn unexpected(&self, expected: &str) -> ReverseError {
        ReverseError::UnexpectedToken {
            position: self.position(),
            expected: expected.to_string(),
            found: self.peek().describe(),
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), ReverseError> {
        if *self.peek() == Token::Punct(c) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ReverseError> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn program(&mut self) -> Result<Expr, ReverseError> {
        if self.is_keyword("package") {
            self.bump();
            self.expect_ident()?;
        }
        while self.is_keyword("import") {
            self.bump();
            self.import_spec()?;
        }

        if self.is_keyword("var") {
            self.bump();
            self.expect_ident()?;
            self.expect_punct('=')?;
        } else if matches!(self.peek(), Token::Ident(_))
            && matches!(self.peek_at(1), Token::Define | Token::Punct('='))
        {
            self.bump();
            self.bump();
        }

        if self.is_keyword("if") {
            return Err(ReverseError::IfExpression);
        }
        if *self.peek() == Token::Eof {
            return Err(ReverseError::MissingExpression);
        }

        let expr = self.expr()?;
        while *self.peek() == Token::Punct(';') {
            self.bump();
        }
        if *self.peek() != Token::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    fn import_spec(&mut self) -> Result<(), ReverseError> {
        if *self.peek() == Token::Punct('(') {
            self.bump();
            loop {
                match self.bump() {
                    Token::Punct(')') => return Ok(()),
                    Token::Str(_) | Token::Ident(_) | Token::Punct('.') | Token::Punct(';') => {}
                    _ => return Err(self.unexpected("import path")),
                }
            }
        }
        if matches!(self.peek(), Token::Ident(_) | Token::Punct('.')) {
            self.bump();
        }
        match self.bump() {
            Token::Str(_) => Ok(()),
            _ => Err(self.unexpected("import path")),
        }
    }

    fn expr(&mut self) -> Result<Expr, ReverseError> {
        let primary = self.primary()?;
        let Expr::Call(mut call) = primary else {
            if *self.peek() == Token::Punct('.') {
                return Err(self.unexpected("',' or ')'"));
            }
            return Ok(primary);
        };
        while *self.peek() == Token::Punct('.') {
            self.bump();
            let name = self.expect_ident()?;
            let args = self.arguments()?;
            call.chain.push(Method { name, args });
        }
        Ok(Expr::Call(call))
    }

    fn primary(&mut self) -> Result<Expr, ReverseError> {
        match self.peek().clone() {
            Token::Str(s) => {
                self.bump();
                Ok(Expr::Str(s))
            }
            Token::Number(n) => {
                self.bump();
                Ok(Expr::Number(n))
            }
            Token::Ident(word) if word == "if" => Err(ReverseError::IfExpression),
            Token::Ident(first) => {
                self.bump();
                let is_qualified = *self.peek() == Token::Punct('.')
                    && matches!(self.peek_at(1), Token::Ident(_))
                    && *self.peek_at(2) == Token::Punct('(');
                if is_qualified {
                    self.bump();
                    let name = self.expect_ident()?;
                    let args = self.arguments()?;
                    return Ok(Expr::Call(Call {
                        package: Some(first),
                        name,
                        args,
                        chain: Vec::new(),
                    }));
                }
                if *self.peek() == Token::Punct('(') {
                    let args = self.arguments()?;
                    return Ok(Expr::Call(Call {
                        package: None,
                        name: first,
                        args,
                        chain: Vec::new(),
                    }));
                }
                Ok(Expr::Ident(first))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ReverseError> {
        self.expect_punct('(')?;
        let mut args = Vec::new();
        while *self.peek() != Token::Punct(')') {
            args.push(self.expr()?);
            if *self.peek() == Token::Punct(',') {
                self.bump();
            } else if *self.peek() != Token::Punct(')') {
                return Err(self.unexpected("',' or ')'"));
            }
        }
        self.bump();
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(expr: Expr) -> Call {
        match expr {
            Expr::Call(c) => c,
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn parses_qualified_call_with_chain() {
        let c = call(parse_program(r#"htmlgo.Div(htmlgo.Text("Hello")).Class("container")"#).unwrap());
        assert_eq!(c.package.as_deref(), Some("htmlgo"));
        assert_eq!(c.name, "Div");
        assert_eq!(c.args.len(), 1);
        assert_eq!(c.chain.len(), 1);
        assert_eq!(c.chain[0].name, "Class");
        assert_eq!(c.chain[0].args, vec![Expr::Str("container".to_string())]);
    }

    #[test]
    fn skips_package_import_and_var() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\th \"github.com/theplant/htmlgo\"\n)\n\nvar n = h.P(h.Text(\"x\"));";
        let c = call(parse_program(src).unwrap());
        assert_eq!(c.name, "P");
    }

    #[test]
    fn accepts_short_declaration_and_trailing_commas() {
        let c = call(parse_program("n := Ul(\n  Li(),\n  Li(),\n)").unwrap());
        assert_eq!(c.package, None);
        assert_eq!(c.args.len(), 2);
    }

    #[test]
    fn raw_strings_and_comments() {
        let c = call(parse_program("// header\nText(`a \"b\"`) /* done */").unwrap());
        assert_eq!(c.args, vec![Expr::Str("a \"b\"".to_string())]);
    }

    #[test]
    fn if_expression_is_reported() {
        assert_eq!(
            parse_program("var n = if true { Div() }"),
            Err(ReverseError::IfExpression)
        );
    }

    #[test]
    fn unterminated_string_reports_offset() {
        assert_eq!(
            parse_program(r#"Div(Text("open))"#),
            Err(ReverseError::UnterminatedString { position: 9 })
        );
    }

    #[test]
    fn missing_paren_is_unexpected_token() {
        let err = parse_program(r#"Div(Text("a")"#).unwrap_err();
        assert!(matches!(err, ReverseError::UnexpectedToken { .. }), "{:?}", err);
    }

    #[test]
    fn empty_statement_has_no_expression() {
        assert_eq!(parse_program("var n = "), Err(ReverseError::MissingExpression));
    }
}
