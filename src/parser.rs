//! Recursive-descent statement parser with Pratt (operator-precedence)
//! expression parsing.
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::Node;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equality,
    Comparison,
    Sum,
    Product,
    Unary,
    Call,
    Index,
}

static PRECEDENCES: Lazy<HashMap<TokenKind, Precedence>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = HashMap::new();
    m.insert(Eq, Precedence::Equality);
    m.insert(NotEq, Precedence::Equality);
    m.insert(Lt, Precedence::Comparison);
    m.insert(Gt, Precedence::Comparison);
    m.insert(Plus, Precedence::Sum);
    m.insert(Minus, Precedence::Sum);
    m.insert(Asterisk, Precedence::Product);
    m.insert(Slash, Precedence::Product);
    m.insert(LParen, Precedence::Call);
    m.insert(LBracket, Precedence::Index);
    m
});

fn precedence_of(kind: TokenKind) -> Precedence {
    PRECEDENCES.get(&kind).copied().unwrap_or(Precedence::Lowest)
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    pub errors: Vec<String>,
}

type ParseResult = Result<Node, ()>;

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.cur_token, &mut self.peek_token);
        self.peek_token = self.lexer.next_token();
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance past `kind` if it is the peek token, else record a parser
    /// error and leave position unchanged.
    fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ()> {
        if self.peek_is(kind) {
            self.advance();
            Ok(())
        } else {
            self.errors.push(format!(
                "expected {}, got {}",
                kind.describe(),
                self.peek_token.kind.describe()
            ));
            Err(())
        }
    }

    /// Parse a whole program: a `Block` that ends at `Eof`.
    pub fn parse_program(mut self) -> Result<Node, Vec<String>> {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();

        while !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => {}
            }
            self.advance();
        }

        if self.errors.is_empty() {
            Ok(Node::Block { statements, token })
        } else {
            Err(self.errors)
        }
    }

    fn parse_statement(&mut self) -> ParseResult {
        match self.cur_token.kind {
            TokenKind::So => self.parse_declaration(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_declaration(&mut self) -> ParseResult {
        let token = self.cur_token.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Node::Identifier {
            name: self.cur_token.literal.clone(),
            token: self.cur_token.clone(),
        };

        self.expect_peek(TokenKind::Assign)?;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Node::Declaration {
            name: Box::new(name),
            value: Box::new(value),
            token,
        })
    }

    fn parse_return(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Node::Return {
            value: Box::new(value),
            token,
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult {
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(expr)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < precedence_of(self.peek_token.kind) {
            left = match self.peek_token.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Asterisk
                | TokenKind::Slash
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt => {
                    self.advance();
                    self.parse_infix(left)?
                }
                TokenKind::LParen => {
                    self.advance();
                    self.parse_call(left)?
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.parse_index(left)?
                }
                _ => return Ok(left),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult {
        match self.cur_token.kind {
            TokenKind::Ident => Ok(Node::Identifier {
                name: self.cur_token.literal.clone(),
                token: self.cur_token.clone(),
            }),
            TokenKind::Int => self.parse_integer(),
            TokenKind::Str => Ok(Node::StringLiteral {
                value: self.cur_token.literal.clone(),
                token: self.cur_token.clone(),
            }),
            TokenKind::True | TokenKind::False => Ok(Node::BooleanLiteral {
                value: self.cur_is(TokenKind::True),
                token: self.cur_token.clone(),
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_unary(),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::If => self.parse_if(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            _ => {
                self.errors.push(format!(
                    "no unary parse function for {} found",
                    self.cur_token.kind.describe()
                ));
                Err(())
            }
        }
    }

    fn parse_integer(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        match token.literal.parse::<i32>() {
            Ok(value) => Ok(Node::IntegerLiteral { value, token }),
            Err(_) => {
                self.errors.push(format!("could not parse '{}' as integer", token.literal));
                Err(())
            }
        }
    }

    fn parse_unary(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        let op = self.cur_token.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Unary)?;
        Ok(Node::Unary {
            op,
            right: Box::new(right),
            token,
        })
    }

    fn parse_infix(&mut self, left: Node) -> ParseResult {
        let token = self.cur_token.clone();
        let op = self.cur_token.clone();
        let precedence = precedence_of(self.cur_token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Ok(Node::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            token,
        })
    }

    fn parse_grouped(&mut self) -> ParseResult {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if(&mut self) -> ParseResult {
        let token = self.cur_token.clone();

        self.expect_peek(TokenKind::LParen)?;
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::LBrace)?;
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };

        Ok(Node::If {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative,
            token,
        })
    }

    fn parse_block(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();

        self.advance();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => {}
            }
            self.advance();
        }

        Ok(Node::Block { statements, token })
    }

    fn parse_function_literal(&mut self) -> ParseResult {
        let token = self.cur_token.clone();

        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_function_params()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Node::FunctionLiteral {
            params,
            body: Box::new(body),
            token,
        })
    }

    fn parse_function_params(&mut self) -> Result<Vec<String>, ()> {
        let mut params = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Ok(params);
        }

        self.advance();
        params.push(self.cur_token.literal.clone());

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            params.push(self.cur_token.literal.clone());
        }

        self.expect_peek(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_call(&mut self, callee: Node) -> ParseResult {
        let token = self.cur_token.clone();
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Ok(Node::Call {
            callee: Box::new(callee),
            args,
            token,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Node>, ()> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Ok(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }

    fn parse_index(&mut self, left: Node) -> ParseResult {
        let token = self.cur_token.clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;

        Ok(Node::Index {
            left: Box::new(left),
            index: Box::new(index),
            token,
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Ok(Node::ArrayLiteral { elements, token })
    }

    fn parse_hash_literal(&mut self) -> ParseResult {
        let token = self.cur_token.clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }

        self.expect_peek(TokenKind::RBrace)?;
        Ok(Node::HashLiteral { pairs, token })
    }
}

/// Convenience entry point: lex and parse a whole program.
pub fn parse(source: &str, file: Option<std::rc::Rc<str>>) -> Result<Node, Vec<String>> {
    let lexer = Lexer::new(source, file);
    Parser::new(lexer).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Node {
        parse(src, None).unwrap_or_else(|errs| panic!("parse errors: {errs:?}"))
    }

    #[test]
    fn precedence_unary_times() {
        assert_eq!(parse_ok("-a * b").to_string(), "((-a) * b)");
    }

    #[test]
    fn precedence_mixed_arithmetic() {
        assert_eq!(
            parse_ok("a + b * c + d / e - f").to_string(),
            "(((a + (b * c)) + (d / e)) - f)"
        );
    }

    #[test]
    fn precedence_equality_of_arithmetic() {
        assert_eq!(
            parse_ok("3 + 4 * 5 == 3 * 1 + 4 * 5").to_string(),
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"
        );
    }

    #[test]
    fn precedence_index_binds_tighter_than_product() {
        assert_eq!(
            parse_ok("a * [1, 2, 3, 4][b * c] * d").to_string(),
            "((a * ([1, 2, 3, 4][(b * c)])) * d)"
        );
    }

    #[test]
    fn precedence_call_arguments() {
        assert_eq!(
            parse_ok("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))").to_string(),
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"
        );
    }

    #[test]
    fn trailing_semicolons_are_optional() {
        assert_eq!(parse_ok("so x = 1").to_string(), parse_ok("so x = 1;").to_string());
    }

    #[test]
    fn reports_expected_token_errors() {
        let errs = parse("so x 1;", None).unwrap_err();
        assert!(errs[0].contains("expected"));
    }

    #[test]
    fn reports_no_unary_parse_function() {
        let errs = parse(")", None).unwrap_err();
        assert!(errs[0].contains("no unary parse function"));
    }

    #[test]
    fn empty_array_and_hash_literals() {
        assert_eq!(parse_ok("[]").to_string(), "[]");
        assert_eq!(parse_ok("{}").to_string(), "{}");
    }
}
