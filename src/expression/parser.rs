//! Recursive-descent parser producing an [`Expr`] tree
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' args? ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! `^` is right-associative and binds tighter than a leading minus, so
//! `-2^2 == -4` and `2^3^2 == 512`.

use crate::common::ExpressionError;
use crate::expression::ast::{BinaryOp, Builtin, Expr, UnaryOp};
use crate::expression::lexer::{tokenize, Spanned, Token};

pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>, max_depth: usize) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
            max_depth,
        }
    }

    pub fn parse(mut self) -> Result<Expr, ExpressionError> {
        let expr = self.expr()?;
        match self.tokens.get(self.cursor) {
            None => Ok(expr),
            Some(extra) => Err(unexpected(extra)),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|s| &s.token)
    }

    fn next(&mut self) -> Result<Spanned, ExpressionError> {
        let spanned = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or(ExpressionError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(spanned)
    }

    fn expect(&mut self, wanted: Token) -> Result<(), ExpressionError> {
        let spanned = self.next()?;
        if spanned.token == wanted {
            Ok(())
        } else {
            Err(unexpected(&spanned))
        }
    }

    /// Enter one nesting level: a parenthesis, a call, a sign or an exponent.
    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ExpressionError::TooDeep(self.max_depth));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.cursor += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.power(),
        };
        self.cursor += 1;
        self.descend()?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary { op, operand: Box::new(operand) })
    }

    fn power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.cursor += 1;
            self.descend()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Number(value) => Ok(Expr::Literal(value)),
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.cursor += 1;
                    self.call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            _ => Err(unexpected(&spanned)),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, ExpressionError> {
        let func = Builtin::lookup(&name).ok_or(ExpressionError::UnknownFunction(name))?;
        self.descend()?;

        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.cursor += 1;
        } else {
            loop {
                args.push(self.expr()?);
                let spanned = self.next()?;
                match spanned.token {
                    Token::Comma => continue,
                    Token::RParen => break,
                    _ => return Err(unexpected(&spanned)),
                }
            }
        }
        self.depth -= 1;

        if !func.arity().accepts(args.len()) {
            return Err(ExpressionError::Arity {
                name: func.name().to_string(),
                expected: func.arity().describe(),
                got: args.len(),
            });
        }
        Ok(Expr::Call { func, args })
    }
}

fn unexpected(spanned: &Spanned) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        found: spanned.token.to_string(),
        pos: spanned.pos,
    }
}

/// Tokenize and parse `source`.
pub fn parse(source: &str, max_depth: usize) -> Result<Expr, ExpressionError> {
    Parser::new(tokenize(source)?, max_depth).parse()
}
