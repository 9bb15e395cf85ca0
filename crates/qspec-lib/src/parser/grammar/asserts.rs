//! Assertion blocks and their expressions.
//!
//! Expressions use precedence climbing. Binding power, loosest first:
//!
//! | operators                       | associativity |
//! |---------------------------------|---------------|
//! | `\|\|`                          | left          |
//! | `&&`                            | left          |
//! | `== != < <= > >= =~`            | left          |
//! | `+ -`                           | left          |
//! | `* / %`                         | left          |
//! | unary `-` `!`                   | prefix        |
//! | `.field` `[index]` `(args)`     | postfix       |

use super::values::keyword_literal;
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::{
    Assert, AssertExpr, AssertQuery, AssertTarget, BinaryOp, Expr, ExprKind, UnaryOp, Value,
    ValueKind,
};
use crate::parser::core::{PResult, Parser};
use crate::parser::literals;
use crate::parser::token::{EXPR_FIRST, KEYWORD_SET, TokenKind};

impl Parser {
    /// `assert [query] { (expr ';'?)* }`
    pub(super) fn assert(&mut self) -> PResult<Assert> {
        self.assert_current(TokenKind::KwAssert);
        let start = self.pos;
        self.bump();

        let query = match self.current() {
            TokenKind::RawString => {
                let at = self.pos;
                let body = self.bump();
                Some(AssertQuery {
                    meta: self.meta(at),
                    target: AssertTarget::Inline(
                        literals::raw_string_value(&body.text).to_string(),
                    ),
                })
            }
            TokenKind::Ident => {
                let at = self.pos;
                let call = self.call(false)?;
                Some(AssertQuery {
                    meta: self.meta(at),
                    target: AssertTarget::Call(call),
                })
            }
            _ => None,
        };

        let open = self.expect(
            TokenKind::BraceOpen,
            DiagnosticKind::UnexpectedToken,
            "`{` to open the assertion block",
        )?;

        let mut exprs = Vec::new();
        let mut skipped = Vec::new();
        loop {
            let from = self.pos;
            match self.current() {
                TokenKind::BraceClose => {
                    self.bump();
                    break;
                }
                k if k == TokenKind::Eof || KEYWORD_SET.contains(k) => {
                    self.unclosed(&open, "`assert` block")?;
                    skipped.insert(0, open.clone());
                    break;
                }
                TokenKind::Semicolon => {
                    self.bump();
                }
                k if EXPR_FIRST.contains(k) => {
                    let result = self.expr();
                    if let Some(expr) = self.or_recover(from, result, &mut skipped)? {
                        exprs.push(AssertExpr {
                            meta: self.meta(from),
                            expr,
                        });
                        self.eat(TokenKind::Semicolon);
                    }
                }
                _ => {
                    let err = self.unexpected(
                        DiagnosticKind::ExpectedExpression,
                        "an expression or `}`",
                    );
                    self.report(err)?;
                    skipped.extend(self.recover_in_block(from));
                }
            }
        }

        let mut meta = self.meta(start);
        meta.record_skipped(skipped);
        Ok(Assert { meta, query, exprs })
    }

    pub(super) fn expr(&mut self) -> PResult<Expr> {
        self.expr_bp(0)
    }

    fn expr_bp(&mut self, min_bp: u8) -> PResult<Expr> {
        self.nested(|p| {
            let start = p.pos;
            let mut lhs = p.unary()?;
            while let Some((op, left_bp, right_bp)) = infix_binding(p.current()) {
                if left_bp < min_bp {
                    break;
                }
                p.bump();
                let rhs = p.expr_bp(right_bp)?;
                lhs = Expr {
                    span: p.span_from(start),
                    kind: ExprKind::Binary {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                };
            }
            Ok(lhs)
        })
    }

    fn unary(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let op = match self.current() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => {
                let primary = self.primary()?;
                return self.postfix(start, primary);
            }
        };
        self.bump();
        let operand = self.nested(Self::unary)?;
        Ok(Expr {
            span: self.span_from(start),
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        })
    }

    fn primary(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let kind = match self.current() {
            TokenKind::Str => {
                let token = self.bump();
                let value = ValueKind::String(literals::string_value(&token.text));
                ExprKind::Literal(self.literal(start, value))
            }
            TokenKind::Number => {
                let number = self.number(start, None)?;
                ExprKind::Literal(self.literal(start, ValueKind::Number(number)))
            }
            TokenKind::Ident => {
                let token = self.bump();
                match keyword_literal(&token.text) {
                    Some(value) => ExprKind::Literal(self.literal(start, value)),
                    None => ExprKind::Name(token.text),
                }
            }
            TokenKind::ParenOpen => {
                self.bump();
                let inner = self.expr()?;
                self.expect(
                    TokenKind::ParenClose,
                    DiagnosticKind::UnexpectedToken,
                    "`)` to close the group",
                )?;
                return Ok(Expr {
                    span: self.span_from(start),
                    kind: inner.kind,
                });
            }
            TokenKind::BracketOpen => {
                self.bump();
                ExprKind::List(self.expr_list(TokenKind::BracketClose, "`,` or `]`")?)
            }
            _ => {
                return Err(self
                    .unexpected(DiagnosticKind::ExpectedExpression, "an expression")
                    .into());
            }
        };
        Ok(Expr {
            span: self.span_from(start),
            kind,
        })
    }

    /// Member access, indexing and calls. Indexing and calls only bind when
    /// the bracket sits on the same line, so a new line always starts a new
    /// expression.
    fn postfix(&mut self, start: usize, mut expr: Expr) -> PResult<Expr> {
        loop {
            let kind = match self.current() {
                TokenKind::Dot => {
                    self.bump();
                    let field = self.expect(
                        TokenKind::Ident,
                        DiagnosticKind::ExpectedName,
                        "a field name after `.`",
                    )?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        field: field.text,
                    }
                }
                TokenKind::BracketOpen if self.on_previous_line() => {
                    self.bump();
                    let index = self.expr()?;
                    self.expect(
                        TokenKind::BracketClose,
                        DiagnosticKind::UnexpectedToken,
                        "`]` to close the index",
                    )?;
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::ParenOpen if self.on_previous_line() => {
                    self.bump();
                    let args = self.expr_list(TokenKind::ParenClose, "`,` or `)`")?;
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                _ => return Ok(expr),
            };
            expr = Expr {
                span: self.span_from(start),
                kind,
            };
        }
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    fn expr_list(&mut self, close: TokenKind, expected: &str) -> PResult<Vec<Expr>> {
        let mut items = Vec::new();
        while self.eat(close).is_none() {
            items.push(self.expr()?);
            if self.eat(TokenKind::Comma).is_none() && !self.at(close) {
                return Err(self
                    .unexpected(DiagnosticKind::UnexpectedToken, expected)
                    .into());
            }
        }
        Ok(items)
    }

    fn literal(&self, start: usize, kind: ValueKind) -> Value {
        Value {
            span: self.span_from(start),
            kind,
        }
    }
}

fn infix_binding(kind: TokenKind) -> Option<(BinaryOp, u8, u8)> {
    let (op, bp) = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 3),
        TokenKind::EqEq => (BinaryOp::Eq, 5),
        TokenKind::NotEq => (BinaryOp::NotEq, 5),
        TokenKind::Lt => (BinaryOp::Lt, 5),
        TokenKind::LtEq => (BinaryOp::LtEq, 5),
        TokenKind::Gt => (BinaryOp::Gt, 5),
        TokenKind::GtEq => (BinaryOp::GtEq, 5),
        TokenKind::Tilde => (BinaryOp::Match, 5),
        TokenKind::Plus => (BinaryOp::Add, 7),
        TokenKind::Minus => (BinaryOp::Sub, 7),
        TokenKind::Star => (BinaryOp::Mul, 9),
        TokenKind::Slash => (BinaryOp::Div, 9),
        TokenKind::Percent => (BinaryOp::Rem, 9),
        _ => return None,
    };
    Some((op, bp, bp + 1))
}
