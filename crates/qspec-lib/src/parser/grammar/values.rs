use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::{MapEntry, Number, Statement, Value, ValueKind};
use crate::parser::core::{PResult, ParseError, Parser};
use crate::parser::literals::{self, NumberError, NumberValue};
use crate::parser::token::{Token, TokenKind};

impl Parser {
    /// `key.path: value`
    pub(super) fn statement(&mut self) -> PResult<Statement> {
        let start = self.pos;
        let mut key = self.bump().text;
        while self.eat(TokenKind::Dot).is_some() {
            let segment = self.expect(
                TokenKind::Ident,
                DiagnosticKind::ExpectedName,
                "a field name after `.`",
            )?;
            key.push('.');
            key.push_str(&segment.text);
        }
        self.expect(
            TokenKind::Colon,
            DiagnosticKind::ExpectedColon,
            &format!("`:` after `{key}`"),
        )?;
        let value = self.value()?;
        Ok(Statement {
            meta: self.meta(start),
            key,
            value,
        })
    }

    /// `null`, a boolean, a number, a string, a map or a list.
    pub(super) fn value(&mut self) -> PResult<Value> {
        self.nested(Self::value_inner)
    }

    fn value_inner(&mut self) -> PResult<Value> {
        let start = self.pos;
        let kind = match self.current() {
            TokenKind::Str => {
                let token = self.bump();
                ValueKind::String(literals::string_value(&token.text))
            }
            TokenKind::Number => ValueKind::Number(self.number(start, None)?),
            TokenKind::Minus | TokenKind::Plus if self.nth(1) == TokenKind::Number => {
                let sign = self.bump();
                ValueKind::Number(self.number(start, Some(sign))?)
            }
            TokenKind::Ident => match keyword_literal(&self.current_token().text) {
                Some(kind) => {
                    self.bump();
                    kind
                }
                None => return Err(self.expected_value()),
            },
            TokenKind::BraceOpen => self.map()?,
            TokenKind::BracketOpen => ValueKind::List(self.list()?),
            _ => return Err(self.expected_value()),
        };
        Ok(Value {
            span: self.span_from(start),
            kind,
        })
    }

    fn expected_value(&self) -> ParseError {
        self.unexpected(
            DiagnosticKind::ExpectedValue,
            "`null`, a boolean, a number, a string, a map or a list",
        )
        .into()
    }

    /// Cooks the number at the cursor, `sign` having been consumed already.
    pub(super) fn number(&mut self, start: usize, sign: Option<Token>) -> PResult<Number> {
        let digits = self.bump();
        let negative = sign.as_ref().is_some_and(|s| s.kind == TokenKind::Minus);
        let text = match &sign {
            Some(sign) => format!("{}{}", sign.text, digits.text),
            None => digits.text.clone(),
        };

        let value = literals::number_value(&digits.text).and_then(|value| match value {
            NumberValue::Int(n) if negative => n
                .checked_neg()
                .map(NumberValue::Int)
                .ok_or(NumberError::OutOfRange),
            NumberValue::Float(f) if negative => Ok(NumberValue::Float(-f)),
            value => Ok(value),
        });

        match value {
            Ok(value) => Ok(Number { text, value }),
            Err(_) => Err(self
                .error_at(
                    DiagnosticKind::NumberOutOfRange,
                    self.span_from(start),
                    Some(&format!("`{text}`")),
                )
                .into()),
        }
    }

    /// `{ key: value, ... }` with an optional trailing comma.
    fn map(&mut self) -> PResult<ValueKind> {
        self.bump();
        let mut entries = Vec::new();
        while self.eat(TokenKind::BraceClose).is_none() {
            let start = self.pos;
            let key = match self.current() {
                TokenKind::Ident => self.bump().text,
                TokenKind::Str => literals::string_value(&self.bump().text),
                _ => {
                    return Err(self
                        .unexpected(DiagnosticKind::ExpectedName, "a map key or `}`")
                        .into());
                }
            };
            self.expect(
                TokenKind::Colon,
                DiagnosticKind::ExpectedColon,
                &format!("`:` after map key `{key}`"),
            )?;
            let value = self.value()?;
            entries.push(MapEntry {
                span: self.span_from(start),
                key,
                value,
            });
            if self.eat(TokenKind::Comma).is_none() && !self.at(TokenKind::BraceClose) {
                return Err(self
                    .unexpected(DiagnosticKind::UnexpectedToken, "`,` or `}`")
                    .into());
            }
        }
        Ok(ValueKind::Map(entries))
    }

    /// `[ value, ... ]` with an optional trailing comma.
    fn list(&mut self) -> PResult<Vec<Value>> {
        self.bump();
        let mut items = Vec::new();
        while self.eat(TokenKind::BracketClose).is_none() {
            items.push(self.value()?);
            if self.eat(TokenKind::Comma).is_none() && !self.at(TokenKind::BracketClose) {
                return Err(self
                    .unexpected(DiagnosticKind::UnexpectedToken, "`,` or `]`")
                    .into());
            }
        }
        Ok(items)
    }
}

/// `null`, `true` and `false` lex as identifiers.
pub(super) fn keyword_literal(text: &str) -> Option<ValueKind> {
    match text {
        "null" => Some(ValueKind::Null),
        "true" => Some(ValueKind::Bool(true)),
        "false" => Some(ValueKind::Bool(false)),
        _ => None,
    }
}
