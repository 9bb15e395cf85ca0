use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::{ClauseKind, Group, Item, Scope, SetupClause, Test};
use crate::parser::core::{PResult, Parser};
use crate::parser::literals;
use crate::parser::token::{Token, TokenKind};

/// Contents shared by scopes and groups.
#[derive(Default)]
struct Body {
    setup: Option<SetupClause>,
    teardown: Option<SetupClause>,
    items: Vec<Item>,
    skipped: Vec<Token>,
}

impl Parser {
    /// `Name { ... }`
    pub(super) fn scope(&mut self) -> PResult<Scope> {
        let start = self.pos;
        let name = self.bump();
        let open = self.expect(
            TokenKind::BraceOpen,
            DiagnosticKind::UnexpectedToken,
            "`{` after the scope name",
        )?;
        let body = self.nested(|p| p.body(&open, &format!("scope `{}`", name.text)))?;

        let mut meta = self.meta(start);
        meta.record_skipped(body.skipped);
        Ok(Scope {
            meta,
            name: name.text,
            setup: body.setup,
            teardown: body.teardown,
            items: body.items,
        })
    }

    /// `test "..." { ... }` or `group "..." { ... }`
    pub(super) fn item(&mut self) -> PResult<Item> {
        match self.current() {
            TokenKind::KwGroup => self.group().map(Item::Group),
            _ => self.test().map(Item::Test),
        }
    }

    fn group(&mut self) -> PResult<Group> {
        self.assert_current(TokenKind::KwGroup);
        let start = self.pos;
        self.bump();
        let name = self.expect(
            TokenKind::Str,
            DiagnosticKind::ExpectedString,
            "a quoted group name",
        )?;
        let open = self.expect(
            TokenKind::BraceOpen,
            DiagnosticKind::UnexpectedToken,
            "`{` after the group name",
        )?;
        let name = literals::string_value(&name.text);
        let body = self.nested(|p| p.body(&open, &format!("group {name:?}")))?;

        let mut meta = self.meta(start);
        meta.record_skipped(body.skipped);
        Ok(Group {
            meta,
            name,
            setup: body.setup,
            teardown: body.teardown,
            items: body.items,
        })
    }

    /// Block of a scope or group: clauses first, then tests and groups.
    fn body(&mut self, open: &Token, what: &str) -> PResult<Body> {
        let mut body = Body::default();
        loop {
            let from = self.pos;
            match self.current() {
                TokenKind::BraceClose => {
                    self.bump();
                    break;
                }
                TokenKind::Eof | TokenKind::KwQuery | TokenKind::KwImport => {
                    self.unclosed(open, what)?;
                    body.skipped.insert(0, open.clone());
                    break;
                }
                TokenKind::KwSetup | TokenKind::KwTeardown => {
                    let clause = self.setup_clause()?;
                    if !body.items.is_empty() {
                        let what = format!("`{}` after tests", clause.kind.keyword());
                        self.misplaced(clause.meta.span, &what)?;
                    }
                    let slot = match clause.kind {
                        ClauseKind::Setup => &mut body.setup,
                        ClauseKind::Teardown => &mut body.teardown,
                    };
                    if self.fill_slot(slot, clause)?.is_some() {
                        body.skipped.extend(self.consumed_since(from));
                    }
                }
                TokenKind::KwTest | TokenKind::KwGroup => {
                    let result = self.item();
                    if let Some(item) = self.or_recover(from, result, &mut body.skipped)? {
                        body.items.push(item);
                    }
                }
                TokenKind::KwAssert => {
                    let result = self.assert();
                    if let Some(assert) = self.or_recover(from, result, &mut body.skipped)? {
                        self.misplaced(assert.meta.span, "`assert` outside of a test")?;
                        body.skipped.extend(self.consumed_since(from));
                    }
                }
                _ => {
                    let err = self.unexpected(
                        DiagnosticKind::UnexpectedToken,
                        "`test`, `group`, `setup`, `teardown` or `}`",
                    );
                    self.report(err)?;
                    body.skipped.extend(self.recover_in_block(from));
                }
            }
        }
        Ok(body)
    }

    /// `test "name" { setup? statement* assert* }`
    fn test(&mut self) -> PResult<Test> {
        self.assert_current(TokenKind::KwTest);
        let start = self.pos;
        self.bump();
        let name = self.expect(
            TokenKind::Str,
            DiagnosticKind::ExpectedString,
            "a quoted test name",
        )?;
        let open = self.expect(
            TokenKind::BraceOpen,
            DiagnosticKind::UnexpectedToken,
            "`{` after the test name",
        )?;
        let name = literals::string_value(&name.text);

        let mut test = Test {
            meta: Default::default(),
            name,
            setup: None,
            statements: Vec::new(),
            asserts: Vec::new(),
        };
        let mut skipped = Vec::new();

        loop {
            let from = self.pos;
            match self.current() {
                TokenKind::BraceClose => {
                    self.bump();
                    break;
                }
                TokenKind::Eof
                | TokenKind::KwTest
                | TokenKind::KwGroup
                | TokenKind::KwQuery
                | TokenKind::KwImport => {
                    self.unclosed(&open, &format!("test {:?}", test.name))?;
                    skipped.insert(0, open.clone());
                    break;
                }
                TokenKind::KwSetup => {
                    let clause = self.setup_clause()?;
                    if !test.statements.is_empty() || !test.asserts.is_empty() {
                        self.misplaced(clause.meta.span, "`setup` after statements")?;
                    }
                    if self.fill_slot(&mut test.setup, clause)?.is_some() {
                        skipped.extend(self.consumed_since(from));
                    }
                }
                TokenKind::KwTeardown => {
                    let clause = self.setup_clause()?;
                    self.misplaced(clause.meta.span, "`teardown` inside a test")?;
                    skipped.extend(self.consumed_since(from));
                }
                TokenKind::KwAssert => {
                    let result = self.assert();
                    if let Some(assert) = self.or_recover(from, result, &mut skipped)? {
                        test.asserts.push(assert);
                    }
                }
                TokenKind::Ident => {
                    let result = self.statement();
                    if let Some(statement) = self.or_recover(from, result, &mut skipped)? {
                        if !test.asserts.is_empty() {
                            self.misplaced(statement.meta.span, "a statement after `assert`")?;
                        }
                        test.statements.push(statement);
                    }
                }
                _ => {
                    let err = self.unexpected(
                        DiagnosticKind::UnexpectedToken,
                        "a statement, `assert` or `}`",
                    );
                    self.report(err)?;
                    skipped.extend(self.recover_in_block(from));
                }
            }
        }

        test.meta = self.meta(start);
        test.meta.record_skipped(skipped);
        Ok(test)
    }
}
