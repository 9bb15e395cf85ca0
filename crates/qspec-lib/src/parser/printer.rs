//! Textual outline of a parsed suite, for tooling and snapshot tests.

use std::fmt::{self, Write};

use super::ast::{
    AssertTarget, Expr, ExprKind, Import, SetupBody, SetupCall, SetupStep, Suite, UnaryOp, Value,
    ValueKind,
};
use super::literals::NumberValue;
use super::node::NodeRef;

pub struct SuitePrinter<'s> {
    suite: &'s Suite,
    spans: bool,
    comments: bool,
}

impl<'s> SuitePrinter<'s> {
    pub fn new(suite: &'s Suite) -> Self {
        Self {
            suite,
            spans: false,
            comments: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn with_comments(mut self, value: bool) -> Self {
        self.comments = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        self.format_node(self.suite.as_node(), 0, w)?;
        if self.comments {
            for comment in &self.suite.detached_comments {
                writeln!(w, "  detached {:?}", comment.text)?;
            }
        }
        Ok(())
    }

    fn format_node(&self, node: NodeRef<'_>, indent: usize, w: &mut impl Write) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        let meta = node.meta();

        if self.comments {
            for comment in &meta.leading_comments {
                writeln!(w, "{prefix}leading {:?}", comment.text)?;
            }
        }

        write!(w, "{prefix}{}", node.kind_name())?;
        if self.spans {
            write!(w, " [{}]", meta.span)?;
        }
        let label = label(node);
        if !label.is_empty() {
            write!(w, " {label}")?;
        }
        if let Some(recovery) = &meta.recovery {
            write!(w, " (recovered")?;
            if !recovery.skipped.is_empty() {
                let texts: Vec<&str> = recovery.skipped.iter().map(|t| t.text.as_str()).collect();
                write!(w, "; skipped {}", texts.join(" "))?;
            }
            write!(w, ")")?;
        }
        if self.comments
            && let Some(comment) = &meta.trailing_comment
        {
            write!(w, " trailing {:?}", comment.text)?;
        }
        writeln!(w)?;

        for child in node.children() {
            self.format_node(child, indent + 1, w)?;
        }
        Ok(())
    }
}

impl Suite {
    pub fn printer(&self) -> SuitePrinter<'_> {
        SuitePrinter::new(self)
    }
}

fn label(node: NodeRef<'_>) -> String {
    match node {
        NodeRef::Suite(_) => String::new(),
        NodeRef::Import(Import { alias, path, .. }) => match alias {
            Some(alias) => format!("{alias} {path:?}"),
            None => format!("{path:?}"),
        },
        NodeRef::Query(query) => query.name.clone(),
        NodeRef::Scope(scope) => scope.name.clone(),
        NodeRef::Group(group) => format!("{:?}", group.name),
        NodeRef::Test(test) => format!("{:?}", test.name),
        NodeRef::SetupClause(clause) => {
            let body = match &clause.body {
                SetupBody::Inline(_) => "inline",
                SetupBody::Call(_) => "call",
                SetupBody::Block(_) => "block",
                SetupBody::Missing => "missing",
            };
            format!("{} {body}", clause.kind.keyword())
        }
        NodeRef::SetupItem(item) => match &item.step {
            SetupStep::Inline(_) => "inline".to_string(),
            SetupStep::Call(_) => "call".to_string(),
        },
        NodeRef::SetupCall(call) => call_label(call),
        NodeRef::Statement(statement) => format!("{}: {}", statement.key, statement.value),
        NodeRef::Assert(_) => String::new(),
        NodeRef::AssertQuery(query) => match &query.target {
            AssertTarget::Inline(_) => "inline".to_string(),
            AssertTarget::Call(_) => "call".to_string(),
        },
        NodeRef::AssertExpr(expr) => expr.expr.to_string(),
    }
}

fn call_label(call: &SetupCall) -> String {
    let mut out = match &call.module {
        Some(module) => format!("{module}.{}", call.name),
        None => call.name.clone(),
    };
    let params: Vec<String> = call
        .params
        .iter()
        .map(|param| match &param.name {
            Some(name) => format!("{name}: {}", param.value),
            None => param.value.to_string(),
        })
        .collect();
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Number(number) => match number.value {
                NumberValue::Int(n) => write!(f, "{n}"),
                NumberValue::Float(x) => write!(f, "{x:?}"),
            },
            ValueKind::String(s) => write!(f, "{s:?}"),
            ValueKind::Map(entries) => {
                write!(f, "{{")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", entry.key, entry.value)?;
                }
                write!(f, "}}")
            }
            ValueKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// S-expression form, so precedence is visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(value) => write!(f, "{value}"),
            ExprKind::Name(name) => write!(f, "{name}"),
            ExprKind::Member { object, field } => write!(f, "(. {object} {field})"),
            ExprKind::Index { object, index } => write!(f, "(index {object} {index})"),
            ExprKind::Call { callee, args } => {
                write!(f, "(call {callee}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            ExprKind::Unary { op, operand } => {
                let op = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                };
                write!(f, "({op} {operand})")
            }
            ExprKind::Binary { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
            ExprKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
