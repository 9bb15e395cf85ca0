//! Comment attachment.
//!
//! Runs once after parsing. Each comment becomes one of:
//!
//! - the *trailing* comment of the outermost node that ends on the comment's
//!   line, with only trivia between its end and the comment;
//! - a *leading* comment of the outermost node starting at the next real
//!   token, when no blank line sits in between;
//! - a detached comment on the suite otherwise.
//!
//! Spans are never touched, and running the pass again gives the same tree.

use tracing::{debug, trace};

use crate::parser::ast::{NodeMeta, Suite};
use crate::parser::token::{Token, TokenKind, Trivia};

pub fn attach_comments(suite: &mut Suite, trivia: &[Trivia]) {
    let tokens = std::mem::take(&mut suite.tokens);
    let mut detached = Vec::new();

    {
        let mut metas = suite.metas_mut();
        for meta in metas.iter_mut() {
            meta.clear_comments();
        }

        for comment in trivia {
            let index = tokens.iter().position(|t| {
                t.kind == TokenKind::LineComment && t.start.offset == comment.span.start.offset
            });
            let Some(index) = index else {
                trace!(at = %comment.span.start, "comment past the parsed tokens");
                detached.push(comment.clone());
                continue;
            };

            if let Some(i) = trailing_owner(&metas, &tokens, index) {
                trace!(at = %comment.span.start, "trailing comment");
                metas[i].trailing_comment = Some(comment.clone());
            } else if let Some(i) = leading_owner(&metas, &tokens, index) {
                trace!(at = %comment.span.start, "leading comment");
                metas[i].leading_comments.push(comment.clone());
            } else {
                trace!(at = %comment.span.start, "detached comment");
                detached.push(comment.clone());
            }
        }
    }

    debug!(
        comments = trivia.len(),
        detached = detached.len(),
        "comments attached"
    );
    suite.detached_comments = detached;
    suite.tokens = tokens;
}

/// `index` is the comment's position in `tokens`.
fn trailing_owner(metas: &[&mut NodeMeta], tokens: &[Token], index: usize) -> Option<usize> {
    let at = tokens[index].start;
    let mut best: Option<usize> = None;
    for (i, meta) in metas.iter().enumerate() {
        let end = meta.span.end;
        if meta.span.is_empty()
            || meta.trailing_comment.is_some()
            || end.line != at.line
            || end.offset > at.offset
        {
            continue;
        }
        let only_trivia_between = tokens
            .get(meta.tokens.end..index)
            .is_some_and(|between| between.iter().all(Token::is_trivia));
        if !only_trivia_between {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => {
                let current = &metas[b].span;
                end.offset > current.end.offset
                    || (end.offset == current.end.offset
                        && meta.span.start.offset < current.start.offset)
            }
        };
        if better {
            best = Some(i);
        }
    }
    best
}

fn leading_owner(metas: &[&mut NodeMeta], tokens: &[Token], index: usize) -> Option<usize> {
    let mut next = None;
    for (j, token) in tokens.iter().enumerate().skip(index + 1) {
        if token.is_blank_line() {
            return None;
        }
        if !token.is_trivia() {
            next = Some(j);
            break;
        }
    }
    let next = next?;

    metas
        .iter()
        .position(|meta| !meta.tokens.is_empty() && meta.tokens.start == next)
}
