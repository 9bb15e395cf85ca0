mod grammar;
mod recovery;

use crate::parser::{ParseOptions, parse};

/// Outline of a recovering parse, followed by its diagnostics.
fn outline(source: &str) -> String {
    let parse = parse(source, &ParseOptions::recovering());
    let mut out = parse.suite().printer().dump();
    if !parse.diagnostics().is_empty() {
        out.push_str("---\n");
        for diagnostic in parse.diagnostics() {
            out.push_str(&format!("{diagnostic}\n"));
        }
    }
    out
}
