// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage summary of a target's inputs and outputs

use console::style;
use wr_core::Executable;

const HELP_WIDTH: usize = 96;

/// Lines summarizing the target's required and optional inputs, with their
/// `parameter_meta` help, and its outputs. Headings are bold when `styled`.
pub fn usage(target: &Executable<'_>, styled: bool) -> Vec<String> {
    let bold = |line: String| {
        if styled {
            style(line).bold().force_styling(true).to_string()
        } else {
            line
        }
    };
    let uri = &target.doc().uri;
    let mut ans = vec![
        String::new(),
        bold(format!("{} ({})", target.name(), uri)),
        bold("-".repeat(target.name().len() + uri.len() + 3)),
    ];

    let required = target.required_inputs();
    ans.push(String::new());
    ans.push(bold("required inputs:".into()));
    for (name, decl) in required.iter() {
        ans.push(bold(format!("  {} {}", decl.ty, name)));
        parameter_help(target, name, &mut ans);
    }

    let has_input_section = target.has_input_section();
    let optional: Vec<_> = target
        .available_inputs()
        .subtract(&required)
        .into_iter()
        .filter(|(_, decl)| !decl.name.starts_with('_'))
        .filter(|(_, decl)| match &decl.expr {
            Some(expr) if !has_input_section => is_constant_expr(expr),
            _ => true,
        })
        .collect();
    if !optional.is_empty() {
        ans.push(String::new());
        ans.push(bold("optional inputs:".into()));
        for (name, decl) in &optional {
            let line = bold(format!("  {} {}", decl.ty, name));
            match &decl.expr {
                Some(expr) => ans.push(format!("{} = {}", line, expr)),
                None => ans.push(line),
            }
            parameter_help(target, name, &mut ans);
        }
    }

    ans.push(String::new());
    ans.push(bold("outputs:".into()));
    for (name, ty) in target.effective_outputs().iter() {
        ans.push(bold(format!("  {} {}", ty, name)));
    }
    ans
}

fn parameter_help(target: &Executable<'_>, name: &str, out: &mut Vec<String>) {
    let help = match target.parameter_meta().get(name) {
        Some(serde_json::Value::String(text)) => text.as_str(),
        Some(serde_json::Value::Object(entry)) => match entry.get("help") {
            Some(serde_json::Value::String(text)) => text.as_str(),
            _ => return,
        },
        _ => return,
    };
    out.extend(
        textwrap::wrap(help, HELP_WIDTH)
            .into_iter()
            .map(|line| format!("    {}", line)),
    );
}

/// Whether a default expression is a literal: a number, a boolean, a
/// string without placeholders, or an array of such.
pub fn is_constant_expr(expr: &str) -> bool {
    let expr = expr.trim();
    if expr == "true" || expr == "false" {
        return true;
    }
    if expr.parse::<i64>().is_ok() || expr.parse::<f64>().is_ok_and(f64::is_finite) {
        return true;
    }
    if let Some(quote) = expr.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let Some(inner) = expr[1..].strip_suffix(quote) else {
            return false;
        };
        return !inner.contains(quote) && !inner.contains("~{") && !inner.contains("${");
    }
    if let Some(items) = expr.strip_prefix('[').and_then(|e| e.strip_suffix(']')) {
        return split_items(items)
            .is_some_and(|items| items.iter().all(|item| is_constant_expr(item)));
    }
    false
}

/// Split array literal items on top-level commas
fn split_items(text: &str) -> Option<Vec<&str>> {
    if text.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut ans = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '{' | '(') => depth += 1,
            (None, ']' | '}' | ')') => depth -= 1,
            (None, ',') if depth == 0 => {
                ans.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() || depth != 0 {
        return None;
    }
    ans.push(&text[start..]);
    Some(ans)
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
