//! Scanner for the gender-select template mini-language.
//!
//! Regex cannot find an option body's extent because bodies may nest
//! braces, so this is a hand-rolled character scanner with an explicit
//! brace counter. Anything that does not parse as a select block stays
//! literal text — templates never fail to render.

use crate::ast::{Node, SelectBlock};

/// Parse a template into literal runs and (at most) one select block.
/// Later `{…, select, …}` shapes are left as literal text.
pub fn parse(template: &str) -> Vec<Node> {
    let chars: Vec<char> = template.chars().collect();
    let mut nodes = Vec::new();
    let mut literal = String::new();
    let mut saw_select = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{' && !saw_select {
            if let Some((block, consumed)) = try_parse_select(&chars[i..]) {
                if !literal.is_empty() {
                    nodes.push(Node::Literal(std::mem::take(&mut literal)));
                }
                nodes.push(Node::Select(block));
                saw_select = true;
                i += consumed;
                continue;
            }
        }
        literal.push(chars[i]);
        i += 1;
    }

    if !literal.is_empty() {
        nodes.push(Node::Literal(literal));
    }
    nodes
}

/// Try to parse a select block starting at `chars[0] == '{'`.
/// Returns the block and the number of chars consumed, or `None` if the
/// text does not have the `{var, select, key {body} …}` shape.
fn try_parse_select(chars: &[char]) -> Option<(SelectBlock, usize)> {
    let mut i = 1;

    let var = scan_until(chars, &mut i, ',')?;
    let var = var.trim().to_string();
    if var.is_empty() || !var.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    i += 1; // consume ','

    let keyword = scan_until(chars, &mut i, ',')?;
    if keyword.trim() != "select" {
        return None;
    }
    i += 1;

    let mut options = Vec::new();
    loop {
        skip_whitespace(chars, &mut i);
        match chars.get(i) {
            Some('}') => {
                i += 1;
                break;
            }
            Some(_) => {
                let key = scan_option_key(chars, &mut i)?;
                skip_whitespace(chars, &mut i);
                if chars.get(i) != Some(&'{') {
                    return None;
                }
                let body = scan_braced_body(chars, &mut i)?;
                options.push((key, body));
            }
            None => return None,
        }
    }

    if options.is_empty() {
        return None;
    }
    Some((SelectBlock { var, options }, i))
}

/// Collect chars until `stop`, failing on any brace before it.
fn scan_until(chars: &[char], i: &mut usize, stop: char) -> Option<String> {
    let mut out = String::new();
    while let Some(&c) = chars.get(*i) {
        if c == stop {
            return Some(out);
        }
        if c == '{' || c == '}' {
            return None;
        }
        out.push(c);
        *i += 1;
    }
    None
}

/// An option key runs until whitespace or the opening brace of its body.
fn scan_option_key(chars: &[char], i: &mut usize) -> Option<String> {
    let mut key = String::new();
    while let Some(&c) = chars.get(*i) {
        if c.is_whitespace() || c == '{' {
            break;
        }
        if c == '}' || c == ',' {
            return None;
        }
        key.push(c);
        *i += 1;
    }
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Consume a `{…}` body at `chars[i]`, counting nested braces.
fn scan_braced_body(chars: &[char], i: &mut usize) -> Option<String> {
    debug_assert_eq!(chars.get(*i), Some(&'{'));
    *i += 1;
    let mut depth = 1usize;
    let mut body = String::new();
    while let Some(&c) = chars.get(*i) {
        *i += 1;
        match c {
            '{' => {
                depth += 1;
                body.push(c);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body);
                }
                body.push(c);
            }
            _ => body.push(c),
        }
    }
    None
}

fn skip_whitespace(chars: &[char], i: &mut usize) {
    while chars.get(*i).is_some_and(|c| c.is_whitespace()) {
        *i += 1;
    }
}
