//! Template AST: a template is a sequence of literal runs with at most
//! one gender-select block.

/// One parsed piece of a template string.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(String),
    Select(SelectBlock),
}

/// A `{var, select, key {body} …}` block.
///
/// Option bodies may themselves contain braces; the parser finds each
/// body's extent by counting nested open/close braces.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBlock {
    pub var: String,
    /// (branch key, branch body) in source order.
    pub options: Vec<(String, String)>,
}

impl SelectBlock {
    /// Body for `key`, falling back to the branch keyed "other".
    pub fn branch(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.options.iter().find(|(k, _)| k == "other"))
            .map(|(_, body)| body.as_str())
    }
}
