//! Python grammar profile.
//!
//! Tests are bare expressions, so nothing needs unwrapping. `elif` clauses
//! are stored as repeated `alternative` fields of the `if_statement` and are
//! classified as conditionals so the chain nests the same way `else if`
//! does in the C family. `match` maps onto switch/case.

use tree_sitter::Language;

use crate::parser::{CaseValue, Category, Grammar, Rule, Signature};

static RULES: &[Rule] = &[
    Rule::new("block", Category::Block),
    Rule::new("return_statement", Category::Instruction),
    Rule::new("expression_statement", Category::Instruction),
    Rule::new(
        "for_statement",
        Category::For {
            header: &["left", "right"],
        },
    ),
    Rule::new("while_statement", Category::While { condition: "condition" }),
    Rule::new("if_statement", Category::Conditional { condition: "condition" }),
    Rule::new("elif_clause", Category::Conditional { condition: "condition" }),
    Rule::new("match_statement", Category::Switch { condition: "subject" }),
    Rule::new("case_clause", Category::Case { value: CaseValue::Kind("case_pattern") }),
];

fn language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Python grammar for the `python` selector.
pub static GRAMMAR: Grammar = Grammar {
    name: "python",
    selectors: &["python"],
    extensions: &["py"],
    language,
    functions: &["function_definition"],
    signature: Signature::Span(&["name", "parameters"]),
    body_field: "body",
    rules: RULES,
};
