//! C grammar profile.

use tree_sitter::Language;

use crate::parser::{CaseValue, Category, Grammar, Rule, Signature};

/// Classification table for C statements.
///
/// Counts:
/// - compound statements (flattened)
/// - return, expression and declaration statements
/// - for, while and do-while loops
/// - if statements (else arrives as `else_clause`)
/// - switch statements and their case labels
static RULES: &[Rule] = &[
    Rule::new("compound_statement", Category::Block),
    Rule::new("return_statement", Category::Instruction),
    Rule::new("expression_statement", Category::Instruction),
    Rule::new("declaration", Category::Instruction),
    Rule::new(
        "for_statement",
        Category::For {
            header: &["initializer", "condition", "update"],
        },
    ),
    Rule::new("while_statement", Category::While { condition: "condition" }),
    Rule::new("do_statement", Category::DoWhile { condition: "condition" }),
    Rule::new("if_statement", Category::Conditional { condition: "condition" }),
    Rule::new("switch_statement", Category::Switch { condition: "condition" }),
    Rule::new("case_statement", Category::Case { value: CaseValue::Field("value") }),
];

fn language() -> Language {
    tree_sitter_c::LANGUAGE.into()
}

/// C grammar for the `c` selector and `.c`/`.h` files.
pub static GRAMMAR: Grammar = Grammar {
    name: "c",
    selectors: &["c"],
    extensions: &["c", "h"],
    language,
    functions: &["function_definition", "function_declaration"],
    signature: Signature::Field("declarator"),
    body_field: "body",
    rules: RULES,
};
