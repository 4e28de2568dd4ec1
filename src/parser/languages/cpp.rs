//! C++ grammar profile.
//!
//! Same statement kinds as C. Tests sit in a `condition_clause` whose
//! `value` field holds the bare expression. Range-based for loops keep
//! `type declarator : range` as their header.

use tree_sitter::Language;

use crate::parser::{CaseValue, Category, Grammar, Rule, Signature};

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
    Rule::new(
        "for_range_loop",
        Category::For {
            header: &["initializer", "type", "declarator", "right"],
        },
    ),
    Rule::new("while_statement", Category::While { condition: "condition" }),
    Rule::new("do_statement", Category::DoWhile { condition: "condition" }),
    Rule::new("if_statement", Category::Conditional { condition: "condition" }),
    Rule::new("switch_statement", Category::Switch { condition: "condition" }),
    Rule::new("case_statement", Category::Case { value: CaseValue::Field("value") }),
];

fn language() -> Language {
    tree_sitter_cpp::LANGUAGE.into()
}

/// C++ grammar for the `cpp` selector.
pub static GRAMMAR: Grammar = Grammar {
    name: "cpp",
    selectors: &["cpp"],
    extensions: &["cpp", "cc", "cxx", "hpp", "hh"],
    language,
    functions: &["function_definition", "function_declaration"],
    signature: Signature::Field("declarator"),
    body_field: "body",
    rules: RULES,
};
