//! JavaScript grammar profile.

use tree_sitter::Language;

use crate::parser::{CaseValue, Category, Grammar, Rule, Signature};

static RULES: &[Rule] = &[
    Rule::new("statement_block", Category::Block),
    Rule::new("switch_body", Category::Block),
    Rule::new("return_statement", Category::Instruction),
    Rule::new("expression_statement", Category::Instruction),
    Rule::new("lexical_declaration", Category::Instruction),
    Rule::new("variable_declaration", Category::Instruction),
    Rule::new(
        "for_statement",
        Category::For {
            header: &["initializer", "condition", "increment"],
        },
    ),
    Rule::new(
        "for_in_statement",
        Category::For {
            header: &["left", "right"],
        },
    ),
    Rule::new("while_statement", Category::While { condition: "condition" }),
    Rule::new("do_statement", Category::DoWhile { condition: "condition" }),
    Rule::new("if_statement", Category::Conditional { condition: "condition" }),
    Rule::new("switch_statement", Category::Switch { condition: "value" }),
    Rule::new("switch_case", Category::Case { value: CaseValue::Field("value") }),
    Rule::new("switch_default", Category::Case { value: CaseValue::Field("value") }),
];

fn language() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// JavaScript grammar for the `javascript` selector.
pub static GRAMMAR: Grammar = Grammar {
    name: "javascript",
    selectors: &["javascript"],
    extensions: &["js", "jsx", "mjs", "cjs"],
    language,
    functions: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
    ],
    signature: Signature::Span(&["name", "parameter", "parameters"]),
    body_field: "body",
    rules: RULES,
};
