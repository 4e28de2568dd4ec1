//! Integration tests for the transform entry point.
//!
//! These run real tree-sitter grammars over small programs and check the
//! resulting control trees through the public API and the JSON wire format.

use codetree::tree::{WarningKind, BRANCH_FALSE, BRANCH_TRUE, DEFAULT_CASE, MAX_NESTING};
use codetree::{transform, NodeKind, SummaryNode, TreeError};

/// Outline a C source and return the single function it defines.
fn single_c_function(source: &str) -> SummaryNode {
    let outline = transform("c", source.as_bytes()).expect("C source should parse");
    assert_eq!(outline.nodes.len(), 1, "expected one function");
    outline.nodes.into_iter().next().unwrap()
}

// =============================================================================
// C scenarios
// =============================================================================

#[test]
fn test_function_with_return() {
    let function = single_c_function("int add(int a, int b) { return a + b; }");

    assert_eq!(function.kind, NodeKind::Function);
    assert_eq!(function.text(), "add(int a, int b)");
    assert_eq!(function.children.len(), 1);
    assert_eq!(function.children[0].kind, NodeKind::Instruction);
    assert_eq!(function.children[0].text(), "return a + b;");
}

#[test]
fn test_if_else_branches() {
    let function =
        single_c_function("void f(int x) { int y; if (x > 0) { y = 1; } else { y = -1; } }");

    assert_eq!(function.children.len(), 2);
    let branch = &function.children[1];
    assert_eq!(branch.kind, NodeKind::If);
    assert_eq!(branch.text(), "x > 0");
    assert_eq!(branch.children.len(), 2);
    assert_eq!(branch.children[0].text(), "y = 1;");
    assert_eq!(branch.children[0].branch_tag(), BRANCH_TRUE);
    assert_eq!(branch.children[1].text(), "y = -1;");
    assert_eq!(branch.children[1].branch_tag(), BRANCH_FALSE);
}

#[test]
fn test_for_header() {
    let function = single_c_function(
        "int sum(int n) { int sum = 0; for (int i = 0; i < n; i++) { sum += i; } return sum; }",
    );

    let kinds: Vec<NodeKind> = function.children.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Instruction, NodeKind::For, NodeKind::Instruction]
    );
    let for_node = &function.children[1];
    assert_eq!(for_node.branch_tag(), "int i = 0; i < n; i++");
    assert_eq!(for_node.children.len(), 1);
    assert_eq!(for_node.children[0].text(), "sum += i;");
}

#[test]
fn test_switch_cases() {
    let function =
        single_c_function("void f(int v) { switch (v) { case 1: break; default: break; } }");

    let switch = &function.children[0];
    assert_eq!(switch.kind, NodeKind::Switch);
    assert_eq!(switch.text(), "v");
    assert_eq!(switch.children.len(), 2);
    assert_eq!(switch.children[0].kind, NodeKind::Case);
    assert_eq!(switch.children[0].branch_tag(), "1");
    assert_eq!(switch.children[1].branch_tag(), DEFAULT_CASE);
    // break is not a recognized kind
    assert!(switch.children.iter().all(|c| c.children.is_empty()));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_loop_header_overwritten_inside_branch() {
    let function = single_c_function(
        "void f(int c) { if (c) { for (int j = 0; j < 2; j++) { g(j); } } }",
    );

    let branch = &function.children[0];
    let inner = &branch.children[0];
    assert_eq!(inner.kind, NodeKind::For);
    assert_eq!(inner.branch_tag(), BRANCH_TRUE);
    assert_eq!(inner.children[0].text(), "g(j);");
}

#[test]
fn test_single_statement_loop_bodies() {
    let function = single_c_function(
        "void f(int x) { for (int i = 0; i < x; i++) g(i); while (x) x--; do h(); while (x); }",
    );

    let kinds: Vec<NodeKind> = function.children.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NodeKind::For, NodeKind::While, NodeKind::DoWhile]);
    assert_eq!(function.children[0].children[0].text(), "g(i);");
    assert_eq!(function.children[1].branch_tag(), "x");
    assert_eq!(function.children[1].children[0].text(), "x--;");
    assert_eq!(function.children[2].children[0].text(), "h();");
}

#[test]
fn test_unbraced_loop_under_branch() {
    let function = single_c_function("void f(int x) { if (x) for (int i = 0; i < x; i++) g(); }");

    let inner = &function.children[0].children[0];
    assert_eq!(inner.kind, NodeKind::For);
    assert_eq!(inner.branch_tag(), BRANCH_TRUE);
    assert_eq!(inner.children.len(), 1);
    assert_eq!(inner.children[0].text(), "g();");
    assert_eq!(inner.children[0].branch_tag(), "");
}

#[test]
fn test_deep_nesting_is_cut_off() {
    let depth = 20_000;
    let source = format!("void f(void) {}a();{}", "{".repeat(depth), "}".repeat(depth));
    let outline = transform("c", source.as_bytes()).unwrap();

    assert_eq!(outline.nodes.len(), 1);
    assert_eq!(outline.nodes[0].text(), "f(void)");
    assert!(outline.nodes[0].children.is_empty());
    assert_eq!(outline.warnings.len(), 1);
    assert_eq!(outline.warnings[0].kind, WarningKind::TooDeep);
    assert!(serde_json::to_string(&outline.nodes).is_ok());
}

#[test]
fn test_nesting_below_cap_is_kept() {
    let depth = MAX_NESTING / 2;
    let source = format!("void f(void) {}a();{}", "{".repeat(depth), "}".repeat(depth));
    let function = single_c_function(&source);

    assert_eq!(function.children.len(), 1);
    assert_eq!(function.children[0].text(), "a();");
}

#[test]
fn test_deeply_nested_functions_are_found() {
    let depth = 20_000;
    let source = format!(
        "{}function f() {{ g(); }}{}",
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let outline = transform("javascript", source.as_bytes()).unwrap();

    assert_eq!(outline.nodes.len(), 1);
    assert_eq!(outline.nodes[0].text(), "f()");
    assert_eq!(outline.nodes[0].children[0].text(), "g();");
}

#[test]
fn test_nested_block_is_flattened() {
    let nested = single_c_function("void f(void) { { a(); b(); } }");
    let flat = single_c_function("void f(void) { a(); b(); }");
    assert_eq!(nested.children, flat.children);
}

#[test]
fn test_unknown_kinds_do_not_interrupt_siblings() {
    let function = single_c_function("void f(void) { a(); goto done; done: b(); c(); }");
    let texts: Vec<&str> = function.children.iter().map(|n| n.text()).collect();
    assert_eq!(texts, vec!["a();", "c();"]);
}

#[test]
fn test_order_preserved() {
    let source = "void f(int n) { a(); while (n) { n--; } b(); do { n++; } while (n < 3); c(); }";
    let function = single_c_function(source);

    let kinds: Vec<NodeKind> = function.children.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Instruction,
            NodeKind::While,
            NodeKind::Instruction,
            NodeKind::DoWhile,
            NodeKind::Instruction,
        ]
    );
    assert_eq!(function.children[1].branch_tag(), "n");
    assert_eq!(function.children[3].branch_tag(), "(n < 3)");
}

#[test]
fn test_deterministic() {
    let source = br#"
int classify(int v) {
    if (v < 0) { return -1; } else if (v == 0) { return 0; }
    for (;;) { v--; }
    switch (v) { case 1: v++; break; default: break; }
    return v;
}
"#;
    let first = transform("c", source).unwrap();
    for _ in 0..5 {
        assert_eq!(transform("c", source).unwrap(), first);
    }
}

// =============================================================================
// Other languages
// =============================================================================

#[test]
fn test_python_elif_chain() {
    let source = b"def sign(x):\n    if x > 0:\n        return 1\n    elif x < 0:\n        return -1\n    else:\n        return 0\n";
    let outline = transform("python", source).unwrap();

    let function = &outline.nodes[0];
    assert_eq!(function.text(), "sign(x)");
    let branch = &function.children[0];
    assert_eq!(branch.text(), "x > 0");
    assert_eq!(branch.children[0].branch_tag(), BRANCH_TRUE);

    let elif = &branch.children[1];
    assert_eq!(elif.kind, NodeKind::If);
    assert_eq!(elif.text(), "x < 0");
    assert_eq!(elif.branch_tag(), BRANCH_FALSE);
    assert_eq!(elif.children[0].text(), "return -1");
    assert_eq!(elif.children[1].text(), "return 0");
    assert_eq!(elif.children[1].branch_tag(), BRANCH_FALSE);
}

#[test]
fn test_javascript_functions_are_siblings() {
    let source = b"function outer(xs) { const f = (x) => { return x * 2; }; return xs.map(f); }";
    let outline = transform("javascript", source).unwrap();

    let signatures: Vec<&str> = outline.nodes.iter().map(|n| n.text()).collect();
    assert_eq!(signatures, vec!["outer(xs)", "(x)"]);
    assert_eq!(outline.nodes[1].children[0].text(), "return x * 2;");
}

#[test]
fn test_javascript_empty_for_header() {
    let source = b"function spin() { for (;;) { tick(); } }";
    let outline = transform("javascript", source).unwrap();

    let loop_node = &outline.nodes[0].children[0];
    assert_eq!(loop_node.kind, NodeKind::For);
    assert_eq!(loop_node.branch_tag(), "");
    assert_eq!(loop_node.children[0].text(), "tick();");
}

#[test]
fn test_cpp_condition_clause() {
    let source = b"int f(int x) { if (x) { return 1; } while (x > 1) { x--; } return 0; }";
    let outline = transform("cpp", source).unwrap();

    let function = &outline.nodes[0];
    assert_eq!(function.children[0].text(), "x");
    assert_eq!(function.children[1].branch_tag(), "x > 1");
}

// =============================================================================
// Wire format and errors
// =============================================================================

#[test]
fn test_wire_format() {
    let outline = transform("c", b"int add(int a, int b) { return a + b; }").unwrap();
    let json = serde_json::to_value(&outline.nodes).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "type": "function",
            "data": "add(int a, int b)",
            "condition": "",
            "nodes": [{
                "type": "instruction",
                "data": "return a + b;",
                "condition": "",
                "nodes": null
            }]
        }])
    );
}

#[test]
fn test_no_functions() {
    let outline = transform("c", b"int x = 1;\nstruct point { int x; };\n").unwrap();
    assert!(outline.is_empty());
    assert_eq!(serde_json::to_string(&outline.nodes).unwrap(), "[]");
}

#[test]
fn test_unsupported_language() {
    let err = transform("rust", b"fn main() {}").unwrap_err();
    assert!(matches!(err, TreeError::UnsupportedLanguage(ref s) if s == "rust"));
}
