//! Integration tests for directory walking and the `tree` command.

use std::fs;
use std::path::Path;

use codetree::cli::{self, TreeArgs, EXIT_ERROR, EXIT_SUCCESS};
use codetree::parser;
use codetree::transform::transform_files;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.c", "int main(void) { return 0; }\n");
    write(root, "src/util.py", "def helper(x):\n    return x\n");
    write(root, "src/app.js", "function start() { run(); }\n");
    write(root, "src/gen/table.c", "int table(void) { return 1; }\n");
    write(root, "README.md", "# fixture\n");
    write(root, ".cache/hidden.c", "int hidden(void) { return 2; }\n");
    write(root, "node_modules/dep/index.js", "function dep() {}\n");
    write(root, "vendor/lib.c", "int vendored(void) { return 3; }\n");
    dir
}

fn relative_names(root: &Path, files: &[std::path::PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_collect_skips_hidden_and_vendor() {
    let dir = fixture();
    let excluded = cli::exclusion_set(&[]).unwrap();
    let files = cli::collect_files(dir.path(), None, &excluded).unwrap();

    assert_eq!(
        relative_names(dir.path(), &files),
        vec!["src/app.js", "src/gen/table.c", "src/main.c", "src/util.py"]
    );
}

#[test]
fn test_collect_with_exclusions_and_language() {
    let dir = fixture();
    let excluded = cli::exclusion_set(&["**/gen/**".to_string()]).unwrap();
    let files = cli::collect_files(dir.path(), parser::for_selector("c"), &excluded).unwrap();

    assert_eq!(relative_names(dir.path(), &files), vec!["src/main.c"]);
}

#[test]
fn test_transform_files_sorted_by_path() {
    let dir = fixture();
    let excluded = cli::exclusion_set(&[]).unwrap();
    let files = cli::collect_files(dir.path(), None, &excluded).unwrap();

    let outlines = transform_files(&files, None);
    assert_eq!(outlines.len(), 4);
    assert!(outlines.windows(2).all(|w| w[0].path <= w[1].path));

    let python = outlines.iter().find(|o| o.language == "python").unwrap();
    assert_eq!(python.nodes[0].text(), "helper(x)");
    let javascript = outlines.iter().find(|o| o.language == "javascript").unwrap();
    assert_eq!(javascript.nodes[0].children[0].text(), "run();");
}

#[test]
fn test_run_tree_exit_codes() {
    let dir = fixture();

    let args = TreeArgs {
        path: dir.path().to_path_buf(),
        lang: None,
        format: "json".to_string(),
        exclude: Vec::new(),
    };
    assert_eq!(cli::run_tree(&args).unwrap(), EXIT_SUCCESS);

    let bad_format = TreeArgs {
        format: "xml".to_string(),
        ..args
    };
    assert_eq!(cli::run_tree(&bad_format).unwrap(), EXIT_ERROR);

    let bad_lang = TreeArgs {
        path: dir.path().to_path_buf(),
        lang: Some("cobol".to_string()),
        format: "pretty".to_string(),
        exclude: Vec::new(),
    };
    assert_eq!(cli::run_tree(&bad_lang).unwrap(), EXIT_ERROR);
}
