//! Barrel (index file) re-exports for generated components.
//!
//! The barrel is patched, never regenerated: a scan finds the top-level
//! import and re-export declarations, and the new export is inserted as one
//! line after the last of them. Every other byte of the file is preserved.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::NormalizedComponentOptions;
use crate::error::Result;
use crate::project;
use crate::tree::Tree;
use crate::utils::patch::{self, StringChange};
use crate::utils::paths;

static IMPORT_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\Aimport\b[\w$*{}\s,]*?(?:\bfrom\s*)?(['"])([^'"\r\n]+)['"][ \t]*;?"#)
        .expect("import declaration pattern is valid")
});

static RE_EXPORT_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\Aexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*(['"])([^'"\r\n]+)['"][ \t]*;?"#,
    )
    .expect("re-export declaration pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Import,
    ReExport,
}

/// A top-level `import ... from '...'` or `export ... from '...'` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDeclaration {
    pub kind: DeclarationKind,
    /// Byte offset of the keyword.
    pub start: usize,
    /// Byte offset just past the statement (after `;` when present).
    pub end: usize,
    /// Module specifier, without quotes.
    pub specifier: String,
}

/// What `add_exports_to_barrel` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarrelOutcome {
    /// Export was not requested.
    NotRequested,
    /// Applications have no public barrel.
    ApplicationProject,
    MissingBarrel { path: String },
    /// An equivalent export is already present.
    AlreadyExported { path: String },
    Added { path: String, statement: String },
}

/// Find top-level import and re-export declarations.
///
/// Comments, string and template literals are skipped, and anything nested
/// inside braces, brackets or parentheses is ignored, so keywords that
/// appear in those places never count.
pub fn find_module_declarations(source: &str) -> Vec<ModuleDeclaration> {
    let bytes = source.as_bytes();
    let mut declarations = Vec::new();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = source[i..].find('\n').map_or(bytes.len(), |off| i + off);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = source[i + 2..].find("*/").map_or(bytes.len(), |off| i + 2 + off + 2);
            }
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, quote);
            }
            b'{' | b'(' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            c if is_ident_start(c) => {
                let word_end = bytes[i..]
                    .iter()
                    .position(|&b| !is_ident_char(b))
                    .map_or(bytes.len(), |off| i + off);
                let preceded_by_dot = source[..i].trim_end().ends_with('.');

                if depth == 0 && !preceded_by_dot {
                    if let Some(declaration) = match_declaration(source, i, &source[i..word_end]) {
                        i = declaration.end;
                        declarations.push(declaration);
                        continue;
                    }
                }
                i = word_end;
            }
            _ => i += 1,
        }
    }

    declarations
}

fn match_declaration(source: &str, start: usize, keyword: &str) -> Option<ModuleDeclaration> {
    let (pattern, kind) = match keyword {
        "import" => (&*IMPORT_DECLARATION, DeclarationKind::Import),
        "export" => (&*RE_EXPORT_DECLARATION, DeclarationKind::ReExport),
        _ => return None,
    };

    let caps = pattern.captures(&source[start..])?;
    let whole = caps.get(0)?;
    Some(ModuleDeclaration {
        kind,
        start,
        end: start + whole.end(),
        specifier: caps.get(2)?.as_str().to_string(),
    })
}

/// Index just past the closing quote (or end of line for an unterminated
/// single-line string).
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Changes that add `statement` on its own line after the line holding the
/// last declaration, or at the end of the file when there is none.
///
/// When code or a block comment follows the last declaration on its line,
/// the statement goes directly after the declaration instead, so it can
/// never land inside a comment or literal that opens there.
pub fn add_export_changes(
    source: &str,
    declarations: &[ModuleDeclaration],
    statement: &str,
) -> Vec<StringChange> {
    let anchor = declarations.last().map_or(source.len(), |d| d.end);

    let line_end = source[anchor..].find('\n').map(|off| anchor + off + 1);
    let rest = source[anchor..line_end.unwrap_or(source.len())].trim();

    if !rest.is_empty() && !rest.starts_with("//") {
        return vec![StringChange::Insert {
            index: anchor,
            text: format!("\n{}", statement),
        }];
    }

    let change = match line_end {
        Some(index) => StringChange::Insert {
            index,
            text: format!("{}\n", statement),
        },
        None if source.is_empty() || source.ends_with('\n') => StringChange::Insert {
            index: source.len(),
            text: format!("{}\n", statement),
        },
        None => StringChange::Insert {
            index: source.len(),
            text: format!("\n{}", statement),
        },
    };

    vec![change]
}

/// Whether a re-export of `class_name` as the default export of
/// `import_path` already exists.
pub fn exports_default_as(
    source: &str,
    declarations: &[ModuleDeclaration],
    class_name: &str,
    import_path: &str,
) -> bool {
    let Ok(alias) = Regex::new(&format!(r"\bdefault\s+as\s+{}\b", regex::escape(class_name)))
    else {
        return false;
    };

    let target = import_path.trim_start_matches("./");
    declarations.iter().any(|d| {
        d.kind == DeclarationKind::ReExport
            && d.specifier.trim_start_matches("./") == target
            && alias.is_match(&source[d.start..d.end])
    })
}

/// `index.ts` (or `index.js`) under the project's source root.
pub fn barrel_path(options: &NormalizedComponentOptions) -> String {
    let index = if options.js { "index.js" } else { "index.ts" };
    paths::join_path_fragments(&[options.project_source_root.as_str(), index])
}

/// Import path of `file_path` as seen from the barrel's directory. Always
/// starts with `./` and uses forward slashes.
pub fn relative_import_path(barrel_path: &str, file_path: &str) -> String {
    let relative_dir = paths::relative(&paths::dirname(barrel_path), &paths::dirname(file_path));
    let base = paths::basename(file_path);
    format!(
        "./{}",
        paths::join_path_fragments(&[relative_dir.as_str(), base.as_str()])
    )
}

pub fn export_statement(class_name: &str, import_path: &str) -> String {
    format!("export {{ default as {} }} from '{}';", class_name, import_path)
}

/// Re-export the new component from its project's barrel file.
///
/// Does nothing unless export was requested for a non-application project
/// whose barrel exists.
pub fn add_exports_to_barrel<T: Tree + ?Sized>(
    tree: &mut T,
    options: &NormalizedComponentOptions,
) -> Result<BarrelOutcome> {
    if !options.export {
        return Ok(BarrelOutcome::NotRequested);
    }

    if project::project(tree, &options.project)?.is_application() {
        return Ok(BarrelOutcome::ApplicationProject);
    }

    let path = barrel_path(options);
    let Some(source) = tree.read(&path)? else {
        return Ok(BarrelOutcome::MissingBarrel { path });
    };

    let import_path = relative_import_path(&path, &options.file_path);
    let statement = export_statement(&options.class_name, &import_path);
    let declarations = find_module_declarations(&source);

    if !options.allow_duplicate_exports
        && exports_default_as(&source, &declarations, &options.class_name, &import_path)
    {
        return Ok(BarrelOutcome::AlreadyExported { path });
    }

    let changes = add_export_changes(&source, &declarations, &statement);
    let patched = patch::apply_changes_to_string(&source, &changes)?;
    tree.write(&path, &patched)?;

    log_status!("component", "Exported {} from {}", options.class_name, path);

    Ok(BarrelOutcome::Added { path, statement })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{normalize_options, ComponentOptions};
    use crate::tree::MemoryTree;

    fn kinds(source: &str) -> Vec<(DeclarationKind, String)> {
        find_module_declarations(source)
            .into_iter()
            .map(|d| (d.kind, d.specifier))
            .collect()
    }

    #[test]
    fn scanner_finds_imports_and_re_exports() {
        let source = "import './styles.css';\nimport Foo, { bar } from \"./foo\";\nexport * from './a';\nexport {\n  b,\n  c as d,\n} from './b'\nexport const x = 1;\n";
        assert_eq!(
            kinds(source),
            vec![
                (DeclarationKind::Import, "./styles.css".to_string()),
                (DeclarationKind::Import, "./foo".to_string()),
                (DeclarationKind::ReExport, "./a".to_string()),
                (DeclarationKind::ReExport, "./b".to_string()),
            ]
        );
    }

    #[test]
    fn scanner_ignores_comments_strings_and_nested_code() {
        let source = r#"// export * from './commented';
/* import x from './block'; */
const s = "export * from './string'";
const t = `import y from './template'`;
function f() {
  return import('./dynamic');
}
const m = import.meta.url;
export type { Props } from './types';
"#;
        assert_eq!(
            kinds(source),
            vec![(DeclarationKind::ReExport, "./types".to_string())]
        );
    }

    #[test]
    fn declaration_end_stops_before_trailing_comment() {
        let source = "export * from './a'; // keep me\n";
        let decls = find_module_declarations(source);
        assert_eq!(&source[decls[0].start..decls[0].end], "export * from './a';");
    }

    #[test]
    fn insertion_goes_after_last_declaration_line() {
        let source = "export * from './a';\nexport * from './b'; // note\n\nexport const VERSION = '1';\n";
        let decls = find_module_declarations(source);
        let changes = add_export_changes(source, &decls, "export { default as X } from './x';");
        let out = patch::apply_changes_to_string(source, &changes).unwrap();

        assert_eq!(
            out,
            "export * from './a';\nexport * from './b'; // note\nexport { default as X } from './x';\n\nexport const VERSION = '1';\n"
        );
    }

    #[test]
    fn insertion_handles_missing_trailing_newline_and_empty_files() {
        let stmt = "export { default as X } from './x';";

        let source = "export * from './a';";
        let out = patch::apply_changes_to_string(
            source,
            &add_export_changes(source, &find_module_declarations(source), stmt),
        )
        .unwrap();
        assert_eq!(out, "export * from './a';\nexport { default as X } from './x';");

        let out = patch::apply_changes_to_string("", &add_export_changes("", &[], stmt)).unwrap();
        assert_eq!(out, "export { default as X } from './x';\n");

        let source = "// barrel\n";
        let out = patch::apply_changes_to_string(source, &add_export_changes(source, &[], stmt))
            .unwrap();
        assert_eq!(out, "// barrel\nexport { default as X } from './x';\n");
    }

    #[test]
    fn insertion_never_lands_inside_trailing_block_comment() {
        let source = "export * from './a'; /* legacy\n   exports below */\nexport const X = 1;\n";
        let stmt = "export { default as B } from './b.vue';";
        let out = patch::apply_changes_to_string(
            source,
            &add_export_changes(source, &find_module_declarations(source), stmt),
        )
        .unwrap();

        assert_eq!(
            out,
            "export * from './a';\nexport { default as B } from './b.vue'; /* legacy\n   exports below */\nexport const X = 1;\n"
        );
        let specifiers: Vec<String> = find_module_declarations(&out)
            .into_iter()
            .map(|d| d.specifier)
            .collect();
        assert_eq!(specifiers, vec!["./a", "./b.vue"]);
    }

    #[test]
    fn insertion_after_declaration_followed_by_code_on_same_line() {
        let source = "export * from './a'; const s = `multi\nline`;\n";
        let stmt = "export { default as B } from './b.vue';";
        let out = patch::apply_changes_to_string(
            source,
            &add_export_changes(source, &find_module_declarations(source), stmt),
        )
        .unwrap();

        assert_eq!(
            out,
            "export * from './a';\nexport { default as B } from './b.vue'; const s = `multi\nline`;\n"
        );
    }

    #[test]
    fn relative_import_path_is_dot_prefixed_with_extension() {
        assert_eq!(
            relative_import_path("libs/ui/src/index.ts", "libs/ui/src/lib/my-button/my-button.vue"),
            "./lib/my-button/my-button.vue"
        );
        assert_eq!(
            relative_import_path("libs/ui/src/index.ts", "libs/ui/src/card.vue"),
            "./card.vue"
        );
        assert_eq!(
            relative_import_path("libs/ui/src/index.ts", "libs/ui/components/card.vue"),
            "./../components/card.vue"
        );
    }

    #[test]
    fn existing_export_detection_matches_alias_and_path() {
        let source = "export { default as MyButton } from './lib/my-button/my-button.vue';\n";
        let decls = find_module_declarations(source);

        assert!(exports_default_as(source, &decls, "MyButton", "./lib/my-button/my-button.vue"));
        assert!(!exports_default_as(source, &decls, "MyButtonGroup", "./lib/my-button/my-button.vue"));
        assert!(!exports_default_as(source, &decls, "MyButton", "./lib/other.vue"));
    }

    fn library_tree(index: Option<&str>) -> MemoryTree {
        let tree = MemoryTree::new()
            .with_file(
                "libs/ui/project.json",
                r#"{"name": "ui", "sourceRoot": "libs/ui/src", "projectType": "library"}"#,
            )
            .with_file(
                "apps/shop/project.json",
                r#"{"name": "shop", "sourceRoot": "apps/shop/src", "projectType": "application"}"#,
            )
            .with_file("apps/shop/src/index.ts", "export * from './app';\n");
        match index {
            Some(content) => tree.with_file("libs/ui/src/index.ts", content),
            None => tree,
        }
    }

    fn normalized(tree: &MemoryTree, project: &str, export: bool) -> NormalizedComponentOptions {
        normalize_options(
            tree,
            &ComponentOptions {
                name: "my-button".to_string(),
                project: Some(project.to_string()),
                export,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn adds_export_line_and_preserves_existing_lines() {
        let original = "export * from './lib/card/card.vue';\nexport * from './lib/utils';\n";
        let mut tree = library_tree(Some(original));
        let options = normalized(&tree, "ui", true);

        let outcome = add_exports_to_barrel(&mut tree, &options).unwrap();

        let expected_statement =
            "export { default as MyButton } from './lib/my-button/my-button.vue';";
        assert_eq!(
            outcome,
            BarrelOutcome::Added {
                path: "libs/ui/src/index.ts".to_string(),
                statement: expected_statement.to_string(),
            }
        );
        assert_eq!(
            tree.read("libs/ui/src/index.ts").unwrap().unwrap(),
            format!("{}{}\n", original, expected_statement)
        );
    }

    #[test]
    fn application_project_is_left_untouched() {
        let mut tree = library_tree(None);
        let options = normalized(&tree, "shop", true);

        let outcome = add_exports_to_barrel(&mut tree, &options).unwrap();

        assert_eq!(outcome, BarrelOutcome::ApplicationProject);
        assert_eq!(
            tree.read("apps/shop/src/index.ts").unwrap().as_deref(),
            Some("export * from './app';\n")
        );
    }

    #[test]
    fn export_not_requested_is_a_no_op() {
        let mut tree = library_tree(Some("export * from './a';\n"));
        let options = normalized(&tree, "ui", false);
        assert_eq!(add_exports_to_barrel(&mut tree, &options).unwrap(), BarrelOutcome::NotRequested);
        assert_eq!(
            tree.read("libs/ui/src/index.ts").unwrap().as_deref(),
            Some("export * from './a';\n")
        );
    }

    #[test]
    fn missing_barrel_is_a_no_op() {
        let mut tree = library_tree(None);
        let options = normalized(&tree, "ui", true);

        let outcome = add_exports_to_barrel(&mut tree, &options).unwrap();

        assert_eq!(
            outcome,
            BarrelOutcome::MissingBarrel {
                path: "libs/ui/src/index.ts".to_string()
            }
        );
        assert!(!tree.is_file("libs/ui/src/index.ts"));
    }

    #[test]
    fn js_flag_targets_index_js() {
        let mut tree = library_tree(None).with_file("libs/ui/src/index.js", "");
        let mut options = normalized(&tree, "ui", true);
        options.js = true;

        let outcome = add_exports_to_barrel(&mut tree, &options).unwrap();
        assert!(matches!(outcome, BarrelOutcome::Added { ref path, .. } if path == "libs/ui/src/index.js"));
    }

    #[test]
    fn repeated_run_skips_existing_export_by_default() {
        let mut tree = library_tree(Some("export * from './lib/utils';\n"));
        let options = normalized(&tree, "ui", true);

        add_exports_to_barrel(&mut tree, &options).unwrap();
        let once = tree.read("libs/ui/src/index.ts").unwrap().unwrap();

        let second = add_exports_to_barrel(&mut tree, &options).unwrap();
        assert!(matches!(second, BarrelOutcome::AlreadyExported { .. }));
        assert_eq!(tree.read("libs/ui/src/index.ts").unwrap().unwrap(), once);
    }

    #[test]
    fn repeated_run_duplicates_when_allowed() {
        let mut tree = library_tree(Some("export * from './lib/utils';\n"));
        let mut options = normalized(&tree, "ui", true);
        options.allow_duplicate_exports = true;

        add_exports_to_barrel(&mut tree, &options).unwrap();
        add_exports_to_barrel(&mut tree, &options).unwrap();

        let content = tree.read("libs/ui/src/index.ts").unwrap().unwrap();
        assert_eq!(content.matches("default as MyButton").count(), 2);
        assert!(content.starts_with("export * from './lib/utils';\n"));
    }
}
