use span_map::{NodeKind, Outline, SourceStructure, StructureParser, UpdateMode};
use span_map_treesitter::{
    TreeSitterStructureConfig, TreeSitterStructureError, TreeSitterStructureParser,
};
use tree_sitter_rust::LANGUAGE;

fn rust_parser() -> TreeSitterStructureParser {
    TreeSitterStructureParser::new(TreeSitterStructureConfig::rust_items(LANGUAGE.into())).unwrap()
}

#[test]
fn test_parser_builds_nested_structure_from_fixture() {
    let text = include_str!("fixtures/rust_sample.rs");
    let mut parser = rust_parser();
    let root = parser.parse(text).unwrap();

    assert_eq!(root.kind(), NodeKind::CompilationUnit);
    assert_eq!(root.size(), text.chars().count());

    let outline = Outline::from_root(&root);
    let shape: Vec<(NodeKind, usize)> = outline
        .entries()
        .iter()
        .map(|e| (e.kind, e.depth))
        .collect();
    assert_eq!(
        shape,
        vec![
            (NodeKind::Comment, 0),
            (NodeKind::TypeDefinition, 0),
            (NodeKind::Field, 1),
            (NodeKind::Field, 1),
            (NodeKind::Method, 0),
            (NodeKind::Block, 1),
            (NodeKind::Statement, 2),
            (NodeKind::Statement, 2),
        ]
    );

    // The fixture is ASCII, so byte and char offsets agree.
    let field = outline.find_by_kind(NodeKind::Field).next().unwrap();
    assert_eq!(field.start, text.find("x: i32").unwrap());
    assert_eq!(field.end, field.start + "x: i32".len());

    let method = outline.find_by_kind(NodeKind::Method).next().unwrap();
    assert_eq!(method.start, text.find("fn length").unwrap());
    assert_eq!(method.end, text.rfind('}').unwrap() + 1);

    let block = outline.find_by_kind(NodeKind::Block).next().unwrap();
    assert_eq!(block.start, text.find("{\n    let dx").unwrap());
    assert_eq!(block.end, method.end);
}

#[test]
fn test_drives_source_structure_incrementally() {
    let text = include_str!("fixtures/rust_sample.rs");
    let mut structure = SourceStructure::new(rust_parser());

    assert_eq!(structure.reparse(text), UpdateMode::Initial);

    // Rename `dx` to `dxx`: interior to one `let` statement, so the span
    // tree is patched without another parse.
    let offset = text.find("dx =").unwrap() + 1;
    let mut edited = String::from(text);
    edited.insert(offset, 'x');
    assert_eq!(
        structure.text_inserted(offset, "x", &edited),
        UpdateMode::Incremental
    );
    assert_eq!(structure.kind_at(offset), Some(NodeKind::Statement));

    let stmt = structure.node_at(offset).unwrap();
    assert_eq!(stmt.size(), "let dxx = p.x as f64;".len());

    // Appending a new item lands past every tracked child, which forces a
    // real parse.
    let end = edited.chars().count();
    let added = "\nfn zero() -> i32 { 0 }\n";
    let appended = format!("{edited}{added}");
    assert_eq!(
        structure.text_inserted(end, added, &appended),
        UpdateMode::FullReparse
    );
    assert_eq!(
        structure.outline().find_by_kind(NodeKind::Method).count(),
        2
    );
}

#[test]
fn test_multibyte_text_maps_byte_ranges_to_char_offsets() {
    let text = "// 注释\nfn 计算() {\n    let 值 = 1;\n}\n";
    let mut parser = rust_parser();
    let root = parser.parse(text).unwrap();

    assert_eq!(root.size(), text.chars().count());
    assert_eq!(root.size(), 33);

    let outline = Outline::from_root(&root);
    let comment = outline.find_by_kind(NodeKind::Comment).next().unwrap();
    assert_eq!((comment.start, comment.end), (0, 5));

    let method = outline.find_by_kind(NodeKind::Method).next().unwrap();
    assert_eq!((method.start, method.end), (6, 32));

    let block = outline.find_by_kind(NodeKind::Block).next().unwrap();
    assert_eq!((block.start, block.end), (14, 32));

    let stmt = outline.find_by_kind(NodeKind::Statement).next().unwrap();
    assert_eq!((stmt.start, stmt.end), (20, 30));
}

#[test]
fn test_invalid_query_is_reported() {
    let config =
        TreeSitterStructureConfig::new(LANGUAGE.into(), "(this_node_does_not_exist) @type");
    let Err(err) = TreeSitterStructureParser::new(config) else {
        panic!("query should not compile");
    };
    assert!(matches!(err, TreeSitterStructureError::Query(_)));
}
