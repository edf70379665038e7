use span_map::SourceStructure;
use span_map_treesitter::{TreeSitterStructureConfig, TreeSitterStructureParser};
use tree_sitter_rust::LANGUAGE;

fn print_outline(structure: &SourceStructure<TreeSitterStructureParser>) {
    for entry in structure.outline().entries() {
        println!(
            "  {}{} [{}, {})",
            "  ".repeat(entry.depth),
            entry.kind,
            entry.start,
            entry.end
        );
    }
}

fn main() {
    let doc = r#"// demo
struct Counter {
    count: u32,
}

fn bump(c: &mut Counter) {
    let next = c.count + 1;
    c.count = next;
}
"#;

    let parser =
        TreeSitterStructureParser::new(TreeSitterStructureConfig::rust_items(LANGUAGE.into()))
            .expect("init tree-sitter");
    let mut structure = SourceStructure::new(parser);

    structure.reparse(doc);
    println!("outline after the initial parse:");
    print_outline(&structure);

    // Typing inside one `let` statement: the span tree is patched in place.
    let offset = doc.find("next =").expect("fixture text") + 4;
    let mut text = String::from(doc);
    text.insert_str(offset, "_id");
    let mode = structure.text_inserted(offset, "_id", &text);
    println!("\nrenamed a local: {mode:?}");

    // A new statement line lands in the gap between two tracked statements,
    // so the structure is re-read from a fresh parse.
    let gap = text.find("+ 1;").expect("fixture text") + 4;
    let line = "\n    let again = next_id;";
    let mut text2 = text.clone();
    text2.insert_str(gap, line);
    let mode = structure.text_inserted(gap, line, &text2);
    println!("added a statement: {mode:?}");

    println!("\noutline after {} edits:", structure.version());
    print_outline(&structure);

    let inside = text2.find("count + 1").expect("fixture text");
    let path: Vec<String> = structure
        .path_to(inside)
        .iter()
        .map(|span| span.kind().to_string())
        .collect();
    println!("\npath to offset {}: {}", inside, path.join(" > "));
}
