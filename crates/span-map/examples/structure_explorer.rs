//! Structure explorer example
//!
//! Feeds edits to a `SourceStructure` backed by a small line-oriented parser
//! and shows when positions are patched versus reparsed.

use span_map::{NodeKind, OffsetIndex, SourceStructure, SpanNode, StructureParser, TreeBuilder};

/// Lines ending in `{` open a method until the matching `}` line; other
/// non-empty lines become statements.
struct BlockLineParser;

impl StructureParser for BlockLineParser {
    type Error = String;

    fn parse(&mut self, text: &str) -> Result<SpanNode, String> {
        let index = OffsetIndex::from_text(text);

        // Pair every `{` line with its closing `}` line first.
        let mut closes: Vec<Option<usize>> = vec![None; index.line_count()];
        let mut stack = Vec::new();
        for line in 0..index.line_count() {
            let Some(body) = index.line_text(line) else {
                continue;
            };
            let trimmed = body.trim();
            if trimmed.ends_with('{') {
                stack.push(line);
            } else if trimmed == "}" {
                let open = stack
                    .pop()
                    .ok_or_else(|| format!("stray }} on line {line}"))?;
                closes[open] = Some(line);
            }
        }
        if let Some(open) = stack.pop() {
            return Err(format!("unclosed block opened on line {open}"));
        }

        let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, index.char_count());
        build_region(&mut builder, &index, &closes, 0, index.line_count())?;
        builder.finish().map_err(|e| e.to_string())
    }
}

fn content_span(index: &OffsetIndex, line: usize) -> Option<(usize, usize)> {
    let body = index.line_text(line)?;
    let line_start = index.position_to_char(line, 0)?;
    let indent = body.chars().count() - body.trim_start().chars().count();
    let end = line_start + body.trim_end().chars().count();
    Some((line_start + indent, end))
}

fn build_region(
    builder: &mut TreeBuilder,
    index: &OffsetIndex,
    closes: &[Option<usize>],
    from_line: usize,
    to_line: usize,
) -> Result<(), String> {
    let mut line = from_line;
    while line < to_line {
        let Some(body) = index.line_text(line) else {
            break;
        };
        if body.trim().is_empty() {
            line += 1;
            continue;
        }
        let Some((start, line_end)) = content_span(index, line) else {
            break;
        };
        if body.trim().ends_with('{') {
            let close = closes[line].ok_or("unpaired block")?;
            let (_, end) = content_span(index, close).ok_or("missing close line")?;
            builder
                .open(NodeKind::Method, start, end)
                .map_err(|e| e.to_string())?;
            build_region(builder, index, closes, line + 1, close)?;
            builder.close().map_err(|e| e.to_string())?;
            line = close + 1;
        } else {
            builder
                .leaf(NodeKind::Statement, start, line_end)
                .map_err(|e| e.to_string())?;
            line += 1;
        }
    }
    Ok(())
}

fn print_outline(structure: &SourceStructure<BlockLineParser>) {
    for entry in structure.outline().entries() {
        println!(
            "  {}{} [{}..{})",
            "  ".repeat(entry.depth),
            entry.kind,
            entry.start,
            entry.end
        );
    }
}

fn main() {
    println!("=== 源码结构浏览示例 ===\n");

    let doc = "fn add() {\n    total = total + 1;\n}\n\nfn reset() {\n    total = 0;\n}\n";
    let mut structure = SourceStructure::new(BlockLineParser);
    structure.reparse(doc);

    println!("1. 初始结构：");
    print_outline(&structure);

    // 在语句内部打字：只做位置修补
    println!("\n2. 在第一条语句内插入 \"_x\"：");
    let doc2 = {
        let mut s = doc.to_string();
        s.insert_str(20, "_x");
        s
    };
    let mode = structure.text_inserted(20, "_x", &doc2);
    println!("  更新方式: {mode:?}");
    if let Some(span) = structure.node_at(20) {
        println!("  语句跨度变为 [{}..{})", span.start(), span.end());
    }

    // 在两个函数之间插入新语句：落入间隙，整树重建
    println!("\n3. 在函数之间插入 \"print();\" 一行：");
    let doc3 = {
        let mut s = doc2.clone();
        s.insert_str(38, "print();\n");
        s
    };
    let mode = structure.text_inserted(38, "print();\n", &doc3);
    println!("  更新方式: {mode:?}");
    print_outline(&structure);

    // 点查询与路径查询
    println!("\n4. 查询偏移 25 所在的节点链：");
    for span in structure.path_to(25) {
        println!("  {} [{}..{})", span.kind(), span.start(), span.end());
    }

    println!("\n5. 文档版本: {}", structure.version());
}
