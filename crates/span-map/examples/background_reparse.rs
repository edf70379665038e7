//! Background reparse example
//!
//! Runs the parser on a worker thread and uses reparse tickets so results
//! that raced with newer edits are discarded instead of installed.

use std::sync::mpsc;
use std::thread;

use span_map::{
    NodeKind, ReparsePolicy, SourceStructure, SpanNode, StructureConfig, StructureParser,
    TreeBuilder, UpdateMode,
};

fn build_line_tree(text: &str) -> Result<SpanNode, String> {
    let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, text.chars().count());
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches('\n').chars().count();
        if body > 0 {
            builder
                .leaf(NodeKind::Statement, offset, offset + body)
                .map_err(|e| e.to_string())?;
        }
        offset += line.chars().count();
    }
    builder.finish().map_err(|e| e.to_string())
}

struct LineParser;

impl StructureParser for LineParser {
    type Error = String;

    fn parse(&mut self, text: &str) -> Result<SpanNode, String> {
        build_line_tree(text)
    }
}

/// Parse a snapshot on a worker thread and hand the result back.
fn parse_in_background(snapshot: String) -> Result<SpanNode, String> {
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        tx.send(build_line_tree(&snapshot)).ok();
    });
    let result = rx.recv().unwrap_or_else(|_| Err("worker died".to_string()));
    let _ = worker.join();
    result
}

fn main() {
    println!("=== 后台重建示例 ===\n");

    let doc0 = "alpha;\nbeta;\ngamma;\n";
    let config = StructureConfig::new().with_reparse_policy(ReparsePolicy::Deferred);
    let mut structure = SourceStructure::with_config(LineParser, config);
    structure.reparse(doc0);
    println!("1. 初始解析完成，共 {} 个节点", structure.outline().len());

    // 间隙编辑：推迟重建，树标记为过期
    let doc1 = "alpha;;\nbeta;\ngamma;\n";
    let mode = structure.text_inserted(6, ";", doc1);
    println!("\n2. 间隙插入 -> {mode:?}（需要重建: {}）", structure.needs_reparse());

    // 发起后台重建
    let ticket = structure.begin_reparse();
    println!("\n3. 签发重建票据（版本 {}）", ticket.version());
    let in_flight = doc1.to_string();

    // 后台解析期间又来了一次编辑
    let doc2 = "axlpha;;\nbeta;\ngamma;\n";
    let mode = structure.text_inserted(1, "x", doc2);
    println!("4. 解析期间的新编辑 -> {mode:?}（版本 {}）", structure.version());

    // 旧票据的结果作废
    let result = parse_in_background(in_flight);
    let mode = structure.complete_reparse(ticket, result);
    println!("\n5. 提交旧票据结果 -> {mode:?}");

    // 针对最新文本重新走一遍
    let ticket = structure.begin_reparse();
    let result = parse_in_background(doc2.to_string());
    let mode = structure.complete_reparse(ticket, result);
    println!("6. 提交新票据结果 -> {mode:?}（需要重建: {}）", structure.needs_reparse());

    println!("\n7. 最终结构：");
    for entry in structure.outline().entries() {
        println!("  {} [{}..{})", entry.kind, entry.start, entry.end);
    }
    if mode != UpdateMode::FullReparse {
        println!("  （意外的更新方式）");
    }
}
