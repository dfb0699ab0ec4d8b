use super::document::{Block, Document};

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

pub(super) fn render(doc: &Document) -> String {
    let mut out = format!("# {}\n\n", doc.title);
    for (label, value) in &doc.header {
        out.push_str(&format!("- **{label}:** {value}\n"));
    }

    for section in &doc.sections {
        out.push_str(&format!("\n## {}\n", section.title));
        for block in &section.blocks {
            out.push('\n');
            match block {
                Block::Subheading(text) => out.push_str(&format!("### {text}\n")),
                Block::Paragraph(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                Block::Fields(fields) => {
                    for (label, value) in fields {
                        out.push_str(&format!("- **{label}:** {value}\n"));
                    }
                }
                Block::Table { headers, rows } => {
                    let head: Vec<String> = headers.iter().map(|h| cell(h)).collect();
                    out.push_str(&format!("| {} |\n", head.join(" | ")));
                    out.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
                    for row in rows {
                        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
                        out.push_str(&format!("| {} |\n", cells.join(" | ")));
                    }
                }
                Block::Bullets(items) => {
                    for item in items {
                        out.push_str(&format!("- {item}\n"));
                    }
                }
                Block::Code { language, text } => {
                    out.push_str(&format!("```{language}\n{}", text));
                    if !text.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n");
                }
            }
        }
    }
    out
}
