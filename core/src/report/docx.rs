use anyhow::{Result, anyhow};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;

pub const REPORT_TITLE: &str = "Healthcare Diagnosis and Treatment Recommendations";

const TITLE_STYLE: &str = "Title";
const SECTION_STYLE: &str = "Heading2";

/// Drops characters XML 1.0 cannot carry; Word refuses documents containing them.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

fn plain(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(xml_safe(text)))
}

fn styled(text: &str, style: &str) -> Paragraph {
    plain(text).style(style)
}

/// Renders `content` under the report title. Lines starting with `## ` become
/// section headings; every other non-blank line becomes its own paragraph.
pub fn generate_docx(content: &str) -> Result<Vec<u8>> {
    let mut docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(56)
                .bold(),
        )
        .add_style(
            Style::new(SECTION_STYLE, StyleType::Paragraph)
                .name("Heading 2")
                .size(32)
                .bold(),
        )
        .add_paragraph(styled(REPORT_TITLE, TITLE_STYLE));

    for line in content.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            continue;
        }
        docx = match line.strip_prefix("## ") {
            Some(heading) => docx.add_paragraph(styled(heading.trim(), SECTION_STYLE)),
            None => docx.add_paragraph(plain(line)),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| anyhow!("Failed to write DOCX document: {}", e))?;

    Ok(buffer.into_inner())
}
