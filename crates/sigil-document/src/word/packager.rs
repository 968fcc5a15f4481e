// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word packager — converts the semantic block list into a Word-compatible
// HTML envelope.
//
// The watermark is expressed as absolutely positioned, rotated text layers
// beneath the content, produced from the same planner output as the PDF
// path so the two outputs stay visually consistent for a given config.
// Unlike the PDF path there is NO glyph fallback here: the word-processor
// format supports the full Unicode range, and the asymmetry between the two
// outputs is contractual.
//
// Page flow is delegated to the word processor's own reflow; this component
// has no manual page-break logic.

use sigil_core::error::Result;
use sigil_core::types::{DocumentBlock, StyleConfig, WatermarkConfig};
use tracing::{debug, instrument};

use super::envelope;
use crate::watermark::WatermarkPlanner;

/// Fixed heading point sizes for levels 1..=4.
const HEADING_PT: [u32; 4] = [18, 16, 14, 12];

/// Builds the word-processor package from a block list.
pub struct WordPackager<'a> {
    style: &'a StyleConfig,
    watermark: &'a WatermarkConfig,
}

impl<'a> WordPackager<'a> {
    pub fn new(style: &'a StyleConfig, watermark: &'a WatermarkConfig) -> Self {
        Self { style, watermark }
    }

    /// Produce the final word-processor package bytes.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn package(&self, blocks: &[DocumentBlock], title: &str) -> Result<Vec<u8>> {
        let html = self.build_envelope_html(blocks, title);
        let bytes = envelope::package_mhtml(&html);
        debug!(html_len = html.len(), bytes = bytes.len(), "Word package built");
        Ok(bytes)
    }

    /// Assemble the Word-HTML envelope document.
    fn build_envelope_html(&self, blocks: &[DocumentBlock], title: &str) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str(
            "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
             xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
             xmlns=\"http://www.w3.org/TR/REC-html40\">\n<head>\n\
             <meta charset=\"utf-8\">\n<title>",
        );
        html.push_str(&escape(title));
        html.push_str("</title>\n");
        html.push_str(&self.page_style());
        html.push_str("</head>\n<body>\n");

        html.push_str(&self.watermark_layer());

        for block in blocks {
            html.push_str(&render_block(block));
            html.push('\n');
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// `@page` geometry and base typography from the style config.
    fn page_style(&self) -> String {
        let s = self.style;
        format!(
            "<style>\n\
             @page {{ size: {:.2}pt {:.2}pt; margin: {:.2}pt {:.2}pt {:.2}pt {:.2}pt; }}\n\
             body {{ font-family: {}; font-size: {:.1}pt; }}\n\
             </style>\n",
            s.page_width,
            s.page_height,
            s.margins.top,
            s.margins.right,
            s.margins.bottom,
            s.margins.left,
            escape(&s.font_family),
            s.font_size,
        )
    }

    /// Absolutely positioned watermark text layers, beneath the content.
    fn watermark_layer(&self) -> String {
        let plan = WatermarkPlanner::plan(
            self.watermark,
            self.style.page_width,
            self.style.page_height,
        );

        let mut layer = String::new();
        for instr in &plan {
            layer.push_str(&format!(
                "<div style=\"position:absolute;left:{:.1}pt;top:{:.1}pt;\
                 transform:rotate({:.1}deg);opacity:{:.2};color:{};\
                 font-size:{:.1}px;white-space:nowrap;z-index:-1;\">{}</div>\n",
                instr.x,
                instr.y,
                instr.rotation,
                instr.opacity,
                instr.color.hex(),
                self.watermark.font_size,
                escape(&instr.text),
            ));
        }
        layer
    }
}

/// Render one block as Word-HTML. Full Unicode passes through unchanged.
fn render_block(block: &DocumentBlock) -> String {
    match block {
        DocumentBlock::Heading { level, text } => {
            let level = (*level).clamp(1, 4);
            let pt = HEADING_PT[usize::from(level - 1)];
            format!(
                "<h{level} style=\"font-size:{pt}pt;\">{}</h{level}>",
                escape(text)
            )
        }
        DocumentBlock::Paragraph { text } | DocumentBlock::Other { text } => {
            format!("<p>{}</p>", escape(text))
        }
        DocumentBlock::ListItem { ordinal, text } => {
            let prefix = match ordinal {
                Some(n) => format!("{n}. "),
                None => "\u{2022} ".into(),
            };
            format!(
                "<p style=\"margin-left:18pt;\">{prefix}{}</p>",
                escape(text)
            )
        }
        DocumentBlock::Quote { text } => format!(
            "<p style=\"border-left:3pt solid #9ca3af;padding-left:8pt;\
             color:#6b7280;font-style:italic;\">{}</p>",
            escape(text)
        ),
        DocumentBlock::Rule => "<hr>".into(),
    }
}

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}
