// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paginating PDF renderer — walks the block list with a top-origin vertical
// cursor, breaks pages, and emits printpdf 0.8 `Op` lists.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. The layout pass is kept separate from serialisation
// so the per-page op lists can be inspected directly.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, Rgb, TextItem, TextMatrix,
};
use sigil_core::error::Result;
use sigil_core::types::{DocumentBlock, StyleConfig, WatermarkConfig};
use tracing::{debug, info, instrument};

use super::glyphs;
use crate::watermark::WatermarkPlanner;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.4;
/// Left indent for list items, in pt.
const LIST_INDENT: f32 = 18.0;
/// Left indent for blockquote text, in pt.
const QUOTE_INDENT: f32 = 14.0;
/// Vertical space consumed by a horizontal rule, in pt.
const RULE_GAP: f32 = 16.0;

/// Muted gray used for blockquote text and rules.
const MUTED: (f32, f32, f32) = (0.42, 0.45, 0.50);

/// Bold/regular/oblique builtin font triple resolved from `StyleConfig`.
#[derive(Clone, Copy)]
struct FontSet {
    regular: BuiltinFont,
    bold: BuiltinFont,
    oblique: BuiltinFont,
}

/// Renders a block list into paginated PDF bytes.
pub struct PdfPaginator<'a> {
    style: &'a StyleConfig,
    watermark: &'a WatermarkConfig,
}

impl<'a> PdfPaginator<'a> {
    pub fn new(style: &'a StyleConfig, watermark: &'a WatermarkConfig) -> Self {
        Self { style, watermark }
    }

    /// Render the document and return `(pdf_bytes, page_count)`.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn render(&self, blocks: &[DocumentBlock], title: &str) -> Result<(Vec<u8>, usize)> {
        let page_ops = self.layout(blocks);
        let page_count = page_ops.len();

        let page_w = Mm(self.style.page_width * MM_PER_PT);
        let page_h = Mm(self.style.page_height * MM_PER_PT);

        let mut doc = PdfDocument::new(title);
        let pages: Vec<PdfPage> = page_ops
            .into_iter()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        info!(pages = page_count, bytes = bytes.len(), "PDF rendered");
        Ok((bytes, page_count))
    }

    /// Lay out all blocks into per-page op lists (watermark included).
    fn layout(&self, blocks: &[DocumentBlock]) -> Vec<Vec<Op>> {
        let fonts = resolve_fonts(&self.style.font_family);
        let mut run = LayoutRun {
            style: self.style,
            watermark: self.watermark,
            fonts,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor_y: self.style.margins.top,
        };
        run.ops = run.page_start_ops();

        for block in blocks {
            // Page-break rule: checked before rendering the next block.
            if run.cursor_y > run.limit() {
                run.break_page();
            }
            run.emit_block(block);
        }

        run.pages.push(run.ops);
        debug!(pages = run.pages.len(), "layout complete");
        run.pages
    }
}

/// Mutable state of one layout pass.
struct LayoutRun<'a> {
    style: &'a StyleConfig,
    watermark: &'a WatermarkConfig,
    fonts: FontSet,
    pages: Vec<Vec<Op>>,
    ops: Vec<Op>,
    cursor_y: f32,
}

impl LayoutRun<'_> {
    /// Lowest cursor position content may occupy.
    fn limit(&self) -> f32 {
        self.style.page_height - self.style.margins.bottom
    }

    /// Finish the current page and open a fresh one with its watermark.
    fn break_page(&mut self) {
        let start = self.page_start_ops();
        let ops = std::mem::replace(&mut self.ops, start);
        self.pages.push(ops);
        self.cursor_y = self.style.margins.top;
    }

    /// Ops every page starts with: the watermark layer, then a fill reset
    /// so content renders black.
    fn page_start_ops(&self) -> Vec<Op> {
        // The watermark is per-page; the plan is re-computed for each page
        // and is identical every time because the planner is deterministic.
        let plan = WatermarkPlanner::plan(
            self.watermark,
            self.style.page_width,
            self.style.page_height,
        );

        let mut ops = Vec::new();
        for instr in &plan {
            let (r, g, b) = instr.color.rgb();
            // Opacity is approximated by blending toward paper white; the
            // builtin-font path carries no ExtGState.
            let a = instr.opacity;
            ops.push(Op::SetFillColor {
                col: Color::Rgb(Rgb {
                    r: 1.0 - (1.0 - r) * a,
                    g: 1.0 - (1.0 - g) * a,
                    b: 1.0 - (1.0 - b) * a,
                    icc_profile: None,
                }),
            });
            ops.push(Op::StartTextSection);
            // Planner coordinates are top-origin and CSS rotation is
            // clockwise; PDF space is bottom-origin with counter-clockwise
            // rotation, so both flip here.
            ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::TranslateRotate(
                    Pt(instr.x),
                    Pt(self.style.page_height - instr.y),
                    -instr.rotation,
                ),
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(self.watermark.font_size),
                font: self.fonts.regular,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(glyphs::sanitize(&instr.text))],
                font: self.fonts.regular,
            });
            ops.push(Op::EndTextSection);
        }

        ops.push(Op::SetFillColor { col: rgb(0.0, 0.0, 0.0) });
        ops
    }

    // -- Block rendering ------------------------------------------------------

    fn emit_block(&mut self, block: &DocumentBlock) {
        match block {
            DocumentBlock::Heading { level, text } => self.emit_heading(*level, text),
            DocumentBlock::Paragraph { text } | DocumentBlock::Other { text } => {
                self.emit_paragraph(text);
            }
            DocumentBlock::ListItem { ordinal, text } => self.emit_list_item(*ordinal, text),
            DocumentBlock::Quote { text } => self.emit_quote(text),
            DocumentBlock::Rule => self.emit_rule(),
        }
    }

    fn emit_heading(&mut self, level: u8, text: &str) {
        let size = heading_size(level);
        let text = glyphs::sanitize(text);
        // Extra leading above, largest for level 1.
        self.cursor_y += size * 0.8;
        self.ensure_room(size);

        let x = if level == 1 {
            // Level 1 headings are horizontally centered.
            let width = estimate_width(&text, size);
            (self.style.margins.left + (self.style.content_width() - width) / 2.0)
                .max(self.style.margins.left)
        } else {
            self.style.margins.left
        };

        self.cursor_y += size;
        self.write_line(x, size, self.fonts.bold, text.clone());

        if level == 2 {
            // Level 2 headings are underlined across their own text width.
            let width = estimate_width(&text, size);
            let y = self.cursor_y + 3.0;
            self.draw_rule_line(x, y, x + width, y, 0.8, rgb(0.0, 0.0, 0.0));
        }

        self.cursor_y += size * 0.5;
    }

    fn emit_paragraph(&mut self, text: &str) {
        let size = self.style.font_size;
        let text = glyphs::sanitize(text);
        let max_chars = chars_per_line(self.style.content_width(), size);

        for line in wrap_text(&text, max_chars) {
            self.ensure_room(size * LINE_SPACING);
            self.cursor_y += size * LINE_SPACING;
            self.write_line(self.style.margins.left, size, self.fonts.regular, line);
        }
        self.cursor_y += size * 0.5;
    }

    fn emit_list_item(&mut self, ordinal: Option<u32>, text: &str) {
        let size = self.style.font_size;
        let prefix = match ordinal {
            Some(n) => format!("{n}. "),
            None => "\u{2022} ".into(),
        };
        let text = glyphs::sanitize(&format!("{prefix}{text}"));
        let x = self.style.margins.left + LIST_INDENT;
        let max_chars = chars_per_line(self.style.content_width() - LIST_INDENT, size);

        for line in wrap_text(&text, max_chars) {
            self.ensure_room(size * LINE_SPACING);
            self.cursor_y += size * LINE_SPACING;
            self.write_line(x, size, self.fonts.regular, line);
        }
        self.cursor_y += size * 0.25;
    }

    fn emit_quote(&mut self, text: &str) {
        let size = self.style.font_size;
        let text = glyphs::sanitize(text);
        let bar_x = self.style.margins.left + 2.0;
        let x = self.style.margins.left + QUOTE_INDENT;
        let max_chars = chars_per_line(self.style.content_width() - QUOTE_INDENT, size);

        for line in wrap_text(&text, max_chars) {
            self.ensure_room(size * LINE_SPACING);
            self.cursor_y += size * LINE_SPACING;
            // One bar segment per line keeps the bar intact across page
            // breaks; adjacent segments join up visually.
            self.draw_rule_line(
                bar_x,
                self.cursor_y - size,
                bar_x,
                self.cursor_y + size * 0.3,
                1.5,
                rgb(MUTED.0, MUTED.1, MUTED.2),
            );
            self.ops.push(Op::SetFillColor {
                col: rgb(MUTED.0, MUTED.1, MUTED.2),
            });
            self.write_line(x, size, self.fonts.oblique, line);
            self.ops.push(Op::SetFillColor { col: rgb(0.0, 0.0, 0.0) });
        }
        self.cursor_y += size * 0.5;
    }

    fn emit_rule(&mut self) {
        self.ensure_room(RULE_GAP);
        let y = self.cursor_y + RULE_GAP / 2.0;
        self.draw_rule_line(
            self.style.margins.left,
            y,
            self.style.page_width - self.style.margins.right,
            y,
            0.8,
            rgb(MUTED.0, MUTED.1, MUTED.2),
        );
        self.cursor_y += RULE_GAP;
    }

    // -- Low-level emission ---------------------------------------------------

    /// Break the page if the next line of `height` pt would cross the
    /// bottom margin.
    fn ensure_room(&mut self, height: f32) {
        if self.cursor_y + height > self.limit() {
            self.break_page();
        }
    }

    /// Place one line of text with its baseline at the current cursor.
    fn write_line(&mut self, x: f32, size: f32, font: BuiltinFont, text: String) {
        let y = self.style.page_height - self.cursor_y;
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Draw a straight line between two top-origin points.
    fn draw_rule_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, col: Color) {
        let h = self.style.page_height;
        self.ops.push(Op::SetOutlineColor { col });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    LinePoint {
                        p: Point {
                            x: Pt(x1),
                            y: Pt(h - y1),
                        },
                        bezier: false,
                    },
                    LinePoint {
                        p: Point {
                            x: Pt(x2),
                            y: Pt(h - y2),
                        },
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }
}

// -- Metrics helpers ----------------------------------------------------------

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 18.0,
        2 => 16.0,
        _ => 14.0,
    }
}

fn resolve_fonts(family: &str) -> FontSet {
    let family = family.to_ascii_lowercase();
    if family.contains("times") || family.contains("serif") {
        FontSet {
            regular: BuiltinFont::TimesRoman,
            bold: BuiltinFont::TimesBold,
            oblique: BuiltinFont::TimesItalic,
        }
    } else if family.contains("courier") || family.contains("mono") {
        FontSet {
            regular: BuiltinFont::Courier,
            bold: BuiltinFont::CourierBold,
            oblique: BuiltinFont::CourierOblique,
        }
    } else {
        FontSet {
            regular: BuiltinFont::Helvetica,
            bold: BuiltinFont::HelveticaBold,
            oblique: BuiltinFont::HelveticaOblique,
        }
    }
}

/// Average Helvetica glyph width is roughly half the font size.
fn avg_char_width(size: f32) -> f32 {
    0.5 * size
}

fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * avg_char_width(size)
}

fn chars_per_line(width: f32, size: f32) -> usize {
    ((width / avg_char_width(size)) as usize).max(1)
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

/// Word-wrap `text` so no line exceeds `max_chars` characters.
///
/// Words longer than `max_chars` are force-broken at character boundaries.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                let piece: String = chunk.iter().collect();
                if chunk.len() == max_chars {
                    lines.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
            continue;
        }

        if current.is_empty() {
            current = word.to_owned();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
