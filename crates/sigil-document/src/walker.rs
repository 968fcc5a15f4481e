// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML block walker — normalises markdown-derived HTML into an ordered list
// of typed `DocumentBlock`s using `lol_html` streaming handlers.
//
// Only direct children of the body become blocks; the single exception is
// `li` children of top-level `ul`/`ol` lists. Non-content tags (script,
// style, meta, link) and blocks whose text is empty after trimming are
// dropped. Headings deeper than h3 are classified as `Other`.

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use sigil_core::error::{Result, SigilError};
use sigil_core::types::DocumentBlock;
use tracing::{debug, instrument};

/// Walks an HTML string into semantic blocks.
pub struct HtmlWalker;

/// Block kind captured while streaming, before text finalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Heading(u8),
    Paragraph,
    ListItem(Option<u32>),
    Quote,
    Rule,
    Other,
}

/// List context for the currently open top-level `ul`/`ol`.
struct ListContext {
    ordered: bool,
    next_ordinal: u32,
}

#[derive(Default)]
struct WalkState {
    blocks: Vec<(RawKind, String)>,
    /// Whether incoming text chunks append to the last block.
    collecting: bool,
    list: Option<ListContext>,
}

impl HtmlWalker {
    /// Extract the ordered block list from an HTML string.
    #[instrument(skip_all, fields(html_len = html.len()))]
    pub fn walk(html: &str) -> Result<Vec<DocumentBlock>> {
        // Markdown renderers emit fragments without a body; wrap so the
        // "direct child of body" selectors apply uniformly.
        let wrapped;
        let input = if html.to_ascii_lowercase().contains("<body") {
            html
        } else {
            wrapped = format!("<html><body>{html}</body></html>");
            &wrapped
        };

        let state = Rc::new(RefCell::new(WalkState::default()));

        let dispatch_state = Rc::clone(&state);
        let unordered_state = Rc::clone(&state);
        let ordered_state = Rc::clone(&state);
        let text_state = Rc::clone(&state);

        rewrite_str(
            input,
            RewriteStrSettings {
                element_content_handlers: vec![
                    // Classify each direct child of the body.
                    element!("body > *", move |el| {
                        let tag = el.tag_name().to_ascii_lowercase();
                        let mut state = dispatch_state.borrow_mut();
                        state.list = None;
                        state.collecting = false;

                        match tag.as_str() {
                            "h1" | "h2" | "h3" => {
                                let level = tag.as_bytes()[1] - b'0';
                                state.blocks.push((RawKind::Heading(level), String::new()));
                                state.collecting = true;
                            }
                            "p" => {
                                state.blocks.push((RawKind::Paragraph, String::new()));
                                state.collecting = true;
                            }
                            "blockquote" => {
                                state.blocks.push((RawKind::Quote, String::new()));
                                state.collecting = true;
                            }
                            "hr" => {
                                state.blocks.push((RawKind::Rule, String::new()));
                            }
                            "ul" => {
                                state.list = Some(ListContext {
                                    ordered: false,
                                    next_ordinal: 1,
                                });
                            }
                            "ol" => {
                                state.list = Some(ListContext {
                                    ordered: true,
                                    next_ordinal: 1,
                                });
                            }
                            "script" | "style" | "meta" | "link" => {}
                            // h4..h6 land here too — an explicit scope
                            // limitation, not a bug.
                            _ => {
                                state.blocks.push((RawKind::Other, String::new()));
                                state.collecting = true;
                            }
                        }
                        Ok(())
                    }),
                    // Items of top-level unordered lists carry no ordinal.
                    element!("body > ul > li", move |_el| {
                        let mut state = unordered_state.borrow_mut();
                        state.blocks.push((RawKind::ListItem(None), String::new()));
                        state.collecting = true;
                        Ok(())
                    }),
                    // Items of top-level ordered lists are numbered in
                    // source order, 1-based.
                    element!("body > ol > li", move |_el| {
                        let mut state = ordered_state.borrow_mut();
                        let ordinal = state.list.as_mut().and_then(|ctx| {
                            if ctx.ordered {
                                let n = ctx.next_ordinal;
                                ctx.next_ordinal += 1;
                                Some(n)
                            } else {
                                None
                            }
                        });
                        state
                            .blocks
                            .push((RawKind::ListItem(ordinal), String::new()));
                        state.collecting = true;
                        Ok(())
                    }),
                    // Accumulate text for whichever block is open.
                    text!("body > *", move |chunk| {
                        let mut state = text_state.borrow_mut();
                        if state.collecting {
                            let text = chunk.as_str().to_owned();
                            if let Some((_, buf)) = state.blocks.last_mut() {
                                buf.push_str(&text);
                            }
                        }
                        Ok(())
                    }),
                ],
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|e| SigilError::Conversion(format!("HTML walk failed: {e}")))?;

        let state = Rc::try_unwrap(state)
            .map_err(|_| SigilError::Conversion("walker state still shared".into()))?
            .into_inner();

        let blocks: Vec<DocumentBlock> = state
            .blocks
            .into_iter()
            .filter_map(|(kind, raw)| finalize_block(kind, &raw))
            .collect();

        debug!(count = blocks.len(), "HTML walked into blocks");
        Ok(blocks)
    }
}

/// Decode entities, collapse whitespace, and drop empty blocks.
fn finalize_block(kind: RawKind, raw: &str) -> Option<DocumentBlock> {
    if kind == RawKind::Rule {
        return Some(DocumentBlock::Rule);
    }

    let decoded = html_escape::decode_html_entities(raw);
    let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    Some(match kind {
        RawKind::Heading(level) => DocumentBlock::Heading { level, text },
        RawKind::Paragraph => DocumentBlock::Paragraph { text },
        RawKind::ListItem(ordinal) => DocumentBlock::ListItem { ordinal, text },
        RawKind::Quote => DocumentBlock::Quote { text },
        RawKind::Other => DocumentBlock::Other { text },
        RawKind::Rule => unreachable!(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_basic_tags_in_order() {
        let html = "<h1>Title</h1><p>Body text.</p><hr><blockquote>Quoted</blockquote>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks,
            vec![
                DocumentBlock::Heading {
                    level: 1,
                    text: "Title".into()
                },
                DocumentBlock::Paragraph {
                    text: "Body text.".into()
                },
                DocumentBlock::Rule,
                DocumentBlock::Quote {
                    text: "Quoted".into()
                },
            ]
        );
    }

    #[test]
    fn heading_levels_one_to_three_only() {
        let html = "<h2>Two</h2><h3>Three</h3><h4>Four</h4>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks[0],
            DocumentBlock::Heading {
                level: 2,
                text: "Two".into()
            }
        );
        assert_eq!(
            blocks[1],
            DocumentBlock::Heading {
                level: 3,
                text: "Three".into()
            }
        );
        // h4 is out of the heading scope.
        assert_eq!(blocks[2], DocumentBlock::Other { text: "Four".into() });
    }

    #[test]
    fn ordered_lists_carry_ordinals() {
        let html = "<ol><li>first</li><li>second</li><li>third</li></ol>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks,
            vec![
                DocumentBlock::ListItem {
                    ordinal: Some(1),
                    text: "first".into()
                },
                DocumentBlock::ListItem {
                    ordinal: Some(2),
                    text: "second".into()
                },
                DocumentBlock::ListItem {
                    ordinal: Some(3),
                    text: "third".into()
                },
            ]
        );
    }

    #[test]
    fn unordered_lists_have_no_ordinals() {
        let html = "<ul><li>alpha</li><li>beta</li></ul>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks,
            vec![
                DocumentBlock::ListItem {
                    ordinal: None,
                    text: "alpha".into()
                },
                DocumentBlock::ListItem {
                    ordinal: None,
                    text: "beta".into()
                },
            ]
        );
    }

    #[test]
    fn skips_non_content_tags() {
        let html = "<script>var x = 1;</script><style>.a{}</style><p>kept</p>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(blocks, vec![DocumentBlock::Paragraph { text: "kept".into() }]);
    }

    #[test]
    fn drops_blocks_with_empty_text() {
        let html = "<p>   </p><p>real</p><h2></h2>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(blocks, vec![DocumentBlock::Paragraph { text: "real".into() }]);
    }

    #[test]
    fn inline_markup_flattens_to_plain_text() {
        let html = "<p>Some <strong>bold</strong> and <em>italic</em> text</p>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks,
            vec![DocumentBlock::Paragraph {
                text: "Some bold and italic text".into()
            }]
        );
    }

    #[test]
    fn decodes_html_entities() {
        let html = "<p>Fish &amp; Chips &lt;fresh&gt;</p>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(
            blocks,
            vec![DocumentBlock::Paragraph {
                text: "Fish & Chips <fresh>".into()
            }]
        );
    }

    #[test]
    fn full_document_with_body_is_accepted() {
        let html = "<html><head><title>t</title></head><body><p>inside</p></body></html>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(blocks, vec![DocumentBlock::Paragraph { text: "inside".into() }]);
    }

    #[test]
    fn cjk_text_survives_walking_unchanged() {
        let html = "<p>机密文件</p>";
        let blocks = HtmlWalker::walk(html).expect("walk");
        assert_eq!(blocks, vec![DocumentBlock::Paragraph { text: "机密文件".into() }]);
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        let blocks = HtmlWalker::walk("").expect("walk");
        assert!(blocks.is_empty());
    }
}
