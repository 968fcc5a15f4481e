// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph fallback for the PDF path.
//
// The builtin PDF fonts (Helvetica and friends) only cover the WinAnsi
// character set. Every character outside that range — in practice all CJK
// ideographs — is replaced with a `?` placeholder before measuring or
// drawing. This is a documented, intentional degradation of the PDF output,
// not an error condition; the Word path keeps the full glyph range.

/// Placeholder drawn for characters the builtin fonts cannot encode.
pub const PLACEHOLDER: char = '?';

/// Replace every unsupported character in `text` with the placeholder.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if is_supported(c) { c } else { PLACEHOLDER })
        .collect()
}

/// Whether a character is encodable in WinAnsi.
///
/// ASCII and Latin-1 pass through, plus the handful of typographic extras
/// WinAnsi maps into the 0x80..0x9F window.
fn is_supported(c: char) -> bool {
    let code = c as u32;
    if code < 0x80 {
        return true;
    }
    if (0xA0..=0xFF).contains(&code) {
        return true;
    }
    matches!(
        c,
        '\u{20AC}' // euro sign
            | '\u{2018}' | '\u{2019}' | '\u{201A}' // single quotes
            | '\u{201C}' | '\u{201D}' | '\u{201E}' // double quotes
            | '\u{2013}' | '\u{2014}' // en/em dash
            | '\u{2020}' | '\u{2021}' // daggers
            | '\u{2022}' // bullet
            | '\u{2026}' // ellipsis
            | '\u{2030}' // per mille
            | '\u{2039}' | '\u{203A}' // single guillemets
            | '\u{2122}' // trade mark
            | '\u{0152}' | '\u{0153}' // OE ligatures
            | '\u{0160}' | '\u{0161}' | '\u{0178}' | '\u{017D}' | '\u{017E}'
            | '\u{0192}' // florin
            | '\u{02C6}' | '\u{02DC}' // circumflex, small tilde
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(sanitize("Hello, world! 123"), "Hello, world! 123");
    }

    #[test]
    fn latin1_and_typographic_extras_pass_through() {
        assert_eq!(sanitize("café — “quoted” • naïve…"), "café — “quoted” • naïve…");
    }

    #[test]
    fn cjk_becomes_placeholders() {
        assert_eq!(sanitize("机密文件"), "????");
    }

    #[test]
    fn mixed_text_only_replaces_unsupported() {
        assert_eq!(sanitize("report 报告 v2"), "report ?? v2");
    }
}
