// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MHTML envelope writer — the lowest-level word-processor package encoder.
//
// Word opens MIME multipart/related containers whose root part is an HTML
// document. The envelope uses a fixed boundary and base64 body so that the
// bytes for a given HTML input are fully deterministic.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Fixed multipart boundary. Deterministic output requires a constant.
const BOUNDARY: &str = "----=_NextPart_SIGIL_DOC";

/// Root part location referenced by the MIME headers.
const ROOT_LOCATION: &str = "file:///C:/sigil/document.html";

/// Wrap a Word-HTML document into the MHTML package bytes.
pub fn package_mhtml(html: &str) -> Vec<u8> {
    let encoded = STANDARD.encode(html.as_bytes());

    let mut out = String::with_capacity(encoded.len() + 512);
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str(&format!(
        "Content-Type: multipart/related; boundary=\"{BOUNDARY}\"\r\n\r\n"
    ));

    out.push_str(&format!("--{BOUNDARY}\r\n"));
    out.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
    out.push_str("Content-Transfer-Encoding: base64\r\n");
    out.push_str(&format!("Content-Location: {ROOT_LOCATION}\r\n\r\n"));

    // RFC 2045 asks for base64 lines no longer than 76 characters. The
    // alphabet is ASCII, so byte slicing is safe here.
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(76));
        out.push_str(line);
        out.push_str("\r\n");
        rest = tail;
    }

    out.push_str(&format!("\r\n--{BOUNDARY}--\r\n"));
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_deterministic() {
        let a = package_mhtml("<html><body>x</body></html>");
        let b = package_mhtml("<html><body>x</body></html>");
        assert_eq!(a, b);
    }

    #[test]
    fn envelope_carries_mime_headers_and_boundary() {
        let bytes = package_mhtml("<html></html>");
        let text = String::from_utf8(bytes).expect("ascii envelope");
        assert!(text.starts_with("MIME-Version: 1.0"));
        assert!(text.contains("multipart/related"));
        assert!(text.contains(BOUNDARY));
        assert!(text.trim_end().ends_with(&format!("--{BOUNDARY}--")));
    }

    #[test]
    fn body_round_trips_through_base64() {
        let html = "<html><body>机密 &amp; more</body></html>";
        let bytes = package_mhtml(html);
        let text = String::from_utf8(bytes).expect("ascii envelope");

        let body: String = text
            .lines()
            .skip_while(|l| !l.is_empty())
            .skip(1)
            .skip_while(|l| !l.is_empty())
            .skip(1)
            .take_while(|l| !l.starts_with("--"))
            .collect();
        let decoded = STANDARD.decode(body.trim()).expect("valid base64");
        assert_eq!(String::from_utf8(decoded).expect("utf8"), html);
    }
}
