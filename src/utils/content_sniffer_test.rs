// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;

#[test]
fn test_classify_canonical_samples() {
    assert_eq!(
        classify(b"<!DOCTYPE html><html><body>hi</body></html>"),
        Extension::Html
    );
    assert_eq!(classify(b"  \n<html lang=\"ru\">"), Extension::Html);
    assert_eq!(classify(b"<p>paragraph</p>"), Extension::Html);
    assert_eq!(classify(b"<!-- comment -->"), Extension::Html);
    assert_eq!(classify(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3"), Extension::Pdf);
    assert_eq!(classify(b"plain annual report text\n"), Extension::Txt);
    assert_eq!(
        classify(b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1\x00\x00\x00\x00"),
        Extension::Doc
    );
    assert_eq!(
        classify(b"<?xml version=\"1.0\"?><rss></rss>"),
        Extension::Xml
    );
}

#[test]
fn test_classify_returns_none_for_binary_content() {
    assert_eq!(classify(b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00"), Extension::None);
    assert_eq!(classify(b"PK\x03\x04\x14\x00\x00\x00"), Extension::None);
    assert_eq!(classify(b"\x00\x01\x02\x03\x04\x05"), Extension::None);
    assert_eq!(classify(b"GIF89a\x01\x00"), Extension::None);

    // 伪随机字节，必然包含控制字符
    let noise: Vec<u8> = (0u32..256).map(|i| (i.wrapping_mul(131) % 251) as u8).collect();
    assert_eq!(classify(&noise), Extension::None);
}

#[test]
fn test_html_signature_needs_terminator() {
    // "<a" 后紧跟字母，不算 HTML 标签
    assert_eq!(detect_content_type(b"<abbreviation"), "text/plain");
    assert_eq!(detect_content_type(b"<A HREF=x>"), "text/html");
}

#[test]
fn test_only_prefix_is_sniffed() {
    let mut data = vec![b'a'; SNIFF_LEN];
    data.extend_from_slice(b"\x00\x01\x02");
    assert_eq!(classify(&data), Extension::Txt);
}

#[test]
fn test_empty_input_is_plain_text() {
    assert_eq!(classify(b""), Extension::Txt);
}

#[test]
fn test_extension_parsing() {
    assert_eq!(".pdf".parse::<Extension>(), Ok(Extension::Pdf));
    assert_eq!("DOC".parse::<Extension>(), Ok(Extension::Doc));
    assert_eq!("htm".parse::<Extension>(), Ok(Extension::Html));
    assert!("exe".parse::<Extension>().is_err());
    assert_eq!(Extension::Xml.to_string(), ".xml");
    assert_eq!(Extension::from_mime("text/html; charset=utf-8"), Extension::Html);
}
