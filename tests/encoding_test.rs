use rs_microdata::{parse_bytes, parse_reader, Options};

/// UTF-8 content is handled correctly
#[test]
fn utf8_content_handled_correctly() {
    let html = "\
        <html>\
        <head><meta charset=\"utf-8\"></head>\
        <body><div itemscope>\
            <span itemprop=\"name\">é, ñ, ü, 中文</span>\
        </div></body>\
        </html>\
    ".as_bytes();

    let data = parse_bytes(html, None, &Options::default()).expect("extraction failed");

    assert_eq!(data.items[0].text("name"), Some("é, ñ, ü, 中文"));
}

/// ISO-8859-1 from a `<meta>` declaration is converted to UTF-8
#[test]
fn iso88591_meta_converted_to_utf8() {
    // é = 0xE9, ñ = 0xF1, ü = 0xFC in ISO-8859-1
    let html = b"<html>\
        <head><meta charset=\"ISO-8859-1\"></head>\
        <body><div itemscope>\
            <span itemprop=\"a\">Caf\xE9</span><span itemprop=\"b\">espa\xF1ol</span><span itemprop=\"c\">M\xFCnchen</span>\
        </div></body></html>";

    let data = parse_bytes(html, None, &Options::default()).expect("extraction failed");

    assert_eq!(data.items[0].text("a"), Some("Café"));
    assert_eq!(data.items[0].text("b"), Some("español"));
    assert_eq!(data.items[0].text("c"), Some("München"));
}

/// The declared content type wins over the document's own declaration
#[test]
fn declared_charset_overrides_meta() {
    let html = b"<html><head><meta charset=\"utf-8\"></head>\
        <body><div itemscope><span itemprop=\"city\">Z\xFCrich</span></div></body></html>";

    let data = parse_bytes(html, Some("text/html; charset=ISO-8859-1"), &Options::default())
        .expect("extraction failed");

    assert_eq!(data.items[0].text("city"), Some("Zürich"));
}

/// Windows-1252 from http-equiv is detected and converted
#[test]
fn windows1252_detected_and_converted() {
    // 0x93 = left double quote, 0x94 = right double quote
    let html = b"<html>\
        <head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head>\
        <body><div itemscope>\
            <meta itemprop=\"quote\" content=\"\x93Smart quotes\x94\">\
        </div></body></html>";

    let data = parse_bytes(html, None, &Options::default()).expect("extraction failed");

    assert_eq!(data.items[0].text("quote"), Some("\u{201C}Smart quotes\u{201D}"));
}

/// Invalid bytes are replaced, not fatal
#[test]
fn invalid_encoding_handled_gracefully() {
    let html = b"<div itemscope>\
        <p itemprop=\"good\">Valid text</p>\
        <p itemprop=\"bad\">Invalid: \xFF\xFE\xFD</p>\
        </div>";

    let data = parse_bytes(html, None, &Options::default()).expect("extraction failed");

    assert_eq!(data.items[0].text("good"), Some("Valid text"));
    let bad = data.items[0].text("bad").unwrap_or_default();
    assert!(bad.starts_with("Invalid: "));
    assert!(bad.contains('\u{FFFD}'));
}

/// UTF-8 BOM is consumed
#[test]
fn utf8_bom_handled_correctly() {
    let html = b"\xEF\xBB\xBF<div itemscope><p itemprop=\"x\">Content with BOM</p></div>";

    let data = parse_bytes(html, None, &Options::default()).expect("extraction failed");

    assert_eq!(data.items[0].text("x"), Some("Content with BOM"));
}

/// Reader input goes through the same decoding
#[test]
fn reader_input_is_decoded() {
    let html: &[u8] = b"<div itemscope><b itemprop=\"w\">Caf\xE9</b></div>";

    let data = parse_reader(html, Some("charset=windows-1252"), &Options::default())
        .expect("extraction failed");

    assert_eq!(data.items[0].text("w"), Some("Café"));
}

/// A failing reader surfaces as a parse error
#[test]
fn unreadable_stream_is_parse_error() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    let err = parse_reader(Broken, None, &Options::default()).expect_err("read should fail");

    assert!(matches!(err, rs_microdata::Error::ParseError(_)));
    assert!(err.to_string().contains("disk on fire"));
}
