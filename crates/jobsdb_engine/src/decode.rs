use encoding_rs::{Encoding, UTF_8};

/// Decode a response body to text: BOM, then Content-Type charset, then UTF-8.
///
/// Undecodable sequences become U+FFFD; a body that is unusable after that
/// fails to parse downstream instead of here.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c: char| c == '"' || c == '\''))
    })
}
