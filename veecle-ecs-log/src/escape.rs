//! JSON string escaping.
//!
//! Follows the escaping rules of common JSON encoders with HTML escaping disabled: `<`, `>` and
//! `&` are written verbatim because log output is not rendered by browsers.
//! U+2028 and U+2029 are still escaped since they break JavaScript evaluation of the output.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `value` as a quoted JSON string.
pub fn append_string(output: &mut Vec<u8>, value: &str) {
    output.push(b'"');
    append_escaped(output, value);
    output.push(b'"');
}

/// Appends the escaped content of a JSON string, without the surrounding quotes.
pub fn append_escaped(output: &mut Vec<u8>, value: &str) {
    append_escaped_bytes(output, value.as_bytes());
}

/// Appends the escaped content of a JSON string from raw bytes.
///
/// Invalid UTF-8 sequences are replaced by `\ufffd`.
pub fn append_escaped_bytes(output: &mut Vec<u8>, value: &[u8]) {
    for chunk in value.utf8_chunks() {
        append_valid(output, chunk.valid());
        if !chunk.invalid().is_empty() {
            output.extend_from_slice(br"\ufffd");
        }
    }
}

fn append_valid(output: &mut Vec<u8>, value: &str) {
    let bytes = value.as_bytes();
    let mut start = 0;

    for (index, c) in value.char_indices() {
        let escape: &[u8] = match c {
            '"' => br#"\""#,
            '\\' => br"\\",
            '\u{8}' => br"\b",
            '\u{c}' => br"\f",
            '\n' => br"\n",
            '\r' => br"\r",
            '\t' => br"\t",
            '\u{2028}' => br"\u2028",
            '\u{2029}' => br"\u2029",
            c if (c as u32) < 0x20 => {
                output.extend_from_slice(&bytes[start..index]);
                let byte = c as u8;
                output.extend_from_slice(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[usize::from(byte >> 4)],
                    HEX[usize::from(byte & 0xf)],
                ]);
                start = index + 1;
                continue;
            }
            _ => continue,
        };

        output.extend_from_slice(&bytes[start..index]);
        output.extend_from_slice(escape);
        start = index + c.len_utf8();
    }

    output.extend_from_slice(&bytes[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn escaped(value: &str) -> String {
        let mut output = Vec::new();
        append_escaped(&mut output, value);
        String::from_utf8(output).unwrap()
    }

    #[test_case("plain text", "plain text" ; "plain")]
    #[test_case("say \"hi\"", r#"say \"hi\""# ; "quotes")]
    #[test_case(r"C:\temp", r"C:\\temp" ; "backslash")]
    #[test_case("a\nb\tc\r", r"a\nb\tc\r" ; "whitespace controls")]
    #[test_case("\u{8}\u{c}", r"\b\f" ; "short escapes")]
    #[test_case("\u{0}\u{1f}", r"\u0000\u001f" ; "other controls")]
    #[test_case("\u{7f}", "\u{7f}" ; "delete is kept")]
    #[test_case("<a href='x'>&</a>", "<a href='x'>&</a>" ; "no html escaping")]
    #[test_case("line\u{2028}para\u{2029}", r"line\u2028para\u2029" ; "js separators")]
    #[test_case("żółw 🐢", "żółw 🐢" ; "multibyte")]
    fn escapes(input: &str, expected: &str) {
        assert_eq!(escaped(input), expected);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut output = Vec::new();
        append_escaped_bytes(&mut output, b"ok\xff\xfe!\xe2\x82");
        assert_eq!(String::from_utf8(output).unwrap(), r"ok\ufffd\ufffd!\ufffd");
    }

    #[test]
    fn quoted() {
        let mut output = b"x=".to_vec();
        append_string(&mut output, "a\"b");
        assert_eq!(String::from_utf8(output).unwrap(), r#"x="a\"b""#);
    }

    proptest! {
        #[test]
        fn decodes_back_to_original(input in any::<String>()) {
            let mut output = Vec::new();
            append_string(&mut output, &input);
            let decoded: String = serde_json::from_slice(&output).unwrap();
            prop_assert_eq!(decoded, input);
        }

        #[test]
        fn invalid_bytes_decode_to_lossy_text(input in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut output = vec![b'"'];
            append_escaped_bytes(&mut output, &input);
            output.push(b'"');
            let decoded: String = serde_json::from_slice(&output).unwrap();
            prop_assert_eq!(decoded, String::from_utf8_lossy(&input));
        }
    }
}
