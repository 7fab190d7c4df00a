//! HTTP header helpers.

use axum::http::HeaderValue;

/// Builds an `attachment` `Content-Disposition` value for `file_name`.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`
/// parameter carrying the UTF-8 name.
pub fn attachment_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let value = if file_name.is_ascii() && fallback == file_name {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            encode_rfc5987(file_name)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn encode_rfc5987(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name() {
        assert_eq!(
            attachment_disposition("Offer_Asha Rao.pdf"),
            "attachment; filename=\"Offer_Asha Rao.pdf\""
        );
    }

    #[test]
    fn test_unicode_name_gets_encoded_variant() {
        let value = attachment_disposition("Offer_Zoë.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"Offer_Zo_.pdf\"; filename*=UTF-8''Offer_Zo%C3%AB.pdf"
        );
    }
}
