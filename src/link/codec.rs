//! Verification link codec
//!
//! Wire format (stable, crosses devices):
//!
//! ```text
//! <base-url>#verify&hash=<64-hex-chars>[&name=<url-encoded-filename>]
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::digest::DigestHex;

/// Fragment marker identifying a verification link
pub const VERIFY_MARKER: &str = "verify";

/// Placeholder used in messages when no filename is known
pub const DEFAULT_DOCUMENT_NAME: &str = "document";

const HASH_PARAM: &str = "hash";
const NAME_PARAM: &str = "name";

// ============================================================================
// Types
// ============================================================================

/// A digest plus optional filename, as produced by the sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub digest: DigestHex,
    pub filename: Option<String>,
}

impl VerificationRequest {
    pub fn new(digest: DigestHex, filename: Option<String>) -> Self {
        Self { digest, filename }
    }

    pub fn encode(&self, base_url: &str) -> EncodedLink {
        encode(&self.digest, self.filename.as_deref(), base_url)
    }
}

/// Output of [`encode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedLink {
    /// Full verification link
    pub link: String,

    /// Human-readable share message embedding the link verbatim
    pub message: String,
}

impl EncodedLink {
    /// The fragment of the link, including the leading `#`
    pub fn fragment(&self) -> &str {
        self.link
            .find('#')
            .map(|idx| &self.link[idx..])
            .unwrap_or("")
    }
}

/// Receiver-side view of a verification fragment
///
/// The digest is carried as received; it is only checked for shape when it
/// is compared against a computed digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedFragment {
    pub digest: Option<String>,
    pub filename: Option<String>,
}

// ============================================================================
// Encoding
// ============================================================================

/// Build a verification link and share message
///
/// An empty filename is treated as absent. Any fragment already present on
/// `base_url` is dropped, since a link carries exactly one `#`.
pub fn encode(digest: &DigestHex, filename: Option<&str>, base_url: &str) -> EncodedLink {
    let filename = filename.filter(|name| !name.is_empty());
    let base_url = base_url
        .split_once('#')
        .map_or(base_url, |(before, _)| before);

    let mut query = format!("{}={}", HASH_PARAM, urlencoding::encode(digest.as_str()));
    if let Some(name) = filename {
        query.push('&');
        query.push_str(NAME_PARAM);
        query.push('=');
        query.push_str(&urlencoding::encode(name));
    }

    let link = format!("{}#{}&{}", base_url, VERIFY_MARKER, query);
    let message = share_message(filename, &link);

    tracing::debug!(digest = %digest, filename = ?filename, "Encoded verification link");

    EncodedLink { link, message }
}

/// Fixed-template share message
pub fn share_message(filename: Option<&str>, link: &str) -> String {
    let name = filename
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_NAME);
    format!(
        "\u{1F512} I'm sending you \"{}\". Please verify it hasn't been tampered with:\n\n\
         {}\n\n\
         Open the link above, drop in the file you received, and you'll instantly see if it matches.",
        name, link
    )
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a URL fragment such as `#verify&hash=...&name=...`
///
/// Returns `None` when the fragment is not a verification link. Parameters
/// may appear in any order; the first occurrence of each wins. Missing or
/// empty values decode to `None`.
pub fn decode(fragment: &str) -> Option<DecodedFragment> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let rest = fragment.strip_prefix(VERIFY_MARKER)?;
    let query = if rest.is_empty() {
        rest
    } else {
        rest.strip_prefix('&')?
    };

    let mut decoded = DecodedFragment::default();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let slot = match decode_component(key).as_ref() {
            HASH_PARAM => &mut decoded.digest,
            NAME_PARAM => &mut decoded.filename,
            _ => continue,
        };
        if slot.is_none() {
            let value = decode_component(value);
            if !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
    }

    Some(decoded)
}

/// Decode the fragment of a full URL
pub fn decode_url(url: &str) -> Option<DecodedFragment> {
    let (_, fragment) = url.split_once('#')?;
    decode(fragment)
}

/// Form-style component decoding: `+` is a space, then percent-decoding.
/// Invalid UTF-8 is replaced rather than rejected.
fn decode_component(raw: &str) -> Cow<'_, str> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        return Cow::Owned(percent_decode(&spaced).into_owned());
    }
    percent_decode(raw)
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or_else(|_| {
        let bytes = urlencoding::decode_binary(raw.as_bytes());
        Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://hashpdf.example/";
    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn digest(s: &str) -> DigestHex {
        DigestHex::parse(s).unwrap()
    }

    #[test]
    fn test_encode_hello_fragment() {
        let encoded = encode(&digest(HELLO), Some("hello.txt"), BASE);
        assert_eq!(
            encoded.link,
            format!("{BASE}#verify&hash={HELLO}&name=hello.txt")
        );
        assert_eq!(
            encoded.fragment(),
            format!("#verify&hash={HELLO}&name=hello.txt")
        );
    }

    #[test]
    fn test_encode_without_filename() {
        let encoded = encode(&digest(HELLO), None, BASE);
        assert_eq!(encoded.link, format!("{BASE}#verify&hash={HELLO}"));
        assert!(encoded.message.contains("\"document\""));

        let empty = encode(&digest(HELLO), Some(""), BASE);
        assert_eq!(empty.link, encoded.link);
    }

    #[test]
    fn test_message_embeds_link_verbatim() {
        let encoded = encode(&digest(HELLO), Some("file with spaces.pdf"), BASE);
        assert!(encoded.message.contains(&encoded.link));
        assert!(encoded.message.contains("\"file with spaces.pdf\""));
        assert!(encoded.link.contains("name=file%20with%20spaces.pdf"));
    }

    #[test]
    fn test_round_trip_filenames() {
        let d = "a".repeat(64);
        for filename in [None, Some("report.pdf"), Some("file with spaces.pdf"), Some("файл.pdf")] {
            let encoded = encode(&digest(&d), filename, BASE);
            let decoded = decode(encoded.fragment()).unwrap();
            assert_eq!(decoded.digest.as_deref(), Some(d.as_str()));
            assert_eq!(decoded.filename.as_deref(), filename);
        }
    }

    #[test]
    fn test_round_trip_reserved_characters() {
        let name = "Q&A #1 = 50% + more?.pdf";
        let encoded = encode(&digest(HELLO), Some(name), BASE);
        let decoded = decode_url(&encoded.link).unwrap();
        assert_eq!(decoded.filename.as_deref(), Some(name));
        assert_eq!(decoded.digest.as_deref(), Some(HELLO));
    }

    #[test]
    fn test_decode_unrecognized() {
        assert_eq!(decode("#not-a-verify-link"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("#"), None);
        assert_eq!(decode("#verifyhash=abc"), None);
        assert_eq!(decode_url("https://hashpdf.example/"), None);
    }

    #[test]
    fn test_decode_marker_only() {
        assert_eq!(decode("#verify"), Some(DecodedFragment::default()));
        assert_eq!(decode("#verify&"), Some(DecodedFragment::default()));
    }

    #[test]
    fn test_decode_any_order_and_missing_hash() {
        let decoded = decode(&format!("#verify&name=a.pdf&hash={HELLO}")).unwrap();
        assert_eq!(decoded.digest.as_deref(), Some(HELLO));
        assert_eq!(decoded.filename.as_deref(), Some("a.pdf"));

        let no_hash = decode("#verify&name=a.pdf").unwrap();
        assert_eq!(no_hash.digest, None);
        assert_eq!(no_hash.filename.as_deref(), Some("a.pdf"));

        let empty_hash = decode("#verify&hash=&name=").unwrap();
        assert_eq!(empty_hash, DecodedFragment::default());
    }

    #[test]
    fn test_decode_form_encoding() {
        let decoded = decode("verify&hash=abc&name=my+report%2Bfinal.pdf&extra=1").unwrap();
        assert_eq!(decoded.digest.as_deref(), Some("abc"));
        assert_eq!(decoded.filename.as_deref(), Some("my report+final.pdf"));
    }

    #[test]
    fn test_decode_first_occurrence_wins() {
        let decoded = decode("#verify&hash=first&hash=second").unwrap();
        assert_eq!(decoded.digest.as_deref(), Some("first"));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let decoded = decode("#verify&name=%FF.pdf").unwrap();
        assert_eq!(decoded.filename.as_deref(), Some("\u{FFFD}.pdf"));
    }

    #[test]
    fn test_encode_drops_existing_base_fragment() {
        let d = "a".repeat(64);
        let encoded = encode(&digest(&d), Some("r.pdf"), "https://x.example/app#/home");
        assert_eq!(
            encoded.link,
            format!("https://x.example/app#verify&hash={d}&name=r.pdf")
        );
        assert_eq!(encoded.link.matches('#').count(), 1);

        let from_fragment = decode(encoded.fragment()).unwrap();
        let from_url = decode_url(&encoded.link).unwrap();
        assert_eq!(from_fragment, from_url);
        assert_eq!(from_url.digest.as_deref(), Some(d.as_str()));
        assert_eq!(from_url.filename.as_deref(), Some("r.pdf"));
    }

    #[test]
    fn test_decode_component_borrows_plain_input() {
        assert!(matches!(decode_component("report.pdf"), Cow::Borrowed("report.pdf")));
        assert!(matches!(decode_component("a%20b"), Cow::Owned(ref s) if s == "a b"));
        assert_eq!(decode_component("a+b"), "a b");
    }

    #[test]
    fn test_request_encode_matches_free_function() {
        let request = VerificationRequest::new(digest(HELLO), Some("hello.txt".to_string()));
        assert_eq!(request.encode(BASE), encode(&digest(HELLO), Some("hello.txt"), BASE));
    }
}
