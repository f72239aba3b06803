//! Share targets for a verification link
//!
//! Prebuilt URLs the UI can hand to a browser or mail client. Opening them
//! is the caller's job.

use serde::{Deserialize, Serialize};

use super::codec::{EncodedLink, DEFAULT_DOCUMENT_NAME};

const WHATSAPP_BASE: &str = "https://wa.me/?text=";
const TELEGRAM_BASE: &str = "https://t.me/share/url?text=";

/// Share URLs for one encoded link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTargets {
    /// Title for a native share sheet
    pub title: String,
    pub whatsapp: String,
    pub telegram: String,
    /// `mailto:` URL with subject and body
    pub email: String,
}

impl ShareTargets {
    pub fn new(encoded: &EncodedLink, filename: Option<&str>) -> Self {
        let name = filename
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DOCUMENT_NAME);
        let message = urlencoding::encode(&encoded.message);
        let subject = urlencoding::encode(&format!("Verify document: {}", name)).into_owned();

        Self {
            title: format!("Verify: {}", name),
            whatsapp: format!("{}{}", WHATSAPP_BASE, message),
            telegram: format!("{}{}", TELEGRAM_BASE, message),
            email: format!("mailto:?subject={}&body={}", subject, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestHex;
    use crate::link::codec::{decode_url, encode};

    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn hello_link(filename: Option<&str>) -> EncodedLink {
        encode(&DigestHex::parse(HELLO).unwrap(), filename, "https://hashpdf.example/")
    }

    #[test]
    fn test_share_targets_with_filename() {
        let encoded = hello_link(Some("contract.pdf"));
        let targets = ShareTargets::new(&encoded, Some("contract.pdf"));

        assert_eq!(targets.title, "Verify: contract.pdf");
        assert!(targets.whatsapp.starts_with(WHATSAPP_BASE));
        assert!(targets.telegram.starts_with(TELEGRAM_BASE));
        assert!(targets
            .email
            .starts_with("mailto:?subject=Verify%20document%3A%20contract.pdf&body="));
    }

    #[test]
    fn test_share_targets_default_name() {
        let targets = ShareTargets::new(&hello_link(None), None);
        assert_eq!(targets.title, "Verify: document");
    }

    #[test]
    fn test_message_survives_query_encoding() {
        let encoded = hello_link(Some("file with spaces.pdf"));
        let targets = ShareTargets::new(&encoded, Some("file with spaces.pdf"));

        // Only the message is in the query, so it carries no raw separators
        let body = targets.whatsapp.strip_prefix(WHATSAPP_BASE).unwrap();
        assert!(!body.contains('&') && !body.contains('#') && !body.contains(' '));

        let message = urlencoding::decode(body).unwrap();
        assert_eq!(message, encoded.message);

        let link = message.lines().find(|line| line.starts_with("https://")).unwrap();
        let decoded = decode_url(link).unwrap();
        assert_eq!(decoded.filename.as_deref(), Some("file with spaces.pdf"));
        assert_eq!(decoded.digest.as_deref(), Some(HELLO));
    }
}
