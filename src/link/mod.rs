//! Verification Link Codec
//!
//! Carries a digest and an optional filename from sender to receiver inside
//! a URL fragment, which browsers do not send to servers.
//!
//! - `codec`: fragment encoding/decoding and the share message
//! - `share`: messaging and e-mail share URLs built from an encoded link

pub mod codec;
pub mod share;

pub use codec::{
    decode, decode_url, encode, share_message, DecodedFragment, EncodedLink,
    VerificationRequest, DEFAULT_DOCUMENT_NAME, VERIFY_MARKER,
};
pub use share::ShareTargets;
