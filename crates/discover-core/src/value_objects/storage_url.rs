//! Download URLs of stored images
//!
//! Only URLs of the form
//! `https://firebasestorage.googleapis.com/v0/b/<bucket>/o/<percent-encoded path>?alt=media`
//! are recognised; anything else cannot be deleted by URL.

use std::fmt;

use crate::error::DomainError;

const HOST_PREFIX: &str = "https://firebasestorage.googleapis.com/v0/b/";

/// A parsed storage download URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUrl {
    bucket: String,
    path: String,
}

impl StorageUrl {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object path inside the bucket, decoded
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_storage_url(url: &str) -> bool {
        url.starts_with(HOST_PREFIX)
    }

    pub fn parse(url: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidStorageUrl(url.to_string());

        let rest = url.strip_prefix(HOST_PREFIX).ok_or_else(invalid)?;
        let (bucket, rest) = rest.split_once("/o/").ok_or_else(invalid)?;
        let encoded = rest.split(['?', '#']).next().unwrap_or_default();
        if bucket.is_empty() || encoded.is_empty() {
            return Err(invalid());
        }

        let path = percent_decode(encoded).ok_or_else(invalid)?;
        Ok(Self::new(bucket, path))
    }
}

impl fmt::Display for StorageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{HOST_PREFIX}{}/o/{}?alt=media",
            self.bucket,
            percent_encode(&self.path)
        )
    }
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = input.get(i + 1..i + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_path() {
        let url = "https://firebasestorage.googleapis.com/v0/b/site.appspot.com/o/blocks%2F42%2Fcover%20art.png?alt=media&token=abc";
        let parsed = StorageUrl::parse(url).unwrap();
        assert_eq!(parsed.bucket(), "site.appspot.com");
        assert_eq!(parsed.path(), "blocks/42/cover art.png");
    }

    #[test]
    fn test_display_encodes_path() {
        let url = StorageUrl::new("bucket", "blocks/1/a b.png").to_string();
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/bucket/o/blocks%2F1%2Fa%20b.png?alt=media"
        );
        assert_eq!(StorageUrl::parse(&url).unwrap().path(), "blocks/1/a b.png");
    }

    #[test]
    fn test_rejects_foreign_urls() {
        assert!(StorageUrl::parse("https://example.com/o/x.png").is_err());
        assert!(StorageUrl::parse("https://firebasestorage.googleapis.com/v0/b/bucket/o/").is_err());
        assert!(StorageUrl::parse("https://firebasestorage.googleapis.com/v0/b/bucket/o/%zz").is_err());
        assert!(!StorageUrl::is_storage_url("/uploads/a.png"));
    }
}
