use crate::error::Error;
use async_trait::async_trait;
use std::time::Duration;

/// Issues time-limited GET links for stored objects.
#[async_trait]
pub trait LinkIssuer: Send + Sync {
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration)
        -> Result<String, Error>;
}

/// Bucket and key addressed by a locator such as `s3://bucket/path/to/obj.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

/// Splits `scheme://bucket/key` on the first `/` after the authority.
///
/// The key is taken byte for byte: no dot-segment resolution, no
/// percent-decoding, whitespace kept, since S3 keys may contain all of those.
pub fn parse_locator(locator: &str) -> Result<ObjectLocation, Error> {
    let invalid = |reason: &str| Error::InvalidLocator {
        locator: locator.to_string(),
        reason: reason.to_string(),
    };

    let (scheme, rest) = locator
        .split_once("://")
        .ok_or_else(|| invalid("expected scheme://bucket/key"))?;
    if !is_scheme(scheme) {
        return Err(invalid("invalid scheme"));
    }

    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return Err(invalid("missing bucket"));
    }
    if key.is_empty() {
        return Err(invalid("missing object key"));
    }

    Ok(ObjectLocation {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Swaps a storage locator for a link valid `expiration` seconds.
///
/// Never fails: a bad locator or a rejected signing request is logged and
/// yields `None`, so one broken frame doesn't sink the whole item.
pub async fn create_presigned_url<I>(issuer: &I, object_uri: &str, expiration: u64) -> Option<String>
where
    I: LinkIssuer + ?Sized,
{
    let location = match parse_locator(object_uri) {
        Ok(location) => location,
        Err(e) => {
            tracing::error!("{}", e);
            return None;
        }
    };

    match issuer
        .presign_get(
            &location.bucket,
            &location.key,
            Duration::from_secs(expiration),
        )
        .await
    {
        Ok(url) => {
            tracing::debug!("S3 signed url: {}", url);
            Some(url)
        }
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}
