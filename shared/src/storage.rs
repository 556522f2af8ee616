use crate::consolidation::ObjectReader;
use crate::error::Error;
use crate::presign::LinkIssuer;
use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::config::PresigningConfig;
use std::time::Duration;

/// SigV4 refuses to sign for longer than a week.
pub const MAX_PRESIGN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub struct S3Store {
    client: s3::Client,
}

impl S3Store {
    pub fn new(client: s3::Client) -> Self {
        S3Store { client }
    }
}

pub fn clamp_ttl(expires_in: Duration) -> Duration {
    if expires_in > MAX_PRESIGN_TTL {
        tracing::warn!(
            "requested link ttl of {}s exceeds the SigV4 limit, issuing for {}s",
            expires_in.as_secs(),
            MAX_PRESIGN_TTL.as_secs()
        );
        MAX_PRESIGN_TTL
    } else {
        expires_in
    }
}

#[async_trait]
impl LinkIssuer for S3Store {
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        let presign_err = |reason: String| Error::Presign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };

        let presigning = PresigningConfig::expires_in(clamp_ttl(expires_in))
            .map_err(|e| presign_err(e.to_string()))?;
        let presigned_url = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| presign_err(e.to_string()))?;

        Ok(presigned_url.uri().to_string())
    }
}

#[async_trait]
impl ObjectReader for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let read_err = |reason: String| Error::ObjectRead {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };

        let cmd_output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| read_err(e.to_string()))?;

        cmd_output
            .body
            .collect()
            .await
            .map(|data| data.into_bytes().to_vec())
            .map_err(|e| read_err(e.to_string()))
    }
}
