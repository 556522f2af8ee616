//! In-memory stand-ins for S3 used by the unit tests.

use crate::consolidation::ObjectReader;
use crate::error::Error;
use crate::presign::LinkIssuer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Hands out `https://<bucket>.example.test/<key>?expires=<secs>` and records every request.
#[derive(Default)]
pub struct StubIssuer {
    fail_marker: Option<String>,
    calls: Mutex<Vec<(String, String, Duration)>>,
}

impl StubIssuer {
    /// Fails every key containing `marker`.
    pub fn failing_on(marker: &str) -> Self {
        StubIssuer {
            fail_marker: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkIssuer for StubIssuer {
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), expires_in));

        match &self.fail_marker {
            Some(marker) if key.contains(marker.as_str()) => Err(Error::Presign {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "simulated backend error".to_string(),
            }),
            _ => Ok(format!(
                "https://{bucket}.example.test/{key}?expires={}",
                expires_in.as_secs()
            )),
        }
    }
}

#[derive(Default)]
pub struct StubStore {
    objects: HashMap<(String, String), Vec<u8>>,
    reads: Mutex<Vec<(String, String)>>,
}

impl StubStore {
    pub fn with_object(mut self, bucket: &str, key: &str, body: &str) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), body.as_bytes().to_vec());
        self
    }

    pub fn reads(&self) -> Vec<(String, String)> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectReader for StubStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        self.reads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| Error::ObjectRead {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "NoSuchKey".to_string(),
            })
    }
}
