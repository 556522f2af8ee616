use crate::error::Error;
use crate::presign::parse_locator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Reads whole objects out of the bucket Ground Truth writes worker answers to.
#[async_trait]
pub trait ObjectReader: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationEvent {
    #[serde(default)]
    pub version: Option<String>,
    pub labeling_job_arn: String,
    /// `null` for jobs created from the console.
    #[serde(default)]
    pub label_categories: Option<Vec<String>>,
    pub label_attribute_name: String,
    #[serde(default)]
    pub role_arn: Option<String>,
    pub payload: Payload,
    #[serde(default)]
    pub output_config: Option<String>,
    #[serde(default)]
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Reference {
        #[serde(rename = "s3Uri")]
        s3_uri: String,
    },
    Inline(Vec<Value>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkerAnnotation {
    worker_id: String,
    annotation_data: AnnotationData,
}

#[derive(Debug, Clone, Deserialize)]
struct AnnotationData {
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "s3Uri", alias = "s3uri")]
    s3_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedRecord {
    pub dataset_object_id: String,
    pub consolidated_annotation: ConsolidatedAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedAnnotation {
    pub content: Map<String, Value>,
}

pub async fn handle_consolidation<R>(
    raw_event: Value,
    reader: &R,
) -> Result<Vec<ConsolidatedRecord>, Error>
where
    R: ObjectReader + ?Sized,
{
    tracing::info!("Received event: {}", raw_event);

    let event: ConsolidationEvent =
        serde_json::from_value(raw_event).map_err(|source| Error::MalformedEvent {
            kind: "annotation-consolidation",
            source,
        })?;

    if let Some(categories) = &event.label_categories {
        tracing::info!("Label Categories are: {:?}", categories);
    }
    if let Some(role_arn) = &event.role_arn {
        tracing::debug!("role arn: {} (using ambient credentials)", role_arn);
    }
    if let Some(output_config) = &event.output_config {
        tracing::debug!("output config: {}", output_config);
    }
    if let Some(kms_key_id) = &event.kms_key_id {
        tracing::debug!("kms key id: {}", kms_key_id);
    }

    do_consolidation(
        &event.labeling_job_arn,
        event.payload,
        &event.label_attribute_name,
        reader,
    )
    .await
}

/// Combines the worker answers of each data object under `label_attribute_name`.
///
/// Data objects that can't be read are logged and left out of the result.
pub async fn do_consolidation<R>(
    labeling_job_arn: &str,
    payload: Payload,
    label_attribute_name: &str,
    reader: &R,
) -> Result<Vec<ConsolidatedRecord>, Error>
where
    R: ObjectReader + ?Sized,
{
    let items = resolve_payload(payload, reader).await?;

    let mut consolidated_output = Vec::with_capacity(items.len());
    let mut success_count = 0;
    let mut failure_count = 0;

    for (index, item) in items.into_iter().enumerate() {
        match consolidate_object(labeling_job_arn, label_attribute_name, item, reader).await {
            Ok(record) => {
                success_count += 1;
                consolidated_output.push(record);
            }
            Err(e) => {
                failure_count += 1;
                tracing::error!("Consolidation failed for data object {}: {}", index, e);
            }
        }
    }

    tracing::info!(
        "Consolidation complete. Success count {} failure count {}",
        success_count,
        failure_count
    );
    tracing::debug!("Consolidated output: {:?}", consolidated_output);

    Ok(consolidated_output)
}

async fn resolve_payload<R>(payload: Payload, reader: &R) -> Result<Vec<Value>, Error>
where
    R: ObjectReader + ?Sized,
{
    match payload {
        Payload::Inline(items) => Ok(items),
        Payload::Reference { s3_uri } => {
            let location = parse_locator(&s3_uri)?;
            let raw = reader.get_object(&location.bucket, &location.key).await?;

            serde_json::from_slice(&raw).map_err(|e| {
                Error::MalformedPayload(format!("{s3_uri} is not a list of data objects: {e}"))
            })
        }
    }
}

async fn consolidate_object<R>(
    labeling_job_arn: &str,
    label_attribute_name: &str,
    item: Value,
    reader: &R,
) -> Result<ConsolidatedRecord, Error>
where
    R: ObjectReader + ?Sized,
{
    let dataset_object_id = item
        .get("datasetObjectId")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedPayload("missing datasetObjectId".to_string()))?
        .to_string();
    let log_prefix = format!("[{labeling_job_arn}] data object id [{dataset_object_id}]:");
    tracing::info!("{} Consolidating annotations BEGIN", log_prefix);

    let annotations = item
        .get("annotations")
        .cloned()
        .ok_or_else(|| Error::MalformedPayload(format!("{log_prefix} missing annotations")))?;
    tracing::info!("{} Received annotations from all workers {}", log_prefix, annotations);

    let workers: Vec<WorkerAnnotation> = serde_json::from_value(annotations.clone())
        .map_err(|e| Error::MalformedPayload(format!("{log_prefix} {e}")))?;

    for worker in &workers {
        let answer = match &worker.annotation_data.s3_uri {
            Some(s3_uri) => {
                let location = parse_locator(s3_uri)?;
                let raw = reader.get_object(&location.bucket, &location.key).await?;
                String::from_utf8_lossy(&raw).into_owned()
            }
            None => worker.annotation_data.content.clone().unwrap_or_default(),
        };

        tracing::info!(
            "{} Received annotation from worker [{}] is [{}]",
            log_prefix,
            worker.worker_id,
            answer
        );
    }

    let mut content = Map::new();
    content.insert(
        label_attribute_name.to_string(),
        json!({ "annotationsFromAllWorkers": annotations }),
    );

    tracing::info!("{} Consolidating annotations END", log_prefix);

    Ok(ConsolidatedRecord {
        dataset_object_id,
        consolidated_annotation: ConsolidatedAnnotation { content },
    })
}
