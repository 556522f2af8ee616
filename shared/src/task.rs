use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event SageMaker Ground Truth sends to the pre-human-task hook, once per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreHumanTaskEvent {
    #[serde(default)]
    pub version: Option<String>,
    pub labeling_job_arn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_object: DataObject,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataObject {
    /// Kept raw so a missing video can be told apart from a malformed one.
    #[serde(default)]
    pub video: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub title: String,
    pub current_frame: Value,
    pub frames: Vec<FrameDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub url: String,
    pub seq_id: Value,
}

/// The video as merged into the labeling template, frame locators swapped for links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskObject {
    pub title: String,
    pub current_frame: Value,
    pub frames: Vec<LinkedFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedFrame {
    /// `null` when the link could not be issued.
    pub url: Option<String>,
    pub seq_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub task_object: Option<TaskObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreHumanTaskOutput {
    pub task_input: TaskInput,
    #[serde(with = "bool_string")]
    pub is_human_annotation_required: bool,
}

/// Ground Truth expects the flag as the strings `"true"` / `"false"`.
mod bool_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"\"true\" or \"false\"",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flag_serializes_as_string() {
        let output = PreHumanTaskOutput {
            task_input: TaskInput { task_object: None },
            is_human_annotation_required: false,
        };

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "taskInput": { "taskObject": null },
                "isHumanAnnotationRequired": "false"
            })
        );
    }

    #[test]
    fn event_without_data_object() {
        let event: PreHumanTaskEvent =
            serde_json::from_value(json!({ "labelingJobArn": "arn:x" })).unwrap();

        assert!(event.version.is_none());
        assert!(event.data_object.video.is_none());
    }

    #[test]
    fn null_data_object_is_absent() {
        let event: PreHumanTaskEvent = serde_json::from_value(json!({
            "labelingJobArn": "arn:x",
            "dataObject": null
        }))
        .unwrap();

        assert!(event.data_object.video.is_none());
    }

    #[test]
    fn null_video_is_absent() {
        let event: PreHumanTaskEvent = serde_json::from_value(json!({
            "version": "2018-10-16",
            "labelingJobArn": "arn:x",
            "dataObject": { "video": null, "source-ref": "s3://b/k" }
        }))
        .unwrap();

        assert_eq!(event.version.as_deref(), Some("2018-10-16"));
        assert!(event.data_object.video.is_none());
    }
}
