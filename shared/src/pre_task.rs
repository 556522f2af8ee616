use crate::config::Config;
use crate::error::Error;
use crate::presign::{create_presigned_url, LinkIssuer};
use crate::task::{
    LinkedFrame, PreHumanTaskEvent, PreHumanTaskOutput, TaskInput, TaskObject, VideoDescriptor,
};
use serde_json::Value;

/// Builds the template payload for one labeling item.
///
/// A missing `dataObject.video` is not an error: the item comes back with a
/// `null` task object and `isHumanAnnotationRequired = "false"`. A video that
/// is present but not shaped like a video descriptor fails the invocation.
pub async fn handle_pre_human_task<I>(
    raw_event: Value,
    issuer: &I,
    cfg: &Config,
) -> Result<PreHumanTaskOutput, Error>
where
    I: LinkIssuer + ?Sized,
{
    tracing::info!("Received event: {}", raw_event);

    let event: PreHumanTaskEvent =
        serde_json::from_value(raw_event).map_err(|source| Error::MalformedEvent {
            kind: "pre-human-task",
            source,
        })?;

    let video = event
        .data_object
        .video
        .map(serde_json::from_value::<VideoDescriptor>)
        .transpose()
        .map_err(Error::MalformedVideo)?;

    let task_object = match video {
        Some(video) => Some(format_input(video, issuer, cfg.link_ttl).await),
        None => None,
    };
    let is_human_annotation_required = task_object.is_some();

    let output = PreHumanTaskOutput {
        task_input: TaskInput { task_object },
        is_human_annotation_required,
    };

    tracing::info!("{:?}", output);

    if !is_human_annotation_required {
        tracing::warn!("Failed to pre-process {}!", event.labeling_job_arn);
    }

    Ok(output)
}

/// Replaces every frame locator with a pre-signed link, keeping order and `seq_id`.
pub async fn format_input<I>(video: VideoDescriptor, issuer: &I, expiration: u64) -> TaskObject
where
    I: LinkIssuer + ?Sized,
{
    let mut frames = Vec::with_capacity(video.frames.len());

    for frame in video.frames {
        frames.push(LinkedFrame {
            url: create_presigned_url(issuer, &frame.url, expiration).await,
            seq_id: frame.seq_id,
        });
    }

    TaskObject {
        title: video.title,
        current_frame: video.current_frame,
        frames,
    }
}
