use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::{
    config::{get_s3_client, get_service_cfg, Config},
    pre_task::handle_pre_human_task,
    storage::S3Store,
    task::PreHumanTaskOutput,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = get_service_cfg();

    tracing_subscriber::fmt()
        .with_max_level(cfg.as_ref().map_or(tracing::Level::INFO, |cfg| cfg.log_level))
        // disable printing the name of the module in every log line.
        .with_target(false)
        // CloudWatch adds the ingestion time.
        .without_time()
        .init();

    let cfg = cfg.map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::event!(tracing::Level::DEBUG, "{:?}", cfg);

    let store = S3Store::new(get_s3_client().await);

    run(service_fn(|event| pre_human_task(event, &store, &cfg))).await
}

async fn pre_human_task(
    event: LambdaEvent<Value>,
    store: &S3Store,
    cfg: &Config,
) -> Result<PreHumanTaskOutput, Error> {
    Ok(handle_pre_human_task(event.payload, store, cfg).await?)
}
