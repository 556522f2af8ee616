use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::{
    config::{get_s3_client, get_service_cfg},
    consolidation::{handle_consolidation, ConsolidatedRecord},
    storage::S3Store,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = get_service_cfg();

    tracing_subscriber::fmt()
        .with_max_level(cfg.as_ref().map_or(tracing::Level::INFO, |cfg| cfg.log_level))
        .with_target(false)
        .without_time()
        .init();

    let cfg = cfg.map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::event!(tracing::Level::DEBUG, "{:?}", cfg);

    let store = S3Store::new(get_s3_client().await);

    run(service_fn(|event| consolidate(event, &store))).await
}

async fn consolidate(
    event: LambdaEvent<Value>,
    store: &S3Store,
) -> Result<Vec<ConsolidatedRecord>, Error> {
    Ok(handle_consolidation(event.payload, store).await?)
}
