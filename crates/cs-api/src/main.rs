#[tokio::main]
async fn main() {
    if let Err(err) = cs_api::run().await {
        tracing::error!(error = %err, "cs-api failed");
        std::process::exit(1);
    }
}
