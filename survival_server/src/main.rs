#[tokio::main]
async fn main() -> std::io::Result<()> {
    survival_server::run_with_config().await
}
