use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    shortly::server::run().await
}
