use reelist::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run().await
}
