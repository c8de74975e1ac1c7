#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lesson_backend::run().await
}
