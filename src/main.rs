#[tokio::main]
async fn main() -> std::io::Result<()> {
    directory_backend::run().await
}
