#[tokio::main]
async fn main() -> anyhow::Result<()> {
    avatar_director_lib::run().await
}
