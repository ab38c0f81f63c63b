use dropbox_core::Config;

#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let (_state, router) = dropbox_api::setup::initialize_app(config.clone()).await?;
    dropbox_api::setup::server::start_server(&config, router).await
}
