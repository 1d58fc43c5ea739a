use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod storage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg));

    // Both documents must exist before the first request
    state.store.bootstrap().await?;
    logger::log_info(&format!(
        "[STORAGE] Vocabulary: {}, marked words: {}",
        state.store.vocabs_path().display(),
        state.store.marked_path().display()
    ));

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    server::serve(listener, state, server::signal::shutdown_signal()).await;
    Ok(())
}
