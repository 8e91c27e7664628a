use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// The full terminal binary (`fractal serve`) offers the same server with CLI
// flags; this one just reads config.toml next to the working directory.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = configuration::load_settings(Path::new("config.toml"))?;
    let state = web_server::build_state(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(addr, state).await
}
