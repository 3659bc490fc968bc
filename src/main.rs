use www_server::{config, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = config::parse_port_arg(std::env::args().skip(1))?;
    let cfg = config::Config::load()?.with_port(port);
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(cfg))?;
    Ok(())
}
