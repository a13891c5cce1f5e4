use tracing::{error, info};

use climate_sim::{serve, CommandServer, CommandService, ServerConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    let mut service = CommandService::from_env();

    let server = match CommandServer::bind(config.command_bind) {
        Ok(server) => server,
        Err(err) => {
            error!(
                target: "climate::server",
                bind = %config.command_bind,
                error = %err,
                "server.bind_failed"
            );
            std::process::exit(1);
        }
    };

    info!(
        target: "climate::server",
        command_bind = %server.local_addr(),
        config_source = %service.metadata().source_label(),
        "Climate simulation server ready"
    );

    serve(&server, &mut service);
}
