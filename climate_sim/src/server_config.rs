use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

pub const SERVER_BIND_ENV: &str = "CLIMATE_SERVER_BIND";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub command_bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command_bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 41001),
        }
    }
}

impl ServerConfig {
    /// Defaults, with `CLIMATE_SERVER_BIND` overriding the command address.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(SERVER_BIND_ENV) {
            config.apply_bind_override(&raw);
        }
        config
    }

    fn apply_bind_override(&mut self, raw: &str) {
        match raw.trim().parse::<SocketAddr>() {
            Ok(addr) => self.command_bind = addr,
            Err(err) => tracing::warn!(
                target: "climate::config",
                value = raw,
                error = %err,
                "server_config.bind_override_invalid"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_is_loopback() {
        assert_eq!(
            ServerConfig::default().command_bind.to_string(),
            "127.0.0.1:41001"
        );
    }

    #[test]
    fn override_parses_or_keeps_default() {
        let mut config = ServerConfig::default();
        config.apply_bind_override("0.0.0.0:5000");
        assert_eq!(config.command_bind.port(), 5000);

        config.apply_bind_override("not an address");
        assert_eq!(config.command_bind.port(), 5000);
    }
}
