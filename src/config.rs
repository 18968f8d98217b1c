//! Server configuration from the environment: HOST, PORT, BROADCAST_CAPACITY.

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_broadcast_capacity() -> usize {
    64
}

/// Where the relay listens and how far a client may lag behind the broadcast.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl ServerConfig {
    /// Read from process environment variables. Missing or unparseable values use defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(default_host),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or_else(default_port),
            broadcast_capacity: lookup("BROADCAST_CAPACITY")
                .and_then(|c| c.trim().parse().ok())
                .filter(|&c| c > 0)
                .unwrap_or_else(default_broadcast_capacity),
        }
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
