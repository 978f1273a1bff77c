use crate::schema::EntityDescriptor;

/// Persistence context configuration.
///
/// Connection coordinates are carried for parity with a networked provider;
/// the embedded engine only logs them at initialization.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username for authentication.
    pub username: String,

    /// Password for authentication.
    pub password: String,

    /// When set, `initialize()` reconciles storage with the registry
    /// automatically.
    pub synchronize: bool,

    /// Descriptors known at construction time. They resolve through the same
    /// path as anything registered later.
    pub entities: Vec<EntityDescriptor>,
}

impl ContextConfig {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "dynorm".to_string(),
            username: username.to_string(),
            password: password.to_string(),
            synchronize: false,
            entities: Vec::new(),
        }
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database name
    pub fn database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    /// Enable or disable automatic schema synchronization at initialization
    pub fn synchronize(mut self, synchronize: bool) -> Self {
        self.synchronize = synchronize;
        self
    }

    /// Add a descriptor known at construction time
    pub fn entity(mut self, descriptor: EntityDescriptor) -> Self {
        self.entities.push(descriptor);
        self
    }
}
