//! The host side of plugin registration.
//!
//! A host hands each plugin a [`Server`] during `register`. Plugins publish
//! values under their own name with [`Server::expose`] and report through
//! [`Server::log`]. [`MemoryServer`] is an in-process host that keeps both.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Error;
use crate::plugin::Plugin;

/// What a plugin sees of its host during registration.
pub trait Server {
    /// Publish `value` under `plugin`. A later call for the same plugin
    /// replaces the earlier value.
    fn expose(&mut self, plugin: &str, value: Box<dyn Any + Send + Sync>);

    fn log(&self, tags: &[&str], message: &str);
}

/// One line written through [`Server::log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub tags: Vec<String>,
    pub message: String,
}

/// An in-process plugin host.
#[derive(Default)]
pub struct MemoryServer {
    registered: Vec<String>,
    exposures: HashMap<String, Box<dyn Any + Send + Sync>>,
    logs: Mutex<Vec<LogEntry>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `plugin`'s registration against this host, once per plugin name.
    pub fn register<P: Plugin + ?Sized>(
        &mut self,
        plugin: &P,
        options: serde_json::Value,
    ) -> Result<(), Error> {
        let name = plugin.attributes().name;
        if self.registered.iter().any(|registered| registered == name) {
            return Err(Error::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        plugin.register(self, options)?;
        self.registered.push(name.to_string());
        Ok(())
    }

    /// The value `plugin` exposed, if it has the expected type.
    pub fn plugin<T: Any>(&self, plugin: &str) -> Option<&T> {
        self.exposures.get(plugin)?.downcast_ref::<T>()
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs
            .lock()
            .map(|logs| logs.clone())
            .unwrap_or_default()
    }
}

impl Server for MemoryServer {
    fn expose(&mut self, plugin: &str, value: Box<dyn Any + Send + Sync>) {
        self.exposures.insert(plugin.to_string(), value);
    }

    fn log(&self, tags: &[&str], message: &str) {
        tracing::info!(tags = %tags.join(","), "{}", message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(LogEntry {
                tags: tags.iter().map(|tag| tag.to_string()).collect(),
                message: message.to_string(),
            });
        }
    }
}
