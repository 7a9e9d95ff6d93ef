//! Addresses of co-located services and where each one came from.
//!
//! Every address-bearing field can be filled four ways, strongest first:
//! an operator escape hatch (full value in an environment variable), the
//! configuration file, a per-service host variable, or the shared subnet prefix.

use super::dsn;
use super::env::{EnvSource, vars};
use super::merge::lookup;
use serde_json::Value;
use std::fmt;

/// Prefix used when neither the environment nor the file provides one.
pub const DEFAULT_SUBNET_PREFIX: &str = "169.254.15";

/// A service whose address is part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Service {
    /// PostgreSQL; the address lives inside the DSN.
    Database,
    /// Redis.
    Cache,
    /// NATS.
    Broker,
    /// MinIO / S3-compatible object storage.
    ObjectStore,
    /// Retrieval-augmented generation backend.
    Retrieval,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Database,
        Service::Cache,
        Service::Broker,
        Service::ObjectStore,
        Service::Retrieval,
    ];

    /// Dotted key of the field holding this service's address.
    pub fn key(self) -> &'static str {
        match self {
            Service::Database => "pg.dsn",
            Service::Cache => "redis.addr",
            Service::Broker => "mq.nats.server",
            Service::ObjectStore => "s3.endpoint",
            Service::Retrieval => "rag.ct_rag.base_url",
        }
    }

    /// Variable naming the host the service runs on.
    pub fn host_var(self) -> &'static str {
        match self {
            Service::Database => vars::POSTGRES_HOST,
            Service::Cache => vars::REDIS_HOST,
            Service::Broker => vars::NATS_HOST,
            Service::ObjectStore => vars::MINIO_HOST,
            Service::Retrieval => vars::RAG_HOST,
        }
    }

    /// Variable carrying a complete, operator-supplied value for the field.
    pub fn override_var(self) -> &'static str {
        match self {
            Service::Database => vars::PG_DSN,
            Service::Cache => vars::REDIS_ADDR,
            Service::Broker => vars::MQ_NATS_SERVER,
            Service::ObjectStore => vars::S3_ENDPOINT,
            Service::Retrieval => vars::RAG_CT_RAG_BASE_URL,
        }
    }

    /// Last octet of the service's address within the subnet.
    pub fn host_octet(self) -> u8 {
        match self {
            Service::Database => 11,
            Service::Cache => 12,
            Service::Broker => 13,
            Service::ObjectStore => 14,
            Service::Retrieval => 18,
        }
    }

    /// Build the field value for a service reachable at `host`.
    pub fn address_for_host(self, host: &str) -> String {
        match self {
            Service::Database => dsn::default_dsn(host),
            Service::Cache => format!("{host}:6379"),
            Service::Broker => format!("nats://{host}:4222"),
            Service::ObjectStore => format!("{host}:9000"),
            Service::Retrieval => format!("http://{host}:8080/api/v1"),
        }
    }

    /// Build the field value from the shared subnet prefix.
    pub fn address_for_prefix(self, prefix: &str) -> String {
        self.address_for_host(&format!("{prefix}.{}", self.host_octet()))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Database => write!(f, "database"),
            Service::Cache => write!(f, "cache"),
            Service::Broker => write!(f, "broker"),
            Service::ObjectStore => write!(f, "object-store"),
            Service::Retrieval => write!(f, "retrieval"),
        }
    }
}

/// Origin of an address-bearing field, strongest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    /// Complete value from the service's override variable.
    Operator(String),
    /// Complete value from the configuration file.
    File(String),
    /// Built from the service's host variable (payload: the host).
    Host(String),
    /// Built from the subnet prefix (payload: the prefix).
    Subnet(String),
}

impl AddressSource {
    /// Default-layer choice: the host variable if set, otherwise the prefix.
    pub fn derived(service: Service, env: &dyn EnvSource, prefix: &str) -> Self {
        match env.non_empty(service.host_var()) {
            Some(host) => AddressSource::Host(host),
            None => AddressSource::Subnet(prefix.to_string()),
        }
    }

    /// The operator escape hatch, if set.
    pub fn operator(service: Service, env: &dyn EnvSource) -> Option<Self> {
        env.non_empty(service.override_var())
            .map(AddressSource::Operator)
    }

    /// Pick the winning source for `service` across all layers.
    ///
    /// `file` is the parsed configuration file (an empty object when there is none).
    pub fn resolve(service: Service, file: &Value, env: &dyn EnvSource, prefix: &str) -> Self {
        Self::operator(service, env)
            .or_else(|| {
                lookup(file, service.key())
                    .and_then(Value::as_str)
                    .map(|value| AddressSource::File(value.to_string()))
            })
            .unwrap_or_else(|| Self::derived(service, env, prefix))
    }

    /// Address this source produces for `service`.
    ///
    /// For [`Service::Database`] this is the DSN before the credential pass;
    /// `POSTGRES_PASSWORD` may still rewrite its password afterwards.
    pub fn render(&self, service: Service) -> String {
        match self {
            AddressSource::Operator(value) | AddressSource::File(value) => value.clone(),
            AddressSource::Host(host) => service.address_for_host(host),
            AddressSource::Subnet(prefix) => service.address_for_prefix(prefix),
        }
    }

    /// Short label for the kind of source.
    pub fn kind(&self) -> &'static str {
        match self {
            AddressSource::Operator(_) => "operator",
            AddressSource::File(_) => "file",
            AddressSource::Host(_) => "host",
            AddressSource::Subnet(_) => "subnet",
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, AddressSource::Operator(_))
    }
}

/// Resolve the subnet prefix once for a whole resolution pass.
///
/// Environment beats file beats [`DEFAULT_SUBNET_PREFIX`]; empty values count as unset.
pub fn effective_subnet_prefix(file: &Value, env: &dyn EnvSource) -> String {
    env.non_empty(vars::SUBNET_PREFIX)
        .or_else(|| {
            lookup(file, "subnet_prefix")
                .and_then(Value::as_str)
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_SUBNET_PREFIX.to_string())
}
