//! Configuration types and the compiled-in defaults.

use super::address::{AddressSource, DEFAULT_SUBNET_PREFIX, Service};
use super::dsn;
use super::env::EnvSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::Level;

/// Default HTTP listen port.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default path of the reverse proxy's admin socket.
pub const DEFAULT_CADDY_API: &str = "/app/run/caddy-admin.sock";

/// Placeholder shown instead of secret values.
pub const SECRET_MASK: &str = "******";

/// Fully resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub log: LogConfig,
    pub http: HttpConfig,
    pub admin_password: String,
    pub pg: PgConfig,
    pub mq: MqConfig,
    pub rag: RagConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub s3: S3Config,
    /// Socket or URL of the reverse proxy's admin API.
    pub caddy_api: String,
    /// First three octets shared by co-located services, e.g. `169.254.15`.
    pub subnet_prefix: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Numeric level: -4 debug, 0 info, 4 warn, 8 error. Values in between round down.
    pub level: i32,
}

impl LogConfig {
    /// Map the numeric level onto a tracing level.
    pub fn tracing_level(&self) -> Level {
        match self.level {
            i32::MIN..=-1 => Level::DEBUG,
            0..=3 => Level::INFO,
            4..=7 => Level::WARN,
            _ => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgConfig {
    /// Full connection string.
    pub dsn: String,
}

/// Message queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub nats: NatsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatsConfig {
    pub server: String,
    pub user: String,
    pub password: String,
}

/// Retrieval-augmented generation provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagConfig {
    pub provider: String,
    pub ct_rag: CtRagConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtRagConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    pub addr: String,
    pub password: String,
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Token signing secret.
    pub secret: String,
}

/// Object storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
}

impl Default for Config {
    /// Defaults with every address derived from [`DEFAULT_SUBNET_PREFIX`].
    ///
    /// Does not look at the environment; use [`Config::defaults`] for that.
    fn default() -> Self {
        Self::defaults(&HashMap::<String, String>::new(), DEFAULT_SUBNET_PREFIX)
    }
}

impl Config {
    /// Build the compiled-in defaults.
    ///
    /// Addresses come from the per-service host variables in `env` when set,
    /// otherwise from `subnet_prefix`. Secrets default to empty strings.
    pub fn defaults(env: &dyn EnvSource, subnet_prefix: &str) -> Self {
        let address =
            |service: Service| AddressSource::derived(service, env, subnet_prefix).render(service);

        Self {
            log: LogConfig::default(),
            http: HttpConfig {
                port: DEFAULT_HTTP_PORT,
            },
            admin_password: String::new(),
            pg: PgConfig {
                dsn: address(Service::Database),
            },
            mq: MqConfig {
                kind: "nats".to_string(),
                nats: NatsConfig {
                    server: address(Service::Broker),
                    user: "panda-wiki".to_string(),
                    password: String::new(),
                },
            },
            rag: RagConfig {
                provider: "ct".to_string(),
                ct_rag: CtRagConfig {
                    base_url: address(Service::Retrieval),
                    api_key: "sk-1234567890".to_string(),
                },
            },
            redis: RedisConfig {
                addr: address(Service::Cache),
                password: String::new(),
            },
            auth: AuthConfig {
                kind: "jwt".to_string(),
                jwt: JwtConfig {
                    secret: String::new(),
                },
            },
            s3: S3Config {
                endpoint: address(Service::ObjectStore),
                access_key: "s3panda-wiki".to_string(),
                secret_key: String::new(),
            },
            caddy_api: DEFAULT_CADDY_API.to_string(),
            subnet_prefix: subnet_prefix.to_string(),
        }
    }

    /// The field holding `service`'s address.
    pub fn address(&self, service: Service) -> &str {
        match service {
            Service::Database => &self.pg.dsn,
            Service::Cache => &self.redis.addr,
            Service::Broker => &self.mq.nats.server,
            Service::ObjectStore => &self.s3.endpoint,
            Service::Retrieval => &self.rag.ct_rag.base_url,
        }
    }

    pub fn address_mut(&mut self, service: Service) -> &mut String {
        match service {
            Service::Database => &mut self.pg.dsn,
            Service::Cache => &mut self.redis.addr,
            Service::Broker => &mut self.mq.nats.server,
            Service::ObjectStore => &mut self.s3.endpoint,
            Service::Retrieval => &mut self.rag.ct_rag.base_url,
        }
    }

    /// Copy with every non-empty secret replaced by [`SECRET_MASK`].
    pub fn redacted(&self) -> Self {
        fn mask(secret: &mut String) {
            if !secret.is_empty() {
                *secret = SECRET_MASK.to_string();
            }
        }

        let mut out = self.clone();
        mask(&mut out.admin_password);
        mask(&mut out.mq.nats.password);
        mask(&mut out.rag.ct_rag.api_key);
        mask(&mut out.redis.password);
        mask(&mut out.auth.jwt.secret);
        mask(&mut out.s3.secret_key);
        out.pg.dsn = dsn::mask_password(&out.pg.dsn, SECRET_MASK);
        out
    }
}
