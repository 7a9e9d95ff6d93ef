//! Environment variable overrides.
//!
//! Only the variables listed in [`vars`] are consulted, and only the fields
//! wired up in [`apply_env_overrides`] can be overridden. A variable that is set
//! to the empty string counts as unset.

use super::address::{AddressSource, Service};
use super::dsn;
use super::types::Config;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Names of every environment variable the resolver reads.
pub mod vars {
    pub const SUBNET_PREFIX: &str = "SUBNET_PREFIX";

    pub const POSTGRES_HOST: &str = "POSTGRES_HOST";
    pub const REDIS_HOST: &str = "REDIS_HOST";
    pub const NATS_HOST: &str = "NATS_HOST";
    pub const RAG_HOST: &str = "RAG_HOST";
    pub const MINIO_HOST: &str = "MINIO_HOST";

    pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
    pub const NATS_PASSWORD: &str = "NATS_PASSWORD";
    pub const REDIS_PASSWORD: &str = "REDIS_PASSWORD";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const S3_SECRET_KEY: &str = "S3_SECRET_KEY";
    pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

    pub const PG_DSN: &str = "PG_DSN";
    pub const MQ_NATS_SERVER: &str = "MQ_NATS_SERVER";
    pub const REDIS_ADDR: &str = "REDIS_ADDR";
    pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
    pub const RAG_CT_RAG_BASE_URL: &str = "RAG_CT_RAG_BASE_URL";
}

/// A source of environment variables.
pub trait EnvSource {
    /// Raw value of `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Value of `key` if it is set and non-empty.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<K, V, S> EnvSource for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|value| value.as_ref().to_string())
    }
}

/// Apply the environment allow-list on top of the default+file configuration.
///
/// Returns the names of the variables that were applied. Running this twice
/// against the same environment leaves the configuration unchanged the second time.
pub fn apply_env_overrides(config: &mut Config, env: &dyn EnvSource) -> Vec<&'static str> {
    let mut applied = Vec::new();

    let mut set = |field: &mut String, var: &'static str| {
        if let Some(value) = env.non_empty(var) {
            *field = value;
            applied.push(var);
        }
    };

    set(&mut config.subnet_prefix, vars::SUBNET_PREFIX);
    set(&mut config.admin_password, vars::ADMIN_PASSWORD);
    set(&mut config.mq.nats.password, vars::NATS_PASSWORD);
    set(&mut config.redis.password, vars::REDIS_PASSWORD);
    set(&mut config.auth.jwt.secret, vars::JWT_SECRET);
    set(&mut config.s3.secret_key, vars::S3_SECRET_KEY);

    if let Some(password) = env.non_empty(vars::POSTGRES_PASSWORD) {
        config.pg.dsn = dsn::with_password(&config.pg.dsn, &password);
        applied.push(vars::POSTGRES_PASSWORD);
    }

    // Escape hatches go last so a full PG_DSN also wins over POSTGRES_PASSWORD.
    for service in Service::ALL {
        if let Some(source) = AddressSource::operator(service, env) {
            *config.address_mut(service) = source.render(service);
            applied.push(service.override_var());
        }
    }

    applied
}
