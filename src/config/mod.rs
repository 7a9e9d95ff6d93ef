//! Layered service configuration.
//!
//! A [`Config`] is resolved once at startup from three layers, lowest priority first:
//! 1. **Defaults** - compiled in; addresses of co-located services are derived from
//!    per-service host variables or the shared subnet prefix
//! 2. **File** - `config.yml` / `config.yaml` in `.` or `./config`, overlaid key by key
//! 3. **Environment** - a fixed allow-list of credential and address variables
//!
//! ## Environment Variables
//! - `SUBNET_PREFIX` - Shared network prefix (default: `169.254.15`)
//! - `POSTGRES_HOST`, `REDIS_HOST`, `NATS_HOST`, `MINIO_HOST`, `RAG_HOST` - Service hosts
//!   used when deriving default addresses
//! - `POSTGRES_PASSWORD` - Rewrites the password inside the DSN
//! - `NATS_PASSWORD`, `REDIS_PASSWORD`, `JWT_SECRET`, `S3_SECRET_KEY`, `ADMIN_PASSWORD` -
//!   Credentials
//! - `PG_DSN`, `MQ_NATS_SERVER`, `REDIS_ADDR`, `S3_ENDPOINT`, `RAG_CT_RAG_BASE_URL` -
//!   Complete values that bypass derivation and the file
//!
//! The merged default+file tree is also available as [`Settings`] for ad-hoc,
//! string-keyed lookups. It does not see environment overrides.

pub mod address;
pub mod dsn;
pub mod env;
mod loader;
mod merge;
mod settings;
mod types;

pub use address::{AddressSource, DEFAULT_SUBNET_PREFIX, Service};
pub use env::{EnvSource, ProcessEnv, apply_env_overrides};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader, ConfigPaths, read_config_file};
pub use merge::deep_merge;
pub use settings::Settings;
pub use types::*;
