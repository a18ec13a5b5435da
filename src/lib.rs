pub mod cli;
pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod model;
pub mod output;
pub mod plan;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod shard;
pub mod templates;

// Generated code names these as `<crate_path>::ResourceHandle` etc.
pub use model::{ResourceHandle, ResourceItem, ResourceKey, ResourceKind};

pub use config::{Config, Overrides, Settings};
pub use context::ContextEnv;
pub use emit::{EmitSettings, Emitter, Visibility};
pub use error::GenError;
pub use generate::{generate, GenerateOptions, Generation};
pub use output::{check, publish, SourceUnit};
pub use plan::ResourceEntry;
pub use registry::{Accessor, Registry};
pub use shard::{assign_shards, Shard, ShardLayout};
