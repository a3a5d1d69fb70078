//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod publish;
pub(crate) mod seed;

pub(crate) use build::BuildArgs;
pub(crate) use export::ExportArgs;
pub(crate) use import::ImportArgs;
pub(crate) use publish::PublishArgs;
pub(crate) use seed::SeedArgs;
