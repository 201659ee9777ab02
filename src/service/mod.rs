//! Service descriptors and the factories that derive them
//!
//! A [`ServiceDescriptor`] is the canonical record of one container's startup
//! contract. Factories derive descriptors from the deployment configuration;
//! the composer, serializer, and applier consume them.

pub mod context;
pub mod descriptor;
pub mod env;
pub mod factories;
pub mod keys;

pub use context::TopologyContext;
pub use descriptor::{
    EntryPoint, Exposure, Gateway, HostBinding, Mount, MountKind, MountMode, PortSpec, Route,
    SecretFile, ServiceDescriptor, TlsFiles,
};
pub use env::{EnvList, EnvRule};
pub use factories::{default_factories, ServiceFactory};
pub use keys::{KeyConverter, KeyKind, PemConverter};
