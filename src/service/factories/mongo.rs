//! Database service

use super::{names, ports, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::{Mount, ServiceDescriptor};

/// Named volume holding the database files
pub const DATA_VOLUME: &str = "den-mongodata";

const HEALTH_CHECK: &str = "mongo --quiet --eval 'db.runCommand({ ping: 1 }).ok'";

/// Builds the database service
pub struct MongoFactory;

impl ServiceFactory for MongoFactory {
    fn name(&self) -> &'static str {
        names::MONGO
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        Ok(ServiceDescriptor::new(names::MONGO, &config.image.mongo)
            .expose(ports::MONGO)
            .mount(Mount::volume(DATA_VOLUME, ctx.platform.data_dir()))
            .health_check(HEALTH_CHECK))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_mongo_is_internal_only() {
        let descriptor = MongoFactory.build(&sample_config(), &linux_ctx()).unwrap();
        assert_eq!(descriptor.ports.len(), 1);
        assert!(descriptor.ports[0].host.is_none());
        assert!(descriptor.exposure.is_none());
        assert!(descriptor.secret_dir.is_none());
    }

    #[test]
    fn test_mongo_data_dir_follows_platform() {
        let linux = MongoFactory.build(&sample_config(), &linux_ctx()).unwrap();
        let windows = MongoFactory.build(&sample_config(), &windows_ctx()).unwrap();
        assert_eq!(linux.volumes[0].target, "/data/db");
        assert_eq!(windows.volumes[0].target, "c:\\data\\db");
        assert_eq!(linux.volumes[0].source, windows.volumes[0].source);
    }
}
