//! Project description files.
//!
//! ```json
//! {
//!   "region": "us-east-1",
//!   "resources": [
//!     { "name": "api", "service": { "service_type": "ec2", "instance_type": "m5.large" } }
//!   ]
//! }
//! ```

use std::path::Path;

use domain_estimation::{Project, ServiceConfig};
use domain_pricing::Region;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
    /// Defaults to the service's default resource name
    #[serde(default)]
    pub name: Option<String>,
    pub service: ServiceConfig,
}

impl ProjectFile {
    pub async fn read(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read project file {}", path.display()))?;
        Self::parse(&raw).wrap_err_with(|| format!("Invalid project file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replay every resource through the lifecycle: select the service type,
    /// apply its attributes, name it and commit.
    ///
    /// `region_override` wins over the file's region, which wins over
    /// `default_region`. `default_region` is only evaluated when neither names
    /// a region. Resources of unrecognized service types are skipped.
    pub fn into_project(
        self,
        region_override: Option<Region>,
        default_region: impl FnOnce() -> Result<Region>,
    ) -> Result<Project> {
        let region = match region_override.or(self.region) {
            Some(region) => region,
            None => default_region()?,
        };
        let mut project = Project::new(region);

        for (index, entry) in self.resources.into_iter().enumerate() {
            let Some(service_type) = entry.service.service_type() else {
                warn!(index, name = ?entry.name, "Skipping resource with unknown service type");
                continue;
            };

            project.select_service_type(service_type);
            project
                .replace_draft_service(entry.service)
                .wrap_err_with(|| format!("Resource #{index} could not be applied"))?;
            if let Some(name) = entry.name {
                project.rename_draft(name);
            }
            let id = project.commit()?;
            debug!(index, resource_id = %id, %service_type, "Loaded resource");
        }

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use domain_estimation::ServiceType;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "region": "eu-west-1",
        "resources": [
            { "name": "api", "service": { "service_type": "ec2", "instance_type": "m5.large" } },
            { "service": { "service_type": "rds", "multi_az": true } },
            { "name": "legacy", "service": { "service_type": "mainframe" } }
        ]
    }"#;

    #[test]
    fn test_replays_resources_in_order() {
        let project = ProjectFile::parse(SAMPLE)
            .unwrap()
            .into_project(None, || Ok(Region::UsEast1))
            .unwrap();

        assert_eq!(project.region(), Region::EuWest1);
        assert_eq!(project.len(), 2);
        assert!(project.draft().is_empty());

        let api = &project.resources()[0];
        assert_eq!(api.name, "api");
        assert!(api.id.is_permanent());
        match &api.service {
            ServiceConfig::Ec2(ec2) => assert_eq!(ec2.instance_type, "m5.large"),
            other => panic!("expected ec2, got {other:?}"),
        }

        let database = &project.resources()[1];
        assert_eq!(database.name, "database");
        assert_eq!(database.service_type(), Some(ServiceType::Rds));
    }

    #[test]
    fn test_region_precedence() {
        let file = ProjectFile::parse(r#"{ "resources": [] }"#).unwrap();
        assert_eq!(
            file.clone().into_project(None, || Ok(Region::UsWest2)).unwrap().region(),
            Region::UsWest2
        );
        assert_eq!(
            file.into_project(Some(Region::ApSouth1), || Ok(Region::UsWest2)).unwrap().region(),
            Region::ApSouth1
        );
    }

    #[test]
    fn test_bad_default_region_is_ignored_when_region_is_given() {
        temp_env::with_var("PRICING_REGION", Some("mars-1"), || {
            let config = Config::from_env().unwrap();
            let file = ProjectFile::parse(SAMPLE).unwrap();

            let project = file
                .clone()
                .into_project(Some(Region::UsEast1), || config.default_region())
                .unwrap();
            assert_eq!(project.region(), Region::UsEast1);

            // the file's own region also wins
            let project = file.into_project(None, || config.default_region()).unwrap();
            assert_eq!(project.region(), Region::EuWest1);

            let err = ProjectFile::parse(r#"{ "resources": [] }"#)
                .unwrap()
                .into_project(None, || config.default_region())
                .unwrap_err();
            assert!(err.to_string().contains("mars-1"));
        });
    }

    #[test]
    fn test_parse_rejects_unknown_region() {
        assert!(ProjectFile::parse(r#"{ "region": "moon-1" }"#).is_err());
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let project_file = ProjectFile::read(file.path()).await.unwrap();
        assert_eq!(project_file.resources.len(), 3);

        let err = ProjectFile::read(Path::new("/no/such/project.json")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read project file"));
    }
}
