//! Cost Estimator
//!
//! Prices a project of cloud resources against a pricing artifact loaded once
//! at startup. Lists service options and default configurations.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_estimation::{Estimator, ServiceConfig, ServiceGroup, ServiceType};
use domain_pricing::{OptionCategory, PricingRepository, Region};
use eyre::Result;
use tracing::{info, warn};

mod config;
mod project_file;
mod report;

use config::Config;
use project_file::ProjectFile;
use report::OutputFormat;

#[derive(Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Estimate monthly cloud costs from resource configurations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate every resource of a project file
    Estimate {
        /// Project description (JSON)
        #[arg(short, long)]
        project: PathBuf,

        /// Region to price in. Defaults to the project's region.
        #[arg(short, long)]
        region: Option<Region>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also show the annual projection
        #[arg(short, long)]
        annual: bool,
    },

    /// List the choices of one option category for a service
    Options {
        /// Service type (e.g. ec2, rds, elasticache)
        #[arg(short, long)]
        service: ServiceType,

        /// Option category (e.g. instance_type, database_class, storage_variant)
        #[arg(short, long)]
        category: OptionCategory,

        #[arg(short, long)]
        region: Option<Region>,
    },

    /// Print the default configuration of a service as JSON
    Defaults {
        #[arg(short, long)]
        service: ServiceType,
    },

    /// List the service catalog
    Services {
        /// Only services of this group (e.g. compute, database)
        #[arg(short, long)]
        group: Option<ServiceGroup>,
    },
}

async fn load_repository(config: &Config) -> Result<PricingRepository> {
    let source = config.price_source()?;
    let repository = PricingRepository::load(source.as_ref()).await;
    if let Some(error) = repository.load_error() {
        warn!(%error, "Continuing with fallback prices");
    }
    Ok(repository)
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            project,
            region,
            format,
            annual,
        } => {
            let project_file = ProjectFile::read(&project).await?;
            let project = project_file.into_project(region, || config.default_region())?;
            info!(
                resources = project.len(),
                region = %project.region(),
                "Loaded project"
            );

            let repository = load_repository(&config).await?;
            let estimator = Estimator::new(Arc::new(repository))
                .with_hours_per_month(config.pricing.hours_per_month);
            let estimate = estimator.estimate_project(&project);

            print!("{}", report::render(&estimate, format, annual)?);
        }

        Commands::Options {
            service,
            category,
            region,
        } => {
            let region = match region {
                Some(region) => region,
                None => config.default_region()?,
            };
            let repository = load_repository(&config).await?;
            let options = service.options(&repository, region, category);

            if options.is_empty() {
                info!(%service, %category, %region, "No options available");
            }
            for option in options {
                println!("{option}");
            }
        }

        Commands::Defaults { service } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ServiceConfig::defaults(service))?
            );
        }

        Commands::Services { group } => {
            for service_type in ServiceType::all() {
                let descriptor = service_type.descriptor();
                if group.is_some_and(|group| group != descriptor.group) {
                    continue;
                }
                let categories: Vec<String> = descriptor
                    .option_categories()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!(
                    "{:<20} {:<30} {:<12} {}",
                    service_type,
                    descriptor.display_name,
                    descriptor.group,
                    categories.join(",")
                );
            }
        }
    }

    Ok(())
}
