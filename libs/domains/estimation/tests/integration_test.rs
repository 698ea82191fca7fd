use std::sync::Arc;

use domain_estimation::calculators::compute::Ec2Config;
use domain_estimation::calculators::database::RdsConfig;
use domain_estimation::calculators::storage::{EbsConfig, EbsVolume};
use domain_estimation::{
    Estimator, IdKind, Project, ServiceConfig, ServiceType, annualize, calculate, project_total,
};
use domain_pricing::{OptionCategory, PricePoint, PricingRepository, Region, codes, fallback};

fn worked_example_repository() -> PricingRepository {
    PricingRepository::empty()
        .with_price(Region::UsEast1, codes::EC2, "t3.micro", PricePoint::usd(0.0104, "Hrs"))
        .with_price(Region::UsEast1, codes::EC2, "ebs_gp3_storage", PricePoint::usd(0.08, "GB-Mo"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_breakdowns_are_consistent_for_every_service_default() {
    let repositories = [PricingRepository::empty(), worked_example_repository()];

    for repo in &repositories {
        for service_type in ServiceType::all() {
            let breakdown = calculate(&ServiceConfig::defaults(service_type), Region::UsEast1, repo);
            assert!(breakdown.is_consistent(), "{service_type} breakdown is inconsistent");
            assert!(breakdown.monthly_total >= 0.0, "{service_type} total is negative");
            for item in &breakdown.items {
                assert!(item.quantity >= 0.0, "{service_type}: {} has negative quantity", item.label);
            }
        }
    }
}

#[test]
fn test_calculation_is_deterministic() {
    let repo = worked_example_repository();
    for service_type in ServiceType::all() {
        let config = ServiceConfig::defaults(service_type);
        assert_eq!(
            calculate(&config, Region::UsEast1, &repo),
            calculate(&config, Region::UsEast1, &repo),
        );
    }
}

#[test]
fn test_annual_figures_are_monthly_times_twelve() {
    let mut project = Project::new(Region::UsEast1);
    for service_type in [ServiceType::Ec2, ServiceType::Rds, ServiceType::S3, ServiceType::Lambda] {
        project.select_service_type(service_type);
        project.commit().unwrap();
    }

    let estimate = Estimator::new(Arc::new(worked_example_repository())).estimate_project(&project);

    for resource in &estimate.resources {
        assert_eq!(resource.annual_total(), resource.monthly_total() * 12.0);
    }
    assert_eq!(estimate.annual_total(), estimate.monthly_total * 12.0);

    let breakdowns: Vec<_> = estimate.resources.iter().map(|r| r.breakdown.clone()).collect();
    assert_eq!(project_total(&breakdowns), estimate.monthly_total);
}

#[test]
fn test_multi_az_doubles_instance_and_storage_lines() {
    let repo = PricingRepository::empty();
    let single = RdsConfig::default();
    let multi = RdsConfig {
        multi_az: true,
        ..RdsConfig::default()
    };

    let single = calculate(&ServiceConfig::Rds(single), Region::UsEast1, &repo);
    let multi = calculate(&ServiceConfig::Rds(multi), Region::UsEast1, &repo);

    assert_eq!(single.len(), multi.len());
    assert_close(multi.items[0].total, single.items[0].total * 2.0);
    assert_close(multi.items[1].total, single.items[1].total * 2.0);
    assert!(multi.items[0].label.contains("Multi-AZ"));
    assert!(single.items[1].label.starts_with("Storage"));
}

#[test]
fn test_selecting_a_new_service_type_resets_the_draft() {
    let mut project = Project::new(Region::UsEast1);
    project.select_service_type(ServiceType::Ec2);
    project
        .replace_draft_service(ServiceConfig::Ec2(Ec2Config {
            instance_count: 4,
            ..Ec2Config::default()
        }))
        .unwrap();
    let previous = project.draft().id;

    project.select_service_type(ServiceType::Elasticache);

    let draft = project.draft();
    assert_eq!(draft.service, Some(ServiceConfig::defaults(ServiceType::Elasticache)));
    assert_eq!(draft.id.kind, IdKind::Ephemeral);
    assert_ne!(draft.id, previous);
}

#[test]
fn test_commit_edit_remove_round_trip() {
    let mut project = Project::new(Region::UsEast1);
    project.select_service_type(ServiceType::Sqs);
    let other = project.commit().unwrap();

    project.select_service_type(ServiceType::Ebs);
    project
        .replace_draft_service(ServiceConfig::Ebs(EbsConfig {
            volumes: vec![EbsVolume::gp3(500.0), EbsVolume::gp3(50.0)],
            ..EbsConfig::default()
        }))
        .unwrap();
    project.rename_draft("data-volumes");
    let drafted = serde_json::to_vec(&project.draft().service).unwrap();

    let id = project.commit().unwrap();
    assert_eq!(project.len(), 2);
    assert!(project.draft().is_empty());
    assert_eq!(project.draft().id.kind, IdKind::Ephemeral);

    project.edit(id.value).unwrap();
    assert_eq!(project.len(), 1);
    assert_eq!(project.draft().id, id);
    assert_eq!(project.draft().name, "data-volumes");
    assert_eq!(serde_json::to_vec(&project.draft().service).unwrap(), drafted);

    let draft = project.draft().clone();
    project.remove(other.value).unwrap();
    assert!(project.is_empty());
    assert_eq!(project.draft(), &draft);
}

#[test]
fn test_options_fall_back_only_for_node_services() {
    let repo = PricingRepository::empty();
    let region = Region::ApSouth1;

    let with_fallback = [
        (ServiceType::Ec2, OptionCategory::InstanceType, codes::EC2),
        (ServiceType::Rds, OptionCategory::DatabaseClass, codes::RDS),
        (ServiceType::Elasticache, OptionCategory::CacheNodeType, codes::ELASTICACHE),
        (ServiceType::Opensearch, OptionCategory::SearchNodeType, codes::OPENSEARCH),
    ];
    for (service_type, category, code) in with_fallback {
        let options = service_type.options(&repo, region, category);
        assert!(!options.is_empty(), "{service_type} has no fallback options");
        assert_eq!(options, fallback::options(code, category));
    }

    let without_fallback = [
        (ServiceType::Lightsail, OptionCategory::Capacity),
        (ServiceType::S3, OptionCategory::StorageVariant),
        (ServiceType::ApiGateway, OptionCategory::Capacity),
        (ServiceType::Ebs, OptionCategory::StorageVariant),
        (ServiceType::Msk, OptionCategory::InstanceType),
    ];
    for (service_type, category) in without_fallback {
        assert!(
            service_type.options(&repo, region, category).is_empty(),
            "{service_type} should have no fallback options"
        );
    }
}

#[test]
fn test_options_come_from_loaded_data_when_present() {
    let repo = worked_example_repository()
        .with_price(Region::UsEast1, codes::EC2, "ebs_io2_storage", PricePoint::usd(0.125, "GB-Mo"));

    assert_eq!(
        ServiceType::Ec2.options(&repo, Region::UsEast1, OptionCategory::InstanceType),
        vec!["t3.micro"]
    );
    assert_eq!(
        ServiceType::Ebs.options(&repo, Region::UsEast1, OptionCategory::StorageVariant),
        vec!["gp3", "io2"]
    );
}

#[test]
fn test_worked_example_compute_resource() {
    let repo = worked_example_repository();
    let breakdown = calculate(&ServiceConfig::defaults(ServiceType::Ec2), Region::UsEast1, &repo);

    assert_eq!(breakdown.len(), 2);
    assert_close(breakdown.items[0].total, 7.592);
    assert_close(breakdown.items[1].total, 0.64);
    assert_close(breakdown.monthly_total, 8.232);
    assert_close(breakdown.annual_total(), 98.784);
    assert_close(annualize(breakdown.monthly_total), 98.784);
}

#[test]
fn test_disabling_a_feature_removes_exactly_one_line() {
    let repo = worked_example_repository();
    let on = Ec2Config {
        elastic_ip: true,
        ..Ec2Config::default()
    };
    let off = Ec2Config::default();

    let on = calculate(&ServiceConfig::Ec2(on), Region::UsEast1, &repo);
    let off = calculate(&ServiceConfig::Ec2(off), Region::UsEast1, &repo);

    assert_eq!(off.len(), on.len() - 1);
    assert!(on.find("Elastic IP").is_some());
    assert!(off.find("Elastic IP").is_none());

    let with_replica = RdsConfig {
        read_replicas: 1,
        ..RdsConfig::default()
    };
    let with_backups = calculate(&ServiceConfig::Rds(RdsConfig::default()), Region::UsEast1, &repo);
    let without_backups = calculate(
        &ServiceConfig::Rds(RdsConfig {
            backup_retention_days: 0,
            ..RdsConfig::default()
        }),
        Region::UsEast1,
        &repo,
    );
    assert_eq!(without_backups.len(), with_backups.len() - 1);
    assert!(calculate(&ServiceConfig::Rds(with_replica), Region::UsEast1, &repo).len() > with_backups.len());
}

#[test]
fn test_unknown_service_type_prices_to_nothing() {
    let config: ServiceConfig =
        serde_json::from_str(r#"{ "service_type": "mainframe", "mips": 9000 }"#).unwrap();

    let breakdown = calculate(&config, Region::UsEast1, &worked_example_repository());

    assert!(breakdown.is_empty());
    assert_eq!(breakdown.monthly_total, 0.0);
}

#[test]
fn test_negative_inputs_are_clamped() {
    let repo = worked_example_repository();
    let config = ServiceConfig::Ec2(Ec2Config {
        hours_per_month: Some(-5.0),
        root_volume: EbsVolume::gp3(-8.0),
        data_transfer_out_gb: f64::NAN,
        ..Ec2Config::default()
    });

    let breakdown = calculate(&config, Region::UsEast1, &repo);

    assert!(breakdown.is_consistent());
    assert!(breakdown.items.iter().all(|item| item.total >= 0.0));
}
