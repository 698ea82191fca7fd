//! Presentation of estimates. The only place amounts are rounded.

use std::fmt::{self, Write as _};

use clap::ValueEnum;
use domain_estimation::{CostBreakdown, ProjectEstimate, ServiceType};
use eyre::Result;
use serde::Serialize;

const TOP_DRIVERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Round to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn money(amount: f64) -> String {
    format!("${:.2}", round_cents(amount))
}

#[derive(Debug, Serialize)]
struct LineView<'a> {
    label: &'a str,
    quantity: f64,
    unit: &'a str,
    unit_price: f64,
    total: f64,
}

#[derive(Debug, Serialize)]
struct ResourceView<'a> {
    id: String,
    name: &'a str,
    service_type: String,
    items: Vec<LineView<'a>>,
    monthly_total: f64,
    annual_total: f64,
}

#[derive(Debug, Serialize)]
struct ProjectView<'a> {
    region: &'a str,
    degraded: bool,
    resources: Vec<ResourceView<'a>>,
    monthly_total: f64,
    annual_total: f64,
    top_cost_drivers: Vec<&'a str>,
}

fn lines(breakdown: &CostBreakdown) -> Vec<LineView<'_>> {
    breakdown
        .items
        .iter()
        .map(|item| LineView {
            label: &item.label,
            quantity: item.quantity,
            unit: &item.unit,
            unit_price: item.unit_price,
            total: round_cents(item.total),
        })
        .collect()
}

pub fn render(estimate: &ProjectEstimate, format: OutputFormat, annual: bool) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(estimate, annual),
        OutputFormat::Json => render_json(estimate),
    }
}

/// JSON report; totals are rounded to cents, unit prices are left as priced
pub fn render_json(estimate: &ProjectEstimate) -> Result<String> {
    let view = ProjectView {
        region: estimate.region.code(),
        degraded: estimate.degraded,
        resources: estimate
            .resources
            .iter()
            .map(|resource| ResourceView {
                id: resource.id.to_string(),
                name: &resource.name,
                service_type: service_label(resource.service_type),
                items: lines(&resource.breakdown),
                monthly_total: round_cents(resource.monthly_total()),
                annual_total: round_cents(resource.annual_total()),
            })
            .collect(),
        monthly_total: round_cents(estimate.monthly_total),
        annual_total: round_cents(estimate.annual_total()),
        top_cost_drivers: estimate
            .top_cost_drivers(TOP_DRIVERS)
            .into_iter()
            .map(|resource| resource.name.as_str())
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn service_label(service_type: Option<ServiceType>) -> String {
    service_type
        .map(|service_type| service_type.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn render_text(estimate: &ProjectEstimate, annual: bool) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, estimate, annual)?;
    Ok(out)
}

fn write_text(
    out: &mut impl fmt::Write,
    estimate: &ProjectEstimate,
    annual: bool,
) -> fmt::Result {
    writeln!(
        out,
        "Project estimate for {} ({})",
        estimate.region.code(),
        estimate.region.display_name()
    )?;
    if estimate.degraded {
        writeln!(out, "warning: pricing artifact unavailable, using fallback prices")?;
    }

    for resource in &estimate.resources {
        writeln!(
            out,
            "\n{} [{}]  {}/mo",
            resource.name,
            service_label(resource.service_type),
            money(resource.monthly_total())
        )?;
        for item in &resource.breakdown.items {
            writeln!(
                out,
                "  {:<48} {:>12.2} {:<12} x {:<10} = {:>10}",
                item.label,
                item.quantity,
                item.unit,
                item.unit_price,
                money(item.total)
            )?;
        }
    }

    writeln!(out, "\nMonthly total: {}", money(estimate.monthly_total))?;
    if annual {
        writeln!(out, "Annual total:  {}", money(estimate.annual_total()))?;
    }

    let drivers = estimate.top_cost_drivers(TOP_DRIVERS);
    if !drivers.is_empty() {
        writeln!(out, "\nTop cost drivers:")?;
        for (rank, resource) in drivers.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} {}/mo",
                rank + 1,
                resource.name,
                money(resource.monthly_total())
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_estimation::{CostComponent, ResourceEstimate, ResourceId};
    use domain_pricing::Region;

    fn estimate() -> ProjectEstimate {
        let resource = |name: &str, total_price: f64| ResourceEstimate {
            id: ResourceId::permanent(),
            name: name.to_string(),
            service_type: Some(ServiceType::Ec2),
            breakdown: CostBreakdown::from_items(vec![CostComponent::new(
                "EC2 instance (t3.micro)",
                730.0,
                "Hrs",
                total_price / 730.0,
            )]),
        };
        let resources = vec![
            resource("small", 1.0),
            resource("big", 100.0),
            resource("medium", 10.0),
            resource("tiny", 0.1),
        ];
        let monthly_total = resources.iter().map(ResourceEstimate::monthly_total).sum();
        ProjectEstimate {
            region: Region::UsEast1,
            resources,
            monthly_total,
            degraded: false,
        }
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(8.232), 8.23);
        assert_eq!(round_cents(98.784), 98.78);
        assert_eq!(round_cents(0.006), 0.01);
    }

    #[test]
    fn test_text_report_lists_top_three_drivers() {
        let text = render_text(&estimate(), true).unwrap();

        assert!(text.contains("Monthly total: $111.10"));
        assert!(text.contains("Annual total:  $1333.20"));
        assert!(text.contains("1. big $100.00/mo"));
        assert!(text.contains("3. small $1.00/mo"));
        assert!(!text.contains("4. "));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_text_report_flags_degraded_pricing() {
        let mut estimate = estimate();
        estimate.degraded = true;
        let text = render_text(&estimate, false).unwrap();
        assert!(text.contains("fallback prices"));
        assert!(!text.contains("Annual total"));
    }

    #[test]
    fn test_write_errors_are_propagated() {
        struct Full;
        impl fmt::Write for Full {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        assert!(write_text(&mut Full, &estimate(), true).is_err());
    }

    #[test]
    fn test_json_report_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&estimate()).unwrap()).unwrap();

        assert_eq!(json["region"], "us-east-1");
        assert_eq!(json["monthly_total"], 111.1);
        assert_eq!(json["resources"].as_array().unwrap().len(), 4);
        assert_eq!(json["resources"][1]["service_type"], "ec2");
        assert_eq!(json["top_cost_drivers"], serde_json::json!(["big", "medium", "small"]));
    }
}
