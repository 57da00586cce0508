//! `dlt stats` command - fleet statistics dashboard

use console::style;
use miette::Result;

use crate::cli::helpers::open_workspace;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;
use crate::core::loader;
use crate::core::metrics::{count_by, mean, share, to_series, SeriesPoint};
use crate::core::workspace::Workspace;
use crate::entities::device::{Device, DeviceStatus};
use crate::entities::recycling::RecyclingBatch;
use crate::entities::refurbishment::{JobStatus, RefurbishmentJob};
use crate::entities::shipment::{Shipment, ShipmentStatus};

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Show per-category breakdown and the monthly recycling trend
    #[arg(long)]
    pub detailed: bool,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global)?;

    let fleet = collect_fleet_metrics(&workspace)?;
    let shipping = collect_shipment_metrics(&workspace)?;
    let recovery = collect_recovery_metrics(&workspace)?;
    let refurb = collect_refurb_metrics(&workspace)?;
    let health = calculate_health(&fleet, &shipping, &recovery, &refurb);

    match global.format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "fleet": fleet,
                "shipments": shipping,
                "recycling": recovery,
                "refurbishment": refurb,
                "health": health,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).unwrap_or_default()
            );
        }
        _ => {
            let width = 66;

            println!();
            println!("{}", style("Device Lifecycle Overview").bold().underlined());
            println!("{}", "═".repeat(width));
            println!();

            print_two_columns(
                "FLEET",
                &format_fleet_metrics(&fleet, args.detailed),
                "SHIPMENTS",
                &format_shipment_metrics(&shipping),
            );

            println!();

            print_two_columns(
                "RECYCLING",
                &format_recovery_metrics(&recovery),
                "REFURBISHMENT",
                &format_refurb_metrics(&refurb),
            );

            if args.detailed && !recovery.monthly.is_empty() {
                println!();
                println!("{}", style("RECYCLING TREND").bold());
                println!("{:-<width$}", "");
                print_bars(&recovery.monthly);
            }

            println!();
            println!("{}", "═".repeat(width));

            let health_style = match health {
                "Excellent" => style(health).green().bold(),
                "Good" => style(health).cyan().bold(),
                "Fair" => style(health).yellow().bold(),
                _ => style(health).red().bold(),
            };
            println!("Fleet Health: {}", health_style);
        }
    }

    Ok(())
}

#[derive(serde::Serialize, Default)]
struct FleetMetrics {
    total: usize,
    by_status: Vec<(String, usize)>,
    by_category: Vec<(String, usize)>,
    active_share: f64,
    end_of_life: usize,
}

#[derive(serde::Serialize, Default)]
struct ShipmentMetrics {
    total: usize,
    in_transit: usize,
    delivered: usize,
    delayed: usize,
    avg_progress: f64,
}

#[derive(serde::Serialize, Default)]
struct RecoveryMetrics {
    batches: usize,
    completed: usize,
    devices_recycled: u32,
    /// Mean over assessed batches; unassessed ones report 0 and are skipped
    avg_recovery: f64,
    assessed: usize,
    materials_recovered_kg: f64,
    materials_total_kg: f64,
    /// Batches per start month, in store order
    monthly: Vec<SeriesPoint>,
}

#[derive(serde::Serialize, Default)]
struct RefurbMetrics {
    jobs: usize,
    active: usize,
    on_hold: usize,
    completed: usize,
    avg_progress: f64,
    /// Mean over scored jobs; a zero score means "not yet scored"
    avg_quality: f64,
    scored: usize,
}

fn collect_fleet_metrics(workspace: &Workspace) -> Result<FleetMetrics> {
    let devices: Vec<Device> = loader::load_all(&workspace.record_dir(RecordPrefix::Device))?;

    let mut metrics = FleetMetrics {
        total: devices.len(),
        by_status: count_by(devices.iter(), |d| d.status.style().label.to_string()),
        by_category: count_by(devices.iter(), |d| d.category.label().to_string()),
        ..Default::default()
    };

    let active = devices
        .iter()
        .filter(|d| d.status == DeviceStatus::Active)
        .count();
    metrics.active_share = share(active, metrics.total);
    metrics.end_of_life = devices
        .iter()
        .filter(|d| d.status == DeviceStatus::EndOfLife)
        .count();

    Ok(metrics)
}

fn collect_shipment_metrics(workspace: &Workspace) -> Result<ShipmentMetrics> {
    let shipments: Vec<Shipment> =
        loader::load_all(&workspace.record_dir(RecordPrefix::Shipment))?;

    let mut metrics = ShipmentMetrics {
        total: shipments.len(),
        ..Default::default()
    };
    for shipment in &shipments {
        match shipment.status {
            ShipmentStatus::InTransit => metrics.in_transit += 1,
            ShipmentStatus::Delivered => metrics.delivered += 1,
            ShipmentStatus::Delayed => metrics.delayed += 1,
            _ => {}
        }
    }

    let progress: Vec<f64> = shipments.iter().map(|s| s.progress.as_f64()).collect();
    metrics.avg_progress = mean(&progress).unwrap_or(0.0);

    Ok(metrics)
}

fn collect_recovery_metrics(workspace: &Workspace) -> Result<RecoveryMetrics> {
    let batches: Vec<RecyclingBatch> =
        loader::load_all(&workspace.record_dir(RecordPrefix::Batch))?;

    let mut metrics = RecoveryMetrics {
        batches: batches.len(),
        ..Default::default()
    };

    let mut recoveries = Vec::new();
    for batch in &batches {
        metrics.devices_recycled += batch.device_count;
        if batch.status == crate::entities::recycling::BatchStatus::Completed {
            metrics.completed += 1;
        }
        if batch.is_assessed() {
            recoveries.push(batch.material_recovery.as_f64());
        }
        for row in &batch.materials {
            metrics.materials_recovered_kg += row.recovered_kg;
            metrics.materials_total_kg += row.total_kg;
        }
    }
    metrics.assessed = recoveries.len();
    metrics.avg_recovery = mean(&recoveries).unwrap_or(0.0);

    let monthly = count_by(batches.iter(), |b| {
        b.start_date.format("%b %Y").to_string()
    });
    metrics.monthly = to_series(&monthly);

    Ok(metrics)
}

fn collect_refurb_metrics(workspace: &Workspace) -> Result<RefurbMetrics> {
    let jobs: Vec<RefurbishmentJob> = loader::load_all(&workspace.record_dir(RecordPrefix::Job))?;

    let mut metrics = RefurbMetrics {
        jobs: jobs.len(),
        ..Default::default()
    };

    let mut scores = Vec::new();
    for job in &jobs {
        match job.status {
            JobStatus::InProgress | JobStatus::QualityCheck => metrics.active += 1,
            JobStatus::OnHold => metrics.on_hold += 1,
            JobStatus::Completed => metrics.completed += 1,
            _ => {}
        }
        if job.is_scored() {
            scores.push(job.quality_score.as_f64());
        }
    }
    metrics.scored = scores.len();
    metrics.avg_quality = mean(&scores).unwrap_or(0.0);

    let progress: Vec<f64> = jobs.iter().map(|j| j.progress.as_f64()).collect();
    metrics.avg_progress = mean(&progress).unwrap_or(0.0);

    Ok(metrics)
}

fn format_fleet_metrics(m: &FleetMetrics, detailed: bool) -> Vec<String> {
    let mut lines = vec![format!("Devices:      {}", m.total)];

    for (label, n) in &m.by_status {
        lines.push(format!("{:<13} {}", format!("{}:", label), n));
    }
    if m.total > 0 {
        lines.push(format!("Active share: {:.0}%", m.active_share));
    }
    if detailed {
        for (label, n) in &m.by_category {
            lines.push(format!("  {:<11} {}", format!("{}:", label), n));
        }
    }

    lines
}

fn format_shipment_metrics(m: &ShipmentMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("Total:        {}", m.total),
        format!("In transit:   {}", m.in_transit),
        format!("Delivered:    {}", m.delivered),
    ];

    if m.delayed > 0 {
        lines.push(format!("Delayed:      {} {}", m.delayed, style("⚠").red()));
    }
    if m.total > 0 {
        lines.push(format!("Avg progress: {:.0}%", m.avg_progress));
    }

    lines
}

fn format_recovery_metrics(m: &RecoveryMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("Batches:      {}", m.batches),
        format!("Completed:    {}", m.completed),
        format!("Devices:      {}", m.devices_recycled),
    ];

    if m.assessed > 0 {
        lines.push(format!("Avg recovery: {:.0}%", m.avg_recovery));
    } else if m.batches > 0 {
        lines.push("Avg recovery: pending".to_string());
    }
    if m.materials_total_kg > 0.0 {
        lines.push(format!(
            "Materials:    {:.0}/{:.0} kg",
            m.materials_recovered_kg, m.materials_total_kg
        ));
    }

    lines
}

fn format_refurb_metrics(m: &RefurbMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("Jobs:         {}", m.jobs),
        format!("On the bench: {}", m.active),
        format!("Completed:    {}", m.completed),
    ];

    if m.on_hold > 0 {
        lines.push(format!("On hold:      {} {}", m.on_hold, style("⚠").yellow()));
    }
    if m.jobs > 0 {
        lines.push(format!("Avg progress: {:.0}%", m.avg_progress));
    }
    if m.scored > 0 {
        lines.push(format!(
            "Avg quality:  {:.0}% ({} scored)",
            m.avg_quality, m.scored
        ));
    }

    lines
}

fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 33;

    println!(
        "{:<col_width$} {}",
        style(title1).bold(),
        style(title2).bold()
    );
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());
    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        println!("  {:<31} {}", l1, l2);
    }
}

/// Render a series as scaled horizontal bars
fn print_bars(series: &[SeriesPoint]) {
    let max = series.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return;
    }

    for point in series {
        let len = ((point.value / max) * 24.0).round() as usize;
        println!(
            "  {:<10} {} {}",
            point.label,
            style("█".repeat(len.max(1))).cyan(),
            point.value as usize
        );
    }
}

fn calculate_health(
    fleet: &FleetMetrics,
    shipping: &ShipmentMetrics,
    recovery: &RecoveryMetrics,
    refurb: &RefurbMetrics,
) -> &'static str {
    let mut score = 100i32;

    // A fleet skewed toward end-of-life drags the rating down
    if fleet.total > 0 {
        let eol_share = share(fleet.end_of_life, fleet.total);
        if eol_share > 40.0 {
            score -= 20;
        } else if eol_share > 20.0 {
            score -= 10;
        }
    }

    score -= 10 * shipping.delayed as i32;
    score -= 10 * refurb.on_hold as i32;

    if recovery.assessed > 0 && recovery.avg_recovery < 70.0 {
        score -= 15;
    }

    match score {
        90..=100 => "Excellent",
        75..=89 => "Good",
        50..=74 => "Fair",
        _ => "Needs attention",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_starts_excellent() {
        let fleet = FleetMetrics::default();
        let shipping = ShipmentMetrics::default();
        let recovery = RecoveryMetrics::default();
        let refurb = RefurbMetrics::default();
        assert_eq!(
            calculate_health(&fleet, &shipping, &recovery, &refurb),
            "Excellent"
        );
    }

    #[test]
    fn test_health_degrades_with_delays_and_holds() {
        let fleet = FleetMetrics::default();
        let shipping = ShipmentMetrics {
            delayed: 1,
            ..Default::default()
        };
        let refurb = RefurbMetrics {
            on_hold: 1,
            ..Default::default()
        };
        let recovery = RecoveryMetrics::default();
        assert_eq!(
            calculate_health(&fleet, &shipping, &recovery, &refurb),
            "Good"
        );
    }

    #[test]
    fn test_health_needs_attention_when_everything_stalls() {
        let fleet = FleetMetrics {
            total: 2,
            end_of_life: 2,
            ..Default::default()
        };
        let shipping = ShipmentMetrics {
            delayed: 2,
            ..Default::default()
        };
        let refurb = RefurbMetrics {
            on_hold: 2,
            ..Default::default()
        };
        let recovery = RecoveryMetrics {
            assessed: 1,
            avg_recovery: 40.0,
            ..Default::default()
        };
        assert_eq!(
            calculate_health(&fleet, &shipping, &recovery, &refurb),
            "Needs attention"
        );
    }
}
