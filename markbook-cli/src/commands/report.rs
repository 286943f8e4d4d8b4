//! Report command - marks table, charts and summary for the logged-in user

use anyhow::Result;
use colored::Colorize;
use markbook_core::domain::{ChartKind, ChartSpec};
use markbook_core::{PageId, Report};

use super::{get_context, with_session};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let report = with_session(&ctx, |session| {
        let report = ctx.session_service.report(session)?;
        if session.current_page != PageId::Report {
            session.navigate(PageId::Report)?;
        }
        Ok(report)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

pub fn print_report(report: &Report) {
    let Some(summary) = &report.summary else {
        output::warning("No marks found!");
        return;
    };

    println!("{}", "Your Marks".bold());
    println!("{}", output::marks_table(&report.table));
    println!();

    for chart in &report.charts {
        print_chart(chart);
        println!();
    }

    println!(
        "Total: {}  Average: {:.1}  Highest: {} ({})  Lowest: {} ({})",
        summary.total,
        summary.average,
        summary.highest.subject,
        summary.highest.marks.value(),
        summary.lowest.subject,
        summary.lowest.marks.value(),
    );
}

fn print_chart(chart: &ChartSpec) {
    println!("{}", chart.title.bold());
    match chart.kind {
        ChartKind::Bar => {
            for point in &chart.points {
                println!(
                    "  {:<10} {} {}",
                    point.subject.name(),
                    output::bar(point.marks).cyan(),
                    point.marks
                );
            }
        }
        ChartKind::Line => {
            let series: Vec<String> = chart
                .points
                .iter()
                .map(|p| format!("{} {}", p.subject.name(), p.marks))
                .collect();
            println!("  {}", series.join(" -> "));
        }
        ChartKind::Pie => {
            for point in &chart.points {
                println!(
                    "  {:<10} {:>5.1}%",
                    point.subject.name(),
                    point.share.unwrap_or_default()
                );
            }
        }
    }
}
