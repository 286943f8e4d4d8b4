//! Report domain model - chart-ready views of a marks table

use serde::{Deserialize, Serialize};

use super::marks::{MarkRow, MarksTable, Subject};

/// Kind of chart a series is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// One data point of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub subject: Subject,
    pub marks: u8,
    /// Share of the total in percent; only set for pie charts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<f64>,
}

/// Data for one chart, handed to whatever renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

/// Aggregate figures over a full table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: u32,
    pub average: f64,
    pub highest: MarkRow,
    pub lowest: MarkRow,
}

/// Everything the report page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub table: MarksTable,
    pub charts: Vec<ChartSpec>,
    pub summary: Option<ReportSummary>,
}

impl Report {
    /// Build the report for a table; an empty table yields no charts
    pub fn from_table(table: MarksTable) -> Self {
        if table.is_empty() {
            return Self {
                table,
                charts: Vec::new(),
                summary: None,
            };
        }

        let total = table.total();
        let points: Vec<ChartPoint> = table
            .rows()
            .iter()
            .map(|row| ChartPoint {
                subject: row.subject,
                marks: row.marks.value(),
                share: None,
            })
            .collect();

        let pie_points = points
            .iter()
            .map(|p| ChartPoint {
                share: Some(share_of(p.marks, total)),
                ..p.clone()
            })
            .collect();

        let charts = vec![
            ChartSpec {
                kind: ChartKind::Bar,
                title: "Marks per Subject".to_string(),
                points: points.clone(),
            },
            ChartSpec {
                kind: ChartKind::Line,
                title: "Marks Distribution".to_string(),
                points,
            },
            ChartSpec {
                kind: ChartKind::Pie,
                title: "Marks Share by Subject".to_string(),
                points: pie_points,
            },
        ];

        let rows = table.rows();
        // first row wins ties, matching table order
        let highest = rows
            .iter()
            .copied()
            .reduce(|best, row| if row.marks > best.marks { row } else { best });
        let lowest = rows
            .iter()
            .copied()
            .reduce(|worst, row| if row.marks < worst.marks { row } else { worst });

        let summary = highest.zip(lowest).map(|(highest, lowest)| ReportSummary {
            total,
            average: f64::from(total) / rows.len() as f64,
            highest,
            lowest,
        });

        Self {
            table,
            charts,
            summary,
        }
    }
}

fn share_of(marks: u8, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(marks) * 100.0 / f64::from(total)
    }
}
