use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{AssetConfig, ChartConfig};
use crate::enrich::EnrichedTable;

/// Plotly-shaped trace objects. These serialize to the JSON the chart
/// library consumes; the renderer never touches the filesystem.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<String>,
        y: Vec<Option<f64>>,
        name: String,
        mode: String,
        line: LineStyle,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        name: String,
        opacity: f64,
        yaxis: String,
    },
    Table {
        header: TableHeader,
        cells: TableCells,
    },
}

impl Trace {
    pub fn trace_name(&self) -> Option<&str> {
        match self {
            Trace::Scatter { name, .. } | Trace::Bar { name, .. } => Some(name.as_str()),
            Trace::Table { .. } => None,
        }
    }

    /// Number of plotted points; `null` entries in a scatter are unplotted.
    pub fn visible_points(&self) -> usize {
        match self {
            Trace::Scatter { y, .. } => y.iter().flatten().count(),
            Trace::Bar { y, .. } => y.len(),
            Trace::Table { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableHeader {
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCells {
    /// Column-major, matching the header order.
    pub values: Vec<Vec<String>>,
}

/// A renderable figure: traces plus a layout blob the chart library applies
/// as-is.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Value,
}

/// Build the time-series figure and the latest-values table figure from the
/// enriched history.
pub fn build_dashboard(
    enriched: &EnrichedTable,
    assets: &[AssetConfig],
    chart: &ChartConfig,
) -> (Figure, Figure) {
    let timestamps: Vec<String> = enriched
        .table
        .rows
        .iter()
        .map(|row| row.timestamp.to_rfc3339())
        .collect();

    // Markers help when the series is nearly empty; past a few points they
    // only add noise.
    let mode = if enriched.table.len() <= 3 {
        "lines+markers"
    } else {
        "lines"
    };

    let mut traces = Vec::new();
    for (col, column) in enriched.table.columns.iter().enumerate() {
        let values = enriched.table.column_values(col);
        let color = assets
            .iter()
            .find(|asset| &asset.name == column)
            .and_then(|asset| asset.color.clone());

        traces.push(Trace::Scatter {
            x: timestamps.clone(),
            y: values.iter().map(|&v| Some(v)).collect(),
            name: column.clone(),
            mode: mode.to_string(),
            line: LineStyle {
                width: 2.0,
                color,
                dash: None,
            },
        });

        for &window in &chart.ma_windows {
            traces.push(Trace::Scatter {
                x: timestamps.clone(),
                y: rolling_mean(&values, window),
                name: format!("{column} MA{window}"),
                mode: "lines".to_string(),
                line: LineStyle {
                    width: 1.0,
                    color: None,
                    dash: Some("dot".to_string()),
                },
            });
        }
    }

    if !enriched.table.columns.is_empty() {
        traces.push(Trace::Bar {
            x: timestamps.clone(),
            y: enriched.mean_pct_per_row(),
            name: "Avg % change".to_string(),
            opacity: 0.25,
            yaxis: "y2".to_string(),
        });
    }

    let figure = Figure {
        data: traces,
        layout: json!({
            "title": "Price history (MA and avg % change)",
            "plot_bgcolor": chart.theme_bg,
            "paper_bgcolor": chart.theme_bg,
            "font": { "color": chart.theme_fg },
            "legend": { "orientation": "h", "y": -0.2 },
            "margin": { "l": 40, "r": 20, "t": 60, "b": 100 },
            "height": 580,
            "yaxis": {
                "title": "Price (USD)",
                "gridcolor": "rgba(255,255,255,0.06)"
            },
            "yaxis2": {
                "title": "% change (bars)",
                "overlaying": "y",
                "side": "right",
                "gridcolor": "rgba(255,255,255,0.06)"
            }
        }),
    };

    let table_figure = build_summary_table(enriched, chart);

    (figure, table_figure)
}

fn build_summary_table(enriched: &EnrichedTable, chart: &ChartConfig) -> Figure {
    let mut names = Vec::new();
    let mut prices = Vec::new();
    let mut changes = Vec::new();

    for (col, column) in enriched.table.columns.iter().enumerate() {
        names.push(column.clone());
        prices.push(format_currency(enriched.latest_price(col).unwrap_or(0.0)));
        changes.push(format_signed_pct(enriched.latest_pct(col).unwrap_or(0.0)));
    }

    Figure {
        data: vec![Trace::Table {
            header: TableHeader {
                values: vec![
                    "Asset".to_string(),
                    "Last price".to_string(),
                    "% vs previous".to_string(),
                ],
            },
            cells: TableCells {
                values: vec![names, prices, changes],
            },
        }],
        layout: json!({
            "plot_bgcolor": chart.theme_bg,
            "paper_bgcolor": chart.theme_bg,
            "font": { "color": chart.theme_fg },
            "margin": { "l": 0, "r": 0, "t": 10, "b": 0 },
            "height": 220
        }),
    }
}

/// Simple rolling mean; the first `window - 1` points are undefined and stay
/// `None` so the chart leaves them unplotted.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some(parts) => parts,
        None => (formatted.as_str(), "00"),
    };

    let mut grouped = String::new();
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

pub fn format_signed_pct(value: f64) -> String {
    format!("{value:+.2}%")
}
