use std::fs;
use std::path::Path;

use crate::dashboard::Figure;
use crate::error::{Context, Result};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

/// Write the dashboard artifact: a self-contained HTML page embedding both
/// figures as JSON next to a CDN-loaded chart library. The file is fully
/// overwritten on every run.
pub fn write_dashboard_html(figure: &Figure, table: &Figure, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create dashboard directory {}", parent.display())
            })?;
        }
    }

    let html = render_page(figure, table)?;
    fs::write(path, html)
        .with_context(|| format!("failed to write dashboard to {}", path.display()))?;

    Ok(())
}

fn render_page(figure: &Figure, table: &Figure) -> Result<String> {
    let chart_json = serde_json::to_string(figure)?;
    let table_json = serde_json::to_string(table)?;

    Ok(format!(
        r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Price dashboard</title>
<script src="{PLOTLY_CDN}"></script>
<style>
  body{{margin:0;background:#0f1220;color:#e8ecf5;font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif}}
  .wrap{{max-width:1100px;margin:24px auto;padding:0 16px}}
  .card{{background:#15192b;border:1px solid #26304a;border-radius:14px;padding:14px;box-shadow:0 10px 24px rgba(0,0,0,.25)}}
  h1{{font-size:1.4rem;margin:0 0 12px}}
  footer{{opacity:.7;margin:18px 0}}
</style>
</head>
<body>
  <div class="wrap">
    <h1>Price dashboard</h1>
    <div class="card">
      <div id="chart"></div>
    </div>
    <div class="card" style="margin-top:14px">
      <div id="summary"></div>
    </div>
    <footer>Generated automatically.</footer>
  </div>
  <script>
    var chart = {chart_json};
    var summary = {table_json};
    Plotly.newPlot("chart", chart.data, chart.layout, {{displayModeBar: false, responsive: true}});
    Plotly.newPlot("summary", summary.data, summary.layout, {{displayModeBar: false, responsive: true}});
  </script>
</body>
</html>
"##
    ))
}
