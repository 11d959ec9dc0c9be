//! HTML page rendering.
//!
//! Produces one self-contained page: the dashboard payload is embedded as
//! JSON and drawn client-side by `charts.js` on top of Chart.js. The date
//! form submits `start`/`end` as query parameters, so each change of the
//! filter is a fresh render.

use crate::dashboard::Dashboard;
use crate::error::Result;

const CHARTS_JS: &str = include_str!("charts.js");
const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

/// Renders `dashboard` into a complete HTML document.
#[tracing::instrument(skip(dashboard), fields(records = dashboard.record_count))]
pub fn render_page(dashboard: &Dashboard) -> Result<String> {
    let payload = embed_json(&serde_json::to_string(dashboard)?);

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Bike Sharing Data Dashboard</title>
<style>
  body {{ font-family: sans-serif; margin: 0; display: flex; color: #262730; }}
  aside {{ width: 260px; padding: 24px; background: #f0f2f6; min-height: 100vh; box-sizing: border-box; }}
  main {{ flex: 1; padding: 24px 48px; max-width: 1100px; }}
  label {{ display: block; margin-top: 12px; font-size: 14px; }}
  input, button {{ margin-top: 4px; width: 100%; padding: 4px; box-sizing: border-box; }}
  .columns {{ display: flex; gap: 24px; }}
  .columns > div {{ flex: 1; }}
  .pie {{ max-width: 480px; }}
  .meta {{ color: #808495; font-size: 13px; }}
</style>
</head>
<body>
<aside>
  <h3>Filter by Date Range</h3>
  <form method="get" action="/">
    <label for="start">Start date</label>
    <input type="date" id="start" name="start" value="{start}" min="{min}" max="{max}">
    <label for="end">End date</label>
    <input type="date" id="end" name="end" value="{end}" min="{min}" max="{max}">
    <button type="submit">Apply</button>
  </form>
  <p class="meta">{records} records in range</p>
</aside>
<main>
  <h1>Bike Sharing Data Dashboard</h1>
  <p>This dashboard summarizes bike rental data by year, month, season, weather, day, hour and user type.
  Use the <b>sidebar</b> to filter the data by date range.</p>

  <h2>Total Bike Rentals by Year</h2>
  <canvas id="chart-year"></canvas>

  <h2>Total Bike Rentals by Month (2011 vs 2012)</h2>
  <canvas id="chart-month"></canvas>

  <h2>Total Bike Rentals by Weather and Season</h2>
  <div class="columns">
    <div><canvas id="chart-weather"></canvas></div>
    <div><canvas id="chart-season"></canvas></div>
  </div>

  <h2>Total Bike Rentals by Days</h2>
  <canvas id="chart-weekday"></canvas>

  <h2>Proportion of Casual vs Registered Users</h2>
  <div class="pie"><canvas id="chart-users"></canvas></div>

  <h2>Hours with Highest Bike Rentals</h2>
  <canvas id="chart-hour"></canvas>

  <h2>Rentals on Holidays, Weekends, and Working Days</h2>
  <canvas id="chart-holiday"></canvas>
  <canvas id="chart-weekend"></canvas>
  <canvas id="chart-working-day"></canvas>
</main>
<script type="application/json" id="dashboard-data">{payload}</script>
<script src="{cdn}"></script>
<script>
{charts_js}
</script>
</body>
</html>
"##,
        start = dashboard.range.start(),
        end = dashboard.range.end(),
        min = dashboard.bounds.start(),
        max = dashboard.bounds.end(),
        records = dashboard.record_count,
        payload = payload,
        cdn = CHART_JS_CDN,
        charts_js = CHARTS_JS,
    );

    Ok(html)
}

/// Makes serialized JSON safe to place inside a `<script>` element.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "\\u003c!--")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::record::RentalRecord;
    use chrono::NaiveDate;

    fn dashboard() -> Dashboard {
        let records = vec![
            RentalRecord {
                season: Some("</script><b>".to_string()),
                ..RentalRecord::new(NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(), 1, 2)
            },
            RentalRecord::new(NaiveDate::from_ymd_opt(2012, 12, 31).unwrap(), 3, 4),
        ];
        Dashboard::build(&records, None, Aggregator::default()).unwrap()
    }

    #[test]
    fn test_render_page_has_date_form_bounds() {
        let html = render_page(&dashboard()).unwrap();
        assert!(html.contains(r#"name="start" value="2011-01-01" min="2011-01-01" max="2012-12-31""#));
        assert!(html.contains(r#"name="end" value="2012-12-31""#));
        assert!(html.contains("2 records in range"));
    }

    #[test]
    fn test_render_page_has_every_chart() {
        let html = render_page(&dashboard()).unwrap();
        for id in [
            "chart-year",
            "chart-month",
            "chart-weather",
            "chart-season",
            "chart-weekday",
            "chart-users",
            "chart-hour",
            "chart-holiday",
            "chart-weekend",
            "chart-working-day",
        ] {
            assert!(html.contains(&format!(r#"<canvas id="{id}">"#)), "missing {id}");
        }
    }

    #[test]
    fn test_render_page_escapes_payload() {
        let html = render_page(&dashboard()).unwrap();
        assert!(!html.contains("\"</script><b>\""));
        assert!(html.contains(r#"<\/script><b>"#));
    }

    #[test]
    fn test_embed_json() {
        assert_eq!(embed_json(r#"{"a":"</x>"}"#), r#"{"a":"<\/x>"}"#);
        assert_eq!(embed_json("<!--"), "\\u003c!--");
    }
}
