//! HTML dashboard renderer: an SVG donut chart plus a status page.
//!
//! Both artifacts come from embedded minijinja templates with HTML
//! auto-escaping, so labels and links from the source are inert.

use std::f64::consts::TAU;

use chrono::Local;
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use pingboard_config::Link;
use pingboard_core::{CoreError, Report, ReportRenderer, Snapshot};

const REPORT_TEMPLATE: &str = "report.html";
const CHART_TEMPLATE: &str = "status_chart.svg";

const CHART_TITLE: &str = "Endpoint status";
const RADIUS: f64 = 70.0;
// Center of the donut in chart coordinates.
const CX: f64 = 110.0;
const CY: f64 = 130.0;

const REACHABLE_COLOR: &str = "#4CAF50";
const UNREACHABLE_COLOR: &str = "#F44336";

pub struct HtmlRenderer {
    env: Environment<'static>,
    title: String,
    links: Vec<Link>,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>, links: Vec<Link>) -> Result<Self, CoreError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(REPORT_TEMPLATE, include_str!("../templates/report.html"))
            .map_err(template_error)?;
        env.add_template(CHART_TEMPLATE, include_str!("../templates/status_chart.svg"))
            .map_err(template_error)?;
        Ok(Self {
            env,
            title: title.into(),
            links,
        })
    }

    fn render_chart(&self, snapshot: &Snapshot) -> Result<String, CoreError> {
        let circumference = TAU * RADIUS;
        let total = snapshot.len();
        let mut segments = Vec::with_capacity(2);
        let mut start = 0.0;

        for (class, color, count) in [
            ("reachable", REACHABLE_COLOR, snapshot.reachable_count()),
            ("unreachable", UNREACHABLE_COLOR, snapshot.unreachable_count()),
        ] {
            if count == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let fraction = count as f64 / total as f64;
            let mid = TAU * (start + fraction / 2.0);
            segments.push(Segment {
                class,
                color,
                length: num(fraction * circumference),
                offset: num(-start * circumference),
                percent: format!("{:.1}", fraction * 100.0),
                label_x: num(CX + RADIUS * mid.sin()),
                label_y: num(CY - RADIUS * mid.cos()),
            });
            start += fraction;
        }

        self.env
            .get_template(CHART_TEMPLATE)
            .and_then(|tmpl| {
                tmpl.render(context! {
                    title => CHART_TITLE,
                    radius => num(RADIUS),
                    circumference => num(circumference),
                    segments,
                    total,
                    reachable => snapshot.reachable_count(),
                    unreachable => snapshot.unreachable_count(),
                })
            })
            .map_err(template_error)
    }

    fn render_page(&self, snapshot: &Snapshot, chart_file: &str) -> Result<String, CoreError> {
        let indicators: Vec<Indicator<'_>> = snapshot
            .outcomes()
            .iter()
            .map(|outcome| Indicator {
                identifier: outcome.endpoint.identifier(),
                label: outcome.endpoint.label(),
                class: if outcome.reachable {
                    "available"
                } else {
                    "unavailable"
                },
                status: outcome.status_label(),
            })
            .collect();
        let updated = snapshot
            .generated_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        self.env
            .get_template(REPORT_TEMPLATE)
            .and_then(|tmpl| {
                tmpl.render(context! {
                    title => &self.title,
                    updated,
                    reachable => snapshot.reachable_count(),
                    unreachable => snapshot.unreachable_count(),
                    chart_file,
                    links => &self.links,
                    indicators,
                })
            })
            .map_err(template_error)
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render(&self, snapshot: &Snapshot) -> Result<Report, CoreError> {
        let chart = self.render_chart(snapshot)?;
        let chart_file = Report::chart_file_name_for("svg");
        let markup = self.render_page(snapshot, &chart_file)?;
        Ok(Report {
            chart: chart.into_bytes(),
            chart_extension: "svg",
            markup,
        })
    }
}

#[derive(Serialize)]
struct Segment {
    class: &'static str,
    color: &'static str,
    length: String,
    offset: String,
    percent: String,
    label_x: String,
    label_y: String,
}

#[derive(Serialize)]
struct Indicator<'a> {
    identifier: &'a str,
    label: &'a str,
    class: &'static str,
    status: &'a str,
}

/// Two decimals, never "-0.00".
fn num(value: f64) -> String {
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    format!("{value:.2}")
}

fn template_error(err: minijinja::Error) -> CoreError {
    CoreError::Render {
        message: err.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pingboard_core::{Endpoint, ProbeErrorKind, ProbeOutcome, summarize};

    use super::*;

    fn outcome(identifier: &str, label: &str, result: Result<bool, ProbeErrorKind>) -> ProbeOutcome {
        ProbeOutcome::from_result(
            Endpoint::new(identifier, label),
            result,
            1,
            std::time::Duration::from_millis(5),
        )
    }

    fn renderer() -> HtmlRenderer {
        HtmlRenderer::new(
            "Lab <status>",
            vec![Link {
                label: "Inventory".into(),
                url: "https://intranet.example/inventory".into(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn indicators_keep_input_order_and_status_classes() {
        let snapshot = summarize(vec![
            outcome("10.0.0.3", "gamma", Ok(false)),
            outcome("10.0.0.1", "alpha", Ok(true)),
            outcome("10.0.0.2", "beta", Err(ProbeErrorKind::Timeout)),
        ]);
        let report = renderer().render(&snapshot).unwrap();
        let html = &report.markup;

        let gamma = html.find(">gamma</a>").unwrap();
        let alpha = html.find(">alpha</a>").unwrap();
        let beta = html.find(">beta</a>").unwrap();
        assert!(gamma < alpha && alpha < beta);

        assert!(html.contains(r#"href="http://10.0.0.1" target="_blank" class="label-box available""#));
        assert!(html.contains(r#"href="http://10.0.0.3" target="_blank" class="label-box unavailable""#));
        assert!(html.contains("10.0.0.2: timeout"));
        assert!(html.contains("Reachable: 1"));
        assert!(html.contains("Unreachable: 2"));
        assert!(html.contains(r#"<img src="status_chart.svg""#));
        assert!(html.contains(">Inventory</a>"));
    }

    #[test]
    fn labels_and_title_are_escaped() {
        let snapshot = summarize(vec![outcome("10.0.0.9", "<script>alert(1)</script>", Ok(true))]);
        let report = renderer().render(&snapshot).unwrap();

        assert!(!report.markup.contains("<script>"));
        assert!(report.markup.contains("&lt;script&gt;"));
        assert!(report.markup.contains("Lab &lt;status&gt;"));
    }

    #[test]
    fn chart_splits_ring_by_share() {
        let snapshot = summarize(vec![
            outcome("a", "a", Ok(true)),
            outcome("b", "b", Ok(true)),
            outcome("c", "c", Ok(true)),
            outcome("d", "d", Ok(false)),
        ]);
        let report = renderer().render(&snapshot).unwrap();
        let svg = String::from_utf8(report.chart).unwrap();

        assert_eq!(report.chart_extension, "svg");
        assert!(svg.starts_with("<svg"));
        // circumference 2π·70 ≈ 439.82; 75% ≈ 329.87, 25% ≈ 109.96
        assert!(svg.contains(r#"stroke-dasharray="329.87 439.82""#), "{svg}");
        assert!(svg.contains(r#"stroke-dasharray="109.96 439.82""#), "{svg}");
        assert!(svg.contains(r#"stroke-dashoffset="-329.87""#), "{svg}");
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("25.0%"));
    }

    #[test]
    fn empty_snapshot_renders_placeholder() {
        let report = renderer().render(&summarize(Vec::new())).unwrap();
        let svg = String::from_utf8(report.chart).unwrap();

        assert!(!svg.contains("stroke-dasharray"));
        assert!(svg.contains("0 total"));
        assert!(report.markup.contains("No endpoints were listed."));
        assert!(report.markup.contains("Reachable: 0"));
    }

    #[test]
    fn num_never_prints_negative_zero() {
        assert_eq!(num(-0.0), "0.00");
        assert_eq!(num(-0.001), "0.00");
        assert_eq!(num(12.3456), "12.35");
    }
}
