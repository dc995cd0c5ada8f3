//! Server-side HTML for the dashboard.
//!
//! Every data source is rendered from the same section template: match
//! selector, plot-type selector, roster table, bar chart.

use std::fmt::Write;

use crate::table::{escape_html, BarChart, StatsTable, DEFAULT_MAX_ROWS};

use super::state::{MatchOption, Source};

pub const PAGE_TITLE: &str =
    "Welcome to vainstats - VainGlory game match stats and player ranking!";
pub const NO_MATCH_SELECTED: &str = "No match selected";
pub const PLOT_FAILED: &str = "Plot could not be created";

const CHART_WIDTH: f64 = 480.0;
const CHART_HEIGHT: f64 = 300.0;
const CHART_MARGIN: f64 = 40.0;

/// Everything needed to draw one source section.
#[derive(Debug)]
pub struct SectionView {
    pub source: Source,
    pub title: String,
    pub options: Vec<MatchOption>,
    pub selected_match: Option<String>,
    pub plot_choices: Vec<String>,
    pub selected_plot: Option<String>,
    pub table: Option<StatsTable>,
    pub chart: Option<Result<BarChart, String>>,
}

pub fn page(sections: &[SectionView]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>vainstats</title>");
    html.push_str(
        "<style>.source{width:48%;display:inline-block;vertical-align:top}\
         table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:2px 6px}</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    html.push_str("<form method=\"get\" action=\"/\">\n");
    for section in sections {
        html.push_str(&section_html(section));
    }
    html.push_str("<p><button type=\"submit\">Show</button></p>\n</form>\n</body>\n</html>\n");
    html
}

fn section_html(view: &SectionView) -> String {
    let source = view.source.as_str();
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"source\" id=\"{}-div\">", source);
    let _ = writeln!(
        html,
        "<h2>Pick a Match from the {} list:</h2>",
        escape_html(&view.title)
    );

    if view.options.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", NO_MATCH_SELECTED);
        html.push_str("</div>\n");
        return html;
    }

    let _ = writeln!(html, "<select name=\"{}_match\">", source);
    for option in &view.options {
        let selected = if view.selected_match.as_deref() == Some(option.value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&option.value),
            selected,
            escape_html(&option.label)
        );
    }
    html.push_str("</select>\n");

    html.push_str("<h2>Roster Plot</h2>\n<h3>Pick a Plot type:</h3>\n");
    let _ = writeln!(html, "<div id=\"{}-plot-type-div\">", source);
    for choice in &view.plot_choices {
        let checked = if view.selected_plot.as_deref() == Some(choice.as_str()) {
            " checked"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"{}_plot\" value=\"{}\"{}> {}</label>",
            source,
            escape_html(choice),
            checked,
            escape_html(choice)
        );
    }
    html.push_str("</div>\n");

    html.push_str("<h4>Match Roster Stats</h4>\n");
    let _ = writeln!(html, "<div id=\"{}-roster-table\">", source);
    match (&view.selected_match, &view.table) {
        (Some(_), Some(table)) => html.push_str(&table.to_html(DEFAULT_MAX_ROWS)),
        _ => html.push_str(NO_MATCH_SELECTED),
    }
    html.push_str("\n</div>\n");

    let _ = writeln!(html, "<div id=\"{}-roster-plot\">", source);
    match &view.chart {
        Some(Ok(chart)) => html.push_str(&bar_chart_svg(chart)),
        Some(Err(_)) => {
            let _ = write!(html, "<p>{}</p>", PLOT_FAILED);
        }
        None => {}
    }
    html.push_str("\n</div>\n</div>\n");
    html
}

/// Render a bar chart as inline SVG.
pub fn bar_chart_svg(chart: &BarChart) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"20\" text-anchor=\"middle\">{}</text>",
        CHART_WIDTH / 2.0,
        escape_html(&chart.stat)
    );

    if chart.is_empty() {
        svg.push_str("</svg>");
        return svg;
    }

    let plot_height = CHART_HEIGHT - 2.0 * CHART_MARGIN;
    let max = chart.max_value();
    let scale = if max > 0.0 { plot_height / max } else { 0.0 };
    let slot = (CHART_WIDTH - 2.0 * CHART_MARGIN) / chart.values.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = CHART_HEIGHT - CHART_MARGIN;

    for (i, value) in chart.values.iter().enumerate() {
        let height = (value.max(0.0) * scale).round();
        let x = CHART_MARGIN + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = baseline - height;
        let label = chart.labels.get(i).map(String::as_str).unwrap_or("");

        let _ = write!(
            svg,
            "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#4682b4\"/>",
            x, y, bar_width, height
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            x + bar_width / 2.0,
            y - 4.0,
            value
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            x + bar_width / 2.0,
            baseline + 16.0,
            escape_html(label)
        );
    }

    svg.push_str("</svg>");
    svg
}
