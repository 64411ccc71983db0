//! HTML rendering of a batch report
//!
//! One table row per image: a thumbnail, then for every configuration a
//! title, the extracted colors with their pixel counts, and the matched
//! palette colors with their CIEDE2000 distances.

use std::fmt::Write as _;

use super::BatchReport;
use crate::constants::report::THUMBNAIL_WIDTH;
use crate::sweep::{ConfigurationReport, ImageReport};

const HEADING: &str = "Colors listed in order of dominance: hex color followed by number of entries";
const CELL_STYLE: &str = "width:200px;height:50px;text-align:center;";

/// Render the full report page
pub fn render(report: &BatchReport) -> String {
    let mut html = String::new();
    html.push_str("<html><body>");
    let _ = write!(html, "<h1>{}</h1>", HEADING);
    html.push_str("<table border=\"1\">");

    for image in report.images() {
        render_image(&mut html, image);
    }

    html.push_str("</table></body></html>");
    html
}

fn render_image(html: &mut String, image: &ImageReport) {
    let _ = write!(
        html,
        "<tr><td><img src=\"{}\" width=\"{}\" border=\"1\"></td><td>",
        escape(image.thumbnail()),
        THUMBNAIL_WIDTH
    );
    for entry in &image.entries {
        let _ = write!(html, "<h3>{}</h3>", escape(&image.title(entry)));
        render_entry(html, entry);
    }
    html.push_str("</td></tr>");
}

fn render_entry(html: &mut String, entry: &ConfigurationReport) {
    html.push_str("<table><tr>");
    for m in &entry.matches {
        let hex = m.cluster.hex();
        let _ = write!(
            html,
            "<td style=\"background-color: {hex};{CELL_STYLE}\">{hex} {}</td>",
            m.cluster.weight
        );
    }
    html.push_str("</tr></table>");

    html.push_str("<table><tr>");
    for m in &entry.matches {
        let hex = escape(&m.nearest.hex);
        let _ = write!(
            html,
            "<td style=\"background-color: {hex};{CELL_STYLE}\">{hex} {:.2}</td>",
            m.distance()
        );
    }
    html.push_str("</tr></table>");
}

/// Minimal escaping for text and attribute values
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
