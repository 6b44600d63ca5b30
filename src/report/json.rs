use crate::report::TeamReport;

pub fn render_report_json(report: &TeamReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
