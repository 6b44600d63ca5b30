use crate::model::Catalog;
use crate::report::{SubjectReport, TeamReport, format_score};
use crate::scoring::gaps::GapPriority;
use crate::trend::{TrendReport, TrendSummary};

pub fn render_report_text(report: &TeamReport, catalog: &Catalog) -> String {
    let mut out = String::new();

    out.push_str("Competency Assessment Report\n");
    out.push_str("============================\n\n");

    out.push_str("1. Team radar\n");
    out.push_str(&format!(
        "Max possible score: {}\n",
        format_score(report.radar.max_possible_score)
    ));
    for score in &report.radar.competencies {
        if score.member_count == 0 {
            out.push_str(&format!("{}: not assessed\n", score.title));
        } else {
            out.push_str(&format!(
                "{}: {} ({} members)\n",
                score.title,
                format_score(score.score),
                score.member_count
            ));
        }
    }
    out.push('\n');

    out.push_str("2. Hiring gaps\n");
    for gap in &report.hiring_gaps {
        out.push_str(&format!(
            "[{}] {} {}\n",
            gap.priority.as_str(),
            gap.title,
            gap_score_label(gap.priority, gap.score)
        ));
        if gap.priority != GapPriority::Strength && !gap.skills_to_look_for.is_empty() {
            let skills = gap
                .skills_to_look_for
                .iter()
                .map(|s| s.title.as_str())
                .collect::<Vec<_>>();
            out.push_str(&format!("  Look for: {}\n", skills.join(", ")));
        }
    }
    out.push('\n');

    out.push_str("3. Individuals\n");
    for subject in &report.subjects {
        render_subject(&mut out, subject, catalog);
    }

    out
}

fn render_subject(out: &mut String, report: &SubjectReport, catalog: &Catalog) {
    out.push_str(&format!(
        "\n{} ({})\n",
        report.subject.name,
        report.subject.current_level.label()
    ));
    let Some(assessment) = report.latest_assessment else {
        out.push_str("No completed assessment.\n");
        return;
    };
    out.push_str(&format!("Latest assessment: #{}", assessment));
    if let Some(coverage) = report.coverage {
        out.push_str(&format!(", coverage {}%", format_score(coverage)));
    }
    out.push('\n');

    for summary in &report.summaries {
        out.push_str(&format!(
            "  {}: {} [{}]\n    {}\n",
            summary.title,
            format_score(summary.average),
            summary.outlook.as_str(),
            summary.recommendation
        ));
        for sub in &summary.sub_competencies {
            out.push_str(&format!("    - {}: {}", sub.title, format_score(sub.average)));
            if let Some(worst) = sub.worst {
                out.push_str(&format!(", lowest: {}", worst.label()));
            }
            out.push('\n');
        }
    }

    if let Some(trend) = &report.trend {
        out.push_str(&format!(
            "  Trend over {} assessments: {}\n",
            trend.assessments,
            summary_statement(&trend.summary)
        ));
        render_trend_lines(out, trend, catalog);
    }
}

fn render_trend_lines(out: &mut String, trend: &TrendReport, catalog: &Catalog) {
    for (id, delta) in &trend.competencies {
        let title = catalog
            .competency(*id)
            .map(|c| c.title.as_str())
            .unwrap_or("unknown competency");
        out.push_str(&format!(
            "    {}: {} -> {} ({})\n",
            title,
            format_score(delta.first),
            format_score(delta.last),
            delta.trend.as_str()
        ));
    }
}

fn gap_score_label(priority: GapPriority, score: f64) -> String {
    match priority {
        GapPriority::NotAssessed => "(no data)".to_string(),
        _ => format!("({})", format_score(score)),
    }
}

fn summary_statement(summary: &TrendSummary) -> String {
    format!(
        "{} improving, {} stable, {} declining",
        summary.improving, summary.stable, summary.declining
    )
}
