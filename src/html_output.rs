//! HTML benchmark report
//!
//! A single self-contained page: one table per run with every metric, its
//! statistics, baseline value and status, followed by the environment
//! fields that differ between runs.

use crate::model::{PerformanceTestRunResult, SampleGroupResult, TestState};
use crate::regression::{diff_ratio, SampleStatistics};

/// File name of the report inside the report directory
pub const REPORT_FILE_NAME: &str = "performance_benchmark_report.html";

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlReport<'a> {
    runs: &'a [PerformanceTestRunResult],
    default_threshold: f64,
}

impl<'a> HtmlReport<'a> {
    pub fn new(runs: &'a [PerformanceTestRunResult], default_threshold: f64) -> Self {
        Self {
            runs,
            default_threshold,
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2, h3 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        td.num {
            font-family: monospace;
            text-align: right;
        }
        tr.regressed {
            background-color: #f8d7da;
        }
        tr.known {
            background-color: #fff3cd;
        }
        tr.progressed {
            background-color: #d4edda;
        }
        .test-failure {
            color: #cc0000;
            font-weight: bold;
        }
        .baseline-tag {
            font-size: 0.8em;
            color: #888;
        }
        .env-table th {
            background-color: #5cb85c;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn generate_header() -> String {
        let headers = [
            "Test",
            "Metric",
            "Unit",
            "Aggregation",
            "Value",
            "Baseline",
            "Diff %",
            "Threshold %",
            "Min",
            "Max",
            "Median",
            "Average",
            "Std Dev",
            "Sum",
            "Status",
        ];
        let cells: Vec<String> = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
        format!("<tr>{}</tr>", cells.join(""))
    }

    fn format_metric_row(&self, test_name: &str, failed: bool, group: &SampleGroupResult) -> String {
        let stats = group
            .statistics
            .unwrap_or_else(|| SampleStatistics::from_samples(&group.samples));
        let value = stats.value_of(group.aggregation_type);
        let baseline = group
            .baseline_value
            .map(|b| format!("{:.2}", b))
            .unwrap_or_default();
        let diff = group
            .baseline_value
            .and_then(|b| diff_ratio(value, b))
            .map(|r| format!("{:.2}", r * 100.0))
            .unwrap_or_default();
        let status = match group.known_issue_details() {
            Some(details) if !details.is_empty() => {
                format!("known: {}", Self::escape_html(details))
            }
            _ => group.classification.label().to_string(),
        };
        let test_class = if failed { " class=\"test-failure\"" } else { "" };

        let cells = [
            format!("<td{}>{}</td>", test_class, Self::escape_html(test_name)),
            format!("<td>{}</td>", Self::escape_html(&group.name)),
            format!("<td>{}</td>", group.unit),
            format!("<td>{}</td>", group.aggregation_type),
            format!(r#"<td class="num">{:.2}</td>"#, value),
            format!(r#"<td class="num">{}</td>"#, baseline),
            format!(r#"<td class="num">{}</td>"#, diff),
            format!(
                r#"<td class="num">{:.2}</td>"#,
                group.effective_threshold(self.default_threshold) * 100.0
            ),
            format!(r#"<td class="num">{:.2}</td>"#, stats.min),
            format!(r#"<td class="num">{:.2}</td>"#, stats.max),
            format!(r#"<td class="num">{:.2}</td>"#, stats.median),
            format!(r#"<td class="num">{:.2}</td>"#, stats.average),
            format!(r#"<td class="num">{:.2}</td>"#, stats.standard_deviation),
            format!(r#"<td class="num">{:.2}</td>"#, stats.sum),
            format!("<td>{}</td>", status),
        ];

        format!(
            r#"<tr class="{}">{}</tr>"#,
            group.classification.label(),
            cells.join("")
        )
    }

    fn render_run(&self, run: &PerformanceTestRunResult) -> String {
        let mut html = String::new();

        html.push_str(&format!("    <h2>{}", Self::escape_html(&run.result_name)));
        if run.is_baseline {
            html.push_str(" <span class=\"baseline-tag\">(baseline)</span>");
        }
        html.push_str("</h2>\n");

        html.push_str("    <table>\n");
        html.push_str("        ");
        html.push_str(&Self::generate_header());
        html.push('\n');
        for test in run.test_results() {
            let failed = test.state == TestState::Failure;
            for group in &test.sample_groups {
                html.push_str("        ");
                html.push_str(&self.format_metric_row(&test.name, failed, group));
                html.push('\n');
            }
        }
        html.push_str("    </table>\n");

        html
    }

    /// Environment fields that differ, one row per (run, section)
    fn render_environment(&self) -> String {
        let rows: Vec<String> = self
            .runs
            .iter()
            .flat_map(|run| {
                run.environment_diff.iter().map(move |(section, fields)| {
                    let values: Vec<String> = fields
                        .iter()
                        .map(|field| {
                            let value = run
                                .run
                                .metadata
                                .get(section)
                                .and_then(|s| s.get(field))
                                .map(|v| v.to_string())
                                .unwrap_or_else(|| "(missing)".to_string());
                            format!("{} = {}", Self::escape_html(field), Self::escape_html(&value))
                        })
                        .collect();
                    format!(
                        "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        Self::escape_html(&run.result_name),
                        Self::escape_html(section),
                        values.join("<br>")
                    )
                })
            })
            .collect();

        if rows.is_empty() {
            return String::new();
        }

        let mut html = String::new();
        html.push_str("    <h2>Environment Differences</h2>\n");
        html.push_str("    <table class=\"env-table\">\n");
        html.push_str("        <tr><th>Run</th><th>Section</th><th>Fields</th></tr>\n");
        for row in rows {
            html.push_str(&row);
        }
        html.push_str("    </table>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Performance Benchmark Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Performance Benchmark Report</h1>\n");

        if !self.runs.iter().any(|r| r.is_baseline) {
            html.push_str("    <p>No baseline: metrics are not classified.</p>\n");
        }

        for run in self.runs {
            html.push_str(&self.render_run(run));
        }

        html.push_str(&self.render_environment());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by benchmark-reporter\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
