//! NUnit XML result documents
//!
//! The test runner writes each performance result into the `<output>` of
//! its test case, one JSON payload per line behind a marker:
//!
//! ```text
//! ##performancetestresult2:{"Name":"Boot","SampleGroups":[...]}
//! ##performancetestruninfo2:{"TestSuite":"Playmode","Player":{...}}
//! ```
//!
//! Version 1 uses the same markers without the trailing `2`.

use super::Schema;
use crate::error::{ReportError, Result};
use crate::model::{PerformanceTestRun, SchemaVersion};
use quick_xml::events::Event;
use quick_xml::Reader;

struct Markers {
    result: &'static str,
    run_info: &'static str,
}

fn markers(version: SchemaVersion) -> Markers {
    match version {
        SchemaVersion::V1 => Markers {
            result: "##performancetestresult:",
            run_info: "##performancetestruninfo:",
        },
        SchemaVersion::V2 => Markers {
            result: "##performancetestresult2:",
            run_info: "##performancetestruninfo2:",
        },
    }
}

pub(super) fn parse<S: Schema>(xml: &str) -> Result<PerformanceTestRun> {
    let markers = markers(S::VERSION);
    let mut run = PerformanceTestRun {
        schema_version: S::VERSION,
        ..Default::default()
    };

    let mut reader = Reader::from_str(xml);
    let mut output_depth = 0usize;
    let mut output = String::new();
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_element = true;
                if e.name().as_ref() == b"output" {
                    output_depth += 1;
                }
            }
            Ok(Event::Empty(_)) => saw_element = true,
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"output" && output_depth > 0 {
                    output_depth -= 1;
                    if output_depth == 0 {
                        scan_output::<S>(&output, &markers, &mut run)?;
                        output.clear();
                    }
                }
            }
            Ok(Event::Text(t)) if output_depth > 0 => {
                let text = t.unescape().map_err(|e| {
                    ReportError::MalformedInput(format!("XML text decode error: {}", e))
                })?;
                output.push_str(&text);
            }
            Ok(Event::CData(c)) if output_depth > 0 => {
                let bytes = c.into_inner();
                let text = std::str::from_utf8(&bytes).map_err(|e| {
                    ReportError::MalformedInput(format!("CDATA is not UTF-8: {}", e))
                })?;
                output.push_str(text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReportError::MalformedInput(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !saw_element {
        return Err(ReportError::MalformedInput(
            "document contains no XML elements".to_string(),
        ));
    }
    if output_depth > 0 {
        return Err(ReportError::MalformedInput(
            "unterminated <output> element".to_string(),
        ));
    }

    Ok(run)
}

fn scan_output<S: Schema>(
    output: &str,
    markers: &Markers,
    run: &mut PerformanceTestRun,
) -> Result<()> {
    for line in output.lines().map(str::trim) {
        if let Some(json) = line.strip_prefix(markers.result) {
            run.results.push(S::test_result(json)?);
        } else if let Some(json) = line.strip_prefix(markers.run_info) {
            let info = S::run_info(json)?;
            if info.test_suite.is_some() {
                run.test_suite = info.test_suite;
            }
            run.metadata.extend(info.metadata);
        }
    }
    Ok(())
}
