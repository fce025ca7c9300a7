// Integration test fixtures
//
// Builders for V2 result documents written into temporary directories.
#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// One metric: (test, metric, unit index, samples)
pub type Metric<'a> = (&'a str, &'a str, u8, &'a [f64]);

/// V2 run document with `Average` aggregation for every metric
pub fn v2_run(metrics: &[Metric<'_>]) -> Value {
    let mut tests: Vec<(String, Vec<Value>)> = Vec::new();
    for (test, metric, unit, samples) in metrics {
        let group = json!({
            "Name": metric,
            "Unit": unit,
            "AggregationType": "Average",
            "IncreaseIsBetter": false,
            "Samples": samples,
        });
        match tests.iter_mut().find(|(name, _)| name.as_str() == *test) {
            Some((_, groups)) => groups.push(group),
            None => tests.push((test.to_string(), vec![group])),
        }
    }

    json!({
        "TestSuite": "Playmode",
        "Player": {"Platform": "Android", "GraphicsApi": "Vulkan"},
        "Results": tests
            .into_iter()
            .map(|(name, groups)| json!({"Name": name, "Version": "1", "SampleGroups": groups}))
            .collect::<Vec<_>>(),
    })
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

pub fn write_json_run(dir: &Path, name: &str, metrics: &[Metric<'_>]) -> PathBuf {
    write_file(dir, name, &v2_run(metrics).to_string())
}

/// NUnit XML document carrying the same run as `v2_run`
pub fn write_xml_run(dir: &Path, name: &str, metrics: &[Metric<'_>]) -> PathBuf {
    let run = v2_run(metrics);
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<test-run>\n  <test-suite name=\"Playmode\">\n");
    xml.push_str(&format!(
        "    <output><![CDATA[##performancetestruninfo2:{}\n]]></output>\n",
        json!({"TestSuite": run["TestSuite"], "Player": run["Player"]})
    ));
    for result in run["Results"].as_array().unwrap() {
        xml.push_str(&format!(
            "    <test-case name={}>\n      <output><![CDATA[##performancetestresult2:{}\n]]></output>\n    </test-case>\n",
            result["Name"], result
        ));
    }
    xml.push_str("  </test-suite>\n</test-run>\n");
    write_file(dir, name, &xml)
}
