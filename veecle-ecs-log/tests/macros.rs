//! Logging through the macro front end.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};
use veecle_ecs_log::export::TestExporter;
use veecle_ecs_log::{
    Attr, Handler, Level, Logger, attribute, attributes, debug, error, fatal, info, log, trace,
    warn,
};

fn logger(source: bool) -> (Logger, Arc<Mutex<Vec<String>>>) {
    let (exporter, lines) = TestExporter::new();
    let handler = Handler::builder()
        .timestamp(false)
        .source(source)
        .min_level(Level::Trace)
        .build(exporter);
    (Logger::new(handler), lines)
}

fn decoded(lines: &Mutex<Vec<String>>) -> Vec<Json> {
    lines
        .lock()
        .unwrap()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn attribute_syntax() {
    let status = 200_u32;
    let attrs = attributes!(status, http.method = "GET", "url.path" = "/health");

    let keys: Vec<&str> = attrs.iter().map(|attr| &*attr.key).collect();
    assert_eq!(keys, ["status", "http.method", "url.path"]);

    let single = attribute!("labels.env" = "prod");
    assert_eq!(single.key, "labels.env");
    assert_eq!(single.value.to_string(), "\"prod\"");

    let braced = attributes!({ "a" = 1, b = true, });
    assert_eq!(braced.len(), 2);

    let empty: Vec<Attr> = attributes!();
    assert!(empty.is_empty());
}

#[test]
fn level_macros() {
    let (logger, lines) = logger(false);

    trace!(logger, "t").unwrap();
    debug!(logger, "d").unwrap();
    info!(logger, "i").unwrap();
    warn!(logger, "w").unwrap();
    error!(logger, "e").unwrap();
    fatal!(logger, "f").unwrap();
    log!(logger, Level::Info, format!("formatted {}", 1)).unwrap();

    let levels: Vec<Json> = decoded(&lines)
        .into_iter()
        .map(|line| line["log"]["level"].clone())
        .collect();
    assert_eq!(
        levels,
        [
            json!("TRACE"),
            json!("DEBUG"),
            json!("INFO"),
            json!("WARN"),
            json!("ERROR"),
            json!("FATAL"),
            json!("INFO"),
        ]
    );
    assert_eq!(decoded(&lines)[6]["message"], json!("formatted 1"));
}

#[test]
fn macro_attributes_nest() {
    let (logger, lines) = logger(false);
    let user = "alice";

    info!(logger, "login", user, event.action = "login", "event.outcome" = "success").unwrap();
    info!(&logger, "braced", { "event.kind" = "metric", }).unwrap();

    assert_eq!(
        decoded(&lines),
        [
            json!({
                "message": "login",
                "log": { "level": "INFO" },
                "user": "alice",
                "event": { "action": "login", "outcome": "success" },
            }),
            json!({
                "message": "braced",
                "log": { "level": "INFO" },
                "event": { "kind": "metric" },
            }),
        ]
    );
}

#[test]
fn macros_record_module_and_location() {
    let (logger, lines) = logger(true);

    let line = line!() + 1;
    warn!(logger, "located").unwrap();

    assert_eq!(
        decoded(&lines),
        [json!({
            "message": "located",
            "log": {
                "level": "WARN",
                "origin": {
                    "function": module_path!(),
                    "file": file!(),
                    "line": line,
                },
            },
        })]
    );
}

#[test]
fn methods_leave_the_function_empty() {
    let (logger, lines) = logger(true);

    let line = line!() + 1;
    logger.info("located", vec![]).unwrap();

    assert_eq!(
        decoded(&lines)[0]["log"]["origin"],
        json!({ "function": "", "file": file!(), "line": line })
    );
}
