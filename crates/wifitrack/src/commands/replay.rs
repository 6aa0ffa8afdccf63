//! Replay command: drive a tracker from a scripted scan sequence.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use wifitrack_core::{
    EntryFilter, ManualClock, MemorySource, NativeScanRecord, NoopCallback, RadioState,
    SecurityClass, Signal, SignalOutcome, WifiEntry, WifiTracker,
};

use crate::cli::{GlobalOpts, OutputFormat, ReplayArgs};
use crate::config::{self, OutputPrefs};
use crate::error::CliError;
use crate::output;

// ── Script format ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReplayScript {
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// One moment in the replay. At most one of `scan` / `source_error` is
/// honored per step; `source_error` wins.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReplayStep {
    pub at_millis: i64,
    #[serde(default)]
    pub radio_state: Option<RadioState>,
    #[serde(default)]
    pub scan: Option<ScanStep>,
    #[serde(default)]
    pub source_error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScanStep {
    #[serde(default = "default_succeeded")]
    pub succeeded: bool,
    #[serde(default)]
    pub records: Vec<NativeScanRecord>,
}

fn default_succeeded() -> bool {
    true
}

pub(crate) fn parse_script(path: &Path, text: &str) -> Result<ReplayScript, CliError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(text).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| CliError::InvalidScript {
        path: path.display().to_string(),
        reason,
    })
}

fn read_script(path: &Path) -> Result<ReplayScript, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::ScriptNotFound {
                path: path.display().to_string(),
            }
        } else {
            CliError::Io(e)
        }
    })?;
    parse_script(path, &text)
}

// ── Views ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EntryView {
    ssid: String,
    security: SecurityClass,
    bssid: String,
    last_seen_millis: i64,
    age_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rssi_dbm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_mhz: Option<u32>,
}

impl EntryView {
    fn new(entry: &WifiEntry, now_millis: i64) -> Self {
        Self {
            ssid: entry.ssid().to_owned(),
            security: entry.security(),
            bssid: entry.representative.bssid.clone(),
            last_seen_millis: entry.last_seen_millis,
            age_millis: entry.age_millis(now_millis),
            rssi_dbm: entry.representative.rssi_dbm,
            frequency_mhz: entry.representative.frequency_mhz,
        }
    }

    /// `ssid,security`, the entry's dedup key.
    fn key(&self) -> String {
        format!("{},{}", self.ssid, self.security)
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
    #[tabled(rename = "RSSI")]
    rssi: String,
}

impl EntryRow {
    fn new(v: &EntryView, color: bool) -> Self {
        let age = std::time::Duration::from_millis(v.age_millis);
        Self {
            ssid: v.ssid.clone(),
            security: output::paint_security(v.security, color),
            bssid: v.bssid.clone(),
            last_seen: format!("{} ago", humantime::format_duration(age)),
            rssi: v
                .rssi_dbm
                .map_or_else(|| "-".into(), |dbm| format!("{dbm} dBm")),
        }
    }
}

#[derive(Debug, Serialize)]
struct StepView {
    step: usize,
    at_millis: i64,
    radio_state: RadioState,
    entries: Vec<EntryView>,
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(args: ReplayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let script = read_script(&args.script)?;

    let mut tracker_config =
        config::resolve_tracker_config(global, args.max_entry_age, args.scan_interval)?;
    // No real radio to poke.
    tracker_config.active_scanning = false;
    let prefs = config::output_prefs(global)?;

    let start_millis = script.steps.first().map_or(0, |s| s.at_millis);
    let source = Arc::new(MemorySource::new(RadioState::Unknown));
    let clock = Arc::new(ManualClock::new(start_millis));
    let tracker = WifiTracker::new(
        tracker_config,
        source.clone(),
        clock.clone(),
        Arc::new(NoopCallback),
    );
    tracker.start().await?;

    let mut views = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        clock.set(step.at_millis);
        apply_step(&tracker, &source, step).await?;

        if args.each || index + 1 == script.steps.len() {
            let filters = entry_filters(&args, step.at_millis);
            views.push(StepView {
                step: index + 1,
                at_millis: step.at_millis,
                radio_state: tracker.wifi_state(),
                entries: tracker
                    .wifi_entries()
                    .iter()
                    .filter(|e| EntryFilter::all_match(&filters, e))
                    .map(|e| EntryView::new(e, step.at_millis))
                    .collect(),
            });
        }
    }

    tracker.stop().await;

    let rendered = if args.each {
        render_steps(&prefs, &views)
    } else {
        let entries = views.pop().map(|v| v.entries).unwrap_or_default();
        render_entries(&prefs, &entries)
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

async fn apply_step(
    tracker: &WifiTracker,
    source: &MemorySource,
    step: &ReplayStep,
) -> Result<(), CliError> {
    if let Some(state) = step.radio_state {
        source.set_radio_state(state);
        tracker.handle_signal(Signal::RadioStateChanged).await?;
    }

    if let Some(reason) = &step.source_error {
        source.fail_scan_results(reason.clone());
        let outcome = tracker.handle_signal(Signal::scan_results()).await?;
        tracing::info!(step_at = step.at_millis, ?outcome, "scan source failure replayed");
    } else if let Some(scan) = &step.scan {
        source.set_scan_results(scan.records.clone());
        let outcome = tracker
            .handle_signal(Signal::ScanResultsAvailable {
                updated: scan.succeeded,
            })
            .await?;
        if let SignalOutcome::Ingested(report) = outcome {
            tracing::info!(
                step_at = step.at_millis,
                inserted = report.inserted,
                evicted = report.evicted,
                retained = report.retained,
                "scan replayed"
            );
        }
    }
    Ok(())
}

/// Reader-side filters from the command line, evaluated at `now_millis`.
fn entry_filters(args: &ReplayArgs, now_millis: i64) -> Vec<EntryFilter> {
    let mut filters = Vec::new();
    if let Some(security) = args.security {
        filters.push(EntryFilter::BySecurity(security));
    }
    if let Some(needle) = &args.ssid {
        filters.push(EntryFilter::SsidContains(needle.clone()));
    }
    if args.secured {
        filters.push(EntryFilter::Secured);
    }
    if let Some(window) = args.seen_within {
        filters.push(EntryFilter::SeenWithin {
            now_millis,
            max_age_millis: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
        });
    }
    filters
}

fn render_entries(prefs: &OutputPrefs, entries: &[EntryView]) -> String {
    output::render_list(
        &prefs.format,
        entries,
        |v| EntryRow::new(v, prefs.color),
        EntryView::key,
    )
}

fn render_steps(prefs: &OutputPrefs, views: &[StepView]) -> String {
    match prefs.format {
        OutputFormat::Table | OutputFormat::Plain => views
            .iter()
            .map(|v| {
                let header = output::paint_header(
                    &format!("step {} @ {} ({})", v.step, v.at_millis, v.radio_state),
                    prefs.color,
                );
                format!("{header}\n{}", render_entries(prefs, &v.entries))
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Json => output::render_json(views, false),
        OutputFormat::JsonCompact => output::render_json(views, true),
        OutputFormat::Yaml => output::render_yaml(views),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn yaml_and_json_scripts_parse_alike() {
        let json = r#"{"steps":[{"at_millis":5,"radio_state":"enabled",
            "scan":{"records":[{"ssid":"Home","bssid":"b0","timestamp_millis":5}]}}]}"#;
        let yaml = "steps:\n  - at_millis: 5\n    radio_state: enabled\n    scan:\n      records:\n        - {ssid: Home, bssid: b0, timestamp_millis: 5}\n";

        let from_json = parse_script(Path::new("s.json"), json).unwrap();
        let from_yaml = parse_script(Path::new("s.yml"), yaml).unwrap();

        for script in [from_json, from_yaml] {
            let step = &script.steps[0];
            assert_eq!(step.radio_state, Some(RadioState::Enabled));
            let scan = step.scan.as_ref().unwrap();
            assert!(scan.succeeded);
            assert_eq!(scan.records[0].ssid.as_deref(), Some("Home"));
        }
    }

    #[test]
    fn no_filter_flags_means_no_filters() {
        let args = ReplayArgs {
            script: "s.json".into(),
            each: false,
            max_entry_age: None,
            scan_interval: None,
            security: None,
            ssid: None,
            secured: false,
            seen_within: None,
        };
        assert!(entry_filters(&args, 0).is_empty());

        let args = ReplayArgs {
            security: Some(SecurityClass::Eap),
            seen_within: Some(std::time::Duration::from_secs(5)),
            ..args
        };
        assert_eq!(
            entry_filters(&args, 9_000),
            vec![
                EntryFilter::BySecurity(SecurityClass::Eap),
                EntryFilter::SeenWithin {
                    now_millis: 9_000,
                    max_age_millis: 5_000
                },
            ]
        );
    }

    fn home_view() -> EntryView {
        EntryView {
            ssid: "Home".into(),
            security: SecurityClass::Psk,
            bssid: "b0".into(),
            last_seen_millis: 1_000,
            age_millis: 2_000,
            rssi_dbm: Some(-60),
            frequency_mhz: None,
        }
    }

    #[test]
    fn entry_view_serializes_only_entry_fields() {
        let json = serde_json::to_value(home_view()).unwrap();
        let mut fields: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            ["age_millis", "bssid", "last_seen_millis", "rssi_dbm", "security", "ssid"]
        );
        assert_eq!(json["security"], "psk");
    }

    #[test]
    fn rows_paint_and_plain_uses_the_key() {
        let view = home_view();
        let row = EntryRow::new(&view, false);
        assert_eq!(row.security, "psk");
        assert_eq!(row.last_seen, "2s ago");
        assert_eq!(row.rssi, "-60 dBm");
        assert_ne!(EntryRow::new(&view, true).security, "psk");
        assert_eq!(view.key(), "Home,psk");
    }

    #[test]
    fn step_json_goes_through_the_shared_renderer() {
        let prefs = OutputPrefs {
            format: OutputFormat::JsonCompact,
            color: false,
        };
        let views = [StepView {
            step: 1,
            at_millis: 3_000,
            radio_state: RadioState::Enabled,
            entries: vec![home_view()],
        }];
        let rendered = render_steps(&prefs, &views);
        assert!(rendered.starts_with(r#"[{"step":1,"at_millis":3000,"radio_state":"enabled","entries":[{"ssid":"Home""#));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_script(Path::new("s.json"), r#"{"steps":[{"at":1}]}"#).unwrap_err();
        assert!(matches!(err, CliError::InvalidScript { .. }));
    }
}
