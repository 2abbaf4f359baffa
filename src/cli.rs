// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end.
//!
//! ```text
//! bikestem [--config FILE] [URL | PAYLOAD] [FIELD=VALUE ...]
//! ```
//!
//! The first positional argument may be a page URL carrying `urlstate` or a
//! raw JSON payload. Each `FIELD=VALUE` edit uses the wire key of the field
//! (`spacer`, `stem`, `angleHt`, `angleStem`, `stack`, `reach`,
//! `handlebarStack`, `handlebarReach`, `name`). Slider values are snapped to
//! their range and step. After the edits settle, the fit report and the
//! shareable URL are printed.

use crate::config::ReconcilerConfig;
use crate::diff::FitReport;
use crate::model::{FitField, FitState, MeasurementField, SliderField, TextField};
use crate::persistence::{HistoryMode, PersistedSlot, QueryStringSlot};
use crate::sync::{FlushOutcome, Reconciler};
use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::time::Instant;
use url::Url;

const DEFAULT_PAGE_URL: &str = "https://www.bikestem.fit/";

const USAGE: &str = "Usage: bikestem [--config FILE] [URL|PAYLOAD] [FIELD=VALUE ...]";

/// Where the starting state comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Payload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub source: Option<Source>,
    pub edits: Vec<(String, String)>,
    pub help: bool,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "--config" => {
                    let path = args.next().ok_or_else(|| anyhow!("--config needs a file path"))?;
                    options.config = Some(PathBuf::from(path));
                }
                _ if arg.starts_with("http://") || arg.starts_with("https://") => {
                    set_source(&mut options, Source::Url(arg))?;
                }
                _ if arg.trim_start().starts_with('{') => {
                    set_source(&mut options, Source::Payload(arg))?;
                }
                _ => {
                    let (field, value) = arg
                        .split_once('=')
                        .ok_or_else(|| anyhow!("unrecognized argument '{arg}'\n{USAGE}"))?;
                    options.edits.push((field.to_string(), value.to_string()));
                }
            }
        }

        Ok(options)
    }
}

fn set_source(options: &mut CliOptions, source: Source) -> Result<()> {
    if options.source.is_some() {
        bail!("only one URL or payload may be given");
    }
    options.source = Some(source);
    Ok(())
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct CliOutput {
    pub state: FitState,
    pub report: FitReport,
    pub url: Url,
    pub outcome: FlushOutcome,
}

/// Hydrate, apply the edits, let them settle and collect the result.
pub fn execute(options: &CliOptions) -> Result<CliOutput> {
    let config = match &options.config {
        Some(path) => ReconcilerConfig::load(path)?,
        None => ReconcilerConfig::default(),
    };

    let slot = match &options.source {
        Some(Source::Url(url)) => {
            QueryStringSlot::parse(url).with_context(|| format!("cannot read page URL '{url}'"))?
        }
        Some(Source::Payload(payload)) => {
            let mut slot = QueryStringSlot::parse(DEFAULT_PAGE_URL)?;
            slot.set(Some(payload.clone()), HistoryMode::Replace);
            slot
        }
        None => QueryStringSlot::parse(DEFAULT_PAGE_URL)?,
    };

    let window = config.debounce;
    let mut reconciler = Reconciler::hydrate(slot, config);
    let now = Instant::now();

    for (key, value) in &options.edits {
        apply_edit(&mut reconciler, key, value, now)?;
    }

    let outcome = reconciler.poll(now + window);
    if let FlushOutcome::Written(payload) = &outcome {
        tracing::debug!("Persisted state: {}", payload);
    }

    Ok(CliOutput {
        state: reconciler.state().clone(),
        report: reconciler.report(),
        url: reconciler.slot().url().clone(),
        outcome,
    })
}

fn apply_edit(reconciler: &mut Reconciler<QueryStringSlot>, key: &str, value: &str, now: Instant) -> Result<()> {
    let field = FitField::from_key(key).ok_or_else(|| anyhow!("unknown field '{key}'"))?;

    let text_field = match field {
        FitField::Spacer => return set_slider(reconciler, SliderField::Spacer, value, now),
        FitField::Stem => return set_slider(reconciler, SliderField::Stem, value, now),
        FitField::AngleHt => return set_slider(reconciler, SliderField::AngleHt, value, now),
        FitField::AngleStem => return set_slider(reconciler, SliderField::AngleStem, value, now),
        FitField::Stack => TextField::Measurement(MeasurementField::Stack),
        FitField::Reach => TextField::Measurement(MeasurementField::Reach),
        FitField::HandlebarStack => TextField::Measurement(MeasurementField::HandlebarStack),
        FitField::HandlebarReach => TextField::Measurement(MeasurementField::HandlebarReach),
        FitField::Name => TextField::Name,
        FitField::StemXOrigin | FitField::StemYOrigin => bail!("'{key}' is fixed and cannot be edited"),
    };

    reconciler
        .edit_text(text_field, value, now)
        .with_context(|| format!("{} ({key})", text_field.helper_text(true)))
}

fn set_slider(reconciler: &mut Reconciler<QueryStringSlot>, field: SliderField, value: &str, now: Instant) -> Result<()> {
    let raw: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    let snapped = field.snap(raw);
    if snapped != raw {
        tracing::warn!("{:?} {} adjusted to {} to fit the slider", field, raw, snapped);
    }
    reconciler.set_slider(field, snapped, now);
    Ok(())
}

/// The adjustable fields as `FIELD=VALUE` lines, in the form the command
/// accepts them back
fn field_lines(state: &FitState) -> Vec<String> {
    let sliders = SliderField::ALL
        .into_iter()
        .map(|field| format!("{}={}", field.field(), state.slider(field)));
    let measurements = MeasurementField::ALL
        .into_iter()
        .map(|field| format!("{}={}", field.field(), state.measurement(field)));
    sliders.chain(measurements).collect()
}

fn print_output(output: &CliOutput) {
    let report = &output.report;
    println!("{}", report.title.trim_start());
    for message in [&report.stack_message, &report.reach_message] {
        if !message.is_empty() {
            println!("{message}");
        }
    }
    println!("{}", report.rise_label);
    println!("{}", report.run_label);
    for line in field_lines(&output.state) {
        println!("  {line}");
    }
    println!("{}", output.url);
}

/// Parse arguments, run, and print the result.
pub fn run<I>(args: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let options = CliOptions::parse(args)?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    let output = execute(&options)?;
    print_output(&output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumericInput;
    use crate::persistence::parse;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn persisted(output: &CliOutput) -> crate::model::FitState {
        let raw = output
            .url
            .query_pairs()
            .find(|(key, _)| key == "urlstate")
            .map(|(_, value)| value.into_owned());
        parse(raw.as_deref()).unwrap()
    }

    #[test]
    fn parses_source_and_edits() {
        let options = CliOptions::parse(args(&[
            "--config",
            "fit.toml",
            "https://www.bikestem.fit/?urlstate=%7B%7D",
            "stack=500",
            "name=Road bike",
        ]))
        .unwrap();
        assert_eq!(options.config, Some(PathBuf::from("fit.toml")));
        assert_eq!(
            options.source,
            Some(Source::Url("https://www.bikestem.fit/?urlstate=%7B%7D".to_string()))
        );
        assert_eq!(
            options.edits,
            vec![
                ("stack".to_string(), "500".to_string()),
                ("name".to_string(), "Road bike".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_two_sources_and_stray_words() {
        assert!(CliOptions::parse(args(&["{}", "{}"])).is_err());
        assert!(CliOptions::parse(args(&["stack"])).is_err());
        assert!(CliOptions::parse(args(&["--config"])).is_err());
    }

    #[test]
    fn frame_and_fit_report() {
        let options = CliOptions::parse(args(&[
            "stack=500",
            "reach=400",
            "handlebarStack=600",
            "handlebarReach=500",
        ]))
        .unwrap();
        let output = execute(&options).unwrap();
        assert_eq!(output.report.stack_message, "Stack is TOO SHORT by 62mm");
        assert_eq!(output.report.reach_message, "Reach is TOO SHORT by 12mm");
        assert!(matches!(output.outcome, FlushOutcome::Written(_)));
        assert_eq!(persisted(&output).stack, NumericInput::Value(500.0));
    }

    #[test]
    fn legacy_link_loads_without_rewrite() {
        let url = "https://www.bikestem.fit/?urlstate=%7B%22stemXOrigin%22%3A100%2C%22stemYOrigin%22%3A200%2C%22spacer%22%3A70%2C%22stem%22%3A140%2C%22angleHt%22%3A73%2C%22angleStem%22%3A37%2C%22stack%22%3A565%2C%22reach%22%3A383%2C%22handlebarStack%22%3A717%2C%22handlebarReach%22%3A475%2C%22input%22%3A%22angleStem%22%2C%22value%22%3A37%7D";
        let output = execute(&CliOptions::parse(args(&[url])).unwrap()).unwrap();
        assert_eq!(output.outcome, FlushOutcome::Idle);
        assert_eq!(output.url.as_str(), url);
        assert_eq!(output.report.geometry.stem_run, 140.0 * 53f64.to_radians().sin());
    }

    #[test]
    fn sliders_are_snapped() {
        let options = CliOptions::parse(args(&["{\"name\":\"Snap\"}", "stem=104", "angleHt=74.4"])).unwrap();
        let output = execute(&options).unwrap();
        let state = persisted(&output);
        assert_eq!(state.stem, 100.0);
        assert_eq!(state.angle_ht, 74.5);
        assert_eq!(state.name, "Snap");
    }

    #[test]
    fn field_lines_echo_edit_syntax() {
        let options = CliOptions::parse(args(&["stack=565", "angleStem=-6"])).unwrap();
        let output = execute(&options).unwrap();
        assert_eq!(
            field_lines(&output.state),
            vec![
                "spacer=40",
                "stem=100",
                "angleHt=73",
                "angleStem=-6",
                "stack=565",
                "reach=",
                "handlebarStack=",
                "handlebarReach=",
            ]
        );
    }

    #[test]
    fn invalid_edits_fail() {
        let bad_digits = CliOptions::parse(args(&["stack=5.5"])).unwrap();
        let err = execute(&bad_digits).unwrap_err();
        assert!(err.to_string().contains("Numbers only"));

        let fixed = CliOptions::parse(args(&["stemXOrigin=5"])).unwrap();
        assert!(execute(&fixed).is_err());

        let unknown = CliOptions::parse(args(&["input=spacer"])).unwrap();
        assert!(execute(&unknown).is_err());

        let not_number = CliOptions::parse(args(&["spacer=lots"])).unwrap();
        assert!(execute(&not_number).is_err());
    }
}
