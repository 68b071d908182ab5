//! Command-line dispatch - select registered figures and save or show them

use crate::{FigError, FigureRegistry, Producer};
use rayon::prelude::*;
use std::any::Any;
use std::env;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, info_span};

/// Whether figures are persisted to the save directory or written to the
/// show directory for viewing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Save,
    Show,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Print usage and exit successfully
    Help,
    /// Make the named figures (all registered figures when empty)
    Run { save: SaveMode, names: Vec<String> },
}

/// Interpret command-line tokens in a single pass.
///
/// The first token may be `-h`/`--help`/`help` (usage, nothing else runs)
/// or `save`/`nosave` (overriding the caller-supplied default mode). Every
/// remaining token is a requested figure name; none, or the single literal
/// `all`, means every registered figure.
pub fn parse_tokens(tokens: &[String], default: SaveMode) -> Request {
    if let Some(first) = tokens.first() {
        if matches!(first.as_str(), "-h" | "--help" | "help") {
            return Request::Help;
        }
    }
    let mut save = default;
    let mut rest = tokens;
    if let Some(first) = rest.first() {
        match first.as_str() {
            "save" => {
                save = SaveMode::Save;
                rest = &rest[1..];
            }
            "nosave" => {
                save = SaveMode::Show;
                rest = &rest[1..];
            }
            _ => {}
        }
    }
    let names = if rest.first().map(String::as_str) == Some("all") {
        Vec::new()
    } else {
        rest.to_vec()
    };
    Request::Run { save, names }
}

/// Usage text for the token grammar
pub fn usage(prog: &str, default: SaveMode) -> String {
    let default_word = match default {
        SaveMode::Save => "save",
        SaveMode::Show => "nosave",
    };
    format!(
        "Usage:\n\
         \x20 {prog} [-h|--help] [save|nosave] [fig1 [fig2 ...]]\n\
         \x20 - save/nosave overrides the default save/display behavior\n\
         \x20   Default: {default_word}\n\
         \x20 - Any figure names listed (after the optional save/nosave)\n\
         \x20   will be processed. Default: process all figures.\n"
    )
}

/// Dispatch configuration, populated by the host before the first run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Mode used when the command line says neither `save` nor `nosave`
    pub default_mode: SaveMode,
    /// Destination directory in save mode
    pub save_dir: PathBuf,
    /// Destination in show mode; `None` uses `<temp>/makefig`
    pub show_dir: Option<PathBuf>,
    /// Produce and save figures in parallel (save mode only)
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            default_mode: SaveMode::Show,
            save_dir: PathBuf::from("figures"),
            show_dir: None,
            parallel: true,
        }
    }
}

/// One failed figure, reported without aborting its siblings
#[derive(Debug)]
pub struct Failure {
    pub name: String,
    pub error: FigError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Figures written, with their output paths, in completion order
    pub made: Vec<(String, PathBuf)>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Make the requested figures and write each to the mode's directory.
///
/// Requested names are resolved before anything runs, so an unknown name
/// executes no producers. Each figure is an independent unit of work: a
/// failing (or panicking) producer is recorded and its siblings still run.
/// Save mode fans out over a rayon pool when `opts.parallel` is set.
pub fn make_figs(
    registry: &FigureRegistry,
    save: SaveMode,
    names: &[String],
    opts: &RunOptions,
) -> Result<RunReport, FigError> {
    let selected = registry.select(names)?;
    let out_dir = match save {
        SaveMode::Save => opts.save_dir.clone(),
        SaveMode::Show => opts
            .show_dir
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("makefig")),
    };
    fs::create_dir_all(&out_dir)?;

    let results: Vec<(String, Result<PathBuf, FigError>)> =
        if save == SaveMode::Save && opts.parallel {
            selected
                .par_iter()
                .map(|(name, producer)| {
                    (name.clone(), make_one(name, producer.as_ref(), &out_dir))
                })
                .collect()
        } else {
            selected
                .iter()
                .map(|(name, producer)| {
                    (name.clone(), make_one(name, producer.as_ref(), &out_dir))
                })
                .collect()
        };

    let mut report = RunReport::default();
    for (name, result) in results {
        match result {
            Ok(path) => report.made.push((name, path)),
            Err(error) => report.failures.push(Failure { name, error }),
        }
    }
    if save == SaveMode::Show && !report.made.is_empty() {
        info!(dir = %out_dir.display(), "figures written for viewing");
    }
    Ok(report)
}

fn make_one(name: &str, producer: &dyn Producer, dir: &Path) -> Result<PathBuf, FigError> {
    let span = info_span!("figure", name = name);
    let _guard = span.enter();
    info!("starting");

    let figure = panic::catch_unwind(AssertUnwindSafe(|| producer.produce()))
        .map_err(|payload| FigError::Producer {
            name: name.to_string(),
            message: panic_message(payload),
        })??;

    let bytes = figure.render()?;
    let path = dir.join(format!("{name}.{}", figure.extension()));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), "finished");
    Ok(path)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "producer panicked".to_string()
    }
}

/// Parse explicit tokens and drive the registry, mapping the outcome to an
/// exit code: success only when every requested figure was made.
pub fn run_with(
    registry: &FigureRegistry,
    prog: &str,
    tokens: &[String],
    opts: &RunOptions,
) -> ExitCode {
    match parse_tokens(tokens, opts.default_mode) {
        Request::Help => {
            print!("{}", usage(prog, opts.default_mode));
            ExitCode::SUCCESS
        }
        Request::Run { save, names } => match make_figs(registry, save, &names, opts) {
            Ok(report) if report.is_success() => ExitCode::SUCCESS,
            Ok(report) => {
                for failure in &report.failures {
                    error!(figure = %failure.name, error = %failure.error, "figure failed");
                }
                ExitCode::FAILURE
            }
            Err(err) => {
                error!(error = %err, "dispatch failed");
                ExitCode::FAILURE
            }
        },
    }
}

/// Parse `std::env::args` and drive the registry
pub fn run(registry: &FigureRegistry, opts: &RunOptions) -> ExitCode {
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "makefig".to_string());
    let tokens: Vec<String> = args.collect();
    run_with(registry, &prog, &tokens, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Figure;
    use std::sync::{Arc, Mutex};

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    struct TextFigure(&'static str);

    impl Figure for TextFigure {
        fn render(&self) -> Result<Vec<u8>, FigError> {
            Ok(self.0.as_bytes().to_vec())
        }

        fn extension(&self) -> &str {
            "svg"
        }
    }

    /// Registry of three producers that log their invocations
    fn logged_registry(log: &Arc<Mutex<Vec<String>>>) -> FigureRegistry {
        let mut registry = FigureRegistry::new();
        for name in ["fig_a", "fig_b", "fig_c"] {
            let log = Arc::clone(log);
            registry
                .register(name, move || -> Result<Box<dyn Figure>, FigError> {
                    log.lock().unwrap().push(name.to_string());
                    Ok(Box::new(TextFigure("ok")))
                })
                .unwrap();
        }
        registry
    }

    fn serial_options(dir: &Path) -> RunOptions {
        RunOptions {
            default_mode: SaveMode::Show,
            save_dir: dir.join("saved"),
            show_dir: Some(dir.join("shown")),
            parallel: false,
        }
    }

    #[test]
    fn test_parse_help_short_circuits() {
        assert_eq!(
            parse_tokens(&tokens(&["-h"]), SaveMode::Show),
            Request::Help
        );
        assert_eq!(
            parse_tokens(&tokens(&["--help", "save", "fig_a"]), SaveMode::Show),
            Request::Help
        );
        assert_eq!(
            parse_tokens(&tokens(&["help"]), SaveMode::Save),
            Request::Help
        );
    }

    #[test]
    fn test_parse_save_mode_tokens() {
        assert_eq!(
            parse_tokens(&tokens(&["save", "fig_a"]), SaveMode::Show),
            Request::Run {
                save: SaveMode::Save,
                names: vec!["fig_a".to_string()],
            }
        );
        assert_eq!(
            parse_tokens(&tokens(&["nosave", "fig_a"]), SaveMode::Save),
            Request::Run {
                save: SaveMode::Show,
                names: vec!["fig_a".to_string()],
            }
        );
        // No mode token: the caller default stands.
        assert_eq!(
            parse_tokens(&tokens(&["fig_a", "fig_b"]), SaveMode::Save),
            Request::Run {
                save: SaveMode::Save,
                names: vec!["fig_a".to_string(), "fig_b".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_empty_and_all_select_everything() {
        assert_eq!(
            parse_tokens(&[], SaveMode::Show),
            Request::Run {
                save: SaveMode::Show,
                names: Vec::new(),
            }
        );
        assert_eq!(
            parse_tokens(&tokens(&["save"]), SaveMode::Show),
            Request::Run {
                save: SaveMode::Save,
                names: Vec::new(),
            }
        );
        assert_eq!(
            parse_tokens(&tokens(&["all"]), SaveMode::Show),
            Request::Run {
                save: SaveMode::Show,
                names: Vec::new(),
            }
        );
    }

    #[test]
    fn test_usage_names_the_default() {
        let text = usage("myscript", SaveMode::Show);
        assert!(text.contains("myscript [-h|--help] [save|nosave]"));
        assert!(text.contains("Default: nosave"));
        assert!(usage("x", SaveMode::Save).contains("Default: save"));
    }

    #[test]
    fn test_empty_request_runs_all_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());

        let report = make_figs(&registry, SaveMode::Save, &[], &opts).unwrap();
        assert!(report.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["fig_a", "fig_b", "fig_c"]);
        assert!(opts.save_dir.join("fig_a.svg").is_file());
        assert!(opts.save_dir.join("fig_c.svg").is_file());
    }

    #[test]
    fn test_requested_names_run_once_each() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());

        let names = tokens(&["fig_b"]);
        let report = make_figs(&registry, SaveMode::Save, &names, &opts).unwrap();
        assert!(report.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["fig_b"]);
        assert!(opts.save_dir.join("fig_b.svg").is_file());
        assert!(!opts.save_dir.join("fig_a.svg").exists());
    }

    #[test]
    fn test_show_mode_writes_to_show_dir() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());

        let names = tokens(&["fig_a"]);
        let report = make_figs(&registry, SaveMode::Show, &names, &opts).unwrap();
        assert!(report.is_success());
        let shown = opts.show_dir.as_ref().unwrap();
        assert!(shown.join("fig_a.svg").is_file());
        assert!(!opts.save_dir.exists());
    }

    #[test]
    fn test_unknown_name_executes_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());

        let names = tokens(&["fig_a", "fig_nope"]);
        let err = make_figs(&registry, SaveMode::Save, &names, &opts).unwrap_err();
        assert!(matches!(err, FigError::Registry(_)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failure_does_not_abort_siblings() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = FigureRegistry::new();
        {
            let log = Arc::clone(&log);
            registry
                .register("fig_a", move || -> Result<Box<dyn Figure>, FigError> {
                    log.lock().unwrap().push("fig_a".to_string());
                    Ok(Box::new(TextFigure("a")))
                })
                .unwrap();
        }
        registry
            .register("fig_b", || -> Result<Box<dyn Figure>, FigError> {
                Err(FigError::Backend("axis exploded".to_string()))
            })
            .unwrap();
        {
            let log = Arc::clone(&log);
            registry
                .register("fig_c", move || -> Result<Box<dyn Figure>, FigError> {
                    log.lock().unwrap().push("fig_c".to_string());
                    Ok(Box::new(TextFigure("c")))
                })
                .unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());
        let report = make_figs(&registry, SaveMode::Save, &[], &opts).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "fig_b");
        assert_eq!(*log.lock().unwrap(), vec!["fig_a", "fig_c"]);
        assert!(opts.save_dir.join("fig_a.svg").is_file());
        assert!(opts.save_dir.join("fig_c.svg").is_file());
        assert!(!opts.save_dir.join("fig_b.svg").exists());
    }

    #[test]
    fn test_panicking_producer_is_isolated() {
        let mut registry = FigureRegistry::new();
        registry
            .register("boom", || -> Result<Box<dyn Figure>, FigError> {
                panic!("data file missing")
            })
            .unwrap();
        registry
            .register("calm", || -> Result<Box<dyn Figure>, FigError> {
                Ok(Box::new(TextFigure("ok")))
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());
        let report = make_figs(&registry, SaveMode::Save, &[], &opts).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "boom");
        match &report.failures[0].error {
            FigError::Producer { message, .. } => assert_eq!(message, "data file missing"),
            other => panic!("expected producer error, got {other}"),
        }
        assert_eq!(report.made.len(), 1);
        assert_eq!(report.made[0].0, "calm");
    }

    #[test]
    fn test_parallel_save_makes_everything() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = RunOptions {
            parallel: true,
            ..serial_options(dir.path())
        };

        let report = make_figs(&registry, SaveMode::Save, &[], &opts).unwrap();
        assert!(report.is_success());
        assert_eq!(report.made.len(), 3);
        let mut seen = log.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["fig_a", "fig_b", "fig_c"]);
        for name in ["fig_a", "fig_b", "fig_c"] {
            assert!(opts.save_dir.join(format!("{name}.svg")).is_file());
        }
    }

    #[test]
    fn test_help_runs_no_producers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = logged_registry(&log);
        let dir = tempfile::tempdir().unwrap();
        let opts = serial_options(dir.path());

        let _ = run_with(&registry, "prog", &tokens(&["--help"]), &opts);
        assert!(log.lock().unwrap().is_empty());
    }
}
