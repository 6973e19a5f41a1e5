//! Command-line front end.
//!
//! Classify single responses, inspect maps, plan session orders and run a
//! round interactively over stdin.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::{info, warn};

use crate::analyzer::{ConceptMap, ConceptMapAnalyzer, MapContext};
use crate::config::Config;
use crate::engine::{
    ConversationState, EngineOutput, ExperimentalCondition, RoundRequest, ScaffoldingEngine,
    ScaffoldingSession,
};
use crate::events::{EventSink, JsonLinesSink, NullSink};

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Classify one learner response
    Classify {
        /// Response text
        text: String,
    },

    /// Show metrics for a concept map file
    Analyze {
        /// Path to the concept map JSON
        #[arg(long)]
        map: PathBuf,
    },

    /// Plan the scaffolding order for a session
    Plan {
        /// Fixed condition: standard or reversed. Random when omitted
        #[arg(long)]
        condition: Option<String>,

        /// Seed for the random order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run one round, reading learner responses from stdin
    Run {
        /// Path to the concept map JSON
        #[arg(long)]
        map: PathBuf,

        /// Round number (1-4)
        #[arg(long, default_value = "1")]
        round: u8,

        /// Scaffolding type; derived from the map when omitted
        #[arg(long = "type")]
        scaffolding_type: Option<String>,

        /// Intensity: high, medium or low; derived from the map when omitted
        #[arg(long)]
        intensity: Option<String>,

        /// Print a readable transcript instead of JSON lines
        #[arg(long)]
        transcript: bool,
    },
}

/// Result of CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a CLI command.
///
/// `run` streams its output to `out` as it goes; every other command returns
/// its output in the result message.
pub fn execute_command(
    command: Commands,
    config: &Config,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> CliResult {
    match command {
        Commands::Classify { text } => execute_classify(config, &text),
        Commands::Analyze { map } => execute_analyze(&map),
        Commands::Plan { condition, seed } => execute_plan(config, condition, seed),
        Commands::Run {
            map,
            round,
            scaffolding_type,
            intensity,
            transcript,
        } => {
            let mut request = match read_map(&map) {
                Ok(map) => RoundRequest::new(round, map),
                Err(result) => return result,
            };
            if let Some(t) = scaffolding_type {
                request = request.with_type(t);
            }
            if let Some(i) = intensity {
                request = request.with_intensity(i);
            }
            execute_run(config, request, transcript, input, out)
        }
    }
}

fn execute_classify(config: &Config, text: &str) -> CliResult {
    let engine = ScaffoldingEngine::from_config(config);
    let analysis = engine.classifier().classify(text);
    to_json(&analysis)
}

fn execute_analyze(path: &Path) -> CliResult {
    let map = match read_map(path) {
        Ok(map) => map,
        Err(result) => return result,
    };
    let metrics = ConceptMapAnalyzer::new().analyze(&map);
    let context = MapContext::new(&map, &metrics);
    to_json(&json!({
        "metrics": metrics,
        "suggested_type": metrics.leaning_type(),
        "suggested_intensity": metrics.intensity(),
        "observation": context.observation(),
    }))
}

fn execute_plan(config: &Config, condition: Option<String>, seed: Option<u64>) -> CliResult {
    let session = match condition {
        Some(raw) => match raw.parse::<ExperimentalCondition>() {
            Ok(condition) => ScaffoldingSession::for_condition(condition),
            Err(e) => return CliResult::error(e),
        },
        None => ScaffoldingSession::randomized(&mut seeded_rng(seed.or(config.engine.seed))),
    };
    info!(session_id = %session.session_id, sequence = ?session.sequence, "Planned session");
    to_json(&session)
}

fn execute_run(
    config: &Config,
    request: RoundRequest,
    transcript: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> CliResult {
    let sink: Arc<dyn EventSink> = match &config.engine.events_path {
        Some(path) => match JsonLinesSink::open(path) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                return CliResult::error(format!(
                    "Failed to open event log {}: {}",
                    path.display(),
                    e
                ))
            }
        },
        None => Arc::new(NullSink),
    };
    let engine = ScaffoldingEngine::from_config(config).with_sink(sink);
    let mut rng = seeded_rng(config.engine.seed);

    let start = match engine.start_round(request) {
        Ok(start) => start,
        Err(e) => return CliResult::error(e.to_string()),
    };
    let mut state = start.state;
    if let Err(e) = emit(out, &state, &start.output, transcript) {
        return CliResult::error(format!("Failed to write output: {}", e));
    }

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read learner response");
                break;
            }
        };
        if transcript {
            if let Err(e) = writeln!(out, "> {}", line.trim()) {
                return CliResult::error(format!("Failed to write output: {}", e));
            }
        }
        let output = engine.process_learner_response(&mut state, &line, &mut rng);
        if let Err(e) = emit(out, &state, &output, transcript) {
            return CliResult::error(format!("Failed to write output: {}", e));
        }
        if state.is_concluded() {
            break;
        }
    }

    if !transcript {
        return CliResult::success("");
    }
    let summary = match engine.suggest_next_intensity(&state) {
        Some(next) => format!(
            "Round {} ended after {} turns. Suggested next intensity: {}",
            state.round, state.turn, next
        ),
        None => format!("Round {} ended after {} turns.", state.round, state.turn),
    };
    CliResult::success(summary)
}

fn emit(
    out: &mut dyn Write,
    state: &ConversationState,
    output: &EngineOutput,
    transcript: bool,
) -> std::io::Result<()> {
    if !transcript {
        let line = serde_json::to_string(output).map_err(std::io::Error::other)?;
        return writeln!(out, "{}", line);
    }
    let marker = state.scaffolding_type.map(|t| t.marker()).unwrap_or("");
    for prompt in &output.prompts {
        writeln!(out, "{} {}", marker, prompt)?;
    }
    Ok(())
}

fn read_map(path: &Path) -> Result<ConceptMap, CliResult> {
    std::fs::read_to_string(path)
        .map(|raw| ConceptMap::from_json_str(&raw))
        .map_err(|e| CliResult::error(format!("Failed to read map file {}: {}", path.display(), e)))
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> CliResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliResult::success(json),
        Err(e) => CliResult::error(format!("Failed to serialize output: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(command: Commands, config: &Config, stdin: &str) -> (CliResult, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = execute_command(command, config, &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn map_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("map.json");
        std::fs::write(
            &path,
            r#"{"concepts": [{"id": "c1", "label": "AMG"}, {"id": "c2", "label": "Market Entry"}],
                "relationships": [{"source": "c1", "target": "c2", "label": "restricts"}]}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_classify_outputs_analysis() {
        let (result, _) = run(
            Commands::Classify {
                text: "asdfghjkl".to_string(),
            },
            &Config::default(),
            "",
        );
        assert_eq!(result.exit_code, 0);
        let value: serde_json::Value = serde_json::from_str(&result.message).unwrap();
        assert_eq!(value["response_type"], "gibberish");
    }

    #[test]
    fn test_analyze_reports_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let (result, _) = run(
            Commands::Analyze { map: map_file(&dir) },
            &Config::default(),
            "",
        );
        let value: serde_json::Value = serde_json::from_str(&result.message).unwrap();
        assert_eq!(value["metrics"]["node_count"], 2);
        assert_eq!(value["metrics"]["edge_count"], 1);
    }

    #[test]
    fn test_analyze_missing_file_fails() {
        let (result, _) = run(
            Commands::Analyze {
                map: PathBuf::from("/nonexistent/map.json"),
            },
            &Config::default(),
            "",
        );
        assert_eq!(result.exit_code, 1);
        assert!(result.message.contains("Failed to read map file"));
    }

    #[test]
    fn test_plan_with_condition_and_bad_condition() {
        let (result, _) = run(
            Commands::Plan {
                condition: Some("reversed".to_string()),
                seed: None,
            },
            &Config::default(),
            "",
        );
        let value: serde_json::Value = serde_json::from_str(&result.message).unwrap();
        assert_eq!(value["sequence"][0], "metacognitive");

        let (result, _) = run(
            Commands::Plan {
                condition: Some("sideways".to_string()),
                seed: None,
            },
            &Config::default(),
            "",
        );
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn test_run_streams_json_lines_until_concluded() {
        let dir = tempfile::tempdir().unwrap();
        let command = Commands::Run {
            map: map_file(&dir),
            round: 1,
            scaffolding_type: Some("conceptual".to_string()),
            intensity: None,
            transcript: false,
        };
        let (result, out) = run(command, &Config::default(), "asdf\nI'm done\nignored\n");
        assert_eq!(result.exit_code, 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["status"], "concluded");
    }

    #[test]
    fn test_run_transcript_and_event_log() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.jsonl");
        let mut config = Config::default();
        config.engine.events_path = Some(events.clone());
        config.engine.seed = Some(1);
        let command = Commands::Run {
            map: map_file(&dir),
            round: 2,
            scaffolding_type: Some("procedural".to_string()),
            intensity: Some("low".to_string()),
            transcript: true,
        };
        let (result, out) = run(command, &config, "ok\nI'm done\n");
        assert!(out.contains("> ok"));
        assert!(out.contains("🛠️"));
        assert!(result.message.contains("Round 2 ended after 2 turns"));
        let logged = std::fs::read_to_string(&events).unwrap();
        assert_eq!(logged.lines().count(), 4);
    }

    #[test]
    fn test_run_rejects_baseline_round() {
        let dir = tempfile::tempdir().unwrap();
        let command = Commands::Run {
            map: map_file(&dir),
            round: 0,
            scaffolding_type: None,
            intensity: None,
            transcript: false,
        };
        let (result, out) = run(command, &Config::default(), "");
        assert_eq!(result.exit_code, 1);
        assert!(result.message.contains("Invalid round 0"));
        assert!(out.is_empty());
    }
}
