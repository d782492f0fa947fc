//! Line protocol spoken with the game engine over stdin and stdout.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use bastion_core::GameConfig;
use bastion_strategy::{Strategy, StrategyConfig};
use bastion_world::{BreachReport, Frame, FrameKind, GameState, TurnSubmission};

/// Totals reported once the engine closes the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MatchSummary {
    /// Turns planned and answered.
    pub(crate) turns: u32,
    /// Frames that could not be decoded.
    pub(crate) rejected: u32,
    /// Whether the engine announced the end of the match.
    pub(crate) finished: bool,
}

/// Plays one match: configuration first, then one frame per line.
///
/// Turn-start frames are answered with the build and deploy stacks. A
/// turn-start frame whose snapshot fails to decode is answered with two empty
/// stacks so the engine is not left waiting. Action frames only feed the
/// breach log. A line that is not a frame at all is logged and left
/// unanswered, since its phase is unknown. A bad configuration line aborts the
/// match.
pub(crate) fn play<R, W>(input: R, mut output: W, tuning: StrategyConfig) -> Result<MatchSummary>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    let config = loop {
        let Some(line) = lines.next() else {
            anyhow::bail!("engine closed the stream before sending the game configuration");
        };
        let line = line.context("failed to read the game configuration line")?;
        if line.trim().is_empty() {
            continue;
        }
        break GameConfig::from_json(&line).context("failed to load the game configuration")?;
    };
    tracing::info!(starting_health = config.starting_health(), "game configuration loaded");

    let mut strategy = Strategy::new(tuning, config.starting_health());
    let mut summary = MatchSummary::default();

    for line in lines {
        let line = line.context("failed to read an engine frame")?;
        if line.trim().is_empty() {
            continue;
        }

        let frame = match Frame::parse(&line) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::error!(%error, "dropping undecodable frame");
                summary.rejected += 1;
                continue;
            }
        };

        match frame.kind() {
            FrameKind::TurnStart => {
                let submission = match GameState::from_frame(&config, &frame) {
                    Ok(mut state) => {
                        summary.turns += 1;
                        let commands = strategy.on_turn(&mut state);
                        TurnSubmission::from_commands(&config, &commands)
                    }
                    Err(error) => {
                        tracing::error!(turn = frame.turn_number(), %error, "turn skipped");
                        summary.rejected += 1;
                        TurnSubmission::default()
                    }
                };
                let [build, deploy] = submission
                    .to_lines()
                    .context("failed to encode the turn submission")?;
                writeln!(output, "{build}").context("failed to write the build stack")?;
                writeln!(output, "{deploy}").context("failed to write the deploy stack")?;
                output.flush().context("failed to flush the turn submission")?;
                tracing::debug!(
                    turn = frame.turn_number(),
                    build = submission.build_len(),
                    deploy = submission.deploy_len(),
                    "turn submitted"
                );
            }
            FrameKind::Action => strategy.on_action_frame(&BreachReport::from_frame(&frame)),
            FrameKind::GameOver => {
                summary.finished = true;
                break;
            }
        }
    }

    tracing::info!(
        turns = summary.turns,
        rejected = summary.rejected,
        breaches = strategy.state().breaches().len(),
        finished = summary.finished,
        "match over"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::fixtures;

    fn compact_config() -> String {
        fixtures::GAME_CONFIG_JSON.replace('\n', " ")
    }

    fn run(frames: &[&str]) -> (MatchSummary, Vec<String>) {
        let mut input = compact_config();
        for frame in frames {
            input.push('\n');
            input.push_str(frame);
        }
        let mut output = Vec::new();
        let summary = play(input.as_bytes(), &mut output, StrategyConfig::default())
            .expect("match plays out");
        let text = String::from_utf8(output).expect("output is utf-8");
        (summary, text.lines().map(str::to_owned).collect())
    }

    #[test]
    fn opening_turn_answers_with_patrols_only() {
        let (summary, lines) = run(&[
            r#"{"turnInfo": [0, 0, -1], "p1Stats": [30, 40, 5, 0], "p1Units": [], "p2Units": []}"#,
            r#"{"turnInfo": [2, 0, 10]}"#,
        ]);

        assert_eq!(
            summary,
            MatchSummary {
                turns: 1,
                rejected: 0,
                finished: true,
            }
        );
        assert_eq!(lines, vec![r#"[]"#, r#"[["EI",7,6],["SI",20,6]]"#]);
    }

    #[test]
    fn action_frames_are_not_answered() {
        let (summary, lines) = run(&[
            r#"{"turnInfo": [1, 0, 3], "events": {"breach": [[[13, 0], 1, 3, "9", 2]]}}"#,
            r#"{"turnInfo": [1, 0, 4]}"#,
        ]);

        assert_eq!(summary.turns, 0);
        assert!(!summary.finished);
        assert!(lines.is_empty());
    }

    #[test]
    fn undecodable_lines_are_skipped() {
        let (summary, lines) = run(&[
            "not json",
            r#"{"turnInfo": [0, 2, -1], "p1Stats": [30, 0, 0, 0]}"#,
        ]);

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.turns, 1);
        assert_eq!(lines, vec!["[]", "[]"]);
    }

    #[test]
    fn broken_turn_snapshot_still_gets_an_empty_reply() {
        let (summary, lines) = run(&[
            r#"{"turnInfo": [0, 1, -1], "p1Stats": [30]}"#,
            r#"{"turnInfo": [0, 2, -1], "p1Stats": [30, 40, 0, 0]}"#,
        ]);

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.turns, 1);
        assert_eq!(lines.len(), 4, "both turns are answered");
        assert_eq!(&lines[..2], &["[]", "[]"]);
        assert!(lines[2].starts_with(r#"[["FF",0,13]"#));
    }

    #[test]
    fn missing_configuration_is_fatal() {
        let mut output = Vec::new();
        assert!(play("\n\n".as_bytes(), &mut output, StrategyConfig::default()).is_err());
        assert!(play("{}".as_bytes(), &mut output, StrategyConfig::default()).is_err());
        assert!(output.is_empty());
    }
}
