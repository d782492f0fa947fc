//! Engine frame decoding: turn-start snapshots and action-frame breach reports.

use bastion_core::Coordinate;
use serde::Deserialize;

use crate::SnapshotError;

/// Owner tag the engine uses for the opposing player inside event records.
const ENEMY_EVENT_OWNER: u8 = 2;

/// Phase a frame belongs to, taken from `turnInfo[0]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Deployment phase: the engine waits for a command batch.
    TurnStart,
    /// One simulated step of the action phase.
    Action,
    /// The match has ended.
    GameOver,
}

/// A decoded engine frame.
#[derive(Debug)]
pub struct Frame {
    kind: FrameKind,
    turn_number: u32,
    raw: RawFrame,
}

impl Frame {
    /// Decodes one line of engine output.
    pub fn parse(line: &str) -> Result<Self, SnapshotError> {
        let raw: RawFrame = serde_json::from_str(line)?;
        let kind = match raw.turn_info.first().copied() {
            Some(0) => FrameKind::TurnStart,
            Some(1) => FrameKind::Action,
            Some(2) => FrameKind::GameOver,
            Some(other) => return Err(SnapshotError::UnknownPhase(other)),
            None => return Err(SnapshotError::MissingTurnInfo),
        };
        let turn_number = raw
            .turn_info
            .get(1)
            .copied()
            .ok_or(SnapshotError::MissingTurnInfo)
            .and_then(|turn| u32::try_from(turn).map_err(|_| SnapshotError::InvalidTurn(turn)))?;

        Ok(Self {
            kind,
            turn_number,
            raw,
        })
    }

    /// Phase of the frame.
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Turn the frame belongs to.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub(crate) fn raw(&self) -> &RawFrame {
        &self.raw
    }
}

/// Enemy units that reached our edge during one action frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BreachReport {
    breaches: Vec<Breach>,
}

/// A single enemy breach of our defenses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breach {
    /// Edge cell where the enemy unit scored.
    pub at: Coordinate,
    /// Health removed from us by the breach.
    pub damage: f64,
}

impl BreachReport {
    /// Extracts the breaches scored against us from an action frame.
    #[must_use]
    pub fn from_frame(frame: &Frame) -> Self {
        let breaches = frame
            .raw
            .events
            .breach
            .iter()
            .filter(|entry| entry.4 == ENEMY_EVENT_OWNER)
            .map(|entry| Breach {
                at: Coordinate::new(entry.0[0], entry.0[1]),
                damage: entry.1,
            })
            .collect();
        Self { breaches }
    }

    /// Breaches in the order the engine reported them.
    #[must_use]
    pub fn breaches(&self) -> &[Breach] {
        &self.breaches
    }

    /// Whether no enemy unit scored during the frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breaches.is_empty()
    }
}

/// `[x, y, health, id]` as sent by the engine.
pub(crate) type RawUnit = (i32, i32, f64, serde_json::Value);

/// `[[x, y], damage, unit_type, id, owner]` as sent by the engine.
type RawBreach = ([i32; 2], f64, serde_json::Value, serde_json::Value, u8);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFrame {
    turn_info: Vec<i64>,
    #[serde(default)]
    pub(crate) p1_units: Vec<Vec<RawUnit>>,
    #[serde(default)]
    pub(crate) p2_units: Vec<Vec<RawUnit>>,
    #[serde(default)]
    pub(crate) p1_stats: Vec<f64>,
    #[serde(default)]
    events: RawEvents,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvents {
    #[serde(default)]
    breach: Vec<RawBreach>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_taken_from_turn_info() {
        let frame = Frame::parse(r#"{"turnInfo": [1, 4, 12]}"#).expect("frame parses");
        assert_eq!(frame.kind(), FrameKind::Action);
        assert_eq!(frame.turn_number(), 4);

        let frame = Frame::parse(r#"{"turnInfo": [2, 40, 0]}"#).expect("frame parses");
        assert_eq!(frame.kind(), FrameKind::GameOver);
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let error = Frame::parse(r#"{"turnInfo": [7, 0, 0]}"#).expect_err("phase is unknown");
        assert!(matches!(error, SnapshotError::UnknownPhase(7)));
    }

    #[test]
    fn only_enemy_breaches_are_reported() {
        let frame = Frame::parse(
            r#"{
                "turnInfo": [1, 3, 40],
                "events": {"breach": [
                    [[3, 10], 1, 3, "12", 2],
                    [[20, 20], 1, 3, "13", 1],
                    [[24, 10], 2, 4, "14", 2]
                ]}
            }"#,
        )
        .expect("frame parses");

        let report = BreachReport::from_frame(&frame);
        let cells: Vec<_> = report.breaches().iter().map(|breach| breach.at).collect();
        assert_eq!(cells, vec![Coordinate::new(3, 10), Coordinate::new(24, 10)]);
        assert_eq!(report.breaches()[1].damage, 2.0);
    }

    #[test]
    fn frames_without_events_report_nothing() {
        let frame = Frame::parse(r#"{"turnInfo": [1, 0, 0]}"#).expect("frame parses");
        assert!(BreachReport::from_frame(&frame).is_empty());
    }
}
