//! Serialization of a committed command batch into the engine's two-line reply.

use bastion_core::{Command, GameConfig};
use serde::Serialize;

/// `[shorthand, x, y]` as expected by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Placement(String, i32, i32);

/// Build and deploy stacks for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnSubmission {
    build: Vec<Placement>,
    deploy: Vec<Placement>,
}

impl TurnSubmission {
    /// Splits a command batch into the build stack (structures and upgrades)
    /// and the deploy stack (mobile units), preserving command order.
    #[must_use]
    pub fn from_commands(config: &GameConfig, commands: &[Command]) -> Self {
        let mut submission = Self::default();
        for command in commands {
            match *command {
                Command::Spawn { kind, at, count } => {
                    let shorthand = &config.stats(kind).shorthand;
                    let stack = if kind.is_stationary() {
                        &mut submission.build
                    } else {
                        &mut submission.deploy
                    };
                    for _ in 0..count {
                        stack.push(Placement(shorthand.clone(), at.x(), at.y()));
                    }
                }
                Command::Upgrade { at } => submission.build.push(Placement(
                    config.upgrade_shorthand().to_owned(),
                    at.x(),
                    at.y(),
                )),
            }
        }
        submission
    }

    /// Number of entries on the build stack.
    #[must_use]
    pub fn build_len(&self) -> usize {
        self.build.len()
    }

    /// Number of entries on the deploy stack.
    #[must_use]
    pub fn deploy_len(&self) -> usize {
        self.deploy.len()
    }

    /// Encodes the two protocol lines: build stack first, then deploy stack.
    pub fn to_lines(&self) -> Result<[String; 2], serde_json::Error> {
        Ok([
            serde_json::to_string(&self.build)?,
            serde_json::to_string(&self.deploy)?,
        ])
    }
}
