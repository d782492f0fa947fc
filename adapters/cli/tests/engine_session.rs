use std::{
    io::Write,
    process::{Command, Stdio},
};

use bastion_core::fixtures;

fn play(args: &[&str], frames: &[&str]) -> (bool, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bastion"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("bastion binary starts");

    {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        // The binary may exit before reading when its arguments are rejected.
        let _ = writeln!(stdin, "{}", fixtures::GAME_CONFIG_JSON.replace('\n', " "));
        for frame in frames {
            let _ = writeln!(stdin, "{frame}");
        }
    }

    let output = child.wait_with_output().expect("bastion exits");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    (output.status.success(), stdout)
}

#[test]
fn answers_each_turn_with_two_lines_on_stdout() {
    let (ok, stdout) = play(
        &["--log-level", "debug"],
        &[
            r#"{"turnInfo": [0, 0, -1], "p1Stats": [30, 40, 5, 0], "p1Units": [], "p2Units": []}"#,
            r#"{"turnInfo": [1, 0, 0], "events": {"breach": []}}"#,
            r#"{"turnInfo": [0, 1, -1], "p1Stats": [30, 40, 5, 0], "p1Units": [], "p2Units": []}"#,
            r#"{"turnInfo": [2, 1, 40]}"#,
        ],
    );

    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4, "two lines per turn, logs stay on stderr");
    assert_eq!(lines[0], "[]");
    assert_eq!(lines[1], r#"[["EI",7,6],["SI",20,6]]"#);
    assert!(lines[2].starts_with(r#"[["FF",0,13]"#));
    assert_eq!(lines[3], "[]");
}

#[test]
fn strategy_file_overrides_the_patrols() {
    let path = std::env::temp_dir().join(format!("bastion-strategy-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[[patrols]]\nkind = \"Scout\"\nat = { x = 13, y = 0 }\n",
    )
    .expect("strategy file written");

    let (ok, stdout) = play(
        &["--strategy", path.to_str().expect("temp path is utf-8")],
        &[r#"{"turnInfo": [0, 0, -1], "p1Stats": [30, 40, 5, 0]}"#],
    );
    let _ = std::fs::remove_file(&path);

    assert!(ok);
    assert_eq!(stdout.lines().nth(1), Some(r#"[["PI",13,0]]"#));
}

#[test]
fn unreadable_strategy_file_fails_fast() {
    let (ok, stdout) = play(&["--strategy", "/nonexistent/bastion.toml"], &[]);
    assert!(!ok);
    assert!(stdout.is_empty());
}
