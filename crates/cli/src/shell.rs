use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use q3rcon::{Completion, RconError, Reply};

const BANNER: &str = "initialized. write rcon commands (enter to send). type 'exit' to quit.";
const PROMPT: &str = "> ";

#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Blank,
    Quit,
    Command(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Blank
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        Input::Quit
    } else {
        Input::Command(line)
    }
}

/// Reads commands until `exit`, `quit` or end of input. Failed commands are
/// reported and the loop keeps going.
pub fn run<R, W, F>(input: R, mut output: W, mut send: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<Reply, RconError>,
{
    writeln!(output, "{}", BANNER)?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;

        let command = match classify(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Command(command) => command,
        };

        match send(command) {
            Ok(reply) => {
                writeln!(output, "server: {}", reply.text)?;
                if let Completion::PacketLimit { limit } = reply.completion {
                    writeln!(output, "warning: reply truncated after {} packets", limit)?;
                }
            }
            Err(err) => {
                log::debug!("command {:?} failed: {}", command, err);
                writeln!(output, "error: {}", err)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn reply(text: &str, completion: Completion) -> Reply {
        Reply {
            text: text.to_string(),
            packets: 1,
            completion,
        }
    }

    fn run_script(script: &str, send: impl FnMut(&str) -> Result<Reply, RconError>) -> String {
        let mut output = Vec::new();
        run(Cursor::new(script), &mut output, send).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), Input::Blank);
        assert_eq!(classify("  \t"), Input::Blank);
        assert_eq!(classify("exit"), Input::Quit);
        assert_eq!(classify(" QUIT "), Input::Quit);
        assert_eq!(classify("Exit"), Input::Quit);
        assert_eq!(classify(" status "), Input::Command("status"));
        assert_eq!(classify("exit now"), Input::Command("exit now"));
    }

    #[test]
    fn test_commands_forwarded_until_quit() {
        let mut sent = Vec::new();
        let output = run_script("status\n\n  map q3dm17 \nquit\nnever\n", |cmd| {
            sent.push(cmd.to_string());
            Ok(reply(&format!("ok {}", cmd), Completion::Quiet))
        });

        assert_eq!(sent, vec!["status", "map q3dm17"]);
        assert!(output.starts_with(BANNER));
        assert!(output.contains("server: ok status\n"));
        assert!(output.contains("server: ok map q3dm17\n"));
        assert!(!output.contains("never"));
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut calls = 0;
        let output = run_script("first\nsecond\n", |_| {
            calls += 1;
            if calls == 1 {
                Err(RconError::Timeout)
            } else {
                Ok(reply("fine", Completion::Quiet))
            }
        });

        assert_eq!(calls, 2);
        assert!(output.contains("error: q3rcon: timeout (no response)\n"));
        assert!(output.contains("server: fine\n"));
    }

    #[test]
    fn test_truncated_reply_warns() {
        let output = run_script("cvarlist\n", |_| {
            Ok(reply("partial", Completion::PacketLimit { limit: 8 }))
        });

        assert!(output.contains("server: partial\n"));
        assert!(output.contains("warning: reply truncated after 8 packets\n"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let output = run_script("", |_| panic!("nothing should be sent"));
        assert_eq!(output, format!("{}\n{}", BANNER, PROMPT));
    }
}
