use std::path::Path;

use divcheck_harness::debugger::{DebugSession, RemoteEndpoint, StopReason};

use futures_util::StreamExt;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio_util::codec::FramedRead;

use crate::Error;
use crate::mi::{AsyncKind, MiDecoder, Record, ResultClass, Results, StreamKind, Value, quote};

/// `gdb` settings applied to every session.
const SETTINGS: [&str; 3] = [
    // never block on interactive queries
    "confirm off",
    // a signal raised within a called function must not leave the
    // target stopped in that function
    "unwindonsignal on",
    "breakpoint pending off",
];

/// Debugging session driving a `gdb` child process.
pub struct Session {
    child: Child,
    stdin: ChildStdin,
    records: FramedRead<ChildStdout, MiDecoder>,
    next_token: u64,

    /// Whether a `*running` record was received since the last stop.
    running: bool,
}

impl Session {
    #[tracing::instrument(name = "GdbInit", skip_all)]
    pub(crate) async fn init(mut child: Child) -> crate::Result<Self> {
        let stdin = child.stdin.take().ok_or(Error::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(Error::MissingPipe("stdout"))?;

        let mut session = Self {
            child,
            stdin,
            records: FramedRead::new(stdout, MiDecoder::default()),
            next_token: 1,
            running: false,
        };

        loop {
            match session.next_record().await? {
                Record::Prompt => break,
                record => log_record(&record),
            }
        }

        for setting in SETTINGS {
            session
                .execute_expecting(&format!("-gdb-set {setting}"), &[ResultClass::Done])
                .await?;
        }

        Ok(session)
    }

    /// Loads the executable and symbols of the given target image.
    pub(crate) async fn load_image(&mut self, image: &Path) -> crate::Result<()> {
        let command = format!(
            "-file-exec-and-symbols {}",
            quote(&image.to_string_lossy())
        );

        self.execute_expecting(&command, &[ResultClass::Done])
            .await
            .map(drop)
    }

    async fn next_record(&mut self) -> crate::Result<Record> {
        let record = self.records.next().await.ok_or(Error::Terminated)??;

        if matches!(
            &record,
            Record::Async { kind: AsyncKind::Exec, class, .. } if class == "running"
        ) {
            self.running = true;
        }

        Ok(record)
    }

    /// Sends an MI command, and waits for its result record.
    async fn execute(&mut self, command: &str) -> crate::Result<(ResultClass, Results)> {
        let token = self.next_token;
        self.next_token += 1;

        tracing::debug!(token, command, "send");

        self.stdin
            .write_all(format!("{token}{command}\n").as_bytes())
            .await?;
        self.stdin.flush().await?;

        loop {
            match self.next_record().await? {
                Record::Result {
                    token: Some(t),
                    class,
                    results,
                } if t == token => {
                    tracing::debug!(token, %class, "result");

                    if class == ResultClass::Error {
                        return Err(Error::Command {
                            command: command.to_owned(),
                            msg: results.get_str("msg").unwrap_or_default().to_owned(),
                        });
                    }

                    return Ok((class, results));
                }
                record => log_record(&record),
            }
        }
    }

    async fn execute_expecting(
        &mut self,
        command: &str,
        accepted: &[ResultClass],
    ) -> crate::Result<Results> {
        let (class, results) = self.execute(command).await?;

        if accepted.contains(&class) {
            Ok(results)
        } else {
            Err(Error::UnexpectedResult {
                command: command.to_owned(),
                class: class.to_string(),
            })
        }
    }

    /// Sends an execution command, and waits until the target stops.
    async fn execute_until_stop(&mut self, command: &str) -> crate::Result<StopReason> {
        self.running = false;

        self.execute_expecting(command, &[ResultClass::Running])
            .await?;

        self.wait_for_stop().await
    }

    async fn wait_for_stop(&mut self) -> crate::Result<StopReason> {
        loop {
            match self.next_record().await? {
                Record::Async {
                    kind: AsyncKind::Exec,
                    class,
                    results,
                    ..
                } if class == "stopped" && self.running => {
                    self.running = false;

                    let reason = stop_reason(&results);
                    tracing::debug!(%reason, "target stopped");

                    return Ok(reason);
                }
                record => log_record(&record),
            }
        }
    }
}

impl DebugSession for Session {
    type Error = crate::Error;

    #[tracing::instrument(skip_all, fields(%endpoint))]
    async fn connect_remote(&mut self, endpoint: &RemoteEndpoint) -> Result<(), Self::Error> {
        self.execute_expecting(
            &format!("-target-select remote {endpoint}"),
            &[ResultClass::Connected, ResultClass::Done],
        )
        .await
        .map(drop)
    }

    #[tracing::instrument(skip(self))]
    async fn monitor(&mut self, command: &str) -> Result<(), Self::Error> {
        let command = format!(
            "-interpreter-exec console {}",
            quote(&format!("monitor {command}"))
        );

        self.execute_expecting(&command, &[ResultClass::Done])
            .await
            .map(drop)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_breakpoint(&mut self, symbol: &str) -> Result<u32, Self::Error> {
        let results = self
            .execute_expecting(&format!("-break-insert {symbol}"), &[ResultClass::Done])
            .await?;

        results
            .get("bkpt")
            .and_then(Value::as_tuple)
            .and_then(|bkpt| bkpt.get_str("number"))
            .and_then(|number| number.parse().ok())
            .ok_or(Error::MissingField("bkpt.number"))
    }

    async fn run(&mut self) -> Result<StopReason, Self::Error> {
        self.execute_until_stop("-exec-run").await
    }

    async fn resume(&mut self) -> Result<StopReason, Self::Error> {
        self.execute_until_stop("-exec-continue").await
    }

    async fn evaluate(&mut self, expression: &str) -> Result<String, Self::Error> {
        let results = self
            .execute_expecting(
                &format!("-data-evaluate-expression {}", quote(expression)),
                &[ResultClass::Done],
            )
            .await?;

        results
            .get_str("value")
            .map(str::to_owned)
            .ok_or(Error::MissingField("value"))
    }

    #[tracing::instrument(name = "GdbExit", skip_all)]
    async fn terminate(mut self) -> Result<(), Self::Error> {
        self.execute_expecting("-gdb-exit", &[ResultClass::Exit, ResultClass::Done])
            .await?;

        let status = self.child.wait().await?;
        tracing::debug!(%status, "gdb exited");

        Ok(())
    }
}

fn log_record(record: &Record) {
    match record {
        Record::Stream {
            kind: StreamKind::Target,
            text,
        } => tracing::debug!(text = text.trim_end(), "target output"),
        Record::Stream { text, .. } => tracing::debug!(text = text.trim_end(), "gdb output"),
        Record::Unrecognized(line) => tracing::debug!(line = line.as_str(), "target output"),
        Record::Prompt => (),
        record => tracing::trace!(?record, "skipped record"),
    }
}

fn stop_reason(results: &Results) -> StopReason {
    let Some(reason) = results.get_str("reason") else {
        return StopReason::Other("unknown".to_owned());
    };

    match reason {
        "breakpoint-hit" => {
            let number = results.get_str("bkptno").and_then(|n| n.parse().ok());
            let function = results
                .get("frame")
                .and_then(Value::as_tuple)
                .and_then(|frame| frame.get_str("func"))
                .map(str::to_owned);

            match number {
                Some(number) => StopReason::Breakpoint { number, function },
                None => StopReason::Other(reason.to_owned()),
            }
        }
        "exited-normally" => StopReason::Exited { exit_code: 0 },
        // the exit code is printed in octal
        "exited" => match results
            .get_str("exit-code")
            .and_then(|code| i32::from_str_radix(code, 8).ok())
        {
            Some(exit_code) => StopReason::Exited { exit_code },
            None => StopReason::Other(reason.to_owned()),
        },
        "exited-signalled" | "signal-received" => StopReason::Signaled {
            signal: results
                .get_str("signal-name")
                .unwrap_or("unknown")
                .to_owned(),
        },
        other => StopReason::Other(other.to_owned()),
    }
}
