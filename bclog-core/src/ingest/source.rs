use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// A blocking supplier of raw log lines.
pub trait LineSource: Send {
    /// The next line without its terminator, or `None` at end of stream.
    fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Lines from any buffered reader. Invalid UTF-8 is replaced, not rejected.
pub struct ReaderSource<R> {
    reader: R,
    name: String,
    buf: Vec<u8>,
}

impl<R: BufRead + Send> ReaderSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            buf: Vec::new(),
        }
    }
}

impl ReaderSource<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(
            BufReader::new(file),
            format!("file {}", path.display()),
        ))
    }
}

impl<R: BufRead + Send> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Lines from a spawned command's stdout, e.g. `ssh host -- tail -f /var/log/syslog`.
///
/// The child is killed when the source is dropped.
pub struct CommandSource {
    child: Child,
    lines: ReaderSource<BufReader<ChildStdout>>,
}

impl CommandSource {
    pub fn spawn(argv: &[String]) -> io::Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty source command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;

        tracing::info!(pid = child.id(), command = ?argv, "spawned log source");

        Ok(Self {
            child,
            lines: ReaderSource::new(BufReader::new(stdout), format!("command {}", argv.join(" "))),
        })
    }
}

impl LineSource for CommandSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = self.lines.next_line()?;
        if line.is_none() {
            match self.child.wait() {
                Ok(status) => tracing::info!(%status, "log source command exited"),
                Err(err) => tracing::warn!(error = %err, "failed to reap log source command"),
            }
        }
        Ok(line)
    }

    fn describe(&self) -> String {
        self.lines.describe()
    }
}

impl Drop for CommandSource {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
