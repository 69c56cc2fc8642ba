use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

/// The line-oriented I/O used by `input` and `output` statements.
pub trait Console {
    /// Writes `line` followed by a line break.
    ///
    /// # Errors
    /// Propagates failures of the underlying writer.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Reads one line. The line break may still be attached.
    ///
    /// # Errors
    /// Propagates failures of the underlying reader, and reports
    /// `UnexpectedEof` once no input is left.
    fn read_line(&mut self) -> io::Result<String>;
}

/// Console bound to the process's standard input and output.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"));
        }
        Ok(line)
    }
}

/// In-memory console: scripted input lines and captured output lines.
///
/// # Example
/// ```
/// use semtree::interpreter::console::{BufferConsole, Console};
///
/// let mut console = BufferConsole::with_input(["7"]);
/// let line = console.read_line().unwrap();
/// console.write_line(&line).unwrap();
///
/// assert_eq!(console.output(), ["7"]);
/// assert!(console.read_line().is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    input:  VecDeque<String>,
    output: Vec<String>,
}

impl BufferConsole {
    /// Creates a console with no input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console that answers `read_line` with `lines`, in order.
    pub fn with_input<I, S>(lines: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { input:  lines.into_iter().map(Into::into).collect(),
               output: Vec::new(), }
    }

    /// Returns every line written so far.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Returns the written lines joined by line breaks.
    #[must_use]
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }
}
