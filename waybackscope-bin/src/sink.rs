//! The single consumer of the result channel.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::{debug, warn};
use waybackscope_lib::Pipeline;

/// The optional file mirror of the console
#[derive(Debug)]
struct FileDestination {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Writes every result line to the console and, optionally, a file
///
/// A failing file is given up with a warning; the console keeps receiving
/// every line.
#[derive(Debug)]
pub(crate) struct OutputSink<W: Write> {
    console: W,
    file: Option<FileDestination>,
    total: usize,
}

impl<W: Write> OutputSink<W> {
    pub(crate) fn new(console: W, file: Option<(PathBuf, File)>) -> Self {
        Self {
            console,
            file: file.map(|(path, file)| FileDestination {
                path,
                writer: BufWriter::new(file),
            }),
            total: 0,
        }
    }

    /// Consume the pipeline until every worker is done
    ///
    /// Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Fails if writing to the console fails. A closed console shows up as
    /// [`io::ErrorKind::BrokenPipe`].
    pub(crate) async fn drain(&mut self, pipeline: &mut Pipeline) -> io::Result<usize> {
        while let Some(line) = pipeline.recv().await {
            self.write_line(&line)?;
        }
        debug!("Result channel closed after {} lines", self.total);
        Ok(self.total)
    }

    pub(crate) fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.console, "{line}")?;
        let failed = match &mut self.file {
            Some(dest) => writeln!(dest.writer, "{line}").err(),
            None => None,
        };
        if let Some(e) = failed {
            self.give_up_file(&e);
        }
        self.total += 1;
        Ok(())
    }

    /// Flush both destinations and close the file
    ///
    /// Returns the path of the file if every line made it there.
    pub(crate) fn finish(mut self) -> io::Result<Option<PathBuf>> {
        self.console.flush()?;
        let Some(mut dest) = self.file.take() else {
            return Ok(None);
        };
        match dest.writer.flush() {
            Ok(()) => Ok(Some(dest.path)),
            Err(e) => {
                warn!("Cannot write to output file `{}`: {e}", dest.path.display());
                Ok(None)
            }
        }
    }

    fn give_up_file(&mut self, error: &io::Error) {
        if let Some(dest) = self.file.take() {
            warn!(
                "Cannot write to output file `{}`: {error}; printing to the console only",
                dest.path.display()
            );
        }
    }
}
