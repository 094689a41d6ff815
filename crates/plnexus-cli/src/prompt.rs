//! Interactive mode and symbol capture.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use crate::cli::Mode;
use crate::error::CliError;

/// Symbol used when the operator just presses enter.
pub const DEFAULT_SYMBOL: &str = "SPX";

/// Line-oriented prompt over any async reader/writer pair.
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

/// Prompt bound to the process stdin/stdout.
pub fn stdio() -> Prompt<BufReader<Stdin>, Stdout> {
    Prompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Shows the mode menu and reads one choice.
    pub async fn choose_mode(&mut self) -> Result<Mode, CliError> {
        let mut menu = String::from("Select data source:\n");
        for mode in Mode::ALL {
            menu.push_str(&format!("  {}) {}\n", mode.key(), mode.label()));
        }
        menu.push_str("> ");
        self.write(&menu).await?;

        let choice = self.read_line().await?;
        Mode::from_choice(&choice)
            .ok_or_else(|| CliError::Input(format!("invalid mode selection '{}'", choice.trim())))
    }

    /// Reads a ticker symbol; empty input selects [`DEFAULT_SYMBOL`].
    pub async fn ask_symbol(&mut self) -> Result<String, CliError> {
        self.write(&format!("Symbol [{DEFAULT_SYMBOL}]: ")).await?;
        let symbol = self.read_line().await?;
        match symbol.trim() {
            "" => Ok(DEFAULT_SYMBOL.to_owned()),
            trimmed => Ok(trimmed.to_owned()),
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), CliError> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(|error| CliError::Input(format!("cannot write prompt: {error}")))?;
        self.writer
            .flush()
            .await
            .map_err(|error| CliError::Input(format!("cannot write prompt: {error}")))
    }

    async fn read_line(&mut self) -> Result<String, CliError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|error| CliError::Input(format!("cannot read input: {error}")))?;
        if read == 0 {
            return Err(CliError::Input(String::from("input closed before a value was entered")));
        }
        Ok(line)
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}
