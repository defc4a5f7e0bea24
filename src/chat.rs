//! `pdf-rag chat`: interactive question loop.
//!
//! Empty input, `sair`, `exit`, or `quit` (any case) ends the session, as
//! does end of input. Every other line is sent through the pipeline. A
//! failed question is reported and the loop continues.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::error;

use pdf_rag_core::QaPipeline;

use crate::ask::open_pipeline;
use crate::config::Config;

const BANNER: &str = "Faça sua pergunta (digite 'sair' para encerrar):\n";
const PROMPT: &str = "PERGUNTA: ";
const FAREWELL: &str = "Encerrando. Até mais!";
const NO_ANSWER: &str = "Nenhuma resposta encontrada.";

/// Whether a (raw) input line ends the session.
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || ["sair", "exit", "quit"].iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Drive the loop over arbitrary input and output streams. Returns the
/// number of questions forwarded to the pipeline.
pub async fn run_loop<R, W>(pipeline: &QaPipeline, k: usize, mut input: R, mut output: W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", BANNER)?;
    let mut asked = 0;

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || is_exit_command(&line) {
            writeln!(output, "{}", FAREWELL)?;
            break;
        }

        let question = line.trim();
        asked += 1;
        match pipeline.ask_k(question, k).await {
            Ok(answer) if answer.text().is_empty() => writeln!(output, "\n{}\n", NO_ANSWER)?,
            Ok(answer) => writeln!(output, "\nRESPOSTA: {}\n", answer)?,
            Err(e) => {
                error!(error = %e, "question failed");
                writeln!(output, "\nErro: {}\n", e)?;
            }
        }
    }

    Ok(asked)
}

pub async fn run_chat(config: &Config, k: Option<usize>) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    let k = k.unwrap_or(config.retrieval.top_k);
    let stdin = std::io::stdin();
    run_loop(&pipeline, k, stdin.lock(), std::io::stdout()).await?;
    Ok(())
}
