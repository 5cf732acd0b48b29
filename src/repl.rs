use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::services::Recommender;

const PROMPT: &str = "Enter a movie title (or 'quit' to exit): ";
const QUIT: &str = "quit";

/// Prompt loop: one resolve-then-recommend cycle per input line
///
/// Stops on `quit` (any case) or end of input. Unmatched titles are
/// reported and the loop carries on.
pub fn run<R: BufRead, W: Write>(recommender: &Recommender, input: R, mut output: W) -> std::io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            break;
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case(QUIT) {
            break;
        }

        let Some(set) = recommender.recommend_for_title(query) else {
            writeln!(output, "Oops! No match is found")?;
            writeln!(output, "Movie not found in the database.")?;
            continue;
        };

        writeln!(
            output,
            "Found possible matches in our database: [{}]",
            set.resolved.candidate_titles().join(", ")
        )?;
        writeln!(output, "Movie recommendations based on '{}':", query)?;
        for rec in &set.recommendations {
            match &rec.title {
                Some(title) => writeln!(output, "- {}", title)?,
                None => writeln!(output, "- movie #{}", rec.item_id)?,
            }
        }
    }
    Ok(())
}

/// Runs [`run`] on the blocking pool so stdin reads never stall the runtime
///
/// Hands the writer back once the loop ends.
pub async fn run_blocking<R, W>(recommender: Arc<Recommender>, input: R, output: W) -> std::io::Result<W>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut output = output;
        run(&recommender, input, &mut output)?;
        Ok(output)
    })
    .await
    .map_err(std::io::Error::other)?
}
