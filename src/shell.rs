//! Interactive shell for the vivarium.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use vivarium_genome::{self as genome, Genome, DEFAULT_GENOME_LEN};

use crate::kernel::Kernel;

const PROMPT: &str = "vivarium> ";

/// Runs the command loop, or a single command when `once` is given.
pub fn run(kernel: &mut Kernel, creature_name: &str, once: Option<&str>) -> Result<()> {
    if let Some(line) = once {
        return execute(kernel, line);
    }
    println!("{creature_name} is awake — type 'help' for guidance.");
    let stdin = io::stdin();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }
        if let Err(err) = execute(kernel, line) {
            println!("! {err}");
        }
    }
    Ok(())
}

fn execute(kernel: &mut Kernel, line: &str) -> Result<()> {
    let (command, rest) = split_word(line.trim());
    match command.to_lowercase().as_str() {
        "tick" => {
            let hours = if rest.is_empty() {
                1
            } else {
                rest.parse::<i64>()
                    .context("tick hours must be an integer")?
            };
            let summary = kernel.tick(hours)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "post" => {
            let (address, payload_text) = split_word(rest);
            if address.is_empty() {
                bail!("post requires an address");
            }
            let payload: Value = if payload_text.is_empty() {
                json!({})
            } else {
                serde_json::from_str(payload_text).context("payload must be valid JSON")?
            };
            let response = kernel.post(address, payload)?;
            println!("{}", serde_json::to_string_pretty(&response.payload)?);
        }
        "observe" => {
            let observation = kernel.observe();
            println!("{}", serde_json::to_string_pretty(&observation.summary)?);
            println!("{}", observation.skin);
        }
        "stream" => {
            let limit = if rest.is_empty() {
                10
            } else {
                rest.parse::<usize>()
                    .context("stream limit must be an integer")?
            };
            for entry in kernel.stream_tail(limit)? {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
        "genome" => {
            let seed = if rest.is_empty() {
                rand::random::<u64>()
            } else {
                rest.parse::<u64>().context("genome seed must be an integer")?
            };
            let genome = Genome::from_seed(seed, DEFAULT_GENOME_LEN);
            let card = json!({
                "seed": seed,
                "base64": genome::to_base64(&genome),
                "base60": genome::to_base60(&genome),
                "fingerprint": genome.fingerprint(),
            });
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        other => bail!("unknown command: {other}"),
    }
    Ok(())
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(index) => (&text[..index], text[index..].trim_start()),
        None => (text, ""),
    }
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 post <device.endpoint> {{json}}  — dispatch to a device\n\
         \x20 tick [hours]                    — advance time\n\
         \x20 observe                         — show state and skin\n\
         \x20 stream [limit]                  — tail the event stream\n\
         \x20 genome [seed]                   — mint a genome card\n\
         \x20 exit | quit                     — leave the shell"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_word() {
        assert_eq!(split_word("post tablet.feed {}"), ("post", "tablet.feed {}"));
        assert_eq!(split_word("observe"), ("observe", ""));
        assert_eq!(split_word("tick   3"), ("tick", "3"));
    }
}
