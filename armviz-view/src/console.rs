use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use armviz::{core::LinkLengths, runtime::Event};

const HELP: &str = "commands: click <x> <y> | hover <frame> | hover-at <seconds> | leave | reset | lengths <l1> <l2> <l3> | duration <seconds> | status | quit";

fn number<T: std::str::FromStr>(value: Option<&str>, name: &str) -> anyhow::Result<T> {
    value
        .ok_or_else(|| anyhow::anyhow!("missing {}", name))?
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid {}", name))
}

fn finite(value: Option<&str>, name: &str) -> anyhow::Result<f32> {
    let value: f32 = number(value, name)?;

    if !value.is_finite() {
        anyhow::bail!("invalid {}", name);
    }

    Ok(value)
}

/// Parse a console command.
///
/// Returns `None` for blank lines.
pub(crate) fn parse(line: &str) -> anyhow::Result<Option<Event>> {
    let mut words = line.split_whitespace();

    let command = match words.next() {
        Some(command) => command.to_lowercase(),
        None => return Ok(None),
    };

    let event = match command.as_str() {
        "click" => Event::Click {
            x: finite(words.next(), "x")?,
            y: finite(words.next(), "y")?,
        },
        "hover" => Event::HoverMove(number(words.next(), "frame")?),
        "hover-at" => Event::HoverAt(finite(words.next(), "time")?),
        "leave" => Event::HoverLeave,
        "reset" => Event::Reset,
        "lengths" => Event::SetLengths(LinkLengths::clamped(
            finite(words.next(), "l1")?,
            finite(words.next(), "l2")?,
            finite(words.next(), "l3")?,
        )),
        "duration" => Event::SetDuration(finite(words.next(), "duration")?),
        "status" => Event::Status,
        "quit" | "exit" => Event::Shutdown,
        _ => anyhow::bail!("unknown command '{}', {}", command, HELP),
    };

    if words.next().is_some() {
        anyhow::bail!("trailing arguments, {}", HELP);
    }

    Ok(Some(event))
}

/// Read commands from standard input until end of input.
pub(crate) async fn read_commands(tx: mpsc::Sender<Event>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    log::info!("{}", HELP);

    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            Ok(Some(event)) => {
                let shutdown = matches!(event, Event::Shutdown);

                if tx.send(event).await.is_err() || shutdown {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("{}", e),
        }
    }

    log::debug!("End of input");

    tx.send(Event::Shutdown).await.ok();

    Ok(())
}
