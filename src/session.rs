//! Interactive session: one editor command per stdin line.
//!
//! ```text
//! list                 reload the artifact catalog
//! select <id>          load an artifact
//! click <px> <py>      click at canvas CSS pixels
//! zoom <n>             pixels per module
//! dpr <ratio>          device pixel ratio
//! resize <width>       reference panel width
//! refresh              reload the selected artifact
//! quit                 finish pending requests and exit
//! ```

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use client::net::store::ArtifactStore;
use client::runtime::Runtime;
use client::state::editor::Event;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::host::SvgFileHost;

const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Event(Event),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// `UnknownCommand` for an unrecognized verb, `Usage` for missing or
/// unparsable arguments.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let event = match (verb, args.as_slice()) {
        ("quit" | "exit", []) => return Ok(Some(SessionCommand::Quit)),
        ("list", []) => Event::LoadCatalog,
        ("refresh", []) => Event::Refresh,
        ("select", [id]) => Event::Select { id: (*id).to_owned() },
        ("click", [x, y]) => Event::PointerClick {
            x: x.parse().map_err(|_| ParseError::Usage("click <px> <py>"))?,
            y: y.parse().map_err(|_| ParseError::Usage("click <px> <py>"))?,
        },
        ("zoom", [zoom]) => Event::ZoomChanged { zoom: zoom.parse().map_err(|_| ParseError::Usage("zoom <n>"))? },
        ("dpr", [ratio]) => Event::DevicePixelRatioChanged {
            device_pixel_ratio: ratio.parse().map_err(|_| ParseError::Usage("dpr <ratio>"))?,
        },
        ("resize", [width]) => {
            Event::ViewportResized { panel_width: width.parse().map_err(|_| ParseError::Usage("resize <width>"))? }
        }
        ("select", _) => return Err(ParseError::Usage("select <id>")),
        ("click", _) => return Err(ParseError::Usage("click <px> <py>")),
        ("zoom", _) => return Err(ParseError::Usage("zoom <n>")),
        ("dpr", _) => return Err(ParseError::Usage("dpr <ratio>")),
        ("resize", _) => return Err(ParseError::Usage("resize <width>")),
        _ => return Err(ParseError::UnknownCommand(line.to_owned())),
    };
    Ok(Some(SessionCommand::Event(event)))
}

/// Run the editor against `store`, feeding it commands read from stdin.
/// Returns the host once stdin closes or `quit` is read and every pending
/// request has finished.
pub async fn run_session<S>(runtime: Runtime<S, SvgFileHost>) -> Runtime<S, SvgFileHost>
where
    S: ArtifactStore + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    tokio::spawn(read_commands(tx));
    drive(runtime, rx).await
}

async fn drive<S>(mut runtime: Runtime<S, SvgFileHost>, rx: mpsc::Receiver<Event>) -> Runtime<S, SvgFileHost>
where
    S: ArtifactStore + 'static,
{
    runtime.dispatch(Event::LoadCatalog);
    runtime.run(rx).await;
    runtime
}

async fn read_commands(tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "stdin read failed");
                break;
            }
        };
        match parse_line(&line) {
            Ok(Some(SessionCommand::Event(event))) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }
    debug!("input closed");
}
