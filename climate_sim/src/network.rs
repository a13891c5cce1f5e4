//! Line-oriented TCP command listener.
//!
//! One thread per client reads newline-delimited commands. Parsed commands
//! travel to the owning loop over a crossbeam channel together with a reply
//! sender; the client thread writes the reply back as one JSON line.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use climate_runtime::{parse_command, CommandEnvelope, ResponseEnvelope};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{info, warn};

/// A parsed command waiting for the main loop.
#[derive(Debug)]
pub struct PendingCommand {
    pub envelope: CommandEnvelope,
    pub peer: SocketAddr,
    reply: Sender<ResponseEnvelope>,
}

impl PendingCommand {
    /// Split off the envelope so it can be handled by value.
    pub fn into_parts(self) -> (CommandEnvelope, ReplyHandle) {
        (
            self.envelope,
            ReplyHandle {
                peer: self.peer,
                reply: self.reply,
            },
        )
    }
}

/// Return path to the client thread that queued a command.
#[derive(Debug)]
pub struct ReplyHandle {
    pub peer: SocketAddr,
    reply: Sender<ResponseEnvelope>,
}

impl ReplyHandle {
    pub fn respond(self, response: ResponseEnvelope) {
        if self.reply.send(response).is_err() {
            warn!(
                target: "climate::server",
                peer = %self.peer,
                "command.reply_dropped"
            );
        }
    }
}

pub struct CommandServer {
    local_addr: SocketAddr,
    receiver: Receiver<PendingCommand>,
}

impl CommandServer {
    /// Bind and start accepting clients. Port 0 picks a free port; see
    /// [`CommandServer::local_addr`].
    pub fn bind(bind_addr: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(bind_addr)?;
        let local_addr = listener.local_addr()?;
        let (sender, receiver) = unbounded::<PendingCommand>();

        thread::spawn(move || loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    info!(target: "climate::server", %peer, "client.connected");
                    let sender = sender.clone();
                    thread::spawn(move || handle_client(stream, peer, sender));
                }
                Err(err) => {
                    warn!(target: "climate::server", error = %err, "client.accept_failed");
                    thread::sleep(std::time::Duration::from_millis(200));
                }
            }
        });

        Ok(Self {
            local_addr,
            receiver,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn receiver(&self) -> &Receiver<PendingCommand> {
        &self.receiver
    }
}

fn handle_client(stream: TcpStream, peer: SocketAddr, sender: Sender<PendingCommand>) {
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(err) => {
            warn!(target: "climate::server", %peer, error = %err, "client.clone_failed");
            return;
        }
    };
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let response = match parse_command(trimmed) {
                    Ok(envelope) => match dispatch(envelope, peer, &sender) {
                        Some(response) => response,
                        None => break,
                    },
                    Err(err) => {
                        warn!(
                            target: "climate::server",
                            %peer,
                            error = %err,
                            "command.rejected"
                        );
                        ResponseEnvelope::error(None, err.to_string())
                    }
                };
                if let Err(err) = write_response(&mut writer, &response) {
                    warn!(target: "climate::server", %peer, error = %err, "client.write_failed");
                    break;
                }
            }
            Err(err) => {
                warn!(target: "climate::server", %peer, error = %err, "client.read_failed");
                break;
            }
        }
    }
    info!(target: "climate::server", %peer, "client.disconnected");
}

/// Hand a command to the main loop and wait for its answer. `None` once the
/// loop has shut down.
fn dispatch(
    envelope: CommandEnvelope,
    peer: SocketAddr,
    sender: &Sender<PendingCommand>,
) -> Option<ResponseEnvelope> {
    let (reply, response) = bounded(1);
    sender
        .send(PendingCommand {
            envelope,
            peer,
            reply,
        })
        .ok()?;
    response.recv().ok()
}

fn write_response(stream: &mut TcpStream, response: &ResponseEnvelope) -> io::Result<()> {
    let mut line = response
        .to_line()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    line.push('\n');
    stream.write_all(line.as_bytes())
}
