//! One-shot resmgr client.
//!
//! # Usage
//!
//! ```bash
//! resmgr-client 'WRITE hello'
//! resmgr-client READ
//! resmgr-client --socket /run/resmgr.sock 'SETPERM ro'
//! ```

use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use resmgr_client::DEFAULT_SOCKET_PATH;

/// Send a single command to the resmgr server and print the reply
#[derive(Parser, Debug)]
#[command(name = "resmgr-client")]
#[command(version)]
struct Args {
    /// Path of the server socket
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Command to send, exactly as written (no newline is appended)
    message: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result: Result<(), Box<dyn Error>> =
        match resmgr_client::send_command(&args.socket, &args.message).await {
            Ok(reply) => write_reply(&mut io::stdout().lock(), &reply).map_err(Into::into),
            Err(e) => Err(e.into()),
        };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(io::stderr(), "resmgr-client: {e}");
            ExitCode::FAILURE
        },
    }
}

fn write_reply(out: &mut impl Write, reply: &[u8]) -> io::Result<()> {
    out.write_all(b"response: ")?;
    out.write_all(reply)?;
    out.write_all(b"\n")?;
    out.flush()
}
