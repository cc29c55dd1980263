mod parser;

use bert::{read_frame, write_frame, Decoder, Encoder};
use std::io::{self, Read, Write};
use anyhow::{Context, Result};
use log::debug;
use structopt::StructOpt;
use std::str::from_utf8;

/// Decode and print BERT terms in Erlang syntax
#[derive(StructOpt)]
#[structopt(name = "bq")]
struct Opt {
    /// parse a term in Erlang syntax and encode it into binary BERT instead
    #[structopt(short, long)]
    encode: bool,
    /// the binary side is a BURP frame, i.e. the term is prefixed with its 4 byte length
    #[structopt(short, long)]
    frame: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    debug!("read {} bytes from stdin", buffer.len());
    if opt.encode {
        encode(&buffer, opt.frame)
    } else {
        print(&buffer, opt.frame)
    }
}

fn print(buffer: &[u8], frame: bool) -> Result<()> {
    let term = if frame {
        read_frame(&mut &buffer[..]).context("Decoding error")?
    } else {
        let (term, consumed) = Decoder::decode(buffer).context("Decoding error")?;
        if consumed < buffer.len() {
            debug!("ignoring {} bytes after the term", buffer.len() - consumed);
        }
        term
    };
    println!("{}", &term);
    Ok(())
}

fn encode(buffer: &[u8], frame: bool) -> Result<()> {
    let string = from_utf8(buffer).context("input is not utf-8")?;
    let term = parser::parse(string)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if frame {
        write_frame(&mut out, &term)
    } else {
        Encoder::encode(&term, &mut out)
    };
    written.context("Encoding error")?;
    out.flush().context("Failed to write stdout")?;
    Ok(())
}
