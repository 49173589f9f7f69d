//! Activity ledger file.
//!
//! Length-prefixed protobuf frames, appended and never rewritten:
//!   [u32 LE length][ProtoLedgerEntry bytes] ...
//!
//! Sequence numbers start at 1 and grow by exactly 1; `append` refuses
//! anything else. Each append is fsynced before returning. A failed
//! append truncates the file back to its previous length so no torn
//! frame is left behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use prost::Message;
use tracing::{debug, warn};

use crate::proto_types::ProtoLedgerEntry;

/// Largest frame accepted when reading.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Next frame body, or `None` at a clean end of file. EOF anywhere
/// other than a frame boundary is corruption.
fn read_frame<R: Read>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    match filled {
        0 => return Ok(None),
        4 => {}
        n => return Err(invalid_data(format!("truncated frame header ({} of 4 bytes)", n))),
    }

    let len = u32::from_le_bytes(header) as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(invalid_data(format!("invalid frame length {}", len)));
    }

    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .map_err(|e| invalid_data(format!("truncated frame body: {}", e)))?;
    Ok(Some(body))
}

/// Append target that can be cut back to an earlier length.
trait FrameSink: Write {
    fn end(&mut self) -> io::Result<u64>;
    fn commit(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl FrameSink for File {
    fn end(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn commit(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_all()
    }
}

/// Write one whole frame or nothing.
fn write_frame<S: FrameSink>(sink: &mut S, frame: &[u8]) -> io::Result<()> {
    let start = sink.end()?;
    let written = sink.write_all(frame).and_then(|()| sink.commit());
    if let Err(e) = written {
        if let Err(rollback) = sink.truncate(start) {
            warn!(start, %rollback, "could not truncate torn ledger frame");
        }
        return Err(e);
    }
    Ok(())
}

fn read_ledger(path: &Path) -> io::Result<Vec<ProtoLedgerEntry>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    while let Some(body) = read_frame(&mut reader)? {
        let entry = ProtoLedgerEntry::decode(body.as_slice())
            .map_err(|e| invalid_data(format!("undecodable ledger frame: {}", e)))?;
        entries.push(entry);
    }
    Ok(entries)
}

#[derive(Debug)]
pub struct ActivityLedger {
    path: PathBuf,
    last_sequence: u64,
}

impl ActivityLedger {
    /// Open the ledger at `path`, creating parent directories. An
    /// existing file is read through once to find its last sequence, so
    /// a corrupt ledger is refused here.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let last_sequence = if path.exists() {
            read_ledger(path)?.last().map_or(0, |e| e.sequence)
        } else {
            0
        };
        debug!(?path, last_sequence, "ledger opened");

        Ok(Self {
            path: path.to_path_buf(),
            last_sequence,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Sequence number the next `append` must carry.
    pub fn next_sequence(&self) -> u64 {
        self.last_sequence + 1
    }

    pub fn append(&mut self, entry: &ProtoLedgerEntry) -> io::Result<()> {
        if entry.sequence != self.next_sequence() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "ledger sequence gap: expected {}, got {}",
                    self.next_sequence(),
                    entry.sequence
                ),
            ));
        }

        let body = entry.encode_to_vec();
        let mut frame = Vec::with_capacity(4 + body.len());
        frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
        frame.extend_from_slice(&body);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write_frame(&mut file, &frame)?;

        self.last_sequence = entry.sequence;
        Ok(())
    }

    /// Every entry, oldest first. A ledger never written to is empty.
    pub fn read_all(&self) -> io::Result<Vec<ProtoLedgerEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_ledger(&self.path)
    }
}
