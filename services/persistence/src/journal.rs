//! Append-only event journal with checksums
//!
//! # Binary format (per entry)
//! ```text
//! [body_len: u32]
//! [sequence: u64]
//! [timestamp: i64]
//! [event_type_len: u16][event_type: bytes]
//! [payload_len: u32][payload: bytes]
//! [checksum: u32]  // CRC32C over sequence+timestamp+event_type+payload
//! ```
//!
//! The writer commits batches: all entries of one engine operation are
//! buffered, flushed, and fsynced together, so the journal either carries
//! the whole operation or (after tail truncation on replay) none of it.

use crate::events::MarketEvent;
use crc32c::crc32c;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Journal file name inside the data directory.
pub const JOURNAL_FILE: &str = "market-journal.bin";

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt entry at byte offset {offset}: {detail}")]
    Corrupt { offset: u64, detail: String },
}

/// One persisted event, framed for the journal file.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Journal-monotonic sequence number, assigned by the writer.
    pub sequence: u64,
    /// Event time in Unix nanos.
    pub timestamp: i64,
    /// Event type tag (diagnostics only; the payload is authoritative).
    pub event_type: String,
    /// Bincode-serialized [`MarketEvent`].
    pub payload: Vec<u8>,
    /// CRC32C over (sequence ++ timestamp ++ event_type ++ payload).
    pub checksum: u32,
}

impl JournalEntry {
    /// Build an entry from an event, computing the checksum.
    pub fn from_event(sequence: u64, event: &MarketEvent) -> Result<Self, JournalError> {
        let payload =
            bincode::serialize(event).map_err(|e| JournalError::Serialization(e.to_string()))?;
        let timestamp = event.timestamp();
        let event_type = event.event_type().to_string();
        let checksum = Self::compute_checksum(sequence, timestamp, &event_type, &payload);
        Ok(Self {
            sequence,
            timestamp,
            event_type,
            payload,
            checksum,
        })
    }

    /// Decode the payload back into an event.
    pub fn event(&self) -> Result<MarketEvent, JournalError> {
        bincode::deserialize(&self.payload)
            .map_err(|e| JournalError::Serialization(e.to_string()))
    }

    pub fn compute_checksum(
        sequence: u64,
        timestamp: i64,
        event_type: &str,
        payload: &[u8],
    ) -> u32 {
        let mut buf = Vec::with_capacity(16 + event_type.len() + payload.len());
        buf.extend_from_slice(&sequence.to_le_bytes());
        buf.extend_from_slice(&timestamp.to_le_bytes());
        buf.extend_from_slice(event_type.as_bytes());
        buf.extend_from_slice(payload);
        crc32c(&buf)
    }

    /// Validate the stored checksum against the recomputed value.
    pub fn verify_checksum(&self) -> bool {
        self.checksum
            == Self::compute_checksum(self.sequence, self.timestamp, &self.event_type, &self.payload)
    }

    /// Serialize to the framed wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let event_type = self.event_type.as_bytes();
        let body_len: u32 =
            8 + 8 + 2 + event_type.len() as u32 + 4 + self.payload.len() as u32 + 4;

        let mut buf = Vec::with_capacity(4 + body_len as usize);
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&(event_type.len() as u16).to_le_bytes());
        buf.extend_from_slice(event_type);
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize one entry starting at `data[0]`.
    ///
    /// Returns `(entry, bytes_consumed)`. Truncated or implausible data
    /// yields `Corrupt` rather than a panic; `offset` is relative to the
    /// start of `data` and re-based by the caller.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), JournalError> {
        // Minimum body: 8 (seq) + 8 (ts) + 2 (tag len) + 4 (payload len) + 4 (crc)
        const MIN_BODY: usize = 26;

        let corrupt = |detail: &str| JournalError::Corrupt {
            offset: 0,
            detail: detail.to_string(),
        };

        if data.len() < 4 {
            return Err(corrupt("truncated length prefix"));
        }
        let body_len = u32::from_le_bytes(data[..4].try_into().unwrap()) as usize;
        if !(MIN_BODY..=16_000_000).contains(&body_len) {
            return Err(corrupt(&format!("implausible body length {}", body_len)));
        }
        if data.len() < 4 + body_len {
            return Err(corrupt("truncated entry body"));
        }

        let body = &data[4..4 + body_len];
        let sequence = u64::from_le_bytes(body[0..8].try_into().unwrap());
        let timestamp = i64::from_le_bytes(body[8..16].try_into().unwrap());
        let event_type_len = u16::from_le_bytes(body[16..18].try_into().unwrap()) as usize;

        let mut pos = 18;
        if pos + event_type_len + 4 > body.len() {
            return Err(corrupt("event type overruns body"));
        }
        let event_type = std::str::from_utf8(&body[pos..pos + event_type_len])
            .map_err(|_| corrupt("event type is not UTF-8"))?
            .to_string();
        pos += event_type_len;

        let payload_len = u32::from_le_bytes(body[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;
        if pos + payload_len + 4 != body.len() {
            return Err(corrupt("payload length disagrees with body length"));
        }
        let payload = body[pos..pos + payload_len].to_vec();
        pos += payload_len;

        let checksum = u32::from_le_bytes(body[pos..pos + 4].try_into().unwrap());

        Ok((
            Self {
                sequence,
                timestamp,
                event_type,
                payload,
                checksum,
            },
            4 + body_len,
        ))
    }
}

/// Append-only journal writer.
///
/// Sequences are writer-assigned and gapless within one journal.
pub struct Journal {
    writer: BufWriter<File>,
    path: PathBuf,
    next_sequence: u64,
}

impl Journal {
    /// Open (or create) the journal in `dir`, appending after any
    /// existing entries. `next_sequence` should come from recovery when
    /// the directory is not fresh.
    pub fn open(dir: &Path, next_sequence: u64) -> Result<Self, JournalError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(JOURNAL_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            next_sequence,
        })
    }

    /// Next sequence number the writer will assign.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit a batch of events durably: buffer every entry, then flush
    /// and fsync once. On error nothing is considered committed; the
    /// reader discards a torn tail via checksums.
    pub fn commit(&mut self, events: &[MarketEvent]) -> Result<(), JournalError> {
        let start_sequence = self.next_sequence;
        for (i, event) in events.iter().enumerate() {
            let entry = JournalEntry::from_event(start_sequence + i as u64, event)?;
            self.writer.write_all(&entry.to_bytes())?;
        }
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        self.next_sequence = start_sequence + events.len() as u64;
        Ok(())
    }
}
