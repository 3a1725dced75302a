// Error types for the codec, graph, and MIDI file boundary.
//
// Codec and sampler failures surface typed to the immediate caller; the
// driver propagates everything up to `main`, which decides whether to abort.
// There is no skip-and-continue or partial-result recovery anywhere.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A note name is empty or absent from the note table.
    #[error("invalid note name: {0:?}")]
    InvalidName(String),

    /// No note name exists for this pitch in the table.
    #[error("no note name for pitch {0}")]
    InvalidPitch(u8),

    /// A chord symbol is empty or unknown, or a pitch set matches no chord.
    #[error("invalid chord: {0}")]
    InvalidChord(String),

    /// The sampler was asked to continue from an empty or unknown state.
    #[error("unknown or empty state: {0:?}")]
    InvalidState(String),

    /// A MIDI file could not be read or parsed.
    #[error("could not read MIDI file {path}: {message}")]
    Read { path: String, message: String },

    /// A MIDI file could not be written.
    #[error("could not write MIDI file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
