// MIDI file boundary: reading training input, writing generated output.
//
// Uses the `midly` crate for both directions. Reading extracts per-track
// absolute-tick note-ons plus the file's ticks-per-quarter-note and hands
// them to the quantizer. Writing emits SMF Format 1 at a fixed 400 ticks per
// quarter note with one track per event — each track holds a single event at
// its absolute tick — matching the output shape downstream tooling expects.

use crate::error::{Error, Result};
use crate::graph::State;
use crate::note::NoteCodec;
use crate::quantize::quantize;
use crate::sequence::{EventKind, TimedEvent, VELOCITY};
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};
use std::path::Path;

/// Ticks per quarter note in generated output files.
const OUTPUT_TICKS_PER_QUARTER: u16 = 400;

/// Read a MIDI file and quantize it into a state sequence.
///
/// Only metrical (ticks-per-quarter-note) timing is supported; SMPTE files
/// are rejected. A note-on with velocity 0 counts as a note-off and is
/// ignored, like any other non-note-on event.
pub fn read_midi_file(path: &Path, codec: &NoteCodec) -> Result<Vec<State>> {
    let read_err = |message: String| Error::Read {
        path: path.display().to_string(),
        message,
    };

    let bytes = std::fs::read(path).map_err(|e| read_err(e.to_string()))?;
    let smf = Smf::parse(&bytes).map_err(|e| read_err(e.to_string()))?;

    let tpq = match smf.header.timing {
        Timing::Metrical(t) => t.as_int(),
        Timing::Timecode(..) => return Err(read_err("SMPTE timing is not supported".to_owned())),
    };

    let tracks = collect_note_ons(&smf);
    quantize(&tracks, tpq, codec)
}

/// Extract per-track `(absolute tick, pitch)` note-ons from a parsed file.
fn collect_note_ons(smf: &Smf) -> Vec<Vec<(u32, u8)>> {
    let mut tracks = Vec::with_capacity(smf.tracks.len());
    for track in &smf.tracks {
        let mut notes = Vec::new();
        let mut tick: u32 = 0;
        for event in track {
            tick += event.delta.as_int();
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() > 0 {
                    notes.push((tick, key.as_int()));
                }
            }
        }
        tracks.push(notes);
    }
    tracks
}

/// Serialize a timed event list into an in-memory SMF, one track per event.
pub fn events_to_smf(events: &[TimedEvent]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(OUTPUT_TICKS_PER_QUARTER)),
    ));

    for event in events {
        // The note table's top octave extends past the MIDI range; clamp so
        // every emitted key byte stays valid.
        let key = u7::new(event.pitch.min(127));
        let message = match event.kind {
            EventKind::NoteOn => MidiMessage::NoteOn {
                key,
                vel: u7::new(VELOCITY),
            },
            EventKind::NoteOff => MidiMessage::NoteOff {
                key,
                vel: u7::new(VELOCITY),
            },
        };

        let mut track: Track<'static> = Vec::new();
        track.push(TrackEvent {
            delta: u28::new(event.tick),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
    }

    smf
}

/// Write a timed event list to a MIDI file.
pub fn write_midi_file(path: &Path, events: &[TimedEvent]) -> Result<()> {
    let smf = events_to_smf(events);
    let mut buf = Vec::new();
    smf.write_std(&mut buf).map_err(|e| Error::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, &buf).map_err(|e| Error::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_to_smf_one_track_per_event() {
        let events = [
            TimedEvent {
                tick: 0,
                kind: EventKind::NoteOn,
                pitch: 60,
            },
            TimedEvent {
                tick: 100,
                kind: EventKind::NoteOff,
                pitch: 60,
            },
        ];
        let smf = events_to_smf(&events);
        assert_eq!(smf.tracks.len(), 2);
        // Each track: the event at its absolute tick, then end-of-track.
        assert_eq!(smf.tracks[0].len(), 2);
        assert_eq!(smf.tracks[1][0].delta.as_int(), 100);
    }

    #[test]
    fn test_write_then_parse_roundtrip_in_memory() {
        let events = [
            TimedEvent {
                tick: 0,
                kind: EventKind::NoteOn,
                pitch: 60,
            },
            TimedEvent {
                tick: 0,
                kind: EventKind::NoteOn,
                pitch: 64,
            },
            TimedEvent {
                tick: 90,
                kind: EventKind::NoteOff,
                pitch: 60,
            },
            TimedEvent {
                tick: 90,
                kind: EventKind::NoteOff,
                pitch: 64,
            },
        ];
        let smf = events_to_smf(&events);
        let mut buf = Vec::new();
        smf.write(&mut buf).unwrap();

        let parsed = Smf::parse(&buf).unwrap();
        assert_eq!(parsed.tracks.len(), 4);
        match parsed.header.timing {
            Timing::Metrical(t) => assert_eq!(t.as_int(), 400),
            Timing::Timecode(..) => panic!("expected metrical timing"),
        }

        // The two note-ons survive; note-offs and velocity-0 events do not
        // count as note-ons.
        let tracks = collect_note_ons(&parsed);
        let ons: Vec<(u32, u8)> = tracks.into_iter().flatten().collect();
        assert_eq!(ons, vec![(0, 60), (0, 64)]);
    }

    #[test]
    fn test_collect_note_ons_accumulates_deltas() {
        // Build a single track with two note-ons 10 and 30 ticks in.
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        let mut track: Track<'static> = Vec::new();
        for (delta, pitch) in [(10u32, 60u8), (20, 64)] {
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi {
                    channel: u4::new(0),
                    message: MidiMessage::NoteOn {
                        key: u7::new(pitch),
                        vel: u7::new(80),
                    },
                },
            });
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);

        let tracks = collect_note_ons(&smf);
        assert_eq!(tracks, vec![vec![(10, 60), (30, 64)]]);
    }
}
