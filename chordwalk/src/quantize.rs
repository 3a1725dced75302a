// Temporal quantization: raw note-on events -> symbolic states.
//
// Note-ons that land within a small tick window of each other are heard as
// one simultaneous attack and merge into a single chordal state; anything
// further apart starts a new state. The window is 1% of the file's
// ticks-per-quarter-note, floored, so a coarse-resolution file (tpq < 100)
// only merges exact-tick coincidences.
//
// Tracks are quantized independently and their state sequences concatenated
// in track order; they are not time-merged with each other.

use crate::error::Result;
use crate::graph::State;
use crate::note::NoteCodec;

/// Quantize per-track ordered `(tick, pitch)` note-ons into a state sequence.
///
/// Every track contributes at least one state: the working buffer is flushed
/// at track end even when the track had no events, so an empty track yields
/// one empty state. A pitch with no table name aborts the whole quantization.
pub fn quantize(tracks: &[Vec<(u32, u8)>], tpq: u16, codec: &NoteCodec) -> Result<Vec<State>> {
    let threshold = u32::from(tpq / 100);
    let mut states = Vec::new();

    for track in tracks {
        let mut current: Vec<String> = Vec::new();
        let mut prev_tick: Option<u32> = None;

        for &(tick, pitch) in track {
            let name = codec.to_name(pitch)?.to_owned();
            match prev_tick {
                // Exact coincidence always merges, even when the threshold
                // floors to zero.
                Some(prev) if tick.abs_diff(prev) != 0 && tick.abs_diff(prev) >= threshold => {
                    states.push(State::new(std::mem::take(&mut current)));
                    current.push(name);
                }
                _ => current.push(name),
            }
            prev_tick = Some(tick);
        }

        states.push(State::new(current));
    }

    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> NoteCodec {
        NoteCodec::new()
    }

    #[test]
    fn test_coincident_notes_merge_later_note_splits() {
        // Ticks [0, 0, 200] at tpq=400 (threshold 4): the two notes at tick 0
        // merge into one chordal state, the note at tick 200 stands alone.
        let tracks = vec![vec![(0, 60), (0, 64), (200, 67)]];
        let states = quantize(&tracks, 400, &codec()).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].names(), ["C4", "E4"]);
        assert_eq!(states[1].names(), ["G4"]);
    }

    #[test]
    fn test_near_simultaneous_within_threshold_merges() {
        // tpq=400 gives threshold 4; delta 3 merges, delta 4 does not.
        let tracks = vec![vec![(0, 60), (3, 64), (7, 67)]];
        let states = quantize(&tracks, 400, &codec()).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].names(), ["C4", "E4"]);
        assert_eq!(states[1].names(), ["G4"]);
    }

    #[test]
    fn test_coarse_resolution_merges_only_exact_coincidence() {
        // tpq=50 floors the threshold to 0: same-tick events still merge,
        // but a single tick of separation splits.
        let tracks = vec![vec![(10, 60), (10, 64), (11, 67)]];
        let states = quantize(&tracks, 50, &codec()).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].names(), ["C4", "E4"]);
        assert_eq!(states[1].names(), ["G4"]);
    }

    #[test]
    fn test_empty_track_yields_one_empty_state() {
        let tracks = vec![Vec::new()];
        let states = quantize(&tracks, 480, &codec()).unwrap();
        assert_eq!(states.len(), 1);
        assert!(states[0].is_empty());
    }

    #[test]
    fn test_tracks_quantize_independently() {
        // The second track's first event starts fresh: its tick distance to
        // the first track's last event never splits or merges anything.
        let tracks = vec![vec![(0, 60), (240, 62)], vec![(1, 64)]];
        let states = quantize(&tracks, 400, &codec()).unwrap();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].names(), ["C4"]);
        assert_eq!(states[1].names(), ["D4"]);
        assert_eq!(states[2].names(), ["E4"]);
    }

    #[test]
    fn test_unknown_pitch_is_fatal() {
        // Pitch 0 is below the table floor.
        let tracks = vec![vec![(0, 0)]];
        assert!(quantize(&tracks, 480, &codec()).is_err());
    }
}
