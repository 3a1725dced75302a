// Note and chord tables: the symbolic vocabulary of the model.
//
// Pitches are MIDI numbers bound to names like "C4" or "F#3". Enharmonic
// spellings alias the same pitch ("C#0" and "Db0" are both 13); the reverse
// direction always returns the first entry in table order, so pitch-to-name
// is deterministic and single-valued (sharps win over flats).
//
// Chord symbols are root + octave + quality ("C4maj7") and expand to an
// ordered pitch list via fixed per-quality semitone offsets. Both tables are
// built once in `NoteCodec::new()` and never mutated: the note table covers
// octaves 0-9 (170 names), the chord table every root x octave 0-8 x quality
// combination (2142 entries).

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Octave-0 note names in canonical scan order, with their MIDI pitches.
/// Sharp spellings precede their flat aliases so reverse lookup picks sharps.
const BASE_NOTES: &[(&str, u8)] = &[
    ("C0", 12),
    ("C#0", 13),
    ("Db0", 13),
    ("D0", 14),
    ("D#0", 15),
    ("Eb0", 15),
    ("E0", 16),
    ("F0", 17),
    ("F#0", 18),
    ("Gb0", 18),
    ("G0", 19),
    ("G#0", 20),
    ("Ab0", 20),
    ("A0", 21),
    ("A#0", 22),
    ("Bb0", 22),
    ("B0", 23),
];

/// Root letters (with accidentals) used to build the chord table.
const ROOTS: &[&str] = &[
    "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb", "B",
];

/// The fourteen supported chord qualities.
pub const CHORD_QUALITIES: &[&str] = &[
    "maj", "min", "dim", "aug", "sus2", "sus4", "maj7", "min7", "dom7", "dim7", "halfdim7",
    "minmaj7", "augmaj7", "aug7",
];

/// Semitone offsets from the root for each chord quality, root included.
fn quality_offsets(quality: &str) -> Option<&'static [u8]> {
    match quality {
        "maj" => Some(&[0, 4, 7]),
        "min" => Some(&[0, 3, 7]),
        "dim" => Some(&[0, 3, 6]),
        "aug" => Some(&[0, 4, 8]),
        "sus2" => Some(&[0, 2, 7]),
        "sus4" => Some(&[0, 5, 7]),
        "maj7" => Some(&[0, 4, 7, 11]),
        "min7" => Some(&[0, 3, 7, 10]),
        "dom7" => Some(&[0, 4, 7, 10]),
        "dim7" => Some(&[0, 3, 6, 9]),
        "halfdim7" => Some(&[0, 3, 6, 10]),
        "minmaj7" => Some(&[0, 3, 7, 11]),
        "augmaj7" => Some(&[0, 4, 8, 11]),
        "aug7" => Some(&[0, 4, 8, 10]),
        _ => None,
    }
}

/// Bidirectional note-name <-> pitch codec with chord expansion.
pub struct NoteCodec {
    /// All note names in canonical scan order (reverse lookup is first-match).
    names: Vec<(String, u8)>,
    name_to_pitch: HashMap<String, u8>,
    /// All chord entries in construction order (reverse lookup is first-match).
    chords: Vec<(String, Vec<u8>)>,
    chord_index: HashMap<String, usize>,
}

impl NoteCodec {
    pub fn new() -> Self {
        // Note table: octave 0 replicated across octaves 1-9 by +12 per octave.
        let mut names: Vec<(String, u8)> = Vec::with_capacity(BASE_NOTES.len() * 10);
        for octave in 0u8..=9 {
            for &(base, pitch) in BASE_NOTES {
                let name = format!("{}{}", &base[..base.len() - 1], octave);
                names.push((name, pitch + octave * 12));
            }
        }
        let name_to_pitch: HashMap<String, u8> =
            names.iter().map(|(n, p)| (n.clone(), *p)).collect();

        // Chord table: every root x octave 0-8 x quality.
        let mut chords: Vec<(String, Vec<u8>)> =
            Vec::with_capacity(ROOTS.len() * 9 * CHORD_QUALITIES.len());
        let mut chord_index = HashMap::new();
        for octave in 0u8..=8 {
            for &root in ROOTS {
                let root_pitch = name_to_pitch[&format!("{root}{octave}")];
                for &quality in CHORD_QUALITIES {
                    let offsets = quality_offsets(quality)
                        .unwrap_or_else(|| unreachable!("quality table covers all qualities"));
                    let pitches: Vec<u8> = offsets.iter().map(|&o| root_pitch + o).collect();
                    let name = format!("{root}{octave}{quality}");
                    chord_index.insert(name.clone(), chords.len());
                    chords.push((name, pitches));
                }
            }
        }

        NoteCodec {
            names,
            name_to_pitch,
            chords,
            chord_index,
        }
    }

    /// Resolve a note name to its MIDI pitch.
    pub fn to_pitch(&self, name: &str) -> Result<u8> {
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_owned()));
        }
        self.name_to_pitch
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidName(name.to_owned()))
    }

    /// Resolve a pitch to its canonical note name (first table entry wins).
    pub fn to_name(&self, pitch: u8) -> Result<&str> {
        self.names
            .iter()
            .find(|&&(_, p)| p == pitch)
            .map(|(n, _)| n.as_str())
            .ok_or(Error::InvalidPitch(pitch))
    }

    /// Expand a chord symbol like "C4maj7" to its ordered pitch list.
    pub fn chord_to_pitches(&self, chord: &str) -> Result<&[u8]> {
        if chord.is_empty() {
            return Err(Error::InvalidChord(chord.to_owned()));
        }
        self.chord_index
            .get(chord)
            .map(|&i| self.chords[i].1.as_slice())
            .ok_or_else(|| Error::InvalidChord(chord.to_owned()))
    }

    /// Reverse lookup: name a pitch set. A single pitch resolves as a note;
    /// multiple pitches must exactly match a chord-table entry in order —
    /// no harmonic inference.
    pub fn pitches_to_chord(&self, pitches: &[u8]) -> Result<String> {
        match pitches {
            [] => Err(Error::InvalidChord("empty pitch set".to_owned())),
            [pitch] => self.to_name(*pitch).map(str::to_owned),
            _ => self
                .chords
                .iter()
                .find(|(_, p)| p == pitches)
                .map(|(name, _)| name.clone())
                .ok_or_else(|| Error::InvalidChord(format!("no chord matches {pitches:?}"))),
        }
    }
}

impl Default for NoteCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        let codec = NoteCodec::new();
        assert_eq!(codec.names.len(), 170); // 17 spellings x 10 octaves
        assert_eq!(codec.chords.len(), 2142); // 17 roots x 9 octaves x 14 qualities
    }

    #[test]
    fn test_to_pitch_basics() {
        let codec = NoteCodec::new();
        assert_eq!(codec.to_pitch("C0").unwrap(), 12);
        assert_eq!(codec.to_pitch("C4").unwrap(), 60);
        assert_eq!(codec.to_pitch("A4").unwrap(), 69);
        assert_eq!(codec.to_pitch("B9").unwrap(), 131);
    }

    #[test]
    fn test_enharmonic_aliases_share_a_pitch() {
        let codec = NoteCodec::new();
        assert_eq!(codec.to_pitch("C#0").unwrap(), 13);
        assert_eq!(codec.to_pitch("Db0").unwrap(), 13);
        // Reverse lookup is single-valued: sharps are canonical.
        assert_eq!(codec.to_name(13).unwrap(), "C#0");
        assert_eq!(codec.to_name(22).unwrap(), "A#0");
    }

    #[test]
    fn test_pitch_roundtrip_is_stable_for_all_names() {
        let codec = NoteCodec::new();
        for (name, _) in &codec.names {
            let pitch = codec.to_pitch(name).unwrap();
            let canonical = codec.to_name(pitch).unwrap();
            assert_eq!(codec.to_pitch(canonical).unwrap(), pitch, "name {name}");
        }
    }

    #[test]
    fn test_invalid_name_and_pitch() {
        let codec = NoteCodec::new();
        assert!(matches!(codec.to_pitch(""), Err(Error::InvalidName(_))));
        assert!(matches!(codec.to_pitch("H4"), Err(Error::InvalidName(_))));
        // Pitches below the table floor have no name.
        assert!(matches!(codec.to_name(0), Err(Error::InvalidPitch(0))));
    }

    #[test]
    fn test_chord_expansion() {
        let codec = NoteCodec::new();
        assert_eq!(codec.chord_to_pitches("C4maj").unwrap(), &[60, 64, 67]);
        assert_eq!(codec.chord_to_pitches("C4maj7").unwrap(), &[60, 64, 67, 71]);
        assert_eq!(codec.chord_to_pitches("A4min7").unwrap(), &[69, 72, 76, 79]);
        assert_eq!(codec.chord_to_pitches("D3dim7").unwrap(), &[50, 53, 56, 59]);
    }

    #[test]
    fn test_invalid_chord() {
        let codec = NoteCodec::new();
        assert!(matches!(codec.chord_to_pitches(""), Err(Error::InvalidChord(_))));
        assert!(matches!(
            codec.chord_to_pitches("C4weird"),
            Err(Error::InvalidChord(_))
        ));
        // Chord table stops at octave 8.
        assert!(matches!(
            codec.chord_to_pitches("C9maj"),
            Err(Error::InvalidChord(_))
        ));
    }

    #[test]
    fn test_pitches_to_chord() {
        let codec = NoteCodec::new();
        // Single pitch delegates to note lookup.
        assert_eq!(codec.pitches_to_chord(&[60]).unwrap(), "C4");
        // Exact ordered match against the chord table.
        assert_eq!(codec.pitches_to_chord(&[60, 64, 67, 71]).unwrap(), "C4maj7");
        // No inference: a scrambled or unknown set fails.
        assert!(matches!(
            codec.pitches_to_chord(&[64, 60, 67]),
            Err(Error::InvalidChord(_))
        ));
        assert!(matches!(
            codec.pitches_to_chord(&[]),
            Err(Error::InvalidChord(_))
        ));
    }

    #[test]
    fn test_enharmonic_chords_resolve_to_first_entry() {
        let codec = NoteCodec::new();
        // C#4maj and Db4maj expand identically; reverse lookup returns the
        // entry that comes first in construction order (C# precedes Db).
        let sharp = codec.chord_to_pitches("C#4maj").unwrap().to_vec();
        let flat = codec.chord_to_pitches("Db4maj").unwrap().to_vec();
        assert_eq!(sharp, flat);
        assert_eq!(codec.pitches_to_chord(&sharp).unwrap(), "C#4maj");
    }
}
