// Chordwalk — Markov-chain note and chord generator.
//
// Learns a first-order Markov model of symbolic musical states (single notes
// or simultaneous note-groups) from example MIDI recordings and generates new
// sequences by a weighted random walk, rendered back into timed MIDI events.
//
// Architecture:
// - note.rs: NoteCodec — bidirectional note-name <-> pitch mapping and
//   chord-symbol <-> pitch-set expansion over fixed tables
// - quantize.rs: temporal quantizer — collapses near-simultaneous note-ons
//   into chordal states using a tick-proximity threshold
// - graph.rs: weighted directed transition graph over states, incremental
//   training, synthetic seeding, and weighted next-state sampling
// - sequence.rs: output sequencer — turns a generated state sequence into
//   timed note-on/note-off events with randomized hold durations
// - midi.rs: MIDI file boundary (read + write) via the `midly` crate
// - error.rs: typed errors for the codec, graph, and file boundary
//
// The generator is deterministic given a seed: all randomness flows through
// a single explicitly seeded `chordwalk_prng::WalkRng` owned by the driver.

pub mod error;
pub mod graph;
pub mod midi;
pub mod note;
pub mod quantize;
pub mod sequence;
