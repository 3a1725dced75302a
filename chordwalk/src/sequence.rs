// Output sequencing: generated states -> timed note events.
//
// A virtual clock starts at 0. Each state sounds all of its names at once
// (note-ons at the clock), holds for a random duration drawn from the shared
// generator, releases (note-offs at the new clock), then leaves a fixed gap
// before the next state. MIDI serialization of the resulting event list lives
// in midi.rs.

use crate::error::Result;
use crate::graph::State;
use crate::note::NoteCodec;
use chordwalk_prng::WalkRng;

/// Fixed velocity for every emitted note-on and note-off.
pub const VELOCITY: u8 = 64;

/// Hold duration bounds in ticks, inclusive.
const HOLD_MIN: u32 = 60;
const HOLD_MAX: u32 = 180;

/// Fixed inter-state gap in ticks.
const GAP: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// A note event at an absolute tick on the virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub tick: u32,
    pub kind: EventKind,
    pub pitch: u8,
}

/// Render a state sequence into an ordered timed event list.
///
/// Fails if any generated state carries a name the codec does not know.
pub fn sequence(states: &[State], codec: &NoteCodec, rng: &mut WalkRng) -> Result<Vec<TimedEvent>> {
    let mut events = Vec::new();
    let mut clock: u32 = 0;

    for state in states {
        let mut pitches = Vec::with_capacity(state.names().len());
        for name in state.names() {
            pitches.push(codec.to_pitch(name)?);
        }

        for &pitch in &pitches {
            events.push(TimedEvent {
                tick: clock,
                kind: EventKind::NoteOn,
                pitch,
            });
        }

        clock += rng.range_u32_inclusive(HOLD_MIN, HOLD_MAX);

        for &pitch in &pitches {
            events.push(TimedEvent {
                tick: clock,
                kind: EventKind::NoteOff,
                pitch,
            });
        }

        clock += GAP;
    }

    Ok(events)
}
