// The weighted transition graph: the Markov model itself.
//
// Vertices are states (ordered note-name sequences), edges are directed
// transitions carrying an integer weight >= 1. States are stored in an arena
// indexed by a structural-equality map, so vertex handles stay valid as the
// graph grows; adjacency is a list of (target index, weight) per vertex.
//
// The graph is append-only for the lifetime of the instance: training and
// synthetic seeding add vertices and edges, sampling only reads. There is no
// deletion, decay, or eviction, and no internal locking — callers sharing an
// instance across threads must serialize access themselves.

use crate::error::{Error, Result};
use crate::note::{CHORD_QUALITIES, NoteCodec};
use chordwalk_prng::WalkRng;
use std::collections::HashMap;
use std::fmt;

/// A Markov vertex identity: an ordered sequence of note names representing
/// pitches sounding together. Equality is element-wise and ordered — the same
/// names in a different order are a different state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State(Vec<String>);

impl State {
    pub fn new(names: Vec<String>) -> Self {
        State(names)
    }

    /// The empty state: emitted by the sampler to signal "no continuation"
    /// and by the quantizer for event-less tracks.
    pub fn empty() -> Self {
        State(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Number of synthetic states generated when seeding an untrained graph.
const SYNTHETIC_STATES: usize = 100;

/// Pitch range for synthetic notes and chord roots, inclusive. Matches the
/// span of the note table that also has chord entries underneath it.
const SYNTHETIC_PITCH_MIN: u8 = 12;
const SYNTHETIC_PITCH_MAX: u8 = 119;

/// Weighted directed transition graph over states.
pub struct TransitionGraph {
    /// Vertex payloads in insertion order.
    states: Vec<State>,
    /// Structural key -> arena index.
    index: HashMap<State, usize>,
    /// Per-vertex adjacency: (target index, weight). At most one entry per
    /// ordered (from, to) pair.
    edges: Vec<Vec<(usize, u64)>>,
}

impl TransitionGraph {
    pub fn new() -> Self {
        TransitionGraph {
            states: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Insert a state vertex if it is not already present. Idempotent:
    /// inserting a structurally equal state returns the existing index.
    pub fn add_state(&mut self, state: State) -> usize {
        if let Some(&i) = self.index.get(&state) {
            return i;
        }
        let i = self.states.len();
        self.index.insert(state.clone(), i);
        self.states.push(state);
        self.edges.push(Vec::new());
        i
    }

    /// Add a transition between two existing vertices. If the edge already
    /// exists its weight is incremented by exactly 1 and the supplied weight
    /// is ignored; otherwise the edge is created with the supplied weight.
    pub fn add_transition(&mut self, from: usize, to: usize, weight: u64) {
        let out = &mut self.edges[from];
        if let Some(entry) = out.iter_mut().find(|(target, _)| *target == to) {
            entry.1 += 1;
        } else {
            out.push((to, weight));
        }
    }

    /// Train on an ordered state sequence: every consecutive pair becomes a
    /// +1 transition. Sequences of length <= 1 contribute nothing. Repeated
    /// calls accumulate into the same graph.
    pub fn train(&mut self, states: &[State]) {
        for pair in states.windows(2) {
            let from = self.add_state(pair[0].clone());
            let to = self.add_state(pair[1].clone());
            self.add_transition(from, to, 1);
        }
    }

    /// Seed the graph with synthetic material when no training input exists:
    /// 100 random states (coin flip between a single random note and a random
    /// chord expanded to its note names), 100^2/2 random transitions with
    /// uniform weights in [1, 100], then one linear retraining pass over the
    /// generated list so chain edges get +1 reinforcement on top of the
    /// random weights.
    pub fn seed_random(&mut self, codec: &NoteCodec, rng: &mut WalkRng) -> Result<()> {
        let mut generated = Vec::with_capacity(SYNTHETIC_STATES);
        for _ in 0..SYNTHETIC_STATES {
            let state = if rng.coin_flip() {
                let pitch = rng.range_u8_inclusive(SYNTHETIC_PITCH_MIN, SYNTHETIC_PITCH_MAX);
                State::new(vec![codec.to_name(pitch)?.to_owned()])
            } else {
                let root = rng.range_u8_inclusive(SYNTHETIC_PITCH_MIN, SYNTHETIC_PITCH_MAX);
                let quality = CHORD_QUALITIES[rng.range_usize(0, CHORD_QUALITIES.len())];
                let chord = format!("{}{}", codec.to_name(root)?, quality);
                let names = codec
                    .chord_to_pitches(&chord)?
                    .iter()
                    .map(|&p| codec.to_name(p).map(str::to_owned))
                    .collect::<Result<Vec<String>>>()?;
                State::new(names)
            };
            generated.push(state);
        }

        for state in &generated {
            self.add_state(state.clone());
        }

        let num_transitions = SYNTHETIC_STATES * SYNTHETIC_STATES / 2;
        for _ in 0..num_transitions {
            let from = generated[rng.range_usize(0, SYNTHETIC_STATES)].clone();
            let to = generated[rng.range_usize(0, SYNTHETIC_STATES)].clone();
            let weight = rng.range_u64_inclusive(1, SYNTHETIC_STATES as u64);
            let from = self.add_state(from);
            let to = self.add_state(to);
            self.add_transition(from, to, weight);
        }

        self.train(&generated);
        Ok(())
    }

    /// Sample the next state from a vertex's outgoing edges, with probability
    /// proportional to edge weight. Returns the empty state when the vertex
    /// has no outgoing edges (terminal); fails on an empty or unknown state.
    pub fn next_state(&self, state: &State, rng: &mut WalkRng) -> Result<State> {
        if state.is_empty() {
            return Err(Error::InvalidState("(empty)".to_owned()));
        }
        let Some(&from) = self.index.get(state) else {
            return Err(Error::InvalidState(state.to_string()));
        };

        let out = &self.edges[from];
        if out.is_empty() {
            return Ok(State::empty());
        }

        let total: u64 = out.iter().map(|&(_, w)| w).sum();
        let draw = rng.range_u64(0, total);
        let mut cumulative = 0;
        for &(target, weight) in out {
            cumulative += weight;
            if draw < cumulative {
                return Ok(self.states[target].clone());
            }
        }
        // Unreachable since draw < total; keep the last target as fallback.
        Ok(self.states[out[out.len() - 1].0].clone())
    }

    /// Walk the graph from a starting state, recording `count` states
    /// (the start included). An empty continuation mid-walk halts the whole
    /// walk with an error — no substitution, no retry.
    pub fn walk(&self, start: &State, count: usize, rng: &mut WalkRng) -> Result<Vec<State>> {
        let mut sequence = Vec::with_capacity(count);
        let mut current = start.clone();
        for _ in 0..count {
            if current.is_empty() {
                return Err(Error::InvalidState("(empty)".to_owned()));
            }
            let next = self.next_state(&current, rng)?;
            sequence.push(std::mem::replace(&mut current, next));
        }
        Ok(sequence)
    }

    pub fn vertex_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Stored weight of the (from, to) edge, if it exists.
    pub fn edge_weight(&self, from: &State, to: &State) -> Option<u64> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        self.edges[from]
            .iter()
            .find(|&&(target, _)| target == to)
            .map(|&(_, w)| w)
    }

    pub fn contains(&self, state: &State) -> bool {
        self.index.contains_key(state)
    }

    /// All vertex states in insertion order.
    pub fn states(&self) -> &[State] {
        &self.states
    }
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::new()
    }
}
