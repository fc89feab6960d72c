//! Voice and voice allocation for polyphonic synthesis.
//!
//! A [`Voice`] is one note's worth of synthesis state: two quantum
//! oscillators, a noise source, a state variable filter, and amplitude and
//! filter envelopes. The [`VoiceAllocator`] owns a fixed pool of voices and
//! maps note events onto them with oldest-voice stealing.

use crate::envelope::AdsrEnvelope;
use crate::osc::noise::NoiseGen;
use crate::osc::quantum::QuantumOsc;
use intervo_core::{Effect, StateVariableFilter};

/// Convert MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::powf(2.0, (f32::from(note) - 69.0) / 12.0)
}

/// A single synthesizer voice.
///
/// Per sample the voice mixes its sources, runs the mix through the filter
/// (cutoff modulated by the filter envelope), and scales by the amplitude
/// envelope and note velocity.
///
/// # Example
///
/// ```rust
/// use intervo_synth::Voice;
///
/// let mut voice = Voice::new(48000.0);
/// voice.note_on(60, 0.8);
///
/// for _ in 0..1000 {
///     let sample = voice.process();
/// }
///
/// voice.note_off();
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    /// Primary oscillator
    pub osc1: QuantumOsc,
    /// Secondary oscillator
    pub osc2: QuantumOsc,
    /// Noise source
    pub noise: NoiseGen,
    /// Voice filter
    pub filter: StateVariableFilter,
    /// Amplitude envelope
    pub amp_env: AdsrEnvelope,
    /// Filter cutoff envelope
    pub filter_env: AdsrEnvelope,

    note: u8,
    velocity: f32,
    /// Note-on is being held
    gate: bool,
    /// Voice is producing sound (through release)
    active: bool,
    /// Blocks survived while active; stealing picks the greatest
    age: u64,

    osc1_level: f32,
    osc2_level: f32,
    noise_level: f32,
    /// Cutoff modulation depth in Hz at full envelope
    filter_env_amount: f32,
    /// Base cutoff before modulation
    filter_cutoff: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Voice {
    /// Create a voice at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            osc1: QuantumOsc::new(sample_rate),
            osc2: QuantumOsc::new(sample_rate),
            noise: NoiseGen::new(sample_rate),
            filter: StateVariableFilter::new(sample_rate),
            amp_env: AdsrEnvelope::new(sample_rate),
            filter_env: AdsrEnvelope::new(sample_rate),
            note: 0,
            velocity: 0.0,
            gate: false,
            active: false,
            age: 0,
            osc1_level: 1.0,
            osc2_level: 0.0,
            noise_level: 0.0,
            filter_env_amount: 0.0,
            filter_cutoff: 8000.0,
        };
        voice.filter.set_cutoff(8000.0);
        voice
    }

    /// Set sample rate for all components.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc1.set_sample_rate(sample_rate);
        self.osc2.set_sample_rate(sample_rate);
        self.noise.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
        self.amp_env.set_sample_rate(sample_rate);
        self.filter_env.set_sample_rate(sample_rate);
    }

    /// Trigger note on. Velocity is normalized to [0, 1].
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        self.note = note;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.gate = true;
        self.active = true;
        self.age = 0;

        let freq = midi_to_freq(note);
        self.osc1.set_frequency(freq);
        self.osc2.set_frequency(freq);
        self.osc1.reset();
        self.osc2.reset();
        self.amp_env.gate_on();
        self.filter_env.gate_on();
    }

    /// Retrigger the current note without resetting oscillator phase.
    ///
    /// Used when the same pitch arrives while the gate is already held.
    pub fn retrigger(&mut self, velocity: f32) {
        self.velocity = velocity.clamp(0.0, 1.0);
        self.gate = true;
        self.active = true;
        self.age = 0;
        self.amp_env.gate_on();
        self.filter_env.gate_on();
    }

    /// Trigger note off. The voice keeps sounding through the release.
    pub fn note_off(&mut self) {
        self.gate = false;
        self.amp_env.gate_off();
        self.filter_env.gate_off();
    }

    /// Stop the voice immediately.
    pub fn kill(&mut self) {
        self.gate = false;
        self.active = false;
        self.amp_env.reset();
        self.filter_env.reset();
    }

    /// Reset the voice to its initial state.
    pub fn reset(&mut self) {
        self.kill();
        self.note = 0;
        self.velocity = 0.0;
        self.age = 0;
        self.osc1.reset();
        self.osc2.reset();
        self.noise.reset();
        self.filter.reset();
    }

    /// Whether the voice is producing sound.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the note-on is still held.
    pub fn gate(&self) -> bool {
        self.gate
    }

    /// Current note number.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Current normalized velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Voice age in blocks.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Increment the age counter. Called once per block while active.
    pub fn tick_age(&mut self) {
        if self.active {
            self.age += 1;
        }
    }

    /// Set the three source mix levels.
    pub fn set_mix(&mut self, osc1: f32, osc2: f32, noise: f32) {
        self.osc1_level = osc1.clamp(0.0, 1.0);
        self.osc2_level = osc2.clamp(0.0, 1.0);
        self.noise_level = noise.clamp(0.0, 1.0);
    }

    /// Set the base filter cutoff in Hz.
    pub fn set_filter_cutoff(&mut self, freq: f32) {
        self.filter_cutoff = freq.clamp(20.0, 20000.0);
    }

    /// Set the filter envelope modulation depth in Hz.
    pub fn set_filter_env_amount(&mut self, amount: f32) {
        self.filter_env_amount = amount.clamp(-10000.0, 10000.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let raw = self.osc1_level * self.osc1.process()
            + self.osc2_level * self.osc2.process()
            + self.noise_level * self.noise.process();

        let filter_env = self.filter_env.advance();
        let cutoff = (self.filter_cutoff + filter_env * self.filter_env_amount)
            .clamp(20.0, 20000.0);
        self.filter.set_cutoff(cutoff);
        let filtered = self.filter.process(raw);

        let amp = self.amp_env.advance();
        if !self.amp_env.is_active() {
            self.active = false;
            self.gate = false;
        }

        filtered * amp * self.velocity
    }
}

/// Fixed-pool voice allocator with oldest-voice stealing.
///
/// Note-ons claim a free voice when one exists; otherwise the voice with
/// the greatest age (the one sounding longest) is stolen. A note-on for a
/// pitch that is already gated retriggers that voice, so at most one voice
/// per pitch ever holds an open gate.
///
/// # Example
///
/// ```rust
/// use intervo_synth::VoiceAllocator;
///
/// let mut voices: VoiceAllocator<16> = VoiceAllocator::new(48000.0);
/// voices.note_on(60, 0.8);
/// voices.note_on(64, 0.8);
///
/// let mut block = [0.0f32; 64];
/// voices.render(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct VoiceAllocator<const N: usize> {
    voices: [Voice; N],
}

impl<const N: usize> VoiceAllocator<N> {
    /// Create an allocator with all voices idle.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
        }
    }

    /// Set sample rate for all voices.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Voice capacity.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of currently sounding voices.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Read access to the voice pool.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Mutable access to the voice pool (for patch configuration).
    pub fn voices_mut(&mut self) -> &mut [Voice; N] {
        &mut self.voices
    }

    /// Handle a note-on event.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        // A repeated note-on on a gated pitch retriggers that voice, which
        // keeps the one-gate-per-pitch invariant
        if let Some(voice) = self
            .voices
            .iter_mut()
            .find(|v| v.gate() && v.note() == note)
        {
            voice.retrigger(velocity);
            return;
        }

        let index = self.allocate();
        self.voices[index].note_on(note, velocity);
    }

    /// Handle a note-off event. Only a gated voice matches; releasing
    /// voices are left to finish.
    pub fn note_off(&mut self, note: u8) {
        if let Some(voice) = self
            .voices
            .iter_mut()
            .find(|v| v.gate() && v.note() == note)
        {
            voice.note_off();
        }
    }

    /// Release every gated voice.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            if voice.gate() {
                voice.note_off();
            }
        }
    }

    /// Silence everything immediately.
    pub fn kill_all(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
    }

    /// Reset all voices.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    /// Advance voice ages. Called once per audio block.
    pub fn tick_ages(&mut self) {
        for voice in &mut self.voices {
            voice.tick_age();
        }
    }

    /// Sum all active voices into `out` (additive).
    pub fn render(&mut self, out: &mut [f32]) {
        for voice in &mut self.voices {
            if !voice.is_active() {
                continue;
            }
            for sample in out.iter_mut() {
                *sample += voice.process();
            }
        }
    }

    /// Find a voice for a new note: a free one, else the oldest.
    fn allocate(&self) -> usize {
        for (i, voice) in self.voices.iter().enumerate() {
            if !voice.is_active() {
                return i;
            }
        }

        // All busy: steal the voice that has been sounding longest
        self.voices
            .iter()
            .enumerate()
            .max_by_key(|(_, v)| v.age())
            .map_or(0, |(i, _)| i)
    }
}
