use anyhow::Result;
use bevy_ecs::system::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

// Sound effects types that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Move,
    Rotate,
    Lock,
    /// A completed row was flagged pending
    LineFlagged,
    /// Pending rows detonate after a won challenge
    Explosion,
    /// One pad symbol, 0..=4
    SimonTone(u8),
    SimonSuccess,
    SimonFail,
    CountdownBeep,
    GameStart,
    GameOver,
}

// Command to control the audio thread
enum AudioCommand {
    PlaySound(SoundEffect),
    PlayMusic(bool), // true to start, false to stop
    SetVolume(f32),  // 0.0 to 1.0
    Quit,
}

// Global audio state
#[derive(Resource)]
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    music_enabled: bool,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    pub fn new() -> Self {
        let audio_config = crate::config::current().audio;
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let thread_available = Arc::clone(&available);

        // Start the audio thread
        thread::spawn(move || {
            if let Err(e) = run_audio_thread(&receiver) {
                thread_available.store(false, Ordering::Relaxed);
                eprintln!("Audio thread error: {e}");
            }
        });

        let state = Self {
            sender: Some(sender),
            available,
            music_enabled: audio_config.music_enabled,
            sound_enabled: audio_config.sound_enabled,
            volume: audio_config.volume.clamp(0.0, 1.0),
        };

        // Push the configured defaults to the thread
        state.send(AudioCommand::PlayMusic(state.music_enabled));
        state.send(AudioCommand::SetVolume(state.volume));

        state
    }

    /// Every send is fire-and-forget: a full channel or dead thread is
    /// silently ignored and gameplay continues without sound.
    fn send(&self, command: AudioCommand) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(command);
        }
    }

    pub fn play_sound(&self, effect: SoundEffect) -> bool {
        if self.sound_enabled {
            self.send(AudioCommand::PlaySound(effect));
            true
        } else {
            false
        }
    }

    pub fn is_audio_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    pub fn is_music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        // Clamp volume between 0.0 and 1.0
        self.volume = volume.clamp(0.0, 1.0);
        self.send(AudioCommand::SetVolume(self.volume));
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        self.send(AudioCommand::PlayMusic(self.music_enabled));
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioState {
    fn drop(&mut self) {
        self.send(AudioCommand::Quit);
    }
}

fn run_audio_thread(receiver: &Receiver<AudioCommand>) -> Result<()> {
    // Get the default audio device
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    let mut volume = 0.5f32;
    let mut music_enabled = true;

    // Create a channel for sound effects to be handled by the audio callback
    let (sound_sender, sound_receiver) = bounded::<SoundEffect>(64);
    let (cmd_sender, cmd_receiver) = bounded::<(bool, f32)>(16); // for music state and volume

    // Set up audio stream based on the device's sample format
    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_audio_stream::<f32>(
            &device,
            &config.into(),
            sound_receiver,
            cmd_receiver,
            volume,
            music_enabled,
        )?,
        cpal::SampleFormat::I16 => run_audio_stream::<i16>(
            &device,
            &config.into(),
            sound_receiver,
            cmd_receiver,
            volume,
            music_enabled,
        )?,
        cpal::SampleFormat::U16 => run_audio_stream::<u16>(
            &device,
            &config.into(),
            sound_receiver,
            cmd_receiver,
            volume,
            music_enabled,
        )?,
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };

    // Keep the thread alive and process commands
    loop {
        match receiver.recv() {
            Ok(command) => match command {
                AudioCommand::PlaySound(effect) => {
                    // Forward sound to the audio stream
                    let _ = sound_sender.try_send(effect);
                }
                AudioCommand::PlayMusic(enabled) => {
                    music_enabled = enabled;
                    let _ = cmd_sender.try_send((enabled, volume));
                }
                AudioCommand::SetVolume(new_volume) => {
                    volume = new_volume;
                    let _ = cmd_sender.try_send((music_enabled, volume));
                }
                AudioCommand::Quit => break,
            },
            Err(_) => break, // Channel closed
        }
    }

    Ok(())
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sound_receiver: Receiver<SoundEffect>,
    cmd_receiver: Receiver<(bool, f32)>,
    initial_volume: f32,
    initial_music_enabled: bool,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f64;
    let channels = config.channels as usize;

    let mut music_enabled = initial_music_enabled;
    let mut volume = initial_volume;

    // Background music graph rendered sample by sample
    let mut music = create_background_music();
    music.set_sample_rate(sample_rate);

    // Track active sound effects - store just the sound type and start time
    let mut active_sounds: Vec<(SoundEffect, f64)> = Vec::new();
    let mut current_time = 0.0;

    // Create audio callback closure
    let mut next_value = move || {
        // Process any audio commands (music toggle, volume)
        while let Ok((new_music_enabled, new_volume)) = cmd_receiver.try_recv() {
            music_enabled = new_music_enabled;
            volume = new_volume;
        }

        // Process any new sound effects
        while let Ok(effect) = sound_receiver.try_recv() {
            active_sounds.push((effect, current_time));
        }

        // Generate the basic output
        let mut left = 0.0;
        let mut right = 0.0;

        // Add contribution from active sounds
        let mut sounds_to_remove = Vec::new();
        for (idx, (effect, start_time)) in active_sounds.iter().enumerate() {
            let t = current_time - *start_time;

            // Remove sounds after their expected duration
            let max_duration = 2.0; // Default max duration
            if t > max_duration {
                sounds_to_remove.push(idx);
                continue;
            }

            // Generate the sound sample based on effect type and time
            let sample = generate_sound_sample(*effect, t);
            left += sample.0;
            right += sample.1;
        }

        // Remove expired sounds (in reverse order to maintain correct indices)
        for idx in sounds_to_remove.into_iter().rev() {
            if idx < active_sounds.len() {
                active_sounds.remove(idx);
            }
        }

        // Add background music if enabled
        let (music_left, music_right) = music.get_stereo();
        if music_enabled {
            left += music_left;
            right += music_right;
        }

        // Increment time (assuming 1/sample_rate seconds per sample)
        current_time += 1.0 / sample_rate;

        // Apply volume control
        left *= volume;
        right *= volume;

        // Apply a limiter to prevent clipping
        left = left.clamp(-1.0, 1.0);
        right = right.clamp(-1.0, 1.0);

        (left, right)
    };

    // Callback for error handling
    let err_fn = |err| eprintln!("Error in audio stream: {err}");

    // Create the audio stream
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = next_value();
                let left = T::from_sample(sample.0);
                let right = T::from_sample(sample.1);

                for (channel, sample) in frame.iter_mut().enumerate() {
                    if channel & 1 == 0 {
                        *sample = left;
                    } else {
                        *sample = right;
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    // Start the stream
    stream.play()?;

    Ok(stream)
}

// Generate a sound sample for a given effect and time
pub fn generate_sound_sample(effect: SoundEffect, t: f64) -> (f32, f32) {
    let t = t as f32; // Convert to f32 for simpler calculations

    // Early exit for sounds that have completed
    if t > 2.0 {
        return (0.0, 0.0);
    }

    match effect {
        SoundEffect::Move => {
            // Short triangle click
            let amp = if t < 0.05 { 0.3 } else { 0.0 };
            let sample = triangle_wave(300.0, t) * amp;
            (sample, sample) // Center panned
        }
        SoundEffect::Rotate => {
            // Higher pitched click
            let amp = if t < 0.1 { 0.3 } else { 0.0 };
            let sample = (t * 400.0 * std::f32::consts::TAU).sin() * amp;
            (sample, sample) // Center panned
        }
        SoundEffect::Lock => {
            // Thud on contact
            let amp = (0.15 - t).max(0.0) * 4.0;
            let noise = fastrand::f32() * 0.1; // Simple noise component
            let tone = saw_wave(150.0, t) * 0.25;
            let sample = (noise + tone) * amp;
            (sample * 0.8, sample * 1.2) // Slightly right panned
        }
        SoundEffect::LineFlagged => {
            // Four-note ascending arpeggio
            let (freq, note_t) = if t < 0.1 {
                (523.25, t)
            } else if t < 0.2 {
                (659.25, t - 0.1)
            } else if t < 0.3 {
                (783.99, t - 0.2)
            } else if t < 0.4 {
                (1046.50, t - 0.3)
            } else {
                (0.0, 0.0)
            };
            let amp = if freq > 0.0 { (0.2 - note_t).max(0.0) * 2.0 } else { 0.0 };
            let sample = square_wave(freq, t) * amp * 0.3;
            (sample * 1.2, sample * 0.8) // Slightly left panned
        }
        SoundEffect::Explosion => {
            // Collapsing pitch drop
            let freq = 150.0 - 280.0 * t.min(0.5);
            let amp = (0.5 - t).max(0.0) * 1.6;
            let sample = saw_wave(freq.max(10.0), t) * amp * 0.5;
            (sample, sample) // Center panned
        }
        SoundEffect::SimonTone(index) => {
            // Five distinct pad tones, 300 Hz to 700 Hz
            let freq = 300.0 + 100.0 * f32::from(index % 5);
            let amp = (0.3 - t).max(0.0) * 2.0;
            let sample = (t * freq * std::f32::consts::TAU).sin() * amp * 0.4;
            (sample, sample) // Center panned
        }
        SoundEffect::SimonSuccess => {
            // Rising triple chime
            let (freq, note_t) = if t < 0.1 {
                (800.0, t)
            } else if t < 0.2 {
                (1000.0, t - 0.1)
            } else if t < 0.35 {
                (1200.0, t - 0.2)
            } else {
                (0.0, 0.0)
            };
            let amp = if freq > 0.0 { (0.15 - note_t).max(0.0) * 4.0 } else { 0.0 };
            let sample = triangle_wave(freq, t) * amp * 0.4;
            (sample, sample) // Center panned
        }
        SoundEffect::SimonFail => {
            // Two low buzzes
            let mut sample = 0.0;
            if t < 0.5 {
                sample += saw_wave(150.0, t) * (0.5 - t) * 0.5;
            }
            if t >= 0.15 && t < 0.65 {
                sample += saw_wave(100.0, t) * (0.65 - t) * 0.5;
            }
            (sample, sample) // Center panned
        }
        SoundEffect::CountdownBeep => {
            let amp = if t < 0.1 { 0.3 } else { 0.0 };
            let sample = (t * 440.0 * std::f32::consts::TAU).sin() * amp;
            (sample, sample) // Center panned
        }
        SoundEffect::GameStart => {
            // Four-note fanfare
            let (freq, note_t) = if t < 0.15 {
                (440.0, t)
            } else if t < 0.3 {
                (550.0, t - 0.15)
            } else if t < 0.45 {
                (660.0, t - 0.3)
            } else if t < 0.65 {
                (880.0, t - 0.45)
            } else {
                (0.0, 0.0)
            };
            let amp = if freq > 0.0 { (0.2 - note_t).max(0.0) * 2.0 } else { 0.0 };
            let sample = square_wave(freq, t) * amp * 0.3;
            (sample, sample) // Center panned
        }
        SoundEffect::GameOver => {
            // Game over - descending pitch
            let freq = 600.0 - 400.0 * t;
            let amp = (2.0 - t).max(0.0) * 0.5;
            let sample = (t * freq * std::f32::consts::TAU).sin() * amp * 0.4;
            (sample, sample) // Center panned
        }
    }
}

fn saw_wave(freq: f32, t: f32) -> f32 {
    2.0 * (t * freq).fract() - 1.0
}

fn square_wave(freq: f32, t: f32) -> f32 {
    if (t * freq).fract() < 0.5 { 1.0 } else { -1.0 }
}

fn triangle_wave(freq: f32, t: f32) -> f32 {
    4.0 * ((t * freq).fract() - 0.5).abs() - 1.0
}

// Create background music
fn create_background_music() -> Box<dyn AudioUnit> {
    // Low-resource ambient loop built from fundamental oscillators

    // Bass line - low frequency oscillator
    let bass = sine_hz(110.0) * 0.06;

    // Melody - cycle through a pentatonic scale
    let melody = lfo(move |t| {
        let notes = [220.0, 261.63, 293.66, 349.23, 392.0];
        let idx = ((t * 0.5) % 5.0) as usize;
        notes[idx]
    }) >> sine() * 0.08;

    // Chord pad for harmony - multiple frequencies together
    let chord = sine_hz(220.0) * 0.03 + sine_hz(329.63) * 0.02 + sine_hz(392.0) * 0.02;

    // Combine all elements and apply volume
    let music = (bass + melody + chord) * 0.6;

    // Convert to stereo with center panning
    Box::new(music >> pan(0.0))
}
