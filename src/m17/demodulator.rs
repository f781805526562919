//! M17 4-FSK demodulator
//!
//! Per input sample the matched filter output is clocked by a software PLL.
//! Once per symbol period the three samples around the symbol centre are
//! corrected for deviation and frequency offset, the PLL is updated from the
//! phase estimate, and the centre sample is sliced. The resulting
//! [`SymbolSample`] drives the synchronization state machine:
//!
//! ```text
//!            carrier                 sync (1 err)
//! UNLOCKED ──────────▶ SYNC ────────────────────────▶ FRAMING
//!    ▲                  │ no carrier                  │   ▲
//!    ├──────────────────┘                 368 bits    │   │ sync (4 err)
//!    │        no carrier / >8 misses   ┌──────────────┘   │
//!    └─────────────────────────────── FR_SYNC ────────────┘
//! ```
//!
//! On entry to SYNC the framer, decoder and frame buffer are cleared. On
//! entry to FR_SYNC the sync-loss counter is zeroed, and the tracking match
//! is only honoured once a whole sync word has arrived after the frame.

use crate::config::{
    DemodConfig, ADC_BLOCK_SIZE, FRAME_BITS, INPUT_SCALE, RRC_TAPS, SAMPLE_RATE,
};
use crate::demod::Demodulator;
use crate::dsp::filter::FirFilter;
use crate::dsp::filter_design::matched_filter;
use crate::dsp::{
    llr, CarrierDetect, DeviationError, FrequencyError, PhaseEstimator, SymbolEvm, TimingLoop,
};
use crate::hal::adc::AudioFrontEnd;
use crate::hdlc::{FramePool, IoFrame};
use crate::types::{DemodState, SymbolSample};

use super::decoder::FrameDecoder;
use super::framer::Framer;
use super::sync::SyncCorrelator;

/// Symbols in a sync word
const SYNC_SYMBOLS: u32 = 8;

/// Snapshot of demodulator health
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    /// Synchronization state
    pub state: DemodState,
    /// Symbol clock advance per sample
    pub dt: f32,
    /// Instantaneous EVM of the last symbol
    pub evm: f32,
    /// Smoothed EVM of the sliced symbols
    pub evm_average: f32,
    /// Deviation correction factor
    pub deviation: f32,
    /// Frequency offset estimate
    pub frequency_offset: f32,
    /// Whether frames are being received
    pub locked: bool,
    /// Bit errors reported by the last decode, if any
    pub bit_errors: Option<u32>,
}

/// M17 receive demodulator
pub struct M17Demodulator<F: AudioFrontEnd, D: FrameDecoder> {
    config: DemodConfig,
    front_end: F,
    decoder: D,
    pool: &'static FramePool,

    filter: FirFilter<RRC_TAPS>,
    /// `[prev, centre, next]` around the current symbol
    window: [i16; 3],
    t: f32,
    sample_now: bool,

    timing: TimingLoop,
    phase: PhaseEstimator,
    deviation: DeviationError,
    frequency: FrequencyError,
    symbol_evm: SymbolEvm,
    dcd: CarrierDetect,

    acquire_sync: SyncCorrelator,
    track_sync: SyncCorrelator,
    framer: Framer<FRAME_BITS>,
    buffer: [i8; FRAME_BITS],

    state: DemodState,
    carrier: bool,
    passall: bool,
    ber: Option<u32>,
    sync_count: u32,
    symbol_count: u32,

    estimated_deviation: f32,
    estimated_frequency: f32,
    last_evm: f32,
}

impl<F: AudioFrontEnd, D: FrameDecoder> M17Demodulator<F, D> {
    /// Create a demodulator drawing output frames from `pool`
    pub fn new(config: DemodConfig, front_end: F, decoder: D, pool: &'static FramePool) -> Self {
        Self {
            front_end,
            decoder,
            pool,
            filter: FirFilter::new(matched_filter()),
            window: [0; 3],
            t: 0.0,
            sample_now: false,
            timing: TimingLoop::new(&config),
            phase: PhaseEstimator::default(),
            deviation: DeviationError::new(),
            frequency: FrequencyError::new(),
            symbol_evm: SymbolEvm::new(),
            dcd: CarrierDetect::from_config(&config),
            acquire_sync: SyncCorrelator::m17(config.acquire_sync_errors),
            track_sync: SyncCorrelator::m17(config.track_sync_errors),
            framer: Framer::new(),
            buffer: [0; FRAME_BITS],
            state: DemodState::Unlocked,
            carrier: false,
            passall: config.passall,
            ber: None,
            sync_count: 0,
            symbol_count: 0,
            estimated_deviation: 1.0,
            estimated_frequency: 0.0,
            last_evm: 0.0,
            config,
        }
    }

    /// Run one symbol period through the state machine
    ///
    /// Returns a frame when this symbol completed one that should be
    /// emitted.
    pub fn step(&mut self, input: SymbolSample) -> Option<IoFrame> {
        let (carrier, _) = self.dcd.update(input.evm);
        self.carrier = carrier;
        self.last_evm = input.evm;
        self.timing.set_locked(carrier);

        // Both correlators see every symbol so their windows always hold
        // the most recent eight.
        let acquired = self.acquire_sync.matches(input.symbol);
        let tracked = self.track_sync.matches(input.symbol);

        if self.state == DemodState::Unlocked && carrier {
            self.transition(DemodState::Sync);
        }

        let mut output = None;
        match self.state {
            DemodState::Unlocked => {}
            DemodState::Sync => {
                if !carrier {
                    self.transition(DemodState::Unlocked);
                } else if acquired {
                    self.transition(DemodState::Framing);
                }
            }
            DemodState::FrSync => {
                if !carrier {
                    self.log_telemetry();
                    self.transition(DemodState::Unlocked);
                } else if tracked && self.sync_count + 1 >= SYNC_SYMBOLS {
                    // Earlier hits straddle the previous frame's tail
                    self.transition(DemodState::Framing);
                } else {
                    self.sync_count += 1;
                    if self.sync_count > self.config.sync_loss_limit {
                        self.transition(DemodState::Unlocked);
                    }
                }
            }
            DemodState::Framing => {
                output = self.framing(input.sample);
            }
        }

        if self.config.telemetry_interval != 0
            && self.symbol_count % self.config.telemetry_interval == 0
        {
            self.log_telemetry();
        }
        self.symbol_count = self.symbol_count.wrapping_add(1);

        output
    }

    fn framing(&mut self, sample: f32) -> Option<IoFrame> {
        let frame = self.framer.push(llr(sample))?;
        self.buffer = *frame;
        self.transition(DemodState::FrSync);

        let decoded = self.decoder.decode(&self.buffer, self.pool);
        self.ber = Some(decoded.bit_errors);
        if decoded.valid || self.passall {
            return decoded.frame;
        }

        warn!("decode invalid");
        if let Some(frame) = decoded.frame {
            frame.release();
        }
        None
    }

    fn transition(&mut self, next: DemodState) {
        match next {
            DemodState::Unlocked | DemodState::Framing => {}
            DemodState::Sync => {
                self.framer.reset();
                self.decoder.reset();
                self.buffer.fill(0);
            }
            DemodState::FrSync => {
                self.sync_count = 0;
            }
        }
        debug!("demod: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Correct the current window and derive one symbol
    fn demod(&mut self) -> SymbolSample {
        let mut window = self.window.map(|s| f32::from(s) * INPUT_SCALE);

        self.estimated_deviation = self.deviation.update(window[1]);
        for sample in &mut window {
            *sample *= self.estimated_deviation;
        }

        self.estimated_frequency = self.frequency.update(window[1]);
        for sample in &mut window {
            *sample -= self.estimated_frequency;
        }

        let mut phase = self.phase.estimate(&window);
        if window[1] < 0.0 {
            phase = -phase;
        }
        self.timing.update(phase);

        let (symbol, evm) = self.symbol_evm.slice(window[1]);
        self.window[0] = self.window[2];

        SymbolSample {
            sample: window[1],
            phase,
            symbol,
            evm,
        }
    }

    fn log_telemetry(&self) {
        let t = self.telemetry();
        info!(
            "state: {}, dt: {}, evm: {}, evma: {}, dev: {}, freq: {}, locked: {}, ber: {}",
            t.state.as_u8(),
            (t.dt * 10000.0) as i32,
            (t.evm * 1000.0) as i32,
            (t.evm_average * 1000.0) as i32,
            (t.deviation * 1000.0) as i32,
            (t.frequency_offset * 1000.0) as i32,
            t.locked,
            t.bit_errors.map_or(-1, i64::from)
        );
    }

    /// Current health snapshot
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            state: self.state,
            dt: self.timing.dt(),
            evm: self.last_evm,
            evm_average: self.symbol_evm.evm(),
            deviation: self.estimated_deviation,
            frequency_offset: self.estimated_frequency,
            locked: self.is_locked(),
            bit_errors: self.ber,
        }
    }

    fn is_locked(&self) -> bool {
        self.state == DemodState::Framing && self.carrier
    }

    /// Synchronization state
    #[must_use]
    pub const fn state(&self) -> DemodState {
        self.state
    }

    /// Symbol clock advance per input sample
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.timing.dt()
    }

    /// Soft bits collected toward the current frame
    #[must_use]
    pub const fn pending_bits(&self) -> usize {
        self.framer.pending()
    }

    /// Last frame handed to the decoder
    #[must_use]
    pub const fn frame_buffer(&self) -> &[i8; FRAME_BITS] {
        &self.buffer
    }

    /// Whether pass-all is enabled
    #[must_use]
    pub const fn is_passall(&self) -> bool {
        self.passall
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &DemodConfig {
        &self.config
    }

    /// Frame decoder
    #[must_use]
    pub const fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Frame decoder, mutably
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Analog front end
    #[must_use]
    pub const fn front_end(&self) -> &F {
        &self.front_end
    }
}

impl<F: AudioFrontEnd, D: FrameDecoder> Demodulator for M17Demodulator<F, D> {
    fn start(&mut self) {
        self.filter.reset();
        self.window = [0; 3];
        self.t = 0.0;
        self.sample_now = false;
        self.timing.reset();
        self.dcd.reset();
        self.acquire_sync.reset();
        self.track_sync.reset();
        self.carrier = false;
        self.sync_count = 0;
        self.transition(DemodState::Unlocked);
        self.front_end.start_adc(SAMPLE_RATE);
        info!("M17 demodulator started");
    }

    fn stop(&mut self) {
        self.front_end.stop_loopback();
        self.front_end.stop_adc();
        self.transition(DemodState::Unlocked);
        info!("M17 demodulator stopped");
    }

    fn locked(&self) -> bool {
        self.is_locked()
    }

    fn size(&self) -> usize {
        ADC_BLOCK_SIZE
    }

    fn passall(&mut self, enabled: bool) {
        self.passall = enabled;
    }

    fn process(&mut self, input: &[i16]) -> Option<IoFrame> {
        let mut result = None;

        for &raw in input {
            let filtered = self.filter.process_q15(raw);

            if self.sample_now {
                self.window[2] = filtered;
                let symbol = self.demod();
                if let Some(frame) = self.step(symbol) {
                    result = Some(frame);
                }
                self.sample_now = false;
            }

            self.t += self.timing.dt();
            if self.t < 1.0 {
                self.window[0] = filtered;
            } else {
                self.t -= 1.0;
                self.window[1] = filtered;
                self.sample_now = true;
            }
        }

        result
    }
}
