//! M17 TNC Main Application
//!
//! Entry point for the STM32G474-based TNC receive firmware.
//! Initializes hardware and spawns the demodulator and host-link tasks.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals::PA0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use m17_tnc::hal::adc::{AudioAdc, SampleBlock};
use m17_tnc::hdlc;
use m17_tnc::prelude::*;

/// Frames handed from the demodulator to the host link
static FRAMES: Channel<CriticalSectionRawMutex, IoFrame, 4> = Channel::new();

/// Receive front end on ADC1
struct StmFrontEnd {
    running: bool,
}

impl AudioFrontEnd for StmFrontEnd {
    fn start_adc(&mut self, sample_rate: u32) {
        info!("ADC start at {} Hz", sample_rate);
        self.running = true;
    }

    fn stop_adc(&mut self) {
        info!("ADC stop");
        self.running = false;
    }

    fn stop_loopback(&mut self) {
        // The receive-only build has no loopback output
    }
}

type Demod = M17Demodulator<StmFrontEnd, HardDecisionDecoder>;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("M17 TNC Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // DCD LED (PA5 on Nucleo boards)
    let dcd_led = Output::new(p.PA5, Level::Low, Speed::Low);
    let adc = AudioAdc::new(p.ADC1);

    let mut demod = Demod::new(
        DemodConfig::default(),
        StmFrontEnd { running: false },
        HardDecisionDecoder::new(),
        hdlc::frame_pool(),
    );
    demod.start();

    spawner.spawn(demod_task(demod, adc, p.PA0, dcd_led)).unwrap();
    spawner.spawn(host_link_task()).unwrap();

    info!("Tasks spawned");
}

/// Sample the audio input and run the demodulator one block at a time
#[embassy_executor::task]
async fn demod_task(
    mut demod: Demod,
    mut adc: AudioAdc<'static>,
    mut input: PA0,
    mut dcd_led: Output<'static>,
) {
    // TODO: replace the sample ticker with ring-buffered DMA from TIM6 triggers
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(SAMPLE_RATE)));
    let mut block = SampleBlock::new();

    loop {
        ticker.next().await;
        if !demod.front_end().running {
            continue;
        }

        block.push(adc.read(&mut input));
        if !block.is_full() {
            continue;
        }

        // The sampler never waits on the host link
        if let Some(frame) = demod.process(block.as_slice()) {
            if let Err(TrySendError::Full(frame)) = FRAMES.try_send(frame) {
                warn!("rx queue full, dropping frame");
                hdlc::release(frame);
            }
        }
        block.clear();

        if demod.locked() {
            dcd_led.set_high();
        } else {
            dcd_led.set_low();
        }
    }
}

/// Drain decoded frames toward the host
#[embassy_executor::task]
async fn host_link_task() {
    loop {
        let frame = FRAMES.receive().await;
        info!("rx {} ({} bytes)", frame.kind(), frame.len());
        hdlc::release(frame);
    }
}
