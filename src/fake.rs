//! In-memory sensor for testing
//!
//! [`FakeBus`] implements [`Transport`] by decoding the frames the driver sends and serving
//! them from a register file, while recording every call it receives.

use heapless::Vec;

use crate::{
    bus::{Error, Result, Transport},
    registers::{
        Register, DEFAULT_TCRIT, DEFAULT_THIGH, DEFAULT_THYST, DEFAULT_TLOW, DEVICE_ID,
        RESET_SEQUENCE,
    },
};

const READ: u8 = 0x40;
const STATUS_RDY: u16 = 0x80;

/// Maximum number of bytes kept per recorded exchange
pub const FRAME_CAPACITY: usize = 4;
/// Maximum number of recorded events
pub const LOG_CAPACITY: usize = 32;

pub type Frame = Vec<u8, FRAME_CAPACITY>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    /// Outbound bytes of a full-duplex exchange
    Transfer(Frame),
    /// Outbound bytes of a write-only exchange
    Write(Frame),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FakeError {
    /// An exchange was attempted without chip-select asserted
    NotSelected,
    /// Failure requested with [`Fault::Bus`]
    Injected,
}

/// Failure to report from the next exchange
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fault {
    Busy,
    Timeout,
    Bus,
}

pub struct FakeBus {
    regs: [u16; 8],
    selected: bool,
    fault: Option<Fault>,
    resets: usize,
    events: Vec<Event, LOG_CAPACITY>,
}

impl FakeBus {
    /// A freshly powered-up sensor reading `temperature` (a raw code)
    pub fn new(temperature: u16) -> Self {
        let mut bus = Self {
            regs: [0; 8],
            selected: false,
            fault: None,
            resets: 0,
            events: Vec::new(),
        };
        bus.power_on();
        bus.regs[Register::Temperature.addr() as usize] = temperature;
        bus
    }

    fn power_on(&mut self) {
        let temperature = self.regs[Register::Temperature.addr() as usize];
        self.regs = [0; 8];
        self.regs[Register::Status.addr() as usize] = STATUS_RDY;
        self.regs[Register::Temperature.addr() as usize] = temperature;
        self.regs[Register::Id.addr() as usize] = u16::from(DEVICE_ID);
        self.regs[Register::TCrit.addr() as usize] = DEFAULT_TCRIT;
        self.regs[Register::THyst.addr() as usize] = u16::from(DEFAULT_THYST);
        self.regs[Register::THigh.addr() as usize] = DEFAULT_THIGH;
        self.regs[Register::TLow.addr() as usize] = DEFAULT_TLOW;
    }

    pub fn register(&self, reg: Register) -> u16 {
        self.regs[reg.addr() as usize]
    }

    pub fn set_register(&mut self, reg: Register, value: u16) {
        self.regs[reg.addr() as usize] = value;
    }

    /// Makes the next exchange fail with `fault`
    pub fn fail_next(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of recorded events matching `f`
    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|&e| f(e)).count()
    }

    /// Number of reset sequences received
    pub const fn resets(&self) -> usize {
        self.resets
    }

    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// # Panics
    ///
    /// When more than [`LOG_CAPACITY`] events are recorded without [`FakeBus::clear_events`].
    fn record(&mut self, event: Event) {
        if self.events.push(event).is_err() {
            panic!("FakeBus event log full ({} events)", LOG_CAPACITY);
        }
    }

    fn exchange(&mut self) -> Result<(), FakeError> {
        if !self.selected {
            return Err(Error::Bus(FakeError::NotSelected));
        }
        match self.fault.take() {
            None => Ok(()),
            Some(Fault::Busy) => Err(Error::Busy),
            Some(Fault::Timeout) => Err(Error::Timeout),
            Some(Fault::Bus) => Err(Error::Bus(FakeError::Injected)),
        }
    }

    fn slot(cmd: u8) -> Option<usize> {
        let addr = usize::from((cmd & !READ) >> 3);
        (addr < 8).then_some(addr)
    }
}

fn frame(words: &[u8]) -> Frame {
    let len = words.len().min(FRAME_CAPACITY);
    Vec::from_slice(&words[..len]).unwrap_or_default()
}

impl Transport for FakeBus {
    type Error = FakeError;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.record(Event::Select);
        self.selected = true;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.record(Event::Deselect);
        self.selected = false;
        Ok(())
    }

    fn transfer(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.record(Event::Transfer(frame(words)));
        self.exchange()?;

        let Some((&mut cmd, payload)) = words.split_first_mut() else {
            return Ok(());
        };
        let value = match Self::slot(cmd) {
            Some(slot) if cmd & READ != 0 => self.regs[slot],
            _ => 0xFFFF,
        };

        words_from(value, payload);
        if cmd & READ != 0 && Self::slot(cmd) == Some(Register::Temperature.addr() as usize) {
            // Reading the result clears RDY
            self.regs[Register::Status.addr() as usize] |= STATUS_RDY;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.record(Event::Write(frame(words)));
        self.exchange()?;

        if words == RESET_SEQUENCE {
            self.resets += 1;
            self.power_on();
            return Ok(());
        }

        let Some((&cmd, payload)) = words.split_first() else {
            return Ok(());
        };
        if cmd & READ == 0 {
            if let Some(slot) = Self::slot(cmd) {
                self.regs[slot] = payload
                    .iter()
                    .fold(0u16, |acc, &b| (acc << 8) | u16::from(b));
            }
        }
        Ok(())
    }
}

/// Fills `payload` with the low `payload.len()` bytes of `value`, most significant first
fn words_from(value: u16, payload: &mut [u8]) {
    let bytes = value.to_be_bytes();
    let start = bytes.len().saturating_sub(payload.len());
    for (dst, src) in payload.iter_mut().zip(&bytes[start..]) {
        *dst = *src;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{command, Direction};

    #[test]
    fn serves_registers_big_endian() {
        let mut bus = FakeBus::new(0x2300);
        let mut frame = [0x50, 0x00, 0x00];

        bus.select().unwrap();
        bus.transfer(&mut frame).unwrap();
        bus.deselect().unwrap();

        assert_eq!(frame[1..], [0x23, 0x00]);
    }

    #[test]
    fn decodes_address_without_direction_bit() {
        for reg in Register::ALL {
            let addr = reg.addr() as usize;
            assert_eq!(FakeBus::slot(command(Direction::Read, reg.addr())), Some(addr));
            assert_eq!(FakeBus::slot(command(Direction::Write, reg.addr())), Some(addr));
        }
        assert_eq!(FakeBus::slot(0x50), Some(2));
    }

    #[test]
    fn log_holds_full_capacity() {
        let mut bus = FakeBus::new(0);
        for _ in 0..LOG_CAPACITY / 3 {
            bus.select().unwrap();
            bus.write(&[0x08, 0x80]).unwrap();
            bus.deselect().unwrap();
        }
        assert_eq!(bus.count(|e| matches!(e, Event::Deselect)), LOG_CAPACITY / 3);

        bus.clear_events();
        bus.select().unwrap();
        assert_eq!(bus.events(), [Event::Select]);
    }

    #[test]
    #[should_panic(expected = "event log full")]
    fn log_overflow_panics() {
        let mut bus = FakeBus::new(0);
        for _ in 0..=LOG_CAPACITY {
            bus.select().unwrap();
        }
    }

    #[test]
    fn rejects_exchange_without_select() {
        let mut bus = FakeBus::new(0);
        assert_eq!(
            bus.write(&[0x08, 0x80]),
            Err(Error::Bus(FakeError::NotSelected))
        );
    }

    #[test]
    fn reset_restores_power_on_values() {
        let mut bus = FakeBus::new(0);
        bus.set_register(Register::THigh, 0x2300);

        bus.select().unwrap();
        bus.write(&RESET_SEQUENCE).unwrap();
        bus.deselect().unwrap();

        assert_eq!(bus.resets(), 1);
        assert_eq!(bus.register(Register::THigh), DEFAULT_THIGH);
    }

    #[test]
    fn fault_applies_once() {
        let mut bus = FakeBus::new(0);
        bus.fail_next(Fault::Busy);
        bus.select().unwrap();

        assert_eq!(bus.write(&[0x08, 0x80]), Err(Error::Busy));
        assert_eq!(bus.write(&[0x08, 0x80]), Ok(()));
        assert_eq!(bus.register(Register::Config), 0x80);
    }
}
