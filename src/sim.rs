//! A register-level model of the MCP23008 for tests.
//!
//! Unlike `embedded-hal-mock`, which checks an exact transaction script, this keeps the chip's
//! register file and lets tests look at the resulting state.  Clones share the same chip, so one
//! handle can be given to the driver while the test keeps another.
use crate::Register;
use embedded_hal::i2c::{self, Operation};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Write(Register, u8),
    Read(Register),
}

/// The chip did not acknowledge its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Nack;

impl i2c::Error for Nack {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address)
    }
}

struct State {
    address: u8,
    regs: [u8; 11],
    pointer: u8,
    /// Levels applied to the pins from outside.
    inputs: u8,
    /// Sensed port value at the last input change, for compare-to-previous interrupts.
    last_sensed: u8,
    log: Vec<Access>,
}

impl State {
    fn reg(&self, reg: Register) -> u8 {
        self.regs[reg as usize]
    }

    fn sensed(&self) -> u8 {
        self.inputs ^ self.reg(Register::IPOL)
    }

    fn gpio(&self) -> u8 {
        let iodir = self.reg(Register::IODIR);
        (self.reg(Register::OLAT) & !iodir) | (self.sensed() & iodir)
    }

    fn write(&mut self, addr: u8, value: u8) {
        let Ok(reg) = Register::try_from(addr) else {
            return;
        };
        self.log.push(Access::Write(reg, value));
        match reg {
            Register::INTF | Register::INTCAP => (),
            Register::GPIO | Register::OLAT => self.regs[Register::OLAT as usize] = value,
            _ => self.regs[reg as usize] = value,
        }
    }

    fn read(&mut self, addr: u8) -> u8 {
        let Ok(reg) = Register::try_from(addr) else {
            return 0x00;
        };
        self.log.push(Access::Read(reg));
        match reg {
            Register::GPIO => {
                self.regs[Register::INTF as usize] = 0x00;
                self.gpio()
            }
            Register::INTCAP => {
                self.regs[Register::INTF as usize] = 0x00;
                self.reg(Register::INTCAP)
            }
            _ => self.reg(reg),
        }
    }

    fn advance(&mut self) {
        if self.reg(Register::IOCON) & crate::dev::mcp23008::IOCON_SEQOP == 0 {
            self.pointer = self.pointer.wrapping_add(1) % self.regs.len() as u8;
        }
    }

    fn apply_inputs(&mut self, inputs: u8) {
        self.inputs = inputs;
        let sensed = self.sensed();
        let intcon = self.reg(Register::INTCON);
        let reference = (self.reg(Register::DEFVAL) & intcon) | (self.last_sensed & !intcon);
        let flags = (sensed ^ reference) & self.reg(Register::GPINTEN) & self.reg(Register::IODIR);
        self.last_sensed = sensed;

        // further events are ignored until the pending one is acknowledged
        if flags != 0 && self.reg(Register::INTF) == 0 {
            self.regs[Register::INTF as usize] = flags;
            self.regs[Register::INTCAP as usize] = self.gpio();
        }
    }
}

#[derive(Clone)]
pub(crate) struct SimChip(Rc<RefCell<State>>);

impl SimChip {
    /// A chip at `address` in its power-on state.
    pub fn new(address: u8) -> Self {
        let mut regs = [0x00; 11];
        regs[Register::IODIR as usize] = 0xff;
        Self(Rc::new(RefCell::new(State {
            address,
            regs,
            pointer: 0,
            inputs: 0x00,
            last_sensed: 0x00,
            log: Vec::new(),
        })))
    }

    /// Peek at a register without going through the bus.
    pub fn reg(&self, reg: Register) -> u8 {
        self.0.borrow().reg(reg)
    }

    pub fn regs(&self) -> [u8; 11] {
        self.0.borrow().regs
    }

    /// Change the levels applied to the pins, raising interrupts as the chip would.
    pub fn set_inputs(&self, inputs: u8) {
        self.0.borrow_mut().apply_inputs(inputs);
    }

    pub fn log(&self) -> Vec<Access> {
        self.0.borrow().log.clone()
    }

    pub fn take_log(&self) -> Vec<Access> {
        core::mem::take(&mut self.0.borrow_mut().log)
    }
}

impl i2c::ErrorType for SimChip {
    type Error = Nack;
}

impl i2c::I2c for SimChip {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let state = &mut *self.0.borrow_mut();
        if address != state.address {
            return Err(Nack);
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((&pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = pointer;
                    for &value in data {
                        let pointer = state.pointer;
                        state.write(pointer, value);
                        state.advance();
                    }
                }
                Operation::Read(buf) => {
                    for value in buf.iter_mut() {
                        let pointer = state.pointer;
                        *value = state.read(pointer);
                        state.advance();
                    }
                }
            }
        }
        Ok(())
    }
}

/// Several chips on one bus, each answering its own address.
pub(crate) struct SimBus(Vec<SimChip>);

impl SimBus {
    pub fn new(chips: &[&SimChip]) -> Self {
        Self(chips.iter().map(|&chip| chip.clone()).collect())
    }
}

impl i2c::ErrorType for SimBus {
    type Error = Nack;
}

impl i2c::I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let chip = self
            .0
            .iter_mut()
            .find(|chip| chip.0.borrow().address == address)
            .ok_or(Nack)?;
        i2c::I2c::transaction(chip, address, operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::I2c;

    #[test]
    fn sequential_access_without_seqop() {
        let mut chip = SimChip::new(0x20);

        chip.write(0x20, &[0x00, 0x12, 0x34]).unwrap();
        assert_eq!(chip.reg(Register::IODIR), 0x12);
        assert_eq!(chip.reg(Register::IPOL), 0x34);

        let mut buf = [0x00; 2];
        chip.write_read(0x20, &[0x00], &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn seqop_pins_the_pointer() {
        let mut chip = SimChip::new(0x20);

        chip.write(0x20, &[0x05, 0x20]).unwrap();
        chip.write(0x20, &[0x00, 0x12, 0x34]).unwrap();
        assert_eq!(chip.reg(Register::IODIR), 0x34);
        assert_eq!(chip.reg(Register::IPOL), 0x00);
    }

    #[test]
    fn gpio_mixes_latch_and_inputs() {
        let mut chip = SimChip::new(0x20);
        chip.write(0x20, &[0x00, 0xf0]).unwrap();
        chip.write(0x20, &[0x09, 0xff]).unwrap();
        chip.set_inputs(0b1010_1010);

        assert_eq!(chip.reg(Register::OLAT), 0xff);
        let mut buf = [0x00];
        chip.write_read(0x20, &[0x09], &mut buf).unwrap();
        assert_eq!(buf[0], 0b1010_1111);
    }

    #[test]
    fn other_addresses_are_not_acknowledged() {
        let mut chip = SimChip::new(0x20);
        assert_eq!(chip.write(0x21, &[0x00, 0x00]), Err(Nack));
        assert_eq!(chip.reg(Register::IODIR), 0xff);
    }

    #[test]
    fn bus_routes_by_address() {
        let a = SimChip::new(0x20);
        let b = SimChip::new(0x21);
        let mut bus = SimBus::new(&[&a, &b]);

        bus.write(0x21, &[0x0a, 0x55]).unwrap();
        assert_eq!(b.reg(Register::OLAT), 0x55);
        assert_eq!(a.reg(Register::OLAT), 0x00);
        assert!(a.log().is_empty());

        assert_eq!(bus.write(0x22, &[0x0a, 0x55]), Err(Nack));
    }
}
