//! Support for the `MCP23008` "8-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/DeviceDoc/MCP23008-MCP23S08-Data-Sheet-20001919F.pdf
//!
//! The MCP23008 offers one eight-bit GPIO port.  It has three address pins, so eight devices can
//! coexist on an I2C bus.
//!
//! The driver keeps no copy of any register.  Every query is a register read and every change to
//! a single pin is a read-modify-write of the register involved, so the chip stays the only source
//! of truth even when something else on the bus touches it.
use crate::error::{pin_mask, Error};
use crate::I2cExt;
use embedded_hal::digital::PinState;

/// `MCP23008` "8-Bit I/O Expander with Serial Interface"
pub struct Mcp23008<M>(M);

impl<I2C> Mcp23008<core::cell::RefCell<Driver<I2C>>>
where
    I2C: crate::I2cBus,
{
    /// Create a driver for the chip whose address pins are strapped to `a0`, `a1` and `a2`.
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::with_mutex(i2c, a0, a1, a2)
    }

    /// Create a driver for the chip at the 7-bit bus `address`.
    ///
    /// Bit 7 of `address` is ignored.
    pub fn new_at_address(i2c: I2C, address: u8) -> Self {
        Self::with_mutex_at_address(i2c, address)
    }
}

impl<I2C, M> Mcp23008<M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub fn with_mutex(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self(crate::PortMutex::create(Driver::new(i2c, a0, a1, a2)))
    }

    pub fn with_mutex_at_address(i2c: I2C, address: u8) -> Self {
        Self(crate::PortMutex::create(Driver::with_address(i2c, address)))
    }

    /// The 7-bit bus address this driver talks to.
    pub fn address(&self) -> u8 {
        self.0.lock(|drv| drv.addr)
    }

    /// Put the chip into the configuration this driver expects.
    ///
    /// Writes IOCON with only SEQOP set (no address auto-increment, separate interrupt outputs,
    /// active-low push-pull interrupt), then enables the pull-ups of all pins (they only take
    /// effect on inputs).  Call this before anything else.
    pub fn init(&self) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.init())
    }

    /// Configure all pins at once.
    ///
    /// A 1 bit makes the pin an input, enables its pull-up, or inverts its polarity respectively.
    /// The three registers are overwritten without being read first.
    pub fn set_port_mode(
        &self,
        directions: u8,
        pullups: u8,
        inverted: u8,
    ) -> Result<(), Error<I2C::BusError>> {
        self.0
            .lock(|drv| drv.set_port_mode(directions, pullups, inverted))
    }

    /// Configure a single pin, leaving all other pins untouched.
    pub fn set_pin_mode(
        &self,
        pin: u8,
        mode: crate::PinMode,
        inverted: bool,
    ) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.set_pin_mode(pin, mode, inverted))
    }

    pub fn write_pin(&self, pin: u8, state: PinState) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.write_pin(pin, state))
    }

    pub fn read_pin(&self, pin: u8) -> Result<PinState, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_pin(pin))
    }

    /// Set the state of all pins with a single register write.
    pub fn write_port(&self, value: u8) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.write_register(Register::GPIO, value))
    }

    /// Read the state of all pins with a single register read.
    pub fn read_port(&self) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_register(Register::GPIO))
    }

    /// Read the output latches, i.e. the levels the output pins are being driven to.
    pub fn read_output_latch(&self) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_register(Register::OLAT))
    }

    pub fn write_register(&self, reg: Register, value: u8) -> Result<(), Error<I2C::BusError>> {
        self.0.lock(|drv| drv.write_register(reg, value))
    }

    pub fn read_register(&self, reg: Register) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_register(reg))
    }

    pub fn split<'a>(&'a mut self) -> Parts<'a, I2C, M> {
        Parts {
            gp0: crate::Pin::new(0, &self.0),
            gp1: crate::Pin::new(1, &self.0),
            gp2: crate::Pin::new(2, &self.0),
            gp3: crate::Pin::new(3, &self.0),
            gp4: crate::Pin::new(4, &self.0),
            gp5: crate::Pin::new(5, &self.0),
            gp6: crate::Pin::new(6, &self.0),
            gp7: crate::Pin::new(7, &self.0),
        }
    }
}

#[cfg(feature = "interrupts")]
impl<I2C, M> Mcp23008<M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub fn set_interrupt_mirroring(
        &self,
        mode: crate::InterruptMirroring,
    ) -> Result<(), Error<I2C::BusError>> {
        use crate::PortDriverInterrupts;
        self.0.lock(|drv| drv.set_interrupt_mirroring(mode))
    }

    /// Enable interrupt-on-change for all pins.
    ///
    /// The trigger applies to all pins uniformly, mixed triggers are not supported.
    pub fn configure_interrupt(
        &self,
        trigger: crate::InterruptTrigger,
    ) -> Result<(), Error<I2C::BusError>> {
        use crate::PortDriverInterrupts;
        self.0.lock(|drv| drv.configure_interrupt(trigger))
    }

    pub fn disable_interrupt(&self) -> Result<(), Error<I2C::BusError>> {
        use crate::PortDriverInterrupts;
        self.0.lock(|drv| drv.disable_interrupt())
    }

    /// Acknowledge a pending interrupt, discarding the captured pin state.
    pub fn clear_interrupts(&self) -> Result<(), Error<I2C::BusError>> {
        use crate::PortDriverInterrupts;
        self.0.lock(|drv| drv.clear_interrupts())
    }

    /// Which pins caused the pending interrupt.  Reading this does not acknowledge it.
    pub fn interrupt_flags(&self) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_register(Register::INTF))
    }

    /// Port state at the time the pending interrupt occurred.  Reading this acknowledges it.
    pub fn interrupt_capture(&self) -> Result<u8, Error<I2C::BusError>> {
        self.0.lock(|drv| drv.read_register(Register::INTCAP))
    }
}

pub struct Parts<'a, I2C, M = core::cell::RefCell<Driver<I2C>>>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub gp0: crate::Pin<'a, crate::mode::Input, M>,
    pub gp1: crate::Pin<'a, crate::mode::Input, M>,
    pub gp2: crate::Pin<'a, crate::mode::Input, M>,
    pub gp3: crate::Pin<'a, crate::mode::Input, M>,
    pub gp4: crate::Pin<'a, crate::mode::Input, M>,
    pub gp5: crate::Pin<'a, crate::mode::Input, M>,
    pub gp6: crate::Pin<'a, crate::mode::Input, M>,
    pub gp7: crate::Pin<'a, crate::mode::Input, M>,
}

/// MCP23008 registers.
///
/// N.B.: The MCP23008 only has the sequential (BANK=0) register layout.
///
/// For all registers, the reset value is 0x00, except for IODIR which is 0xFF (making all pins
/// inputs) at reset.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR = 0x00,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL = 0x01,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GPINTEN = 0x02,
    /// DEFVAL: default values for interrupt-on-change
    DEFVAL = 0x03,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    INTCON = 0x04,
    /// IOCON: configuration register, see the `IOCON_*` bits
    IOCON = 0x05,
    /// GPPU: GPIO pull-ups: enables weak internal pull-ups on each pin (when configured
    ///   as an input)
    GPPU = 0x06,
    /// INTF: interrupt flags: 0=no interrupt pending; 1=corresponding pin caused interrupt
    INTF = 0x07,
    /// INTCAP: interrupt captured value: reflects value of each pin at the time that they
    ///   caused an interrupt.  Reading it clears the interrupt.
    INTCAP = 0x08,
    /// GPIO: reflects logic level on pins, writing it writes OLAT
    GPIO = 0x09,
    /// OLAT: output latches: sets state for pins configured as outputs
    OLAT = 0x0a,
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r as u8
    }
}

impl TryFrom<u8> for Register {
    type Error = u8;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Ok(match addr {
            0x00 => Register::IODIR,
            0x01 => Register::IPOL,
            0x02 => Register::GPINTEN,
            0x03 => Register::DEFVAL,
            0x04 => Register::INTCON,
            0x05 => Register::IOCON,
            0x06 => Register::GPPU,
            0x07 => Register::INTF,
            0x08 => Register::INTCAP,
            0x09 => Register::GPIO,
            0x0a => Register::OLAT,
            _ => return Err(addr),
        })
    }
}

// IOCON bits.  Bit 7 (BANK) does not exist on the MCP23008 and bit 0 is unused.

/// Interrupt outputs are OR-ed together.
pub const IOCON_MIRROR: u8 = 1 << 6;
/// Sequential operation disabled: the address pointer does not increment.
pub const IOCON_SEQOP: u8 = 1 << 5;
/// Open-drain interrupt output (overrides INTPOL).
pub const IOCON_ODR: u8 = 1 << 2;
/// Active-high interrupt output.
pub const IOCON_INTPOL: u8 = 1 << 1;

/// IOCON value written by `init()`: only SEQOP set, INT is an active-low push-pull output.
const IOCON_INIT: u8 = IOCON_SEQOP;

pub struct Driver<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> Driver<I2C> {
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let addr = 0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self::with_address(i2c, addr)
    }

    /// Only the low 7 bits of `addr` are used.
    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr: addr & 0x7f,
        }
    }
}

fn set_clear(mask: u8, set: bool) -> (u8, u8) {
    if set {
        (mask, 0)
    } else {
        (0, mask)
    }
}

impl<I2C: crate::I2cBus> Driver<I2C> {
    fn update_bits(&mut self, reg: Register, mask: u8, set: bool) -> Result<(), I2C::BusError> {
        let (mask_set, mask_clear) = set_clear(mask, set);
        self.i2c.update_reg(self.addr, reg, mask_set, mask_clear)
    }

    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I2C::BusError>> {
        self.i2c.write_reg(self.addr, reg, value)?;
        Ok(())
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8, Error<I2C::BusError>> {
        Ok(self.i2c.read_reg(self.addr, reg)?)
    }

    pub fn init(&mut self) -> Result<(), Error<I2C::BusError>> {
        self.write_register(Register::IOCON, IOCON_INIT)?;
        // pull-ups only take effect for pins configured as inputs
        self.write_register(Register::GPPU, 0xff)
    }

    pub fn set_port_mode(
        &mut self,
        directions: u8,
        pullups: u8,
        inverted: u8,
    ) -> Result<(), Error<I2C::BusError>> {
        self.write_register(Register::IODIR, directions)?;
        self.write_register(Register::GPPU, pullups)?;
        self.write_register(Register::IPOL, inverted)
    }

    pub fn set_pin_mode(
        &mut self,
        pin: u8,
        mode: crate::PinMode,
        inverted: bool,
    ) -> Result<(), Error<I2C::BusError>> {
        let mask = pin_mask(pin)?;
        self.update_bits(
            Register::IODIR,
            mask,
            mode.direction() == crate::Direction::Input,
        )?;
        self.update_bits(Register::GPPU, mask, mode.pull_up())?;
        self.update_bits(Register::IPOL, mask, inverted)?;
        Ok(())
    }

    pub fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Error<I2C::BusError>> {
        use crate::PortDriver;

        let (mask_high, mask_low) = set_clear(pin_mask(pin)?, state == PinState::High);
        self.set(mask_high, mask_low)
    }

    pub fn read_pin(&mut self, pin: u8) -> Result<PinState, Error<I2C::BusError>> {
        use crate::PortDriver;

        let mask = pin_mask(pin)?;
        Ok(PinState::from(self.get(mask, 0)? != 0))
    }
}

impl<I2C: crate::I2cBus> crate::PortDriver for Driver<I2C> {
    type Error = Error<I2C::BusError>;

    fn set(&mut self, mask_high: u8, mask_low: u8) -> Result<(), Self::Error> {
        if mask_high | mask_low == 0 {
            return Ok(());
        }
        // writing GPIO goes to OLAT, reading it back covers pins changed by someone else
        self.i2c
            .update_reg(self.addr, Register::GPIO, mask_high, mask_low)?;
        Ok(())
    }

    fn is_set(&mut self, mask_high: u8, mask_low: u8) -> Result<u8, Self::Error> {
        let out = self.read_register(Register::OLAT)?;
        Ok((out & mask_high) | (!out & mask_low))
    }

    fn get(&mut self, mask_high: u8, mask_low: u8) -> Result<u8, Self::Error> {
        let in_ = self.read_register(Register::GPIO)?;
        Ok((in_ & mask_high) | (!in_ & mask_low))
    }
}

impl<I2C: crate::I2cBus> crate::PortDriverTotemPole for Driver<I2C> {
    fn set_direction(
        &mut self,
        mask: u8,
        dir: crate::Direction,
        state: bool,
    ) -> Result<(), Self::Error> {
        // set state before switching direction to prevent glitch
        if dir == crate::Direction::Output {
            use crate::PortDriver;
            let (mask_high, mask_low) = set_clear(mask, state);
            self.set(mask_high, mask_low)?;
        }

        self.update_bits(Register::IODIR, mask, dir == crate::Direction::Input)?;
        Ok(())
    }
}

impl<I2C: crate::I2cBus> crate::PortDriverPolarity for Driver<I2C> {
    fn set_polarity(&mut self, mask: u8, inverted: bool) -> Result<(), Self::Error> {
        self.update_bits(Register::IPOL, mask, inverted)?;
        Ok(())
    }
}

impl<I2C: crate::I2cBus> crate::PortDriverPullUp for Driver<I2C> {
    fn set_pull_up(&mut self, mask: u8, enable: bool) -> Result<(), Self::Error> {
        self.update_bits(Register::GPPU, mask, enable)?;
        Ok(())
    }
}

#[cfg(feature = "interrupts")]
impl<I2C: crate::I2cBus> crate::PortDriverInterrupts for Driver<I2C> {
    fn set_interrupt_mirroring(
        &mut self,
        mode: crate::InterruptMirroring,
    ) -> Result<(), Self::Error> {
        let mirror = mode == crate::InterruptMirroring::Or;
        self.update_bits(Register::IOCON, IOCON_MIRROR, mirror)?;
        Ok(())
    }

    fn configure_interrupt(&mut self, trigger: crate::InterruptTrigger) -> Result<(), Self::Error> {
        self.write_register(Register::GPINTEN, 0xff)?;
        match trigger {
            crate::InterruptTrigger::Change => {
                // compare against the previous pin value, DEFVAL is ignored
                self.write_register(Register::INTCON, 0x00)?;
            }
            crate::InterruptTrigger::Falling => {
                self.write_register(Register::INTCON, 0xff)?;
                self.write_register(Register::DEFVAL, 0xff)?;
            }
            crate::InterruptTrigger::Rising => {
                self.write_register(Register::INTCON, 0xff)?;
                self.write_register(Register::DEFVAL, 0x00)?;
            }
        }
        Ok(())
    }

    fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
        self.write_register(Register::GPINTEN, 0x00)
    }

    fn clear_interrupts(&mut self) -> Result<(), Self::Error> {
        self.read_register(Register::INTCAP)?;
        Ok(())
    }
}
