//! Capability traits the pin layer is built on, plus the logical modes callers configure pins with.
//!
//! All masks are 8 bits wide: bit `n` corresponds to pin `GPn` in every register of the chip.

pub trait PortDriver {
    type Error;

    /// Set all pins in `mask_high` to HIGH and all pins in `mask_low` to LOW.
    ///
    /// All pins must change state with a single register write.
    fn set(&mut self, mask_high: u8, mask_low: u8) -> Result<(), Self::Error>;

    /// Check whether pins in `mask_high` were set HIGH and pins in `mask_low` were set LOW.
    ///
    /// This must query the output latch on the chip, there is no local copy to consult.  For
    /// each pin in either of the masks, the returned `u8` has a 1 if it meets the expected state
    /// and a 0 otherwise.  All other bits stay 0.
    fn is_set(&mut self, mask_high: u8, mask_low: u8) -> Result<u8, Self::Error>;

    /// Check whether pins in `mask_high` are driven HIGH and pins in `mask_low` are driven LOW.
    ///
    /// Same result encoding as [`PortDriver::is_set`], but for the sensed pin levels.
    fn get(&mut self, mask_high: u8, mask_low: u8) -> Result<u8, Self::Error>;

    fn toggle(&mut self, mask: u8) -> Result<(), Self::Error> {
        let high = self.is_set(mask, 0)?;
        // currently low pins go high, currently high pins go low
        self.set(!high & mask, high)
    }
}

pub trait PortDriverTotemPole: PortDriver {
    /// Set the direction for all pins in `mask` to direction `dir`.
    ///
    /// To prevent electrical glitches, when making pins outputs, the `state` can be either `true`
    /// or `false` to immediately put the pin HIGH or LOW upon switching.
    fn set_direction(&mut self, mask: u8, dir: Direction, state: bool) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

pub trait PortDriverPolarity: PortDriver {
    /// Set the polarity of all pins in `mask` either `inverted` or not.
    fn set_polarity(&mut self, mask: u8, inverted: bool) -> Result<(), Self::Error>;
}

pub trait PortDriverPullUp: PortDriver {
    /// Enable pull-ups for pins in mask or set the pin to floating if enable is false.
    fn set_pull_up(&mut self, mask: u8, enable: bool) -> Result<(), Self::Error>;
}

/// Interrupt-on-change configuration.
///
/// Only available with the `interrupts` feature.
#[cfg(feature = "interrupts")]
pub trait PortDriverInterrupts: PortDriver {
    /// Choose whether the interrupt output is driven per port or OR-ed across ports.
    fn set_interrupt_mirroring(&mut self, mode: InterruptMirroring) -> Result<(), Self::Error>;

    /// Enable interrupt-on-change for all pins, firing on the given `trigger`.
    ///
    /// The trigger applies to every pin alike.
    fn configure_interrupt(&mut self, trigger: InterruptTrigger) -> Result<(), Self::Error>;

    /// Disable interrupt-on-change for all pins.
    fn disable_interrupt(&mut self) -> Result<(), Self::Error>;

    /// Acknowledge a pending interrupt by reading the capture register.
    fn clear_interrupts(&mut self) -> Result<(), Self::Error>;
}

/// Logical pin configuration, as used by [`set_pin_mode()`][crate::Mcp23008::set_pin_mode].
///
/// The chip encodes inputs as a 1 in its direction register.  Callers never need to know this,
/// the driver translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Output,
    Input,
    /// Input with the internal ~100k pull-up enabled.
    InputPullUp,
}

impl PinMode {
    pub(crate) fn direction(self) -> Direction {
        match self {
            PinMode::Output => Direction::Output,
            PinMode::Input | PinMode::InputPullUp => Direction::Input,
        }
    }

    pub(crate) fn pull_up(self) -> bool {
        self == PinMode::InputPullUp
    }
}

/// Which edge of a pin raises an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptTrigger {
    /// Any change, compared against the previous pin value.
    Change,
    /// Pin reads HIGH, compared against a LOW default value.
    Rising,
    /// Pin reads LOW, compared against a HIGH default value.
    Falling,
}

/// How the interrupt outputs relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMirroring {
    /// Each interrupt output only reflects its own port.
    Separated,
    /// Interrupt outputs are OR-ed together.
    Or,
}

/// Pin Modes
pub mod mode {
    /// Trait for pin-modes which can be used to set a logic level.
    pub trait HasOutput {}
    /// Trait for pin-modes which can be used to read a logic level.
    pub trait HasInput {}

    /// Pin configured as an input.
    pub struct Input;
    impl HasInput for Input {}

    /// Pin configured as an output.
    pub struct Output;
    impl HasOutput for Output {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_mode_bits() {
        assert_eq!(PinMode::Output.direction(), Direction::Output);
        assert!(!PinMode::Output.pull_up());
        assert_eq!(PinMode::Input.direction(), Direction::Input);
        assert!(!PinMode::Input.pull_up());
        assert_eq!(PinMode::InputPullUp.direction(), Direction::Input);
        assert!(PinMode::InputPullUp.pull_up());
    }
}
