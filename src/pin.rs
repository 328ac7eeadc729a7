use core::marker::PhantomData;
use embedded_hal::digital::{self as hal_digital, PinState};

/// Representation of one MCP23008 pin.
///
/// `Pin` is not constructed directly, this type is created by instanciating an
/// [`Mcp23008`][crate::Mcp23008] and then getting access to all its pins using the `.split()`
/// method.  Every method locks the device mutex for its whole duration, so a read-modify-write
/// done on behalf of one pin can not interleave with another.
pub struct Pin<'a, MODE, MUTEX> {
    pin_mask: u8,
    port_driver: &'a MUTEX,
    _m: PhantomData<MODE>,
}

impl<'a, MODE, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    pub(crate) fn new(pin_number: u8, port_driver: &'a MUTEX) -> Self {
        assert!(pin_number < 8);
        Self {
            pin_mask: 1 << pin_number,
            port_driver,
            _m: PhantomData,
        }
    }

    pub fn pin_mask(&self) -> u8 {
        self.pin_mask
    }

    /// Index of this pin in the chip registers (`0..=7`).
    pub fn pin_number(&self) -> u8 {
        self.pin_mask.trailing_zeros() as u8
    }

    fn into_mode<NEW>(self) -> Pin<'a, NEW, MUTEX> {
        Pin {
            pin_mask: self.pin_mask,
            port_driver: self.port_driver,
            _m: PhantomData,
        }
    }
}

impl<'a, MODE, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver + crate::PortDriverTotemPole,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Configure this pin as an input.
    ///
    /// The pull-up and polarity settings of the pin are left as they are.
    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, MUTEX>, PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Input, false))?;
        Ok(self.into_mode())
    }

    /// Configure this pin as an output with an initial LOW state.
    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Output, false))?;
        Ok(self.into_mode())
    }

    /// Configure this pin as an output with an initial HIGH state.
    pub fn into_output_high(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Output, true))?;
        Ok(self.into_mode())
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver + crate::PortDriverPullUp,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Enable or disable the internal pull-up resistor of this pin.
    pub fn enable_pull_up(&mut self, enable: bool) -> Result<(), PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_pull_up(self.pin_mask, enable))
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver + crate::PortDriverPolarity,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Turn on hardware polarity inversion for this pin.
    pub fn into_inverted(mut self) -> Result<Self, PD::Error> {
        self.set_inverted(true)?;
        Ok(self)
    }

    /// Set hardware polarity inversion for this pin.
    ///
    /// An inverted pin reports LOW for a HIGH level on the pin and vice versa.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_polarity(self.pin_mask, inverted))
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    pub fn is_high(&self) -> Result<bool, PD::Error> {
        self.port_driver
            .lock(|drv| Ok(drv.get(self.pin_mask, 0)? == self.pin_mask))
    }

    pub fn is_low(&self) -> Result<bool, PD::Error> {
        self.port_driver
            .lock(|drv| Ok(drv.get(0, self.pin_mask)? == self.pin_mask))
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    pub fn set_high(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.set(self.pin_mask, 0))
    }

    pub fn set_low(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.set(0, self.pin_mask))
    }

    pub fn set_state(&mut self, state: PinState) -> Result<(), PD::Error> {
        match state {
            PinState::High => self.set_high(),
            PinState::Low => self.set_low(),
        }
    }

    /// Check the output latch of this pin.  This is a bus read, not a cached value.
    pub fn is_set_high(&self) -> Result<bool, PD::Error> {
        self.port_driver
            .lock(|drv| Ok(drv.is_set(self.pin_mask, 0)? == self.pin_mask))
    }

    pub fn is_set_low(&self) -> Result<bool, PD::Error> {
        self.port_driver
            .lock(|drv| Ok(drv.is_set(0, self.pin_mask)? == self.pin_mask))
    }

    pub fn toggle(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.toggle(self.pin_mask))
    }
}

impl<'a, MODE, MUTEX, PD> hal_digital::ErrorType for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: crate::PortMutex<Port = PD>,
{
    type Error = PD::Error;
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> hal_digital::InputPin for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::OutputPin for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}
