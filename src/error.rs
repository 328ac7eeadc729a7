/// Errors returned by the MCP23008 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying I2C bus reported an error.
    Bus(E),
    /// A pin index outside of `0..=7` was passed.
    ///
    /// This is checked before any bus traffic happens, so the chip is left untouched.
    InvalidPin(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c bus error: {:?}", e),
            Error::InvalidPin(pin) => write!(f, "pin {} does not exist (valid pins are 0-7)", pin),
        }
    }
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(any(test, feature = "std"))]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}

/// Turn a pin index into its bit mask, rejecting pins the chip does not have.
pub(crate) fn pin_mask<E>(pin: u8) -> Result<u8, Error<E>> {
    if pin < 8 {
        Ok(1 << pin)
    } else {
        Err(Error::InvalidPin(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_masks() {
        assert_eq!(pin_mask::<()>(0), Ok(0b0000_0001));
        assert_eq!(pin_mask::<()>(7), Ok(0b1000_0000));
        assert_eq!(pin_mask::<()>(8), Err(Error::InvalidPin(8)));
        assert_eq!(pin_mask::<()>(255), Err(Error::InvalidPin(255)));
    }

    #[test]
    fn display() {
        let e: Error<()> = Error::InvalidPin(9);
        assert_eq!(e.to_string(), "pin 9 does not exist (valid pins are 0-7)");
        let e: Error<&str> = Error::Bus("nack");
        assert_eq!(e.to_string(), "i2c bus error: \"nack\"");
    }
}
