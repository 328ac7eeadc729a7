use embedded_hal::i2c::I2c;

/// Blanket trait for types implementing `embedded_hal::i2c::I2c`
pub trait I2cBus: I2c {
    type BusError: From<<Self as embedded_hal::i2c::ErrorType>::Error> + core::fmt::Debug;
}

impl<T, E> I2cBus for T
where
    T: I2c<Error = E>,
    E: embedded_hal::i2c::Error,
{
    type BusError = E;
}

pub(crate) trait I2cExt {
    type Error;

    fn write_reg<R: Into<u8>>(&mut self, addr: u8, reg: R, value: u8) -> Result<(), Self::Error>;
    fn update_reg<R: Into<u8>>(
        &mut self,
        addr: u8,
        reg: R,
        mask_set: u8,
        mask_clear: u8,
    ) -> Result<(), Self::Error>;
    fn read_reg<R: Into<u8>>(&mut self, addr: u8, reg: R) -> Result<u8, Self::Error>;
}

impl<I2C: I2cBus> I2cExt for I2C {
    type Error = I2C::BusError;

    fn write_reg<R: Into<u8>>(&mut self, addr: u8, reg: R, value: u8) -> Result<(), Self::Error> {
        let reg = reg.into();
        #[cfg(feature = "defmt")]
        defmt::trace!("{=u8:#04x}: write reg {=u8:#04x} <- {=u8:#010b}", addr, reg, value);
        self.write(addr, &[reg, value])?;
        Ok(())
    }

    fn update_reg<R: Into<u8>>(
        &mut self,
        addr: u8,
        reg: R,
        mask_set: u8,
        mask_clear: u8,
    ) -> Result<(), Self::Error> {
        let reg = reg.into();
        let mut value = self.read_reg(addr, reg)?;
        value |= mask_set;
        value &= !mask_clear;
        self.write_reg(addr, reg, value)
    }

    fn read_reg<R: Into<u8>>(&mut self, addr: u8, reg: R) -> Result<u8, Self::Error> {
        let reg = reg.into();
        let mut buf = [0x00];
        self.write_read(addr, &[reg], &mut buf)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("{=u8:#04x}: read reg {=u8:#04x} -> {=u8:#010b}", addr, reg, buf[0]);
        Ok(buf[0])
    }
}
