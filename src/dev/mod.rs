//! The device module contains the internals of the MCP23008 driver.
//!
//! In most cases you will not need anything from here explicitly, the exposed types at the root of
//! the crate should be enough.  The `IOCON_*` bit constants are useful together with
//! [`Mcp23008::write_register()`][crate::Mcp23008::write_register].

pub mod mcp23008;
