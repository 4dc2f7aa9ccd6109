//! WebAssembly bindings for the emu6502 emulator.
//!
//! This module provides JavaScript-callable interfaces to the CPU, so test
//! ROMs can be stepped and inspected from a browser.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::WasmMachine;
