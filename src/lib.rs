//! # wordcraft
//!
//! Bit-exact record overlays on 16-bit word-addressed memory, and the Courier
//! type and constant model that follows the same binary-layout rules.
//!
//! Records are declared as tables of [field::Field]s (full words, MSB-first bit
//! ranges, or nested records), validated once, and then read and written
//! through any [memory::Memory] implementation. A `set` rewrites only the bits
//! of its own field; reserved bits and neighbouring fields are preserved.
//!
//! ## Example
//!
//! ```
//! use wordcraft::layouts::GLOBAL_OVERHEAD;
//! use wordcraft::memory::WordMemory;
//!
//! let mut mem = WordMemory::new(4);
//! GLOBAL_OVERHEAD.validate().unwrap();
//!
//! GLOBAL_OVERHEAD.set(&mut mem, 2, "word.gfi", 0x2A).unwrap();
//! GLOBAL_OVERHEAD.set_bool(&mut mem, 2, "word.codelinks", true).unwrap();
//!
//! assert_eq!(mem.as_slice()[3], (0x2A << 2) | 1);
//! assert_eq!(GLOBAL_OVERHEAD.get(&mem, 2, "word.gfi"), Ok(0x2A));
//! ```

pub mod bits;
pub mod constant;
pub mod errors;
pub mod field;
pub mod layouts;
pub mod memory;
pub mod record;
#[cfg(feature = "serde")]
pub mod serde;
pub mod types;
