//! Bit-banged MAX6675 reader
//!
//! Some boards route the amplifier's SO line to a pin that cannot be used
//! as hardware SPI MISO (on the reference board MISO drives a heater), so
//! the word is clocked in by hand:
//!
//! ```text
//! CS   ‾‾\_____________________________/‾‾
//! SCK  _____/‾\_/‾\_ ... _/‾\_____________
//! SO      D15  D14  ...   D0
//!           ^ sampled while SCK is high
//! ```
//!
//! The chip presents D15 when CS falls and shifts out the next bit on each
//! falling SCK edge.

use calor_hal::{Channel, InputPin, OutputPin, SyncSerialInput};

/// Bits per MAX6675 word
const WORD_BITS: u8 = 16;

/// MAX6675 on three GPIO pins
pub struct BitBangSync<CS, SCK, SO> {
    cs: CS,
    sck: SCK,
    so: SO,
}

impl<CS: OutputPin, SCK: OutputPin, SO: InputPin> BitBangSync<CS, SCK, SO> {
    /// Take the pins and park the bus (CS high, SCK low)
    pub fn new(mut cs: CS, mut sck: SCK, so: SO) -> Self {
        cs.set_high();
        sck.set_low();
        Self { cs, sck, so }
    }

    /// Clock in one word
    pub fn read_word(&mut self) -> u16 {
        self.cs.set_low();

        let mut word = 0u16;
        for _ in 0..WORD_BITS {
            self.sck.set_high();
            word = (word << 1) | u16::from(self.so.is_high());
            self.sck.set_low();
        }

        self.cs.set_high();
        word
    }

    /// Release the pins
    pub fn release(self) -> (CS, SCK, SO) {
        (self.cs, self.sck, self.so)
    }
}

impl<CS: OutputPin, SCK: OutputPin, SO: InputPin> SyncSerialInput for BitBangSync<CS, SCK, SO> {
    /// One amplifier per reader; `channel` is not used
    fn sync_read(&mut self, _channel: Channel) -> u16 {
        self.read_word()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Simulated MAX6675 shifting out a fixed word
    struct Chip {
        word: u16,
        selected: Cell<bool>,
        bit: Cell<u8>,
        clock_high: Cell<bool>,
        edges: Cell<u32>,
    }

    impl Chip {
        fn new(word: u16) -> Self {
            Self {
                word,
                selected: Cell::new(false),
                bit: Cell::new(15),
                clock_high: Cell::new(true),
                edges: Cell::new(0),
            }
        }
    }

    struct Cs<'a>(&'a Chip);
    struct Sck<'a>(&'a Chip);
    struct So<'a>(&'a Chip);

    impl OutputPin for Cs<'_> {
        fn set_high(&mut self) {
            self.0.selected.set(false);
        }

        fn set_low(&mut self) {
            self.0.selected.set(true);
            self.0.bit.set(15);
        }
    }

    impl OutputPin for Sck<'_> {
        fn set_high(&mut self) {
            self.0.clock_high.set(true);
        }

        fn set_low(&mut self) {
            let chip = self.0;
            if chip.clock_high.get() && chip.selected.get() {
                chip.edges.set(chip.edges.get() + 1);
                chip.bit.set(chip.bit.get().wrapping_sub(1));
            }
            chip.clock_high.set(false);
        }
    }

    impl InputPin for So<'_> {
        fn is_high(&self) -> bool {
            let chip = self.0;
            // released SO floats high
            !chip.selected.get() || chip.bit.get() > 15 || (chip.word >> chip.bit.get()) & 1 == 1
        }
    }

    #[test]
    fn test_new_parks_bus() {
        let chip = Chip::new(0);
        let _reader = BitBangSync::new(Cs(&chip), Sck(&chip), So(&chip));
        assert!(!chip.selected.get());
        assert!(!chip.clock_high.get());
    }

    #[test]
    fn test_reads_msb_first() {
        let chip = Chip::new(0b0001_1111_0100_0000);
        let mut reader = BitBangSync::new(Cs(&chip), Sck(&chip), So(&chip));

        assert_eq!(reader.sync_read(0), 0b0001_1111_0100_0000);
        assert_eq!(chip.edges.get(), 16);
        assert!(!chip.selected.get());
    }

    #[test]
    fn test_repeated_reads() {
        let chip = Chip::new(0xA5C3);
        let mut reader = BitBangSync::new(Cs(&chip), Sck(&chip), So(&chip));
        assert_eq!(reader.read_word(), 0xA5C3);
        assert_eq!(reader.read_word(), 0xA5C3);
        assert_eq!(chip.edges.get(), 32);
    }

    #[test]
    fn test_release() {
        let chip = Chip::new(0);
        let reader = BitBangSync::new(Cs(&chip), Sck(&chip), So(&chip));
        let (_cs, _sck, so) = reader.release();
        assert!(so.is_high());
    }
}
