//! OOK Pulse Encoder
//!
//! Turns a numeric code into the pulse train understood by cheap 433 MHz
//! receivers (PT2262, EV1527, HT6P20B and friends).
//!
//! # Frame layout
//!
//! Each data bit is one symbol, most significant bit first, followed by a
//! sync symbol. A symbol is a high/low pair whose durations are multiples
//! of the protocol's base pulse length:
//!
//! ```text
//!        ┌─┐           ┌───┐         ┌─┐
//! zero:  │ └───┘  one: │   └─┘ sync: │ └──────── ... ───┘
//!         1   3         3   1         1       31
//! ```
//!
//! Inverted protocols start each symbol low instead of high.

use heapless::Vec;

use crate::config::MAX_CODE_BITS;

/// Maximum pulses in one frame (two per data bit plus the sync pair)
pub const MAX_FRAME_PULSES: usize = 2 * MAX_CODE_BITS as usize + 2;

/// One encoded frame
pub type Frame = Vec<Pulse, MAX_FRAME_PULSES>;

/// A symbol as multiples of the base pulse length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighLow {
    /// Length of the leading level
    pub high: u8,
    /// Length of the trailing level
    pub low: u8,
}

impl HighLow {
    /// Create a symbol
    #[must_use]
    pub const fn new(high: u8, low: u8) -> Self {
        Self { high, low }
    }
}

/// Timing description of one RF protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RfProtocol {
    /// Base pulse length in microseconds
    pub pulse_length_us: u16,
    /// Sync symbol sent after the data bits
    pub sync: HighLow,
    /// Symbol for a 0 bit
    pub zero: HighLow,
    /// Symbol for a 1 bit
    pub one: HighLow,
    /// Start symbols low instead of high
    pub inverted: bool,
}

impl RfProtocol {
    /// Number of built-in protocols
    pub const COUNT: u8 = 12;

    /// Protocol used when an unknown id is requested
    pub const FALLBACK_ID: u8 = 1;

    /// Look up a protocol by its 1-based id
    #[must_use]
    pub fn by_id(id: u8) -> Option<&'static Self> {
        PROTOCOLS.get(usize::from(id).checked_sub(1)?)
    }

    /// Look up a protocol, falling back to protocol 1 for unknown ids
    #[must_use]
    pub fn resolve(id: u8) -> &'static Self {
        Self::by_id(id).unwrap_or(&PROTOCOLS[0])
    }

    /// Expand a symbol into its two pulses
    #[must_use]
    pub fn symbol(&self, symbol: HighLow) -> [Pulse; 2] {
        let first = !self.inverted;
        let len = u32::from(self.pulse_length_us);
        [
            Pulse::new(first, u32::from(symbol.high) * len),
            Pulse::new(!first, u32::from(symbol.low) * len),
        ]
    }
}

/// Built-in protocol table, index 0 is protocol 1
pub const PROTOCOLS: [RfProtocol; RfProtocol::COUNT as usize] = [
    // 1: PT2262 / EV1527
    proto(350, (1, 31), (1, 3), (3, 1), false),
    // 2
    proto(650, (1, 10), (1, 2), (2, 1), false),
    // 3
    proto(100, (30, 71), (4, 11), (9, 6), false),
    // 4
    proto(380, (1, 6), (1, 3), (3, 1), false),
    // 5
    proto(500, (6, 14), (1, 2), (2, 1), false),
    // 6: HT6P20B
    proto(450, (23, 1), (1, 2), (2, 1), true),
    // 7: HS2303-PT
    proto(150, (2, 62), (1, 6), (6, 1), false),
    // 8: Conrad RS-200 RX
    proto(200, (3, 130), (7, 16), (3, 16), false),
    // 9: Conrad RS-200 TX
    proto(200, (130, 7), (16, 7), (16, 3), true),
    // 10: 1ByOne doorbell
    proto(365, (18, 1), (3, 1), (1, 3), true),
    // 11: HT12E
    proto(270, (36, 1), (1, 2), (2, 1), true),
    // 12: SM5212
    proto(320, (36, 1), (1, 2), (2, 1), true),
];

const fn proto(
    pulse_length_us: u16,
    sync: (u8, u8),
    zero: (u8, u8),
    one: (u8, u8),
    inverted: bool,
) -> RfProtocol {
    RfProtocol {
        pulse_length_us,
        sync: HighLow::new(sync.0, sync.1),
        zero: HighLow::new(zero.0, zero.1),
        one: HighLow::new(one.0, one.1),
        inverted,
    }
}

/// One level held on the transmit line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pulse {
    /// Line level (true = high)
    pub high: bool,
    /// Hold time in microseconds
    pub duration_us: u32,
}

impl Pulse {
    /// Create a pulse
    #[must_use]
    pub const fn new(high: bool, duration_us: u32) -> Self {
        Self { high, duration_us }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Pulse {
    fn format(&self, f: defmt::Formatter) {
        let level = if self.high { "H" } else { "L" };
        defmt::write!(f, "{}{}us", level, self.duration_us);
    }
}

/// Encode `bit_width` bits of `code`, MSB first, followed by the sync symbol
///
/// Widths above [`MAX_CODE_BITS`] are clamped.
#[must_use]
pub fn encode_frame(protocol: &RfProtocol, code: u32, bit_width: u8) -> Frame {
    let bits = bit_width.min(MAX_CODE_BITS);
    let mut frame = Frame::new();

    for i in (0..bits).rev() {
        let symbol = if code & (1 << i) != 0 {
            protocol.one
        } else {
            protocol.zero
        };
        // Capacity is sized for MAX_CODE_BITS symbols plus sync
        let _ = frame.extend_from_slice(&protocol.symbol(symbol));
    }
    let _ = frame.extend_from_slice(&protocol.symbol(protocol.sync));

    frame
}

/// Total airtime of a frame in microseconds
#[must_use]
pub fn frame_duration_us(frame: &Frame) -> u32 {
    frame.iter().map(|p| p.duration_us).sum()
}
