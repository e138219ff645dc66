//! Static wiring tables
//!
//! ```text
//!     -7 -6 -5 -4 -3 -2 -1  0  1  2  3  4  5  6  7
//!    ┌─────────────────────────────────────────────┐
//!  7 │ -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  - │
//!  6 │ ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ● │
//!    │                     ...                     │
//! -6 │ ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ● │
//! -7 │ -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  -  ●  - │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! Valves sit where `x + y` is odd. The grid tables are indexed
//! `[Y_MAX - y][x - X_MIN]`.
//!
//! The valve to port/bit arrays must follow the physical wiring inside the
//! electronics cabinet: 8 MOSFET boards of 16 channels, of which the first 14
//! drive a valve and the last two are spares.

#![allow(clippy::unreadable_literal)]

use crate::config::{AXIS_LEN, LED_AXIS_LEN, N_VALVES};

const N: usize = N_VALVES as usize;

/// All wiring-derived look-up tables the translator is built from.
pub struct WiringTables {
    pub point_to_valve: [[u8; AXIS_LEN]; AXIS_LEN],
    pub point_to_led: [[u8; LED_AXIS_LEN]; LED_AXIS_LEN],
    pub valve_to_port: [u8; N],
    pub valve_to_bit: [u8; N],
}

#[rustfmt::skip]
pub static WIRING: WiringTables = WiringTables {
    point_to_valve: [
        // -7   -6   -5   -4   -3   -2   -1    0    1    2    3    4    5    6    7
        [   0,   1,   0,   2,   0,   3,   0,   4,   0,   5,   0,   6,   0,   7,   0 ], //  7
        [  63,   0,  70,   0,  77,   0,  84,   0,  91,   0,  98,   0, 105,   0, 112 ], //  6
        [   0,   8,   0,   9,   0,  10,   0,  11,   0,  12,   0,  13,   0,  14,   0 ], //  5
        [  62,   0,  69,   0,  76,   0,  83,   0,  90,   0,  97,   0, 104,   0, 111 ], //  4
        [   0,  15,   0,  16,   0,  17,   0,  18,   0,  19,   0,  20,   0,  21,   0 ], //  3
        [  61,   0,  68,   0,  75,   0,  82,   0,  89,   0,  96,   0, 103,   0, 110 ], //  2
        [   0,  22,   0,  23,   0,  24,   0,  25,   0,  26,   0,  27,   0,  28,   0 ], //  1
        [  60,   0,  67,   0,  74,   0,  81,   0,  88,   0,  95,   0, 102,   0, 109 ], //  0
        [   0,  29,   0,  30,   0,  31,   0,  32,   0,  33,   0,  34,   0,  35,   0 ], // -1
        [  59,   0,  66,   0,  73,   0,  80,   0,  87,   0,  94,   0, 101,   0, 108 ], // -2
        [   0,  36,   0,  37,   0,  38,   0,  39,   0,  40,   0,  41,   0,  42,   0 ], // -3
        [  58,   0,  65,   0,  72,   0,  79,   0,  86,   0,  93,   0, 100,   0, 107 ], // -4
        [   0,  43,   0,  44,   0,  45,   0,  46,   0,  47,   0,  48,   0,  49,   0 ], // -5
        [  57,   0,  64,   0,  71,   0,  78,   0,  85,   0,  92,   0,  99,   0, 106 ], // -6
        [   0,  50,   0,  51,   0,  52,   0,  53,   0,  54,   0,  55,   0,  56,   0 ], // -7
    ],
    // Serpentine wired 16x16 matrix, the extra column and row (x = 8, y = -8)
    // only carry status pixels.
    point_to_led: [
        // -7   -6   -5   -4   -3   -2   -1    0    1    2    3    4    5    6    7    8
        [  15,  14,  13,  12,  11,  10,   9,   8,   7,   6,   5,   4,   3,   2,   1,   0 ], //  7
        [  16,  17,  18,  19,  20,  21,  22,  23,  24,  25,  26,  27,  28,  29,  30,  31 ], //  6
        [  47,  46,  45,  44,  43,  42,  41,  40,  39,  38,  37,  36,  35,  34,  33,  32 ], //  5
        [  48,  49,  50,  51,  52,  53,  54,  55,  56,  57,  58,  59,  60,  61,  62,  63 ], //  4
        [  79,  78,  77,  76,  75,  74,  73,  72,  71,  70,  69,  68,  67,  66,  65,  64 ], //  3
        [  80,  81,  82,  83,  84,  85,  86,  87,  88,  89,  90,  91,  92,  93,  94,  95 ], //  2
        [ 111, 110, 109, 108, 107, 106, 105, 104, 103, 102, 101, 100,  99,  98,  97,  96 ], //  1
        [ 112, 113, 114, 115, 116, 117, 118, 119, 120, 121, 122, 123, 124, 125, 126, 127 ], //  0
        [ 143, 142, 141, 140, 139, 138, 137, 136, 135, 134, 133, 132, 131, 130, 129, 128 ], // -1
        [ 144, 145, 146, 147, 148, 149, 150, 151, 152, 153, 154, 155, 156, 157, 158, 159 ], // -2
        [ 175, 174, 173, 172, 171, 170, 169, 168, 167, 166, 165, 164, 163, 162, 161, 160 ], // -3
        [ 176, 177, 178, 179, 180, 181, 182, 183, 184, 185, 186, 187, 188, 189, 190, 191 ], // -4
        [ 207, 206, 205, 204, 203, 202, 201, 200, 199, 198, 197, 196, 195, 194, 193, 192 ], // -5
        [ 208, 209, 210, 211, 212, 213, 214, 215, 216, 217, 218, 219, 220, 221, 222, 223 ], // -6
        [ 239, 238, 237, 236, 235, 234, 233, 232, 231, 230, 229, 228, 227, 226, 225, 224 ], // -7
        [ 240, 241, 242, 243, 244, 245, 246, 247, 248, 249, 250, 251, 252, 253, 254, 255 ], // -8
    ],
    valve_to_port: [
        // valves 1 - 14 on port 0, 15 - 28 on port 1, ...
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
        2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
        3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
        4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
        5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
        6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
        7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    ],
    valve_to_bit: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13,
    ],
};
