//! Protocol lines and their packed bitmask form
//!
//! A [`Line`] is a duration-timed list of grid points whose valves are open
//! all at once; every unmentioned valve is closed. A [`PackedLine`] encodes the
//! same list as one 16-bit mask per grid row, which is what the protocol store
//! keeps in memory.

use core::fmt;

use crate::{
    config::{AXIS_LEN, MAX_POINTS_PER_LINE, X_MIN, Y_MAX},
    fault::Fault,
    grid::GridPoint,
};

/// Duration-timed list of grid points, always terminated by
/// [`GridPoint::NULL`].
#[derive(Clone, PartialEq, Eq)]
pub struct Line {
    /// Time duration in [ms]
    pub duration: u16,
    // +1 for the end sentinel
    points: [GridPoint; MAX_POINTS_PER_LINE + 1],
    len: usize,
}

impl Line {
    pub const fn new(duration: u16) -> Self {
        Self {
            duration,
            points: [GridPoint::NULL; MAX_POINTS_PER_LINE + 1],
            len: 0,
        }
    }

    /// Build a line from a list of points, `None` when they don't fit.
    pub fn from_points(duration: u16, points: &[GridPoint]) -> Option<Self> {
        let mut line = Self::new(duration);
        for &p in points {
            if !line.push(p) {
                return None;
            }
        }
        Some(line)
    }

    /// Append a point in front of the end sentinel.
    ///
    /// Returns false when the line is full or the point is the sentinel itself.
    pub fn push(&mut self, p: GridPoint) -> bool {
        if p.is_null() || self.len == MAX_POINTS_PER_LINE {
            return false;
        }
        self.points[self.len] = p;
        self.len += 1;
        self.points[self.len] = GridPoint::NULL;
        true
    }

    pub fn clear(&mut self) {
        self.points[..=self.len].fill(GridPoint::NULL);
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points up to, not including, the end sentinel
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.points[..self.len].iter().copied()
    }

    /// Points including the end sentinel
    pub fn terminated(&self) -> &[GridPoint] {
        &self.points[..=self.len]
    }

    /// Pack the points into row bitmasks, OR-ing into whatever `output`
    /// already holds.
    ///
    /// Precondition: `output` was cleared with [`PackedLine::clear`] before the
    /// first pack of a line. Use [`Line::pack`] to get a fresh packed line.
    pub fn pack_into(&self, output: &mut PackedLine) -> Result<(), Fault> {
        for p in self.points() {
            let col = i16::from(p.x) - i16::from(X_MIN);
            let row = i16::from(Y_MAX) - i16::from(p.y);
            let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
                return Err(Fault::PackOutOfBounds(p));
            };
            if col >= AXIS_LEN || row >= AXIS_LEN {
                return Err(Fault::PackOutOfBounds(p));
            }
            output.masks[row] |= 1 << col;
        }
        output.duration = self.duration;
        Ok(())
    }

    pub fn pack(&self) -> Result<PackedLine, Fault> {
        let mut packed = PackedLine::EMPTY;
        self.pack_into(&mut packed)?;
        Ok(packed)
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("duration", &self.duration)
            .field("points", &&self.points[..self.len])
            .finish()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ms", self.duration)?;
        for p in self.points() {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

/// A [`Line`] packed into one bitmask per PCS row.
///
/// Row 0 is `y = Y_MAX`, bit 0 is `x = X_MIN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackedLine {
    /// Time duration in [ms]
    pub duration: u16,
    pub masks: [u16; AXIS_LEN],
}

impl PackedLine {
    pub const EMPTY: Self = Self {
        duration: 0,
        masks: [0; AXIS_LEN],
    };

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Unpack the bitmasks into `output`, replacing its contents. Points come
    /// out row-major in ascending order, whatever order they were packed in.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn unpack_into(&self, output: &mut Line) -> Result<(), Fault> {
        output.clear();

        for (row, &mask) in self.masks.iter().enumerate() {
            if mask == 0 {
                continue;
            }
            if mask >> AXIS_LEN != 0 {
                return Err(Fault::CorruptPackedLine(row as u8));
            }
            let y = Y_MAX - row as i8;
            for bit in 0..AXIS_LEN {
                if (mask >> bit) & 1 == 1 {
                    // At most AXIS_LEN * AXIS_LEN points, which always fits
                    output.push(GridPoint::new(X_MIN + bit as i8, y));
                }
            }
        }

        output.duration = self.duration;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_sentinel() {
        let mut line = Line::new(100);
        assert!(line.push(GridPoint::new(1, 2)));
        assert_eq!(line.terminated(), &[GridPoint::new(1, 2), GridPoint::NULL]);
        assert!(!line.push(GridPoint::NULL));
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn full_line_rejects_push() {
        let mut line = Line::new(0);
        for _ in 0..MAX_POINTS_PER_LINE {
            assert!(line.push(GridPoint::new(0, 1)));
        }
        assert!(!line.push(GridPoint::new(0, 1)));
        assert_eq!(line.terminated().last(), Some(&GridPoint::NULL));
    }

    #[test]
    fn pack_sets_row_and_column_bits() {
        let line = Line::from_points(500, &[GridPoint::new(-7, 7), GridPoint::new(7, -7)]).unwrap();
        let packed = line.pack().unwrap();
        assert_eq!(packed.duration, 500);
        assert_eq!(packed.masks[0], 0b1);
        assert_eq!(packed.masks[14], 1 << 14);
        assert!(packed.masks[1..14].iter().all(|&m| m == 0));
    }

    #[test]
    fn pack_into_accumulates() {
        let mut packed = PackedLine::EMPTY;
        Line::from_points(10, &[GridPoint::new(0, 1)])
            .unwrap()
            .pack_into(&mut packed)
            .unwrap();
        Line::from_points(20, &[GridPoint::new(1, 0)])
            .unwrap()
            .pack_into(&mut packed)
            .unwrap();

        let mut out = Line::default();
        packed.unpack_into(&mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.duration, 20);

        packed.clear();
        assert_eq!(packed, PackedLine::EMPTY);
    }

    #[test]
    fn pack_out_of_bounds_faults() {
        let line = Line::from_points(500, &[GridPoint::new(0, 1), GridPoint::new(8, 8)]).unwrap();
        assert_eq!(line.pack(), Err(Fault::PackOutOfBounds(GridPoint::new(8, 8))));

        let line = Line::from_points(500, &[GridPoint::new(-8, 0)]).unwrap();
        assert_eq!(line.pack(), Err(Fault::PackOutOfBounds(GridPoint::new(-8, 0))));
    }

    #[test]
    fn unpack_orders_row_major() {
        let line = Line::from_points(
            40,
            &[GridPoint::new(3, -2), GridPoint::new(-1, 6), GridPoint::new(-5, 6)],
        )
        .unwrap();
        let mut out = Line::default();
        line.pack().unwrap().unpack_into(&mut out).unwrap();

        let points: Vec<_> = out.points().collect();
        assert_eq!(
            points,
            vec![GridPoint::new(-5, 6), GridPoint::new(-1, 6), GridPoint::new(3, -2)]
        );
    }

    #[test]
    fn unpack_replaces_previous_contents() {
        let mut out = Line::from_points(1, &[GridPoint::new(0, 1), GridPoint::new(1, 0)]).unwrap();
        PackedLine::EMPTY.unpack_into(&mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.terminated(), &[GridPoint::NULL]);
    }

    #[test]
    fn unpack_rejects_bits_outside_axis() {
        let mut packed = PackedLine::EMPTY;
        packed.masks[3] = 1 << 15;
        let mut out = Line::default();
        assert_eq!(packed.unpack_into(&mut out), Err(Fault::CorruptPackedLine(3)));
    }

    #[test]
    fn display_lists_points() {
        let line = Line::from_points(250, &[GridPoint::new(0, 1), GridPoint::new(-2, 3)]).unwrap();
        assert_eq!(line.to_string(), "250 ms\n(0, 1)(-2, 3)");
    }
}
