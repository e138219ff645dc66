//! Translations between grid points, valve numbers, LED indices and output
//! addresses.
//!
//! Every look-up is bounds-checked and reports a [`Fault`] on violation.

use crate::{
    channels::OutputAddress,
    config::{AXIS_LEN, N_VALVES, X_MIN, Y_MAX},
    fault::Fault,
    grid::GridPoint,
    tables::WiringTables,
};

/// Valve number 1 to 112, 0 indicating 'no valve'
pub type Valve = u8;

const N: usize = N_VALVES as usize;

/// Coordinate translator built once at start-up from the wiring tables
pub struct Translator {
    tables: &'static WiringTables,
    /// Reverse look-up, indexed by `valve - 1`
    valve_to_point: [GridPoint; N],
}

impl Translator {
    /// Build the reverse valve look-up and check that all valves from 1 to
    /// `N_VALVES` are accounted for.
    pub fn new(tables: &'static WiringTables) -> Result<Self, Fault> {
        let mut valve_to_point = [GridPoint::NULL; N];

        for (row, valves) in tables.point_to_valve.iter().enumerate() {
            for (col, &valve) in valves.iter().enumerate() {
                if valve == 0 || valve > N_VALVES {
                    continue;
                }
                valve_to_point[usize::from(valve - 1)] = point_at(row, col);
            }
        }

        for (idx, p) in valve_to_point.iter().enumerate() {
            if p.is_null() {
                let valve = u8::try_from(idx + 1).unwrap_or(u8::MAX);
                log::error!("translate: valve {} missing from the grid table", valve);
                return Err(Fault::ValveUnaccounted(valve));
            }
        }

        Ok(Self {
            tables,
            valve_to_point,
        })
    }

    /// Translate a grid point to its valve number, 0 when no valve is there
    pub fn gridpoint_to_valve(&self, p: GridPoint) -> Result<Valve, Fault> {
        let (row, col) = grid_index(p, AXIS_LEN).ok_or(Fault::PointToValve(p))?;
        Ok(self.tables.point_to_valve[row][col])
    }

    /// Translate a grid point to its LED index. Also valid where no valve
    /// exists.
    pub fn gridpoint_to_led(&self, p: GridPoint) -> Result<u8, Fault> {
        // The LED table has one spare row and column, but only PCS points are
        // accepted here.
        let (row, col) = grid_index(p, AXIS_LEN).ok_or(Fault::PointToLed(p))?;
        Ok(self.tables.point_to_led[row][col])
    }

    pub fn valve_to_gridpoint(&self, valve: Valve) -> Result<GridPoint, Fault> {
        if valve == 0 || valve > N_VALVES {
            return Err(Fault::ValveToPoint(valve));
        }
        Ok(self.valve_to_point[usize::from(valve - 1)])
    }

    pub fn valve_to_output_address(&self, valve: Valve) -> Result<OutputAddress, Fault> {
        if valve == 0 || valve > N_VALVES {
            return Err(Fault::ValveToAddress(valve));
        }
        let idx = usize::from(valve - 1);
        Ok(OutputAddress {
            port: self.tables.valve_to_port[idx],
            bit: self.tables.valve_to_bit[idx],
        })
    }

    /// Shorthand for the full chain grid point -> valve -> output address
    pub fn gridpoint_to_output_address(&self, p: GridPoint) -> Result<OutputAddress, Fault> {
        self.valve_to_output_address(self.gridpoint_to_valve(p)?)
    }
}

/// Row and column into a `[Y_MAX - y][x - X_MIN]` indexed table
fn grid_index(p: GridPoint, len: usize) -> Option<(usize, usize)> {
    let col = usize::try_from(i16::from(p.x) - i16::from(X_MIN)).ok()?;
    let row = usize::try_from(i16::from(Y_MAX) - i16::from(p.y)).ok()?;
    (row < len && col < len).then_some((row, col))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn point_at(row: usize, col: usize) -> GridPoint {
    GridPoint::new(X_MIN + col as i8, Y_MAX - row as i8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::WIRING;

    fn translator() -> Translator {
        Translator::new(&WIRING).unwrap()
    }

    #[test]
    fn corner_points() {
        let t = translator();
        assert_eq!(t.gridpoint_to_valve(GridPoint::new(-6, 7)).unwrap(), 1);
        assert_eq!(t.gridpoint_to_valve(GridPoint::new(7, 6)).unwrap(), 112);
        assert_eq!(t.gridpoint_to_valve(GridPoint::new(0, 0)).unwrap(), 0);
        assert_eq!(t.gridpoint_to_led(GridPoint::new(-7, 7)).unwrap(), 15);
        assert_eq!(t.gridpoint_to_led(GridPoint::new(0, 0)).unwrap(), 119);
    }

    #[test]
    fn out_of_bounds_points_fault() {
        let t = translator();
        let p = GridPoint::new(8, 0);
        assert_eq!(t.gridpoint_to_valve(p), Err(Fault::PointToValve(p)));
        assert_eq!(t.gridpoint_to_led(p), Err(Fault::PointToLed(p)));
        assert_eq!(
            t.gridpoint_to_valve(GridPoint::NULL),
            Err(Fault::PointToValve(GridPoint::NULL))
        );
    }

    #[test]
    fn valve_bounds() {
        let t = translator();
        assert_eq!(t.valve_to_gridpoint(0), Err(Fault::ValveToPoint(0)));
        assert_eq!(t.valve_to_gridpoint(113), Err(Fault::ValveToPoint(113)));
        assert_eq!(t.valve_to_output_address(0), Err(Fault::ValveToAddress(0)));
        assert_eq!(
            t.valve_to_output_address(15).unwrap(),
            OutputAddress { port: 1, bit: 0 }
        );
        assert_eq!(
            t.valve_to_output_address(112).unwrap(),
            OutputAddress { port: 7, bit: 13 }
        );
    }
}
