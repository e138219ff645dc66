use std::collections::HashSet;

use jetting_grid_core::{
    Fault, GridPoint, Translator,
    config::{N_VALVES, X_MAX, X_MIN, Y_MAX, Y_MIN},
    tables::{WIRING, WiringTables},
};

fn translator() -> Translator {
    Translator::new(&WIRING).unwrap()
}

#[test]
fn every_valve_sits_on_odd_parity() {
    let t = translator();
    for valve in 1..=N_VALVES {
        let p = t.valve_to_gridpoint(valve).unwrap();
        assert!(p.in_bounds(), "valve {} at {}", valve, p);
        assert_eq!((p.x + p.y).rem_euclid(2), 1, "valve {} at {}", valve, p);
    }
}

#[test]
fn valve_round_trip() {
    let t = translator();
    let p = t.valve_to_gridpoint(1).unwrap();
    assert_eq!(t.gridpoint_to_valve(p).unwrap(), 1);

    for valve in 1..=N_VALVES {
        let p = t.valve_to_gridpoint(valve).unwrap();
        assert_eq!(t.gridpoint_to_valve(p).unwrap(), valve);
    }
}

#[test]
fn even_parity_points_have_no_valve() {
    let t = translator();
    for x in X_MIN..=X_MAX {
        for y in Y_MIN..=Y_MAX {
            let p = GridPoint::new(x, y);
            let valve = t.gridpoint_to_valve(p).unwrap();
            assert_eq!(valve != 0, p.is_valve_site(), "{}", p);
        }
    }
}

#[test]
fn output_addresses_are_unique() {
    let t = translator();
    let addresses: HashSet<_> = (1..=N_VALVES)
        .map(|v| {
            let addr = t.valve_to_output_address(v).unwrap();
            (addr.port, addr.bit)
        })
        .collect();
    assert_eq!(addresses.len(), usize::from(N_VALVES));
}

#[test]
fn led_indices_are_unique() {
    let t = translator();
    let mut seen = HashSet::new();
    for x in X_MIN..=X_MAX {
        for y in Y_MIN..=Y_MAX {
            assert!(seen.insert(t.gridpoint_to_led(GridPoint::new(x, y)).unwrap()));
        }
    }
}

#[test]
fn missing_valve_is_detected() {
    let mut point_to_valve = WIRING.point_to_valve;
    // Valve 4 sits at (0, 7)
    assert_eq!(point_to_valve[0][7], 4);
    point_to_valve[0][7] = 0;

    let broken: &'static WiringTables = Box::leak(Box::new(WiringTables {
        point_to_valve,
        point_to_led: WIRING.point_to_led,
        valve_to_port: WIRING.valve_to_port,
        valve_to_bit: WIRING.valve_to_bit,
    }));
    assert_eq!(Translator::new(broken).err(), Some(Fault::ValveUnaccounted(4)));
}
