//! Built-in protocols, selectable with `presetN`

use crate::{
    config::{N_VALVES, X_MAX, X_MIN, Y_MAX, Y_MIN},
    fault::Fault,
    grid::GridPoint,
    line::Line,
    protocol::Protocol,
    translate::{Translator, Valve},
};

pub const N_PRESETS: u8 = 6;

/// Name of the protocol installed after an unsuccessful download
pub const FALLBACK_NAME: &str = "All valves open";

/// Replace the protocol by preset `index` and prime it. Unknown indices fall
/// back to preset 0.
pub fn load_preset<const N: usize>(
    index: u8,
    protocol: &mut Protocol<N>,
    translator: &Translator,
) -> Result<(), Fault> {
    let index = if index < N_PRESETS {
        index
    } else {
        log::warn!("presets: no preset {}, loading preset 0", index);
        0
    };
    protocol.clear();
    match index {
        1 => walk_over_valves(protocol, translator)?,
        2 => walk_over_manifolds(protocol, translator)?,
        3 => checkerboard(protocol, translator)?,
        4 => even_odd_valves(protocol, translator)?,
        5 => growing_center_square(protocol)?,
        _ => open_all_valves(protocol, translator)?,
    }
    protocol.prime_start();
    log::info!(
        "presets: loaded '{}' with {} lines",
        protocol.name(),
        protocol.len()
    );
    Ok(())
}

/// Replace the protocol by a single line opening every valve, and prime it
pub fn install_fallback<const N: usize>(
    protocol: &mut Protocol<N>,
    translator: &Translator,
) -> Result<(), Fault> {
    protocol.clear();
    protocol.set_name(FALLBACK_NAME);
    protocol.add_line(&valve_line(translator, 1000, 1..=N_VALVES)?)?;
    protocol.prime_start();
    Ok(())
}

fn valve_line(
    translator: &Translator,
    duration: u16,
    valves: impl IntoIterator<Item = Valve>,
) -> Result<Line, Fault> {
    let mut line = Line::new(duration);
    for valve in valves {
        line.push(translator.valve_to_gridpoint(valve)?);
    }
    Ok(line)
}

fn open_all_valves<const N: usize>(p: &mut Protocol<N>, t: &Translator) -> Result<(), Fault> {
    p.set_name("Open all valves");
    p.add_line(&valve_line(t, 1000, 1..=N_VALVES)?)?;
    Ok(())
}

fn walk_over_valves<const N: usize>(p: &mut Protocol<N>, t: &Translator) -> Result<(), Fault> {
    p.set_name("Walk over valves");
    for valve in 1..=N_VALVES {
        p.add_line(&valve_line(t, 500, [valve])?)?;
    }
    Ok(())
}

fn walk_over_manifolds<const N: usize>(p: &mut Protocol<N>, t: &Translator) -> Result<(), Fault> {
    p.set_name("Walk over manifolds");
    for manifold in [1..=28, 29..=56, 57..=84, 85..=112] {
        p.add_line(&valve_line(t, 1000, manifold)?)?;
    }
    Ok(())
}

fn checkerboard<const N: usize>(p: &mut Protocol<N>, t: &Translator) -> Result<(), Fault> {
    p.set_name("Checkerboard");
    p.add_line(&valve_line(t, 1000, (1..=28).chain(57..=84))?)?;
    p.add_line(&valve_line(t, 1000, (29..=56).chain(85..=112))?)?;
    Ok(())
}

fn even_odd_valves<const N: usize>(p: &mut Protocol<N>, t: &Translator) -> Result<(), Fault> {
    p.set_name("Even/odd valves");
    p.add_line(&valve_line(t, 1000, (1..=N_VALVES).filter(|v| v % 2 == 0))?)?;
    p.add_line(&valve_line(t, 1000, (1..=N_VALVES).filter(|v| v % 2 == 1))?)?;
    Ok(())
}

/// Diamond shaped rings of valves growing out of the center
fn growing_center_square<const N: usize>(p: &mut Protocol<N>) -> Result<(), Fault> {
    p.set_name("Growing center square");
    for rung in 0..7 {
        let mut line = Line::new(1000);
        for x in X_MIN..=X_MAX {
            for y in Y_MIN..=Y_MAX {
                let point = GridPoint::new(x, y);
                if point.is_valve_site() && x.abs() + y.abs() == rung * 2 + 1 {
                    line.push(point);
                }
            }
        }
        p.add_line(&line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::WIRING;

    fn load(index: u8) -> Protocol<128> {
        let translator = Translator::new(&WIRING).unwrap();
        let mut protocol = Protocol::new();
        load_preset(index, &mut protocol, &translator).unwrap();
        protocol
    }

    fn first_line(protocol: &mut Protocol<128>) -> Line {
        protocol.advance_and_decode().unwrap();
        protocol.current_line().clone()
    }

    #[test]
    fn line_counts() {
        for (index, name, lines) in [
            (0, "Open all valves", 1),
            (1, "Walk over valves", 112),
            (2, "Walk over manifolds", 4),
            (3, "Checkerboard", 2),
            (4, "Even/odd valves", 2),
            (5, "Growing center square", 7),
        ] {
            assert!(index < N_PRESETS);
            let protocol = load(index);
            assert_eq!(protocol.name(), name);
            assert_eq!(protocol.len(), lines);
            assert_eq!(protocol.position(), None);
        }
    }

    #[test]
    fn unknown_index_opens_all_valves() {
        for index in [N_PRESETS, 42] {
            let mut protocol = load(index);
            assert_eq!(protocol.name(), "Open all valves");
            assert_eq!(first_line(&mut protocol).len(), 112);
        }
    }

    #[test]
    fn checkerboard_halves() {
        let mut protocol = load(3);
        assert_eq!(first_line(&mut protocol).len(), 56);
        assert_eq!(first_line(&mut protocol).len(), 56);
    }

    #[test]
    fn center_square_first_rung() {
        let mut protocol = load(5);
        let line = first_line(&mut protocol);
        assert_eq!(line.len(), 4);
        assert!(line.points().all(|p| p.x.abs() + p.y.abs() == 1));
    }

    #[test]
    fn fallback_opens_all_valves() {
        let translator = Translator::new(&WIRING).unwrap();
        let mut protocol = Protocol::<4>::new();
        install_fallback(&mut protocol, &translator).unwrap();
        assert_eq!(protocol.name(), FALLBACK_NAME);
        assert_eq!(protocol.len(), 1);
        protocol.advance_and_decode().unwrap();
        assert_eq!(protocol.current_line().duration, 1000);
        assert_eq!(protocol.current_line().len(), 112);
    }
}
