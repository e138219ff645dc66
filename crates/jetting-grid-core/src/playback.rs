//! Timed playback of the protocol onto the valves and the LED matrix

use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

use crate::{
    channels::OutputChannels,
    fault::Fault,
    leds::{ACTIVE_COLOR, LedMatrix, RELEASED_COLOR},
    line::Line,
    ports::PortExpander,
    protocol::Protocol,
    translate::Translator,
};

/// Manual cursor moves from the control link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Forward,
    Back,
    To(usize),
}

pub struct Player<E: PortExpander> {
    translator: Translator,
    channels: OutputChannels<E>,
    /// Activation time of the current line
    tick: Instant,
}

impl<E: PortExpander> Player<E> {
    pub fn new(translator: Translator, channels: OutputChannels<E>) -> Self {
        Self {
            translator,
            channels,
            tick: Instant::from_ticks(0),
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn channels(&self) -> &OutputChannels<E> {
        &self.channels
    }

    /// Configure the port expanders and close every valve
    pub fn init(&mut self) -> Result<(), Fault> {
        self.channels.init()
    }

    /// Advance to the next line once the current one has been active for its
    /// duration. Returns true when a new line was activated.
    pub fn update<const N: usize>(
        &mut self,
        protocol: &mut Protocol<N>,
        leds: &mut LedMatrix,
        now: Instant,
    ) -> Result<bool, Fault> {
        if protocol.is_empty() {
            return Ok(false);
        }
        let duration = Duration::from_millis(u64::from(protocol.current_line().duration));
        if now.saturating_duration_since(self.tick) < duration {
            return Ok(false);
        }
        protocol.advance_and_decode()?;
        self.activate(protocol, leds, now)?;
        Ok(true)
    }

    /// Move the cursor by hand and activate the line it lands on right away.
    /// A jump does not update the last activated record, so the outgoing line
    /// is released on the LED matrix first.
    pub fn jump<const N: usize>(
        &mut self,
        protocol: &mut Protocol<N>,
        leds: &mut LedMatrix,
        jump: Jump,
        now: Instant,
    ) -> Result<(), Fault> {
        if protocol.is_empty() {
            return Ok(());
        }
        self.release(protocol, leds)?;
        match jump {
            Jump::Forward => protocol.step_forward()?,
            Jump::Back => protocol.step_back()?,
            Jump::To(line_no) => protocol.goto_line(line_no)?,
        }
        self.activate(protocol, leds, now)
    }

    /// Show the current line as released. Needed before anything replaces
    /// the line without going through a timed advance.
    pub fn release<const N: usize>(
        &self,
        protocol: &Protocol<N>,
        leds: &mut LedMatrix,
    ) -> Result<(), Fault> {
        self.paint(protocol.current_line(), leds, RELEASED_COLOR)
    }

    /// Open the valves of the current line, closing all others
    fn activate<const N: usize>(
        &mut self,
        protocol: &Protocol<N>,
        leds: &mut LedMatrix,
        now: Instant,
    ) -> Result<(), Fault> {
        self.tick = now;
        self.paint(protocol.last_activated_line(), leds, RELEASED_COLOR)?;

        self.channels.clear();
        for p in protocol.current_line().points() {
            let valve = self.translator.gridpoint_to_valve(p)?;
            // Valve 0 means no valve at this point, which is fatal as well
            let addr = self.translator.valve_to_output_address(valve)?;
            self.channels.add(addr)?;
            leds.set_point(&self.translator, p, ACTIVE_COLOR)?;
        }
        self.channels.commit()?;

        log::debug!(
            "playback: line {:?} active, {} valves",
            protocol.position(),
            protocol.current_line().len()
        );
        Ok(())
    }

    fn paint(&self, line: &Line, leds: &mut LedMatrix, color: RGB8) -> Result<(), Fault> {
        for p in line.points() {
            leds.set_point(&self.translator, p, color)?;
        }
        Ok(())
    }

    /// Close every valve
    pub fn close_all(&mut self) -> Result<(), Fault> {
        self.channels.clear();
        self.channels.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::GridPoint, tables::WIRING};

    #[derive(Default)]
    struct Ports([u16; 8]);

    impl PortExpander for Ports {
        type Error = ();

        fn configure_outputs(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn write_port(&mut self, port: u8, value: u16) -> Result<(), ()> {
            self.0[usize::from(port)] = value;
            Ok(())
        }
    }

    fn setup(lines: &[&[GridPoint]]) -> (Player<Ports>, Protocol<8>, LedMatrix) {
        let translator = Translator::new(&WIRING).unwrap();
        let player = Player::new(translator, OutputChannels::new(Ports::default()));
        let mut protocol = Protocol::new();
        protocol.clear();
        for points in lines {
            protocol
                .add_line(&Line::from_points(100, points).unwrap())
                .unwrap();
        }
        protocol.prime_start();
        (player, protocol, LedMatrix::new())
    }

    fn led(player: &Player<Ports>, leds: &LedMatrix, p: GridPoint) -> RGB8 {
        let idx = player.translator().gridpoint_to_led(p).unwrap();
        leds.pixels()[usize::from(idx)]
    }

    const A: GridPoint = GridPoint::new(-6, 7); // valve 1, port 0 bit 0
    const B: GridPoint = GridPoint::new(7, 6); // valve 112, port 7 bit 13

    #[test]
    fn first_update_fires_immediately() {
        let (mut player, mut protocol, mut leds) = setup(&[&[A], &[B]]);
        let t0 = Instant::from_millis(5000);
        assert!(player.update(&mut protocol, &mut leds, t0).unwrap());
        assert_eq!(protocol.position(), Some(0));
        assert_eq!(player.channels().expander().0[0], 0b1);
        assert_eq!(led(&player, &leds, A), ACTIVE_COLOR);
    }

    #[test]
    fn advances_after_duration() {
        let (mut player, mut protocol, mut leds) = setup(&[&[A], &[B]]);
        let t0 = Instant::from_millis(5000);
        player.update(&mut protocol, &mut leds, t0).unwrap();
        assert!(
            !player
                .update(&mut protocol, &mut leds, t0 + Duration::from_millis(99))
                .unwrap()
        );
        assert!(
            player
                .update(&mut protocol, &mut leds, t0 + Duration::from_millis(100))
                .unwrap()
        );
        assert_eq!(protocol.position(), Some(1));
        let ports = player.channels().expander().0;
        assert_eq!(ports[0], 0);
        assert_eq!(ports[7], 1 << 13);
        assert_eq!(led(&player, &leds, A), RELEASED_COLOR);
        assert_eq!(led(&player, &leds, B), ACTIVE_COLOR);
    }

    #[test]
    fn jump_releases_outgoing_line() {
        let (mut player, mut protocol, mut leds) = setup(&[&[A], &[B]]);
        let t0 = Instant::from_millis(0);
        player.update(&mut protocol, &mut leds, t0).unwrap();
        player
            .jump(&mut protocol, &mut leds, Jump::Back, t0)
            .unwrap();
        assert_eq!(protocol.position(), Some(1));
        assert_eq!(led(&player, &leds, A), RELEASED_COLOR);
        assert_eq!(led(&player, &leds, B), ACTIVE_COLOR);
        assert!(protocol.last_activated_line().is_empty());
    }

    #[test]
    fn point_without_valve_is_fatal() {
        let (mut player, mut protocol, mut leds) = setup(&[&[GridPoint::new(0, 0)]]);
        assert_eq!(
            player.update(&mut protocol, &mut leds, Instant::from_millis(0)),
            Err(Fault::ValveToAddress(0))
        );
    }

    #[test]
    fn empty_protocol_does_nothing() {
        let (mut player, mut protocol, mut leds) = setup(&[]);
        assert!(!player.update(&mut protocol, &mut leds, Instant::from_millis(0)).unwrap());
        assert!(player.channels().all_zero());
    }
}
