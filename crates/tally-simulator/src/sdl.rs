//! SDL2 window front end: the light ring on screen, keys as inputs.
//!
//! | Key      | Input                 |
//! |----------|-----------------------|
//! | Space    | external pad          |
//! | A        | on-board button A     |
//! | B        | button B, show totals |
//! | Q / Esc  | quit                  |
//!
//! Key presses are latched until the control loop polls them, so a press
//! during a tick is never lost. Presses during a blocking display sequence are
//! dropped, the same as on the device.

use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyleBuilder};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use embedded_hal::delay::DelayNs;
use log::{error, info};
use tally_core::io::SEGMENT_COUNT;
use tally_core::{Display, EventSource};

/// Window edge length in display pixels.
const SCREEN_PX: u32 = 240;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Radius of the ring the lights sit on.
const RING_RADIUS: f32 = 90.0;

const LIGHT_DIAMETER: u32 = 30;

const LAMP_DIAMETER: u32 = 16;

/// Longest stretch, in µs, a blocking delay sleeps before pumping window events.
const PUMP_SLICE_US: u32 = 10_000;

const OUTLINE: Rgb888 = Rgb888::new(60, 60, 60);

const LAMP_OFF: Rgb888 = Rgb888::new(60, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Pad,
    ButtonA,
    ButtonB,
}

struct Shared {
    display: SimulatorDisplay<Rgb888>,
    window: Window,
    frame: [Rgb888; SEGMENT_COUNT],
    lamp: bool,
    pad: bool,
    button_a: bool,
    button_b: bool,
}

impl Shared {
    /// Screen angle of a physical position, clockwise from 12 o'clock.
    ///
    /// Lights sit on twelve 30° slots with the top and bottom slots empty,
    /// position 9 at the lower left and lower positions following clockwise.
    fn angle_deg(index: usize) -> f32 {
        let step = (SEGMENT_COUNT - 1 - index) as f32;
        if step < 5.0 {
            210.0 + 30.0 * step
        } else {
            30.0 + 30.0 * (step - 5.0)
        }
    }

    fn light_center(index: usize) -> Point {
        let center = (SCREEN_PX / 2) as f32;
        let theta = Self::angle_deg(index) * PI / 180.0;
        Point::new(
            (center + RING_RADIUS * theta.sin()) as i32,
            (center - RING_RADIUS * theta.cos()) as i32,
        )
    }

    fn redraw(&mut self) {
        let _ = self.display.clear(Rgb888::BLACK);

        for (index, color) in self.frame.iter().enumerate() {
            let style = PrimitiveStyleBuilder::new()
                .fill_color(*color)
                .stroke_color(OUTLINE)
                .stroke_width(2)
                .build();
            let _ = Circle::with_center(Self::light_center(index), LIGHT_DIAMETER)
                .into_styled(style)
                .draw(&mut self.display);
        }

        let lamp_color = if self.lamp { Rgb888::RED } else { LAMP_OFF };
        let center = Point::new((SCREEN_PX / 2) as i32, (SCREEN_PX / 2) as i32);
        let _ = Circle::with_center(center, LAMP_DIAMETER)
            .into_styled(PrimitiveStyleBuilder::new().fill_color(lamp_color).build())
            .draw(&mut self.display);

        self.window.update(&self.display);
    }

    /// Drain SDL events into the key latches. Exits the process on quit.
    fn pump(&mut self) {
        self.window.update(&self.display);

        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => quit(),
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => quit(),
                    Keycode::Space => self.pad = true,
                    Keycode::A => self.button_a = true,
                    Keycode::B => self.button_b = true,
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

fn quit() -> ! {
    info!("Simulator exiting");
    std::process::exit(0);
}

/// Handle to the window; hands out the display, delay and key inputs.
pub struct Frontend {
    shared: Rc<RefCell<Shared>>,
}

impl Frontend {
    pub fn open() -> Self {
        let display = SimulatorDisplay::<Rgb888>::new(Size::new(SCREEN_PX, SCREEN_PX));
        let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
        let window = Window::new("Tally Simulator", &output_settings);

        let mut shared = Shared {
            display,
            window,
            frame: [Rgb888::BLACK; SEGMENT_COUNT],
            lamp: false,
            pad: false,
            button_a: false,
            button_b: false,
        };

        // The SDL window is lazily initialized on the first `update()` call.
        // We must call `update()` once before `events()` or it will panic.
        shared.redraw();

        info!("Keys: Space=pad  A=button A  B=show totals  Q=quit");

        Self {
            shared: Rc::new(RefCell::new(shared)),
        }
    }

    pub fn ring(&self) -> Ring {
        Ring {
            shared: self.shared.clone(),
        }
    }

    pub fn key(&self, key: Key) -> KeySource {
        KeySource {
            shared: self.shared.clone(),
            key,
        }
    }

    pub fn delay(&self) -> PumpingDelay {
        PumpingDelay {
            shared: self.shared.clone(),
        }
    }
}

/// The on-screen ring as a [`Display`].
pub struct Ring {
    shared: Rc<RefCell<Shared>>,
}

impl Display for Ring {
    fn fill(&mut self, color: Rgb888) {
        let mut shared = self.shared.borrow_mut();
        shared.frame = [color; SEGMENT_COUNT];
        shared.redraw();
    }

    fn set_segment(&mut self, index: usize, color: Rgb888) {
        let mut shared = self.shared.borrow_mut();
        match shared.frame.get_mut(index) {
            Some(slot) => *slot = color,
            None => {
                error!("Light {} is not on the ring", index);
                return;
            }
        }
        shared.redraw();
    }

    fn set_status_lamp(&mut self, on: bool) {
        let mut shared = self.shared.borrow_mut();
        shared.lamp = on;
        shared.redraw();
    }

    fn show_frame(&mut self, frame: &[Rgb888; SEGMENT_COUNT]) {
        let mut shared = self.shared.borrow_mut();
        if shared.frame != *frame {
            shared.frame = *frame;
            shared.redraw();
        }
    }
}

/// A latched key press as an [`EventSource`].
pub struct KeySource {
    shared: Rc<RefCell<Shared>>,
    key: Key,
}

impl EventSource for KeySource {
    fn poll(&mut self) -> bool {
        let mut shared = self.shared.borrow_mut();
        let latch = match self.key {
            Key::Pad => &mut shared.pad,
            Key::ButtonA => &mut shared.button_a,
            Key::ButtonB => &mut shared.button_b,
        };
        core::mem::take(latch)
    }
}

/// Sleeps in short slices, keeping the window responsive while the loop blocks.
pub struct PumpingDelay {
    shared: Rc<RefCell<Shared>>,
}

impl PumpingDelay {
    fn sleep_us(&mut self, mut us: u32) {
        loop {
            let slice = us.min(PUMP_SLICE_US);
            std::thread::sleep(std::time::Duration::from_micros(u64::from(slice)));
            self.shared.borrow_mut().pump();
            us -= slice;
            if us == 0 {
                break;
            }
        }
    }
}

impl DelayNs for PumpingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleep_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.sleep_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleep_us(ms.saturating_mul(1_000));
    }
}
