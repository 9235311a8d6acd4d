use std::sync::Arc;

use crate::error::ClickError;
use crate::settings::{ClickKind, MouseButton};

/// Clicks at the current pointer location.
pub trait ClickBackend {
    fn click(&mut self, button: MouseButton, kind: ClickKind) -> Result<(), ClickError>;
}

/// Builds a backend on the thread that will use it.
pub type BackendFactory = Arc<dyn Fn() -> Result<Box<dyn ClickBackend>, ClickError> + Send + Sync>;

pub fn backend_factory<F>(make: F) -> BackendFactory
where
    F: Fn() -> Result<Box<dyn ClickBackend>, ClickError> + Send + Sync + 'static,
{
    Arc::new(make)
}

/// The platform backend, if this build has one.
pub fn default_backend_factory() -> Option<BackendFactory> {
    #[cfg(feature = "clicking_enigo")]
    {
        Some(backend_factory(|| {
            let clicker = enigo_backend::EnigoClicker::new()?;
            Ok(Box::new(clicker) as Box<dyn ClickBackend>)
        }))
    }

    #[cfg(not(feature = "clicking_enigo"))]
    {
        None
    }
}

/// Instantiates and drops one backend to confirm input simulation works here.
pub fn probe_backend(factory: &BackendFactory) -> Result<(), ClickError> {
    factory().map(drop)
}

/// True when `pos` is one of the four corners of a `width` x `height` display.
#[must_use]
pub fn is_failsafe_point(pos: (i32, i32), display: (i32, i32)) -> bool {
    let (x, y) = pos;
    let (max_x, max_y) = (display.0 - 1, display.1 - 1);
    (x == 0 || x == max_x) && (y == 0 || y == max_y)
}

#[cfg(feature = "clicking_enigo")]
mod enigo_backend {
    use enigo::{Button, Direction, Enigo, Mouse, Settings};
    use tracing::debug;

    use super::{is_failsafe_point, ClickBackend};
    use crate::error::ClickError;
    use crate::settings::{ClickKind, MouseButton};

    pub struct EnigoClicker {
        enigo: Enigo,
    }

    impl EnigoClicker {
        pub fn new() -> Result<Self, ClickError> {
            let enigo = Enigo::new(&Settings::default()).map_err(|e| ClickError::Unavailable(format!("{e:?}")))?;
            Ok(Self { enigo })
        }

        fn check_failsafe(&self) -> Result<(), ClickError> {
            let pos = self.enigo.location().map_err(|e| ClickError::Input(format!("{e:?}")))?;
            let screen = self.enigo.main_display().map_err(|e| ClickError::Input(format!("{e:?}")))?;
            if is_failsafe_point(pos, screen) {
                debug!(?pos, display = ?screen, "pointer on fail-safe corner");
                return Err(ClickError::FailSafe);
            }
            Ok(())
        }

        fn press(&mut self, button: Button) -> Result<(), ClickError> {
            self.enigo.button(button, Direction::Click).map_err(|e| ClickError::Input(format!("{e:?}")))
        }
    }

    impl ClickBackend for EnigoClicker {
        fn click(&mut self, button: MouseButton, kind: ClickKind) -> Result<(), ClickError> {
            self.check_failsafe()?;
            let button = match button {
                MouseButton::Left => Button::Left,
                MouseButton::Right => Button::Right,
                MouseButton::Middle => Button::Middle,
            };
            self.press(button)?;
            if kind == ClickKind::Double {
                self.press(button)?;
            }
            Ok(())
        }
    }
}
