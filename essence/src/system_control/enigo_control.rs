use std::sync::Mutex;

use anyhow::{anyhow, Result};
use enigo::{Enigo, MouseButton, MouseControllable};

use super::InputControl;

pub struct EnigoControl {
    enigo: Mutex<Enigo>,
}

impl EnigoControl {
    pub fn new() -> Self {
        EnigoControl {
            enigo: Mutex::new(Enigo::new()),
        }
    }
}

impl Default for EnigoControl {
    fn default() -> Self {
        Self::new()
    }
}

impl InputControl for EnigoControl {
    fn mouse_move_to(&self, x: i32, y: i32) -> Result<()> {
        let mut enigo = self.enigo.lock().map_err(|_| anyhow!("enigo lock poisoned"))?;
        enigo.mouse_move_to(x, y);
        Ok(())
    }

    fn mouse_click(&self) -> Result<()> {
        let mut enigo = self.enigo.lock().map_err(|_| anyhow!("enigo lock poisoned"))?;
        enigo.mouse_click(MouseButton::Left);
        Ok(())
    }
}
