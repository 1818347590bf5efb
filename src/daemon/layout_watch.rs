//! X11 XKB locked-group watcher.
//!
//! Subscribes once at startup to state-notify events for the core keyboard
//! and forwards locked-group changes. The wait is a blocking read of the
//! X event stream; no polling is involved.

use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xkb::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

use crate::error::{KbdError, Result};

/// Connection to the display with an active XKB event subscription.
pub struct LayoutWatcher {
    conn: RustConnection,
}

impl LayoutWatcher {
    /// Connect to the default display and subscribe to state notifications
    /// for the core keyboard.
    ///
    /// # Errors
    /// Fails when no display is reachable or the server does not speak XKB.
    pub fn connect() -> Result<Self> {
        let (conn, _screen) = x11rb::connect(None)?;

        let reply = conn.xkb_use_extension(1, 0)?.reply()?;
        if !reply.supported {
            return Err(KbdError::XkbUnsupported);
        }

        // Select all state-notify detail bits; the watch loop filters for
        // group-lock changes.
        conn.xkb_select_events(
            xkb::ID::USE_CORE_KBD.into(),
            xkb::EventType::from(0u16),
            xkb::EventType::STATE_NOTIFY,
            xkb::MapPart::from(0u16),
            xkb::MapPart::from(0u16),
            &xkb::SelectEventsAux::new(),
        )?
        .check()?;

        Ok(Self { conn })
    }

    /// Locked group currently active on the core keyboard.
    pub fn current_group(&self) -> Result<u8> {
        let state = self
            .conn
            .xkb_get_state(xkb::ID::USE_CORE_KBD.into())?
            .reply()?;
        Ok(state.locked_group.into())
    }

    /// Block on the event stream, invoking the callback with each newly
    /// locked group.
    ///
    /// Only returns when the connection breaks or the callback fails;
    /// under normal operation the loop runs until process exit.
    pub fn watch(&self, mut on_group: impl FnMut(u8) -> Result<()>) -> Result<()> {
        loop {
            if let Event::XkbStateNotify(event) = self.conn.wait_for_event()? {
                let changed = u16::from(event.changed);
                if changed & u16::from(xkb::StatePart::GROUP_LOCK) != 0 {
                    on_group(event.locked_group.into())?;
                }
            }
        }
    }
}
