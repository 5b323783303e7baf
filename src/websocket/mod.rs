//! WebSocket View Sessions
//!
//! The dashboard page connects to `/ws`, sends `init` once, then one
//! `set_control` per change. The server replies with `update` messages
//! carrying only the outputs bound to that control.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8050/ws');
//! ws.onopen = () => ws.send(JSON.stringify({type: 'init'}));
//! ws.onmessage = (event) => console.log(JSON.parse(event.data));
//! ```

mod handler;
mod messages;

pub use handler::{websocket_handler, Session};
pub use messages::{ClientMessage, ServerMessage};
