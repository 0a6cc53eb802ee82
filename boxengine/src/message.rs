//! The message area shown next to the game (status lines, game over text).

/// A place the engine can post a single line of text to.
pub trait MessageArea {
    /// Replace the current message.
    fn print(&mut self, message: &str);

    fn clear(&mut self);
}

/// Message area that keeps the latest message in memory and logs it.
#[derive(Clone, Debug, Default)]
pub struct MessageBoard {
    current: Option<String>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl MessageArea for MessageBoard {
    fn print(&mut self, message: &str) {
        log::info!("message: {}", message);
        self.current = Some(message.to_string());
    }

    fn clear(&mut self) {
        self.current = None;
    }
}
