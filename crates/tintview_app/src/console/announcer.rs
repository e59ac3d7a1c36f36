/// Receives accessibility announcements from the state machine.
pub trait Announcer {
    fn announce(&mut self, text: &str);
}

/// Speaks by printing; stands in for a screen reader bridge.
pub struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn announce(&mut self, text: &str) {
        println!("[announce] {text}");
    }
}
