//! Observer seams: how the core signals the presentation layer.
//!
//! The state machine never renders anything; it calls into these traits
//! and the UI (or a test double) decides what to do. Both observers are
//! optional — a headless peer simply installs none.

use snapdeck_cards::Card;

/// Receives in-round view updates.
pub trait DeckObserver: Send {
    /// The shared table card changed.
    fn deck_card_changed(&mut self, card: &Card);

    /// The local player's hand card changed.
    fn hand_card_changed(&mut self, card: &Card);
}

/// Receives lobby/waiting-room view updates.
pub trait WaitingRoomObserver: Send {
    /// The roster changed; `names` is the full list in join order.
    fn peer_list_changed(&mut self, names: &[String]);

    /// The session is over before (or despite) starting — the host is
    /// gone. Fired at most once.
    fn waiting_room_closed(&mut self);

    /// The game is starting: dismiss the waiting room, present the
    /// game view.
    fn game_view_requested(&mut self);
}
