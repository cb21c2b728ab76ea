//! Binary round frames: the fast path for in-round events.
//!
//! During a round every peer is racing to match the table card, so these
//! messages are packed single-byte fields instead of JSON. Layouts:
//!
//! ```text
//! ClickAttempt  [ event=2 | deck_card | player_id ]
//! CardsBatch    [ event=12 | next_deck_card | remaining |
//!                 (player_id | last_card | cards_held)* ]
//! ```
//!
//! Every frame is length-validated in full before any field is read; a
//! trailing partial record makes the whole frame malformed.

use crate::{Event, PlayerId, ProtocolError};

/// Bytes per embedded player record in a [`RoundMessage::CardsBatch`].
const RECORD_LEN: usize = 3;

/// Fixed header length shared by both round frames.
const HEADER_LEN: usize = 3;

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One player's slice of the draw ledger inside a `CardsBatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRecord {
    /// The host-assigned game id this record belongs to.
    pub player: PlayerId,
    /// Deck index of the player's newest hand card.
    pub last_card: u8,
    /// Total cards the player has drawn so far.
    pub cards_held: u8,
}

// ---------------------------------------------------------------------------
// RoundMessage
// ---------------------------------------------------------------------------

/// A decoded in-round binary frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundMessage {
    /// A peer's claim that it matched a symbol on the table card it was
    /// looking at. `deck_card` pins the claim to that exact table card,
    /// which is what lets the host drop stale claims.
    ClickAttempt { deck_card: u8, player: PlayerId },

    /// The host's authoritative ledger update after accepting a claim
    /// (or at game start): the new table card, how many cards remain
    /// undrawn, and one record per roster player.
    CardsBatch {
        next_deck_card: u8,
        remaining: u8,
        records: Vec<PlayerRecord>,
    },
}

impl RoundMessage {
    /// The stable event code shared with the structured encoding.
    pub fn event(&self) -> Event {
        match self {
            Self::ClickAttempt { .. } => Event::ClickAttempt,
            Self::CardsBatch { .. } => Event::CardsBatch,
        }
    }

    /// Packs this message into its wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::ClickAttempt { deck_card, player } => {
                vec![Event::ClickAttempt.code(), *deck_card, player.0]
            }
            Self::CardsBatch {
                next_deck_card,
                remaining,
                records,
            } => {
                let mut frame =
                    Vec::with_capacity(HEADER_LEN + records.len() * RECORD_LEN);
                frame.push(Event::CardsBatch.code());
                frame.push(*next_deck_card);
                frame.push(*remaining);
                for record in records {
                    frame.push(record.player.0);
                    frame.push(record.last_card);
                    frame.push(record.cards_held);
                }
                frame
            }
        }
    }

    /// Parses a frame, validating its full length before reading fields.
    ///
    /// # Errors
    /// - [`ProtocolError::Truncated`] — empty buffer, a frame shorter
    ///   than its header, or a partial trailing record.
    /// - [`ProtocolError::UnknownEvent`] — unrecognized first byte, or
    ///   an event that is never carried in the binary encoding.
    pub fn decode(frame: &[u8]) -> Result<Self, ProtocolError> {
        let &code = frame.first().ok_or(ProtocolError::Truncated {
            expected: 1,
            actual: 0,
        })?;

        match Event::try_from(code)? {
            Event::ClickAttempt => {
                if frame.len() < HEADER_LEN {
                    return Err(ProtocolError::Truncated {
                        expected: HEADER_LEN,
                        actual: frame.len(),
                    });
                }
                Ok(Self::ClickAttempt {
                    deck_card: frame[1],
                    player: PlayerId(frame[2]),
                })
            }
            Event::CardsBatch => {
                if frame.len() < HEADER_LEN {
                    return Err(ProtocolError::Truncated {
                        expected: HEADER_LEN,
                        actual: frame.len(),
                    });
                }
                let body = &frame[HEADER_LEN..];
                if body.len() % RECORD_LEN != 0 {
                    // Round up to the next whole record for the message.
                    let whole = body.len() / RECORD_LEN + 1;
                    return Err(ProtocolError::Truncated {
                        expected: HEADER_LEN + whole * RECORD_LEN,
                        actual: frame.len(),
                    });
                }
                let records = body
                    .chunks_exact(RECORD_LEN)
                    .map(|chunk| PlayerRecord {
                        player: PlayerId(chunk[0]),
                        last_card: chunk[1],
                        cards_held: chunk[2],
                    })
                    .collect();
                Ok(Self::CardsBatch {
                    next_deck_card: frame[1],
                    remaining: frame[2],
                    records,
                })
            }
            other => Err(ProtocolError::UnknownEvent(other.code())),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u8) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_click_attempt_encodes_three_bytes() {
        let msg = RoundMessage::ClickAttempt {
            deck_card: 4,
            player: pid(7),
        };
        assert_eq!(msg.encode(), vec![2, 4, 7]);
    }

    #[test]
    fn test_click_attempt_round_trip() {
        let msg = RoundMessage::ClickAttempt {
            deck_card: 12,
            player: pid(3),
        };
        assert_eq!(RoundMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_cards_batch_layout_matches_documented_bytes() {
        let msg = RoundMessage::CardsBatch {
            next_deck_card: 3,
            remaining: 10,
            records: vec![
                PlayerRecord { player: pid(0), last_card: 0, cards_held: 1 },
                PlayerRecord { player: pid(1), last_card: 2, cards_held: 1 },
            ],
        };
        assert_eq!(msg.encode(), vec![12, 3, 10, 0, 0, 1, 1, 2, 1]);
    }

    #[test]
    fn test_cards_batch_round_trip_with_no_records() {
        // An empty roster is degenerate but must still frame correctly.
        let msg = RoundMessage::CardsBatch {
            next_deck_card: 0,
            remaining: 13,
            records: vec![],
        };
        assert_eq!(RoundMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_cards_batch_round_trip_with_many_records() {
        let records: Vec<PlayerRecord> = (0..8)
            .map(|i| PlayerRecord {
                player: pid(i),
                last_card: i * 2,
                cards_held: i + 1,
            })
            .collect();
        let msg = RoundMessage::CardsBatch {
            next_deck_card: 16,
            remaining: 41,
            records,
        };
        assert_eq!(RoundMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_decode_empty_buffer_returns_truncated() {
        assert!(matches!(
            RoundMessage::decode(&[]),
            Err(ProtocolError::Truncated { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_decode_short_click_attempt_returns_truncated() {
        assert!(matches!(
            RoundMessage::decode(&[2, 4]),
            Err(ProtocolError::Truncated { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_decode_short_cards_batch_header_returns_truncated() {
        assert!(matches!(
            RoundMessage::decode(&[12, 5]),
            Err(ProtocolError::Truncated { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_decode_partial_record_returns_truncated() {
        // Header plus one full record plus two stray bytes.
        let frame = [12, 3, 10, 0, 0, 1, 1, 2];
        assert!(matches!(
            RoundMessage::decode(&frame),
            Err(ProtocolError::Truncated { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_decode_unknown_event_code_returns_error() {
        assert!(matches!(
            RoundMessage::decode(&[99, 0, 0]),
            Err(ProtocolError::UnknownEvent(99))
        ));
    }

    #[test]
    fn test_decode_structured_only_event_returns_unknown() {
        // StartGame is a valid event but never travels as a binary frame.
        assert!(matches!(
            RoundMessage::decode(&[10, 0, 0]),
            Err(ProtocolError::UnknownEvent(10))
        ));
    }

    #[test]
    fn test_event_mapping() {
        let click = RoundMessage::ClickAttempt { deck_card: 0, player: pid(0) };
        assert_eq!(click.event(), Event::ClickAttempt);
        let batch = RoundMessage::CardsBatch {
            next_deck_card: 0,
            remaining: 0,
            records: vec![],
        };
        assert_eq!(batch.event(), Event::CardsBatch);
    }
}
