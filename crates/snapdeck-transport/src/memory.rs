//! In-process transport: a hub of directly-connected endpoints.
//!
//! `MemoryHub` stands in for a real peer-to-peer transport in tests and
//! demos. Each endpoint gets an unbounded inbound queue; the hub fans
//! deliveries out synchronously, so per-sender ordering holds trivially
//! and a broadcast never loops back to its sender.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use snapdeck_cards::Deck;
use snapdeck_protocol::{PeerId, Recipient, StructuredMessage};

use crate::{Inbound, PeerTransport};

#[derive(Default)]
struct HubInner {
    /// Connected endpoints: identity → (display name, inbound queue).
    peers: HashMap<PeerId, (String, UnboundedSender<Inbound>)>,
    /// Join order, so discovery announcements are deterministic.
    order: Vec<PeerId>,
}

impl HubInner {
    /// Delivers to one peer, silently dropping if its receiver is gone.
    fn deliver(&self, to: PeerId, inbound: Inbound) {
        if let Some((_, queue)) = self.peers.get(&to) {
            let _ = queue.send(inbound);
        }
    }

    /// Delivers to every peer except `from`.
    fn broadcast(&self, from: PeerId, inbound: Inbound) {
        for identity in &self.order {
            if *identity != from {
                self.deliver(*identity, inbound.clone());
            }
        }
    }
}

/// A shared in-memory "network" connecting [`MemoryEndpoint`]s.
#[derive(Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
}

impl MemoryHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a new peer and returns its transport handle plus the
    /// inbound queue to drain into the peer's game manager.
    ///
    /// Discovery is announced both ways: every existing peer receives
    /// `PeerJoined` for the newcomer, and the newcomer receives one
    /// `PeerJoined` per existing peer, in attach order.
    pub fn attach(
        &self,
        name: &str,
        identity: PeerId,
    ) -> (MemoryEndpoint, UnboundedReceiver<Inbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("hub lock poisoned");

        inner.broadcast(
            identity,
            Inbound::PeerJoined {
                name: name.to_string(),
                identity,
            },
        );
        for existing in inner.order.clone() {
            let (existing_name, _) = &inner.peers[&existing];
            let announcement = Inbound::PeerJoined {
                name: existing_name.clone(),
                identity: existing,
            };
            inner.deliver(identity, announcement);
        }

        inner.peers.insert(identity, (name.to_string(), tx));
        inner.order.push(identity);
        tracing::debug!(%identity, name, "peer attached to memory hub");

        (
            MemoryEndpoint {
                identity,
                inner: Arc::clone(&self.inner),
            },
            rx,
        )
    }

    /// Detaches a peer, announcing `PeerLeft` to everyone remaining.
    pub fn detach(&self, identity: PeerId) {
        let mut inner = self.inner.lock().expect("hub lock poisoned");
        if inner.peers.remove(&identity).is_none() {
            return;
        }
        inner.order.retain(|id| *id != identity);
        inner.broadcast(identity, Inbound::PeerLeft(identity));
        tracing::debug!(%identity, "peer detached from memory hub");
    }
}

/// One peer's handle onto a [`MemoryHub`].
#[derive(Clone)]
pub struct MemoryEndpoint {
    identity: PeerId,
    inner: Arc<Mutex<HubInner>>,
}

impl PeerTransport for MemoryEndpoint {
    fn send_structured(&self, recipient: Recipient, message: &StructuredMessage) {
        let inner = self.inner.lock().expect("hub lock poisoned");
        let inbound = Inbound::Structured {
            sender: self.identity,
            message: message.clone(),
        };
        match recipient {
            Recipient::All => inner.broadcast(self.identity, inbound),
            Recipient::Peer(peer) => inner.deliver(peer, inbound),
        }
    }

    fn send_binary(&self, frame: &[u8]) {
        let inner = self.inner.lock().expect("hub lock poisoned");
        inner.broadcast(self.identity, Inbound::Binary(frame.to_vec()));
    }

    fn broadcast_deck(&self, deck: &Deck) {
        let inner = self.inner.lock().expect("hub lock poisoned");
        inner.broadcast(self.identity, Inbound::Deck(deck.clone()));
    }

    fn local_identity(&self) -> PeerId {
        self.identity
    }

    fn begin_hosting(&self) {
        tracing::debug!(identity = %self.identity, "hosting (memory hub is always visible)");
    }

    fn stop_advertising(&self) {
        tracing::debug!(identity = %self.identity, "stopped advertising");
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut UnboundedReceiver<Inbound>) -> Vec<Inbound> {
        let mut out = Vec::new();
        while let Ok(inbound) = rx.try_recv() {
            out.push(inbound);
        }
        out
    }

    #[test]
    fn test_attach_announces_discovery_both_ways() {
        let hub = MemoryHub::new();
        let (_a, mut rx_a) = hub.attach("alice", PeerId(1));
        let (_b, mut rx_b) = hub.attach("bob", PeerId(2));

        // Alice learns about bob.
        let seen_by_a = drain(&mut rx_a);
        assert!(matches!(
            &seen_by_a[..],
            [Inbound::PeerJoined { identity: PeerId(2), .. }]
        ));

        // Bob learns about alice, who attached first.
        let seen_by_b = drain(&mut rx_b);
        assert!(matches!(
            &seen_by_b[..],
            [Inbound::PeerJoined { identity: PeerId(1), .. }]
        ));
    }

    #[test]
    fn test_broadcast_never_loops_back_to_sender() {
        let hub = MemoryHub::new();
        let (a, mut rx_a) = hub.attach("alice", PeerId(1));
        let (_b, mut rx_b) = hub.attach("bob", PeerId(2));
        drain(&mut rx_a);
        drain(&mut rx_b);

        a.send_binary(&[2, 4, 7]);

        assert!(drain(&mut rx_a).is_empty(), "sender must not hear itself");
        assert!(matches!(
            &drain(&mut rx_b)[..],
            [Inbound::Binary(frame)] if frame == &[2, 4, 7]
        ));
    }

    #[test]
    fn test_unicast_reaches_only_the_target() {
        let hub = MemoryHub::new();
        let (a, mut rx_a) = hub.attach("alice", PeerId(1));
        let (_b, mut rx_b) = hub.attach("bob", PeerId(2));
        let (_c, mut rx_c) = hub.attach("carol", PeerId(3));
        for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
            drain(rx);
        }

        a.send_structured(
            Recipient::Peer(PeerId(3)),
            &StructuredMessage::StartGame,
        );

        assert!(drain(&mut rx_b).is_empty());
        assert!(matches!(
            &drain(&mut rx_c)[..],
            [Inbound::Structured { sender: PeerId(1), message: StructuredMessage::StartGame }]
        ));
    }

    #[test]
    fn test_detach_announces_peer_left_to_everyone_else() {
        let hub = MemoryHub::new();
        let (_a, mut rx_a) = hub.attach("alice", PeerId(1));
        let (_b, mut rx_b) = hub.attach("bob", PeerId(2));
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.detach(PeerId(2));

        assert!(matches!(
            &drain(&mut rx_a)[..],
            [Inbound::PeerLeft(PeerId(2))]
        ));
        // Detaching an unknown peer is a no-op.
        hub.detach(PeerId(9));
        assert!(drain(&mut rx_a).is_empty());
    }

    #[test]
    fn test_per_sender_order_is_preserved() {
        let hub = MemoryHub::new();
        let (a, _rx_a) = hub.attach("alice", PeerId(1));
        let (_b, mut rx_b) = hub.attach("bob", PeerId(2));
        drain(&mut rx_b);

        for i in 0..5u8 {
            a.send_binary(&[2, i, 0]);
        }

        let frames: Vec<u8> = drain(&mut rx_b)
            .into_iter()
            .map(|inbound| match inbound {
                Inbound::Binary(frame) => frame[1],
                other => panic!("unexpected delivery: {other:?}"),
            })
            .collect();
        assert_eq!(frames, vec![0, 1, 2, 3, 4]);
    }
}
