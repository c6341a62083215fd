// ── State store ──
//
// Insertion-ordered camera and photo records with change notification.
// Replies and events are folded in by the session; nothing here talks
// to the transport.

mod collection;
mod merge;
mod state_store;

pub use state_store::StateStore;
