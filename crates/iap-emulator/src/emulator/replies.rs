//! Lazily produced replies
//!
//! Item-name requests carry an accessory-chosen length, so their replies are
//! generated one at a time as they are sent rather than collected up front.

use std::vec;

use iap_core::{AirCommand, ItemName, ItemType, Packet, Parameters};

use super::IpodEmulator;

/// Replies to one dispatched packet, in send order
pub struct Replies<'a> {
    inner: Inner<'a>,
}

enum Inner<'a> {
    Packets(vec::IntoIter<Packet>),
    ItemNames {
        emulator: &'a IpodEmulator,
        item_type: ItemType,
        next: u32,
        remaining: u32,
    },
}

impl<'a> Replies<'a> {
    pub(super) fn none() -> Self {
        Vec::new().into()
    }

    /// One name reply per offset, `start` onwards, stopping at `u32::MAX`
    pub(super) fn item_names(
        emulator: &'a IpodEmulator,
        item_type: ItemType,
        start: u32,
        length: u32,
    ) -> Self {
        Self {
            inner: Inner::ItemNames {
                emulator,
                item_type,
                next: start,
                remaining: length,
            },
        }
    }
}

impl From<Vec<Packet>> for Replies<'_> {
    fn from(packets: Vec<Packet>) -> Self {
        Self {
            inner: Inner::Packets(packets.into_iter()),
        }
    }
}

impl Iterator for Replies<'_> {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        match &mut self.inner {
            Inner::Packets(packets) => packets.next(),
            Inner::ItemNames {
                emulator,
                item_type,
                next,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let offset = *next;
                *remaining -= 1;
                match offset.checked_add(1) {
                    Some(following) => *next = following,
                    None => *remaining = 0,
                }

                let name = emulator.hooks.item_name(*item_type, offset);
                Some(Packet::advanced(
                    AirCommand::ResItemName,
                    Parameters::ItemName(ItemName { offset, name }),
                ))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Packets(packets) => packets.size_hint(),
            Inner::ItemNames { remaining, .. } => {
                let remaining = usize::try_from(*remaining).unwrap_or(usize::MAX);
                (0, Some(remaining))
            }
        }
    }
}
