use crate::error::InventoryError;

/// The closed set of player slot-interaction intents, decoded from the raw
/// (mode, button) pair carried by the host's click packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Pickup(MouseButton),
    QuickMove,
    Swap(SwapSlot),
    /// Middle-click copy. Pure presentation on the client; the server moves
    /// nothing for it.
    Peek,
    Discard(DiscardKind),
    QuickCraft(DragStage),
    PickupRemaining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Where a number-key swap pulls its other stack from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSlot {
    Hotbar(u8),
    Offhand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardKind {
    Single,
    FullStack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStage {
    Start(DragButton),
    AddSlot,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    Left,
    Right,
    Middle,
}

impl TransferKind {
    pub fn parse(mode: u8, button: i8) -> Result<Self, InventoryError> {
        match mode {
            0 => match button {
                0 => Ok(Self::Pickup(MouseButton::Left)),
                1 => Ok(Self::Pickup(MouseButton::Right)),
                _ => Err(InventoryError::InvalidPacket),
            },
            // Both buttons do the same here, so we omit it
            1 => Ok(Self::QuickMove),
            2 => match button {
                0..=8 => Ok(Self::Swap(SwapSlot::Hotbar(button as u8))),
                40 => Ok(Self::Swap(SwapSlot::Offhand)),
                _ => Err(InventoryError::InvalidPacket),
            },
            3 => Ok(Self::Peek),
            4 => match button {
                0 => Ok(Self::Discard(DiscardKind::Single)),
                1 => Ok(Self::Discard(DiscardKind::FullStack)),
                _ => Err(InventoryError::InvalidPacket),
            },
            5 => match button {
                0 => Ok(Self::QuickCraft(DragStage::Start(DragButton::Left))),
                4 => Ok(Self::QuickCraft(DragStage::Start(DragButton::Right))),
                8 => Ok(Self::QuickCraft(DragStage::Start(DragButton::Middle))),
                1 | 5 | 9 => Ok(Self::QuickCraft(DragStage::AddSlot)),
                2 | 6 | 10 => Ok(Self::QuickCraft(DragStage::End)),
                _ => Err(InventoryError::InvalidPacket),
            },
            6 => Ok(Self::PickupRemaining),
            _ => Err(InventoryError::InvalidPacket),
        }
    }

    /// The one kind the server treats as a pure read.
    pub const fn is_peek(&self) -> bool {
        matches!(self, Self::Peek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_mode() {
        assert_eq!(
            TransferKind::parse(0, 0).unwrap(),
            TransferKind::Pickup(MouseButton::Left)
        );
        assert_eq!(
            TransferKind::parse(0, 1).unwrap(),
            TransferKind::Pickup(MouseButton::Right)
        );
        assert_eq!(TransferKind::parse(1, 0).unwrap(), TransferKind::QuickMove);
        assert_eq!(
            TransferKind::parse(2, 3).unwrap(),
            TransferKind::Swap(SwapSlot::Hotbar(3))
        );
        assert_eq!(
            TransferKind::parse(2, 40).unwrap(),
            TransferKind::Swap(SwapSlot::Offhand)
        );
        assert_eq!(TransferKind::parse(3, 2).unwrap(), TransferKind::Peek);
        assert_eq!(
            TransferKind::parse(4, 1).unwrap(),
            TransferKind::Discard(DiscardKind::FullStack)
        );
        assert_eq!(
            TransferKind::parse(5, 4).unwrap(),
            TransferKind::QuickCraft(DragStage::Start(DragButton::Right))
        );
        assert_eq!(
            TransferKind::parse(5, 9).unwrap(),
            TransferKind::QuickCraft(DragStage::AddSlot)
        );
        assert_eq!(
            TransferKind::parse(6, 0).unwrap(),
            TransferKind::PickupRemaining
        );
    }

    #[test]
    fn malformed_pairs_are_invalid_packets() {
        for (mode, button) in [(0, 2), (2, 9), (2, 41), (4, 7), (5, 3), (7, 0)] {
            assert!(matches!(
                TransferKind::parse(mode, button),
                Err(InventoryError::InvalidPacket)
            ));
        }
    }
}
