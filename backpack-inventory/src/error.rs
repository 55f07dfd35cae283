use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Player '{0}' tried to interact with a closed screen")]
    ClosedScreenInteract(i32),
    #[error("Invalid inventory packet")]
    InvalidPacket,
}
