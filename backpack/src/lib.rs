pub mod item;
pub mod player;
pub mod server;
pub mod world;

pub use item::{ActionResult, BackpackItem, BACKPACK_ITEM_ID};
pub use player::{Hand, Player};
pub use server::{ClickResponse, Server};
pub use world::{Side, World};
