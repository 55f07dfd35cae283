/// Which half of the client/server pair is executing a hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Client,
    Server,
}

/// The slice of world context item hooks receive. All this mod ever asks of
/// it is which side it is on.
pub struct World {
    side: Side,
}

impl World {
    pub fn new(side: Side) -> Self {
        Self { side }
    }

    pub fn is_client(&self) -> bool {
        self.side == Side::Client
    }
}
