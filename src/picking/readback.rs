/// Guards the single staging buffer: at most one readback is in flight, and
/// each remembers the scene generation it was issued against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickReadback {
    in_flight: Option<u64>,
}

impl PickReadback {
    /// Whether a copy has been issued and its map not yet consumed.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record a new readback for scene generation `generation`. Returns
    /// `false` (and changes nothing) if one is already in flight.
    pub fn begin(&mut self, generation: u64) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(generation);
        true
    }

    /// Consume the in-flight readback, returning its generation.
    pub fn finish(&mut self) -> Option<u64> {
        self.in_flight.take()
    }
}
