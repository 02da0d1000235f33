use crate::topology::Coord;
use crate::VehicleId;
use serde_json::{json, Value};
use slotmap::Key;

/// The notable events of one simulated tick.
#[derive(Default)]
pub(crate) struct DebugFrame {
    events: Vec<Value>,
}

impl DebugFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn spawn(&mut self, id: VehicleId, pos: Coord) {
        self.events.push(json!({
            "type": "spawn",
            "vehicle": id.data().as_ffi(),
            "pos": [pos.x, pos.y],
        }))
    }

    pub fn turn(&mut self, id: VehicleId, pos: Coord) {
        self.events.push(json!({
            "type": "turn",
            "vehicle": id.data().as_ffi(),
            "pos": [pos.x, pos.y],
        }))
    }

    pub fn blocked(&mut self, id: VehicleId, pos: Coord, by: VehicleId) {
        self.events.push(json!({
            "type": "blocked",
            "vehicle": id.data().as_ffi(),
            "pos": [pos.x, pos.y],
            "by": by.data().as_ffi(),
        }))
    }

    pub fn to_json(&self) -> Value {
        json!(self.events)
    }
}
