//! Deduplicate the Hermes frame registry into a frame table.
//!
//! Deduplication is by frame id, not by content: two registry entries with
//! identical names stay two frames. Every registry entry gets exactly one
//! frame, whether or not a sample reaches it.

use crate::parser::{parse_frame_name, Frame, FrameId, HermesStackFrame};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Deduplicated frames plus the id → index lookup used by the stack builder
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    pub frames: Vec<Frame>,
    index_by_id: HashMap<FrameId, usize>,
}

impl FrameTable {
    /// Frame-table index of a registry frame
    pub fn index_of(&self, frame_id: FrameId) -> Option<usize> {
        self.index_by_id.get(&frame_id).copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

/// Build the frame table from the registry
///
/// **Public** - second conversion stage
///
/// Indices follow registry iteration order, which is ascending frame id.
pub fn build_frame_table(registry: &BTreeMap<FrameId, HermesStackFrame>) -> FrameTable {
    let mut table = FrameTable {
        frames: Vec::with_capacity(registry.len()),
        index_by_id: HashMap::with_capacity(registry.len()),
    };

    for (&frame_id, raw) in registry {
        table.index_by_id.insert(frame_id, table.frames.len());
        table.frames.push(normalize_frame(frame_id, raw));
    }

    debug!("Built frame table with {} frames", table.frames.len());

    table
}

fn normalize_frame(frame_id: FrameId, raw: &HermesStackFrame) -> Frame {
    let name = parse_frame_name(&raw.name);

    Frame {
        function: name.function,
        file: name.file,
        line: parse_position(frame_id, "line", raw.line.as_deref()),
        column: parse_position(frame_id, "column", raw.column.as_deref()),
    }
}

/// Absent or unparseable positions stay absent
fn parse_position(frame_id: FrameId, field: &str, value: Option<&str>) -> Option<u32> {
    let value = value?;
    match value.trim().parse() {
        Ok(position) => Some(position),
        Err(_) => {
            debug!("Frame {} has unparseable {} {:?}, leaving it unset", frame_id, field, value);
            None
        }
    }
}
