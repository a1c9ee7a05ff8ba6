// Library-wide constants

// Upper bound on the number of note commitments a single transfer may
// consume or emit
// Curve work is linear in the note count, so an unbounded transfer would
// let a single transaction monopolize a handler thread
pub const MAX_NOTES_PER_SIDE: usize = 255;
