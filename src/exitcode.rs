//! Process exit codes, following BSD sysexits.h

/// Bad flags or no subcommand
pub const USAGE: i32 = 64;

/// Outline file is not a valid outline
pub const DATAERR: i32 = 65;

/// Requested node label does not exist
pub const NOINPUT: i32 = 66;

/// A tree invariant was violated while running a command
pub const SOFTWARE: i32 = 70;

/// Outline file could not be read
pub const IOERR: i32 = 74;

/// Settings could not be loaded
pub const CONFIG: i32 = 78;
